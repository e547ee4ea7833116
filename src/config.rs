use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use toml::Value;
use log::{debug, info};

/// Configuration storage - section_name -> key -> value
pub type Configuration = HashMap<String, HashMap<String, String>>;

/// Section consulted when neither the selected nor the requested section has a key
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "PLMANAGEMENT_CONFIG";

/// Configuration manager
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    config: Configuration,
    config_file_path: Option<PathBuf>,
    selected_section: Option<String>,
}

impl ConfigManager {
    /// Create a new ConfigManager from a Configuration (primarily for testing)
    pub fn from_config(config: Configuration) -> Self {
        Self {
            config,
            config_file_path: None,
            selected_section: None,
        }
    }

    /// Configuration with no sections
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load configuration using discovery hierarchy
    pub fn load() -> Result<Self> {
        debug!("Starting configuration discovery");

        for path in discover_config_files() {
            debug!("Attempting to load config from: {}", path.display());
            if path.exists() {
                return Self::load_from_file(path);
            }
        }

        info!("No configuration file found, using empty configuration");
        Ok(Self::empty())
    }

    /// Load configuration from explicit file path
    pub fn load_from_file(path: PathBuf) -> Result<Self> {
        debug!("Loading configuration from file: {}", path.display());

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = parse_toml_config(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!("Loaded configuration from: {}", path.display());
        Ok(Self {
            config,
            config_file_path: Some(path),
            selected_section: None,
        })
    }

    /// Path of the file this configuration was read from, if any
    pub fn config_file_path(&self) -> Option<&Path> {
        self.config_file_path.as_deref()
    }

    /// Get value from configuration with section fallback
    pub fn get_value(&self, section: &str, key: &str) -> Option<&String> {
        // Priority: selected_section -> specified section -> DEFAULT
        if let Some(selected) = &self.selected_section {
            if let Some(value) = self.config.get(selected).and_then(|s| s.get(key)) {
                return Some(value);
            }
        }

        if let Some(value) = self.config.get(section).and_then(|s| s.get(key)) {
            return Some(value);
        }

        self.config.get(DEFAULT_SECTION).and_then(|s| s.get(key))
    }

    /// Select configuration section for --config-name
    pub fn select_section(&mut self, section: String) {
        debug!("Selecting configuration section: {}", section);
        self.selected_section = Some(section);
    }

    /// Set a value, creating the section when needed
    pub fn set_value(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.config
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    /// Remove a value, returning the previous one
    pub fn remove_value(&mut self, section: &str, key: &str) -> Option<String> {
        self.config.get_mut(section).and_then(|s| s.remove(key))
    }

    /// Raw access to one section (no fallback)
    pub fn section(&self, section: &str) -> Option<&HashMap<String, String>> {
        self.config.get(section)
    }

    /// Section names, sorted
    pub fn sections(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.config.keys().map(String::as_str).collect();
        names.sort();
        names
    }

    /// Get boolean value with type conversion
    pub fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>> {
        match self.get_value(section, key) {
            Some(value) => match value.to_lowercase().as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Err(anyhow::anyhow!("Invalid boolean value for {}.{}: {}", section, key, value)),
            },
            None => Ok(None),
        }
    }

    /// Interpret a switch value; a missing key is `false`
    pub fn is_yes(&self, section: &str, key: &str) -> Result<bool> {
        match self.get_value(section, key) {
            Some(value) => match value.trim().to_lowercase().as_str() {
                "yes" | "true" | "on" | "1" => Ok(true),
                "no" | "false" | "off" | "0" | "" => Ok(false),
                _ => Err(anyhow::anyhow!("Invalid switch value for {}.{}: {}", section, key, value)),
            },
            None => Ok(false),
        }
    }

    /// Comma-separated list value, trimmed, empty entries dropped
    pub fn get_list(&self, section: &str, key: &str) -> Vec<String> {
        self.get_value(section, key)
            .map(|value| {
                value.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get log level value with type conversion
    pub fn get_log_level(&self, section: &str, key: &str) -> Result<Option<log::LevelFilter>> {
        match self.get_value(section, key) {
            Some(value) => Ok(Some(crate::logging::parse_log_level(value)?)),
            None => Ok(None),
        }
    }

    /// Get path value with type conversion
    pub fn get_path(&self, section: &str, key: &str) -> Option<PathBuf> {
        self.get_value(section, key).map(PathBuf::from)
    }

    /// Render the effective configuration as TOML
    pub fn export_toml(&self) -> Result<String> {
        let mut root = toml::Table::new();
        for (section, values) in &self.config {
            let mut table = toml::Table::new();
            for (key, value) in values {
                table.insert(key.clone(), Value::String(value.clone()));
            }
            root.insert(section.clone(), Value::Table(table));
        }
        toml::to_string(&root).context("Failed to serialise configuration")
    }
}

/// Discover configuration files in order of precedence
fn discover_config_files() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. Environment variable
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        paths.push(PathBuf::from(env_path));
    }

    // 2. XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("plmanagement").join("config.toml"));
    }

    // 3. Home directory
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".plmanagement.toml"));
    }

    // 4. Project local
    paths.push(PathBuf::from("./.plmanagement.toml"));

    debug!("Config discovery paths: {:?}", paths);
    paths
}

/// Parse TOML content to string-based configuration
fn parse_toml_config(content: &str) -> Result<Configuration> {
    let toml_value: Value = content.parse()
        .context("Failed to parse TOML content")?;

    let mut config = Configuration::new();

    if let Value::Table(table) = toml_value {
        flatten_toml_table(&table, String::new(), &mut config);
    }

    debug!("Parsed configuration: {:?}", config);
    Ok(config)
}

/// Recursively flatten TOML tables into section.subsection format
fn flatten_toml_table(table: &toml::Table, prefix: String, config: &mut Configuration) {
    for (key, value) in table {
        let section_name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::Table(subtable) => flatten_section(subtable, section_name, config),
            _ => {
                // Top-level scalar becomes a section with a single "value" key
                let mut section_map = HashMap::new();
                section_map.insert("value".to_string(), toml_value_to_string(value));
                config.insert(section_name, section_map);
            }
        }
    }
}

/// Scalars of a table form its own section; sub-tables become dotted sections
fn flatten_section(table: &toml::Table, section_name: String, config: &mut Configuration) {
    let mut section_map = HashMap::new();
    let mut has_subtables = false;

    for (key, value) in table {
        match value {
            Value::Table(subtable) => {
                has_subtables = true;
                flatten_section(subtable, format!("{}.{}", section_name, key), config);
            }
            _ => {
                section_map.insert(key.clone(), toml_value_to_string(value));
            }
        }
    }

    if !section_map.is_empty() || !has_subtables {
        config.entry(section_name).or_default().extend(section_map);
    }
}

/// Convert TOML Value to string representation
fn toml_value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        // Scalar arrays read back through get_list
        Value::Array(items) => items.iter()
            .map(toml_value_to_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Table(_) => value.to_string(),
        Value::Datetime(dt) => dt.to_string(),
    }
}
