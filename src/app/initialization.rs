//! Application initialization and configuration

use std::fs;
use std::path::Path;
use std::str::FromStr;
use anyhow::{Context, Result};
use log::{debug, info, LevelFilter};
use crate::{cli, config, logging, plugin};

/// Configuration section read for logging settings
pub const LOGGING_SECTION: &str = "logging";

/// Load configuration from `--config-file` or discovery, then apply `--config-name`
pub fn load_configuration(initial: &cli::InitialArgs) -> Result<config::ConfigManager> {
    let mut manager = match &initial.config_file {
        Some(config_file) => {
            debug!("Loading configuration from explicit file: {}", config_file.display());
            config::ConfigManager::load_from_file(config_file.clone())?
        }
        None => config::ConfigManager::load()?,
    };

    if let Some(section_name) = &initial.config_name {
        manager.select_section(section_name.clone());
    }

    Ok(manager)
}

/// Registry holding every built-in component
pub fn build_registry() -> Result<plugin::ComponentRegistry> {
    let mut registry = plugin::ComponentRegistry::new();
    plugin::builtin::register_builtins(&mut registry)
        .context("Failed to register built-in components")?;
    debug!("Registered {} component class(es)", registry.len());
    Ok(registry)
}

/// Construct the manager and load every component
pub fn create_manager(config: config::ConfigManager) -> Result<plugin::ComponentManager> {
    let mut manager = plugin::ComponentManager::new(build_registry()?);
    manager.load(config).context("Failed to load components")?;
    Ok(manager)
}

/// Write the effective configuration as TOML
pub fn handle_export_config(config: &config::ConfigManager, export_path: &Path) -> Result<()> {
    info!("Exporting configuration to: {}", export_path.display());

    let content = config.export_toml()?;
    fs::write(export_path, content)
        .with_context(|| format!("Failed to write configuration to {}", export_path.display()))?;

    println!("Configuration exported to: {}", export_path.display());
    Ok(())
}

/// Resolve logging settings from flags first, then the `[logging]` section
pub fn configure_logging(args: &cli::Args, config: &config::ConfigManager) -> Result<logging::LogConfig> {
    let console_level = if args.debug {
        LevelFilter::Trace
    } else if args.verbose {
        LevelFilter::Debug
    } else if args.quiet {
        LevelFilter::Error
    } else {
        config
            .get_log_level(LOGGING_SECTION, "console-level")
            .context("Invalid logging.console-level")?
            .unwrap_or(LevelFilter::Info)
    };

    let format = if args.log_format.to_lowercase() != "text" {
        logging::LogFormat::from_str(&args.log_format).map_err(|e| anyhow::anyhow!(e))?
    } else {
        match config.get_value(LOGGING_SECTION, "log-format") {
            Some(value) => logging::LogFormat::from_str(value).map_err(|e| anyhow::anyhow!(e))?,
            None => logging::LogFormat::Text,
        }
    };

    let log_file = args
        .log_file
        .clone()
        .or_else(|| config.get_path(LOGGING_SECTION, "log-file"));

    let file_level = match &args.log_file_level {
        Some(level) => Some(logging::parse_log_level(level)?),
        None => config
            .get_log_level(LOGGING_SECTION, "file-log-level")
            .context("Invalid logging.file-log-level")?,
    };

    let (destination, file_level) = match (log_file, file_level) {
        (Some(path), level) => (logging::LogDestination::Both(path), Some(level.unwrap_or(console_level))),
        (None, None) => (logging::LogDestination::Console, None),
        (None, Some(_)) => return Err(anyhow::anyhow!("Log file level specified without log file")),
    };

    Ok(logging::LogConfig {
        console_level,
        file_level,
        format,
        destination,
    })
}
