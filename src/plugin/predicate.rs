//! Enablement Predicates
//!
//! The default `Component::is_enabled` combines three inputs with logical OR:
//! the component's default policy, an explicit command-line flag and a named
//! switch in a configuration section. Components needing another rule override
//! `is_enabled` instead.

use std::fmt;
use crate::config::ConfigManager;
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::settings::RunParams;

/// Declarative enablement rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnableRule {
    default: bool,
    flag: Option<&'static str>,
    switch: Option<(&'static str, &'static str)>,
}

impl EnableRule {
    /// Enabled regardless of parameters or configuration
    pub const fn always() -> Self {
        Self { default: true, flag: None, switch: None }
    }

    /// Disabled unless a flag or switch is added
    pub const fn never() -> Self {
        Self { default: false, flag: None, switch: None }
    }

    /// Enable when the command-line flag `name` is given
    pub const fn flag(self, name: &'static str) -> Self {
        Self { flag: Some(name), ..self }
    }

    /// Enable when `section.key` holds a true value (`yes`, `true`, `on`, `1`)
    pub const fn switch(self, section: &'static str, key: &'static str) -> Self {
        Self { switch: Some((section, key)), ..self }
    }

    /// Evaluate against the current parameters and configuration.
    ///
    /// An unparseable switch value is an error; callers treat it as disabled.
    pub fn evaluate(&self, params: &RunParams, config: &ConfigManager) -> PluginResult<bool> {
        if self.default {
            return Ok(true);
        }

        if let Some(flag) = self.flag {
            if params.flag(flag) {
                return Ok(true);
            }
        }

        if let Some((section, key)) = self.switch {
            let enabled = config.is_yes(section, key)
                .map_err(|e| PluginError::predicate_error(e.to_string()))?;
            return Ok(enabled);
        }

        Ok(false)
    }
}

impl Default for EnableRule {
    fn default() -> Self {
        Self::never()
    }
}

impl fmt::Display for EnableRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.default {
            return write!(f, "always");
        }
        let mut parts = Vec::new();
        if let Some(flag) = self.flag {
            parts.push(format!("--{}", flag));
        }
        if let Some((section, key)) = self.switch {
            parts.push(format!("{}.{}", section, key));
        }
        if parts.is_empty() {
            write!(f, "never")
        } else {
            write!(f, "{}", parts.join(" | "))
        }
    }
}
