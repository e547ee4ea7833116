//! Run Parameters
//!
//! Snapshot of the parsed command line handed to components at `configure()`
//! and `is_enabled()` time. Built from clap matches after every component has
//! contributed its options, or assembled directly in tests.

use std::collections::HashMap;
use clap::ArgMatches;

/// Parsed command-line flags and values, keyed by argument id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunParams {
    flags: HashMap<String, bool>,
    values: HashMap<String, Vec<String>>,
}

impl RunParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture every boolean flag and string-valued argument from clap matches.
    ///
    /// Arguments of other value types are left out; components that need them
    /// read the matches through their own option definitions.
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let mut params = Self::new();

        for id in matches.ids() {
            let key = id.as_str();
            if let Ok(Some(flag)) = matches.try_get_one::<bool>(key) {
                params.flags.insert(key.to_string(), *flag);
            } else if let Ok(Some(values)) = matches.try_get_many::<String>(key) {
                params.values.insert(key.to_string(), values.cloned().collect());
            }
        }

        params
    }

    /// Builder: set a boolean flag
    pub fn with_flag(mut self, name: &str, value: bool) -> Self {
        self.flags.insert(name.to_string(), value);
        self
    }

    /// Builder: append a value to an argument
    pub fn with_value(mut self, name: &str, value: &str) -> Self {
        self.values.entry(name.to_string()).or_default().push(value.to_string());
        self
    }

    /// True only when the flag was given
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Whether the flag is known at all (given or defaulted by clap)
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    /// First value of an argument
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(|v| v.first()).map(String::as_str)
    }

    /// All values of an argument, in command-line order
    pub fn values(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, ArgAction, Command};

    fn test_command() -> Command {
        Command::new("plmanagement")
            .arg(Arg::new("cleanup").long("cleanup").action(ArgAction::SetTrue))
            .arg(Arg::new("auto-devices").long("auto-devices").action(ArgAction::SetTrue))
            .arg(Arg::new("action").long("action").action(ArgAction::Append))
            .arg(Arg::new("limit").long("limit").value_parser(clap::value_parser!(usize)))
    }

    #[test]
    fn test_from_matches_collects_flags_and_values() {
        let matches = test_command()
            .try_get_matches_from(["plmanagement", "--cleanup", "--action", "boot", "--action", "migrate"])
            .unwrap();
        let params = RunParams::from_matches(&matches);

        assert!(params.flag("cleanup"));
        assert!(!params.flag("auto-devices"));
        assert!(params.has_flag("auto-devices"));
        assert_eq!(params.values("action"), &["boot".to_string(), "migrate".to_string()]);
        assert_eq!(params.value("action"), Some("boot"));
    }

    #[test]
    fn test_from_matches_skips_non_string_values() {
        let matches = test_command()
            .try_get_matches_from(["plmanagement", "--limit", "3"])
            .unwrap();
        let params = RunParams::from_matches(&matches);

        assert!(params.value("limit").is_none());
        assert!(params.values("action").is_empty());
    }

    #[test]
    fn test_builders() {
        let params = RunParams::new()
            .with_flag("cleanup", true)
            .with_value("action", "a")
            .with_value("action", "b");

        assert!(params.flag("cleanup"));
        assert!(!params.flag("missing"));
        assert_eq!(params.values("action").len(), 2);
    }
}
