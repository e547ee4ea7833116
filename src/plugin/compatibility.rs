//! Version Compatibility Checker
//!
//! Validates the component API version a class targets against the version
//! this build provides (read from `package.metadata.plmanagement.api_version`).

use crate::plugin::error::{PluginError, PluginResult};

// Include the build-generated API version constant
include!(concat!(env!("OUT_DIR"), "/version_api.rs"));

/// Checker for component API version compatibility
#[derive(Debug, Clone, Copy)]
pub struct VersionCompatibilityChecker {
    api_version: u32,
}

impl VersionCompatibilityChecker {
    pub fn new(api_version: u32) -> Self {
        Self { api_version }
    }

    /// Current API version this checker validates against
    pub fn api_version(&self) -> u32 {
        self.api_version
    }

    /// Check if a component API version is compatible
    pub fn is_api_compatible(&self, component_api_version: u32) -> bool {
        // Same major version (year) is compatible
        self.get_major_version(self.api_version) == self.get_major_version(component_api_version)
    }

    /// Get major version (year) from API version
    pub fn get_major_version(&self, api_version: u32) -> u32 {
        api_version / 10000
    }

    /// Check a component class before it is defined
    pub fn check_component(&self, class_name: &str, component_api_version: u32) -> PluginResult<()> {
        if !self.is_api_compatible(component_api_version) {
            return Err(PluginError::version_incompatible(format!(
                "Component '{}' requires API version {} but current version is {}",
                class_name,
                component_api_version,
                self.api_version
            )));
        }
        Ok(())
    }
}

impl Default for VersionCompatibilityChecker {
    fn default() -> Self {
        Self::new(BASE_API_VERSION)
    }
}

/// Convert a YYYYMMDD version to a YYYY-MM-DD string
pub fn version_to_date_string(version: u32) -> String {
    let year = version / 10000;
    let month = (version % 10000) / 100;
    let day = version % 100;
    format!("{year:04}-{month:02}-{day:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_compatibility() {
        let checker = VersionCompatibilityChecker::new(20250727);

        assert!(checker.is_api_compatible(20250727));
        assert!(checker.is_api_compatible(20250101));
        assert!(checker.is_api_compatible(20251231));
        assert!(!checker.is_api_compatible(20240727));
        assert!(!checker.is_api_compatible(20260727));
    }

    #[test]
    fn test_check_component_reports_versions() {
        let checker = VersionCompatibilityChecker::new(20250727);
        assert!(checker.check_component("auto_devices", 20250301).is_ok());

        let error = checker.check_component("legacy", 20190101).unwrap_err();
        assert!(matches!(error, PluginError::VersionIncompatible { .. }));
        assert!(error.to_string().contains("legacy"));
        assert!(error.to_string().contains("20190101"));
    }

    #[test]
    fn test_default_uses_build_version() {
        let checker = VersionCompatibilityChecker::default();
        assert_eq!(checker.api_version(), BASE_API_VERSION);
        assert!(checker.is_api_compatible(BASE_API_VERSION));
    }

    #[test]
    fn test_version_to_date_string() {
        assert_eq!(version_to_date_string(20250727), "2025-07-27");
        assert_eq!(version_to_date_string(20240101), "2024-01-01");
    }
}
