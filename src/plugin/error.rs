//! Plugin Error Types
//!
//! Error taxonomy for component declaration, configuration, enablement and dispatch.

use thiserror::Error;

/// Result type for plugin operations
pub type PluginResult<T> = Result<T, PluginError>;

/// Error types for component and extension-point operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PluginError {
    /// Interface name declared twice with a different method set
    #[error("Interface '{name}' already declared with methods {existing:?}")]
    DuplicateInterface { name: String, existing: Vec<String> },

    /// Component class is malformed (empty name, abstract, etc.)
    #[error("Malformed component class '{class}': {message}")]
    MalformedComponent { class: String, message: String },

    /// Component class already defined in this registry
    #[error("Component already registered: {component_name}")]
    ComponentAlreadyRegistered { component_name: String },

    /// Component not found
    #[error("Component not found: {component_name}")]
    ComponentNotFound { component_name: String },

    /// Version compatibility error
    #[error("Version compatibility error: {message}")]
    VersionIncompatible { message: String },

    /// Component configure() failed
    #[error("Component configuration error: {message}")]
    ConfigurationError { message: String },

    /// Enablement predicate failed
    #[error("Enablement predicate error: {message}")]
    PredicateError { message: String },

    /// Broadcast aborted because one implementer failed
    #[error("Dispatch of '{event}' failed in component '{component}': {message}")]
    DispatchFailed { event: String, component: String, message: String },

    /// Component execution error (raised by implementers)
    #[error("Component execution error: {message}")]
    ExecutionFailed { message: String },

    /// Invalid manager state (e.g. dispatch before load)
    #[error("Invalid manager state: {message}")]
    InvalidState { message: String },

    /// Generic plugin error
    #[error("Plugin error: {message}")]
    Generic { message: String },
}

impl PluginError {
    /// Create a duplicate interface error
    pub fn duplicate_interface<S: Into<String>>(name: S, existing: &[&str]) -> Self {
        Self::DuplicateInterface {
            name: name.into(),
            existing: existing.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Create a malformed component error
    pub fn malformed_component<S: Into<String>, M: Into<String>>(class: S, message: M) -> Self {
        Self::MalformedComponent { class: class.into(), message: message.into() }
    }

    /// Create a component already registered error
    pub fn component_already_registered<S: Into<String>>(component_name: S) -> Self {
        Self::ComponentAlreadyRegistered { component_name: component_name.into() }
    }

    /// Create a component not found error
    pub fn component_not_found<S: Into<String>>(component_name: S) -> Self {
        Self::ComponentNotFound { component_name: component_name.into() }
    }

    /// Create a version incompatible error
    pub fn version_incompatible<S: Into<String>>(message: S) -> Self {
        Self::VersionIncompatible { message: message.into() }
    }

    /// Create a configuration error
    pub fn configuration_error<S: Into<String>>(message: S) -> Self {
        Self::ConfigurationError { message: message.into() }
    }

    /// Create a predicate error
    pub fn predicate_error<S: Into<String>>(message: S) -> Self {
        Self::PredicateError { message: message.into() }
    }

    /// Create a dispatch failed error
    pub fn dispatch_failed<E: Into<String>, C: Into<String>>(event: E, component: C, cause: &PluginError) -> Self {
        Self::DispatchFailed {
            event: event.into(),
            component: component.into(),
            message: cause.to_string(),
        }
    }

    /// Create an execution error
    pub fn execution_failed<S: Into<String>>(message: S) -> Self {
        Self::ExecutionFailed { message: message.into() }
    }

    /// Create an invalid state error
    pub fn invalid_state<S: Into<String>>(message: S) -> Self {
        Self::InvalidState { message: message.into() }
    }

    /// Create a generic error
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic { message: message.into() }
    }

    /// Declaration errors leave the registry inconsistent and are fatal
    pub fn is_declaration_error(&self) -> bool {
        matches!(self,
            PluginError::DuplicateInterface { .. } |
            PluginError::MalformedComponent { .. } |
            PluginError::ComponentAlreadyRegistered { .. } |
            PluginError::VersionIncompatible { .. }
        )
    }

    /// Check if error is recoverable within a running session
    pub fn is_recoverable(&self) -> bool {
        matches!(self,
            PluginError::ConfigurationError { .. } |
            PluginError::PredicateError { .. } |
            PluginError::ExecutionFailed { .. } |
            PluginError::DispatchFailed { .. }
        )
    }
}

impl From<std::io::Error> for PluginError {
    fn from(err: std::io::Error) -> Self {
        PluginError::execution_failed(format!("IO error: {}", err))
    }
}
