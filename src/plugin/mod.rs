//! Plugin System Module
//!
//! Components implement interface traits and are discovered through an
//! explicit registry. The manager constructs one instance per class,
//! configures them, resolves enablement and dispatches events through typed
//! extension points.
//!
//! # Example Usage
//!
//! ```no_run
//! use plmanagement::config::ConfigManager;
//! use plmanagement::plugin::{builtin, ComponentManager, ComponentRegistry, RunParams};
//! use plmanagement::plugin::interfaces::{HostsCleanup, ON_HOSTS_CLEANUP_REQ};
//!
//! # fn main() -> plmanagement::plugin::PluginResult<()> {
//! let mut registry = ComponentRegistry::new();
//! builtin::register_builtins(&mut registry)?;
//!
//! let mut manager = ComponentManager::new(registry);
//! manager.load(ConfigManager::empty())?;
//! manager.configure_all(RunParams::new())?;
//!
//! manager
//!     .extension_point::<dyn HostsCleanup>()
//!     .notify_all(ON_HOSTS_CLEANUP_REQ, |c| c.on_hosts_cleanup_req())?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod interface;
pub mod component;
pub mod compatibility;
pub mod predicate;
pub mod settings;
pub mod priority_queue;
pub mod registry;
pub mod manager;
pub mod extension;
pub mod interfaces;
pub mod builtin;

#[cfg(test)]
pub(crate) mod tests;

// Re-export core types for easier access
pub use error::{PluginError, PluginResult};
pub use interface::{Discipline, Interface, InterfaceHandle, InterfaceRegistry};
pub use component::{Claims, Component, ComponentClass, ComponentState, ComponentSummary};
pub use compatibility::VersionCompatibilityChecker;
pub use predicate::EnableRule;
pub use settings::RunParams;

// Registry and management
pub use registry::{ComponentDefinition, ComponentRegistry};
pub use manager::{ComponentId, ComponentManager, ConfigureFailure};
pub use extension::{Components, DispatchFailure, DispatchReport, ExtensionPoint, Implementer};
