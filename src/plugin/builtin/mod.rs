//! Built-in Components
//!
//! Components shipped with the binary and used by the session runner.

pub mod action_queue;
pub mod auto_devices;
pub mod hosts_cleanup;
pub mod run_journal;

pub use action_queue::ActionQueue;
pub use auto_devices::AutoDevices;
pub use hosts_cleanup::HostsCleaner;
pub use run_journal::RunJournal;

use crate::plugin::error::PluginResult;
use crate::plugin::registry::ComponentRegistry;

/// Names of the built-in components, in registration order
pub fn builtin_names() -> Vec<&'static str> {
    vec!["action_queue", "auto_devices", "hosts_cleanup", "run_journal"]
}

/// Define every built-in component on `registry`
pub fn register_builtins(registry: &mut ComponentRegistry) -> PluginResult<()> {
    registry.define::<ActionQueue>()?;
    registry.define::<AutoDevices>()?;
    registry.define::<HostsCleaner>()?;
    registry.define::<RunJournal>()?;
    Ok(())
}
