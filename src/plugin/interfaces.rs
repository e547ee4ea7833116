//! Session Interfaces
//!
//! Interfaces published by the session runner. Each declares the discipline
//! its events are broadcast with.

use crate::declare_interface;
use crate::plugin::component::Component;
use crate::plugin::error::PluginResult;
use crate::plugin::interface::Discipline;

pub const ON_APPLICATION_START: &str = "on_application_start";
pub const ON_APPLICATION_EXIT: &str = "on_application_exit";
pub const ON_STORAGES_PREP_REQUEST: &str = "on_storages_prep_request";
pub const ON_STORAGES_CLEANUP_REQUEST: &str = "on_storages_cleanup_request";
pub const ON_NEXT_ACTION: &str = "on_next_action";
pub const ON_HOSTS_CLEANUP_REQ: &str = "on_hosts_cleanup_req";
pub const SUMMARY: &str = "summary";

/// Application lifecycle notifications
pub trait ApplicationListener: Component {
    fn on_application_start(&self) -> PluginResult<()>;
    fn on_application_exit(&self) -> PluginResult<()>;
}

declare_interface!(
    ApplicationListener,
    "IApplicationListener",
    ["on_application_start", "on_application_exit"],
    Discipline::BestEffort
);

/// Host cleanup before a run.
///
/// Fail-fast: a run must not start on hosts that could not be cleaned.
pub trait HostsCleanup: Component {
    fn on_hosts_cleanup_req(&self) -> PluginResult<()>;
}

declare_interface!(HostsCleanup, "IHostsCleanup", ["on_hosts_cleanup_req"], Discipline::FailFast);

/// Storage domain preparation and teardown
pub trait StoragesPreparation: Component {
    fn on_storages_prep_request(&self) -> PluginResult<()>;
    fn on_storages_cleanup_request(&self) -> PluginResult<()>;
}

declare_interface!(
    StoragesPreparation,
    "IStoragesPreparation",
    ["on_storages_prep_request", "on_storages_cleanup_request"]
);

/// Source of input actions; the first implementer with an answer wins
pub trait InputListener: Component {
    fn on_next_action(&self) -> PluginResult<Option<String>>;

    /// Whether another action would be served; used to report a truncated run
    fn has_pending_action(&self) -> bool {
        false
    }
}

declare_interface!(InputListener, "IInputListener", ["on_next_action", "has_pending_action"]);

/// Contributes a line to the end-of-session summary
pub trait Reporter: Component {
    fn summary(&self) -> PluginResult<Option<String>>;
}

declare_interface!(Reporter, "IReporter", ["summary"]);
