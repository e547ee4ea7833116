//! Session lifecycle tests
//!
//! Drives a full session through the public API, mixing built-in components
//! with components defined outside the crate.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use plmanagement::app;
use plmanagement::config::ConfigManager;
use plmanagement::plugin::builtin::{self, ActionQueue, HostsCleaner, RunJournal};
use plmanagement::plugin::interfaces::{HostsCleanup, InputListener, Reporter, ON_HOSTS_CLEANUP_REQ};
use plmanagement::plugin::{
    Claims, Component, ComponentClass, ComponentManager, ComponentRegistry, EnableRule, PluginError,
    PluginResult, RunParams,
};
use plmanagement::{declare_interface, implements};

static REFUSALS: AtomicUsize = AtomicUsize::new(0);

/// Cleanup handler that always refuses; runs before the built-in cleaner
struct StubbornHost;

impl Component for StubbornHost {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> i32 {
        5
    }

    fn enable_rule(&self) -> EnableRule {
        EnableRule::never().switch("RUN", "stubborn")
    }
}

impl ComponentClass for StubbornHost {
    const NAME: &'static str = "stubborn_host";

    fn construct() -> Self {
        StubbornHost
    }

    fn claims(claims: &mut Claims<Self>) {
        implements!(claims, HostsCleanup);
    }
}

impl HostsCleanup for StubbornHost {
    fn on_hosts_cleanup_req(&self) -> PluginResult<()> {
        REFUSALS.fetch_add(1, Ordering::SeqCst);
        Err(PluginError::execution_failed("host refused cleanup"))
    }
}

/// Interface declared outside the crate
trait MigrationListener: Component {
    fn on_migration_done(&self, vm: &str) -> PluginResult<()>;
}

declare_interface!(MigrationListener, "IMigrationListener", ["on_migration_done"]);

struct MigrationCounter {
    seen: AtomicUsize,
}

impl Component for MigrationCounter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn enable_rule(&self) -> EnableRule {
        EnableRule::always()
    }
}

impl ComponentClass for MigrationCounter {
    const NAME: &'static str = "migration_counter";

    fn construct() -> Self {
        Self { seen: AtomicUsize::new(0) }
    }

    fn claims(claims: &mut Claims<Self>) {
        implements!(claims, MigrationListener, Reporter);
    }
}

impl MigrationListener for MigrationCounter {
    fn on_migration_done(&self, _vm: &str) -> PluginResult<()> {
        self.seen.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Reporter for MigrationCounter {
    fn summary(&self) -> PluginResult<Option<String>> {
        Ok(Some(format!("migration_counter: {}", self.seen.load(Ordering::SeqCst))))
    }
}

/// Input source and reporter that fails every call; asked before the action queue
struct FlakySource;

impl Component for FlakySource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> i32 {
        1
    }

    fn enable_rule(&self) -> EnableRule {
        EnableRule::never().switch("RUN", "flaky")
    }
}

impl ComponentClass for FlakySource {
    const NAME: &'static str = "flaky_source";

    fn construct() -> Self {
        FlakySource
    }

    fn claims(claims: &mut Claims<Self>) {
        implements!(claims, InputListener, Reporter);
    }
}

impl InputListener for FlakySource {
    fn on_next_action(&self) -> PluginResult<Option<String>> {
        Err(PluginError::execution_failed("input source unavailable"))
    }
}

impl Reporter for FlakySource {
    fn summary(&self) -> PluginResult<Option<String>> {
        Err(PluginError::execution_failed("no summary available"))
    }
}

fn manager_with_extras(config: ConfigManager, params: RunParams) -> ComponentManager {
    let mut registry = ComponentRegistry::new();
    builtin::register_builtins(&mut registry).unwrap();
    registry.define::<StubbornHost>().unwrap();
    registry.define::<MigrationCounter>().unwrap();
    registry.define::<FlakySource>().unwrap();

    let mut manager = ComponentManager::new(registry);
    manager.load(config).unwrap();
    manager.configure_all(params).unwrap();
    manager
}

fn cleanup_config() -> ConfigManager {
    let mut config = ConfigManager::empty();
    config.set_value("RUN", "cleanup", "yes");
    config.set_value("RUN", "actions", "boot");
    config.set_value("PARAMETERS", "vds", "host1,host2");
    config
}

#[test]
fn session_runs_every_phase() {
    let manager = manager_with_extras(cleanup_config(), RunParams::new());

    let outcome = app::run_session(&manager).unwrap();

    assert_eq!(outcome.actions, vec!["boot"]);
    assert_eq!(manager.instance_of::<HostsCleaner>().unwrap().cleaned(), vec!["host1", "host2"]);
    assert_eq!(manager.instance_of::<RunJournal>().unwrap().events(), 2);
    assert!(outcome.summary.iter().any(|line| line == "migration_counter: 0"));
}

#[test]
fn failed_hosts_cleanup_aborts_the_session() {
    let mut config = cleanup_config();
    config.set_value("RUN", "stubborn", "yes");
    let manager = manager_with_extras(config, RunParams::new());

    let before = REFUSALS.load(Ordering::SeqCst);
    let result = app::run_session(&manager);

    assert!(result.is_err());
    assert!(REFUSALS.load(Ordering::SeqCst) > before);
    // Fail-fast: the built-in cleaner after the stubborn one never ran
    assert!(manager.instance_of::<HostsCleaner>().unwrap().cleaned().is_empty());
    // No action was consumed, but exit was still announced
    assert_eq!(manager.instance_of::<ActionQueue>().unwrap().served(), 0);
    assert_eq!(manager.instance_of::<RunJournal>().unwrap().events(), 2);
}

#[test]
fn best_effort_cleanup_reaches_every_host() {
    let mut config = cleanup_config();
    config.set_value("RUN", "stubborn", "yes");
    let manager = manager_with_extras(config, RunParams::new());

    let report = manager
        .extension_point::<dyn HostsCleanup>()
        .notify(ON_HOSTS_CLEANUP_REQ, |c| c.on_hosts_cleanup_req());

    assert_eq!(report.invoked, 2);
    assert_eq!(report.failed_components(), vec!["stubborn_host"]);
    assert_eq!(manager.instance_of::<HostsCleaner>().unwrap().cleaned().len(), 2);
}

#[test]
fn externally_declared_interface_dispatches() {
    let manager = manager_with_extras(ConfigManager::empty(), RunParams::new());
    let ext = manager.extension_point::<dyn MigrationListener>();

    assert_eq!(ext.names(), vec!["migration_counter"]);
    let report = ext.notify("on_migration_done", |c| c.on_migration_done("vm1"));
    assert!(report.is_clean());

    let counter = manager.instance_of::<MigrationCounter>().unwrap();
    assert_eq!(counter.seen.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&counter, &manager.instance_of::<MigrationCounter>().unwrap()));
}

#[test]
fn listing_reflects_configuration() {
    let mut manager = manager_with_extras(cleanup_config(), RunParams::new());

    let enabled: Vec<String> = manager
        .summaries()
        .into_iter()
        .filter(|s| s.enabled)
        .map(|s| s.name)
        .collect();
    assert!(enabled.contains(&"hosts_cleanup".to_string()));
    assert!(!enabled.contains(&"stubborn_host".to_string()));

    manager.config_mut().set_value("RUN", "cleanup", "no");
    assert!(!manager.is_enabled("hosts_cleanup"));
}

#[test]
fn input_and_report_failures_are_counted() {
    let mut config = cleanup_config();
    config.set_value("RUN", "flaky", "yes");
    let manager = manager_with_extras(config, RunParams::new());

    let outcome = app::run_session(&manager).unwrap();

    // The failing source is skipped, so the queue still serves its action
    assert_eq!(outcome.actions, vec!["boot"]);
    // Two action requests plus one summary request
    assert_eq!(outcome.dispatch_failures, 3);
    assert!(!outcome.summary.is_empty());
}

#[test]
fn clean_session_counts_no_failures() {
    let manager = manager_with_extras(cleanup_config(), RunParams::new());
    let outcome = app::run_session(&manager).unwrap();
    assert_eq!(outcome.dispatch_failures, 0);
}
