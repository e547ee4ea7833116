//! Session execution
//!
//! Publishes the session events to the enabled components in a fixed order:
//! application start, hosts cleanup, storages preparation, input actions,
//! storages cleanup, application exit. Hosts cleanup is fail-fast; once it
//! fails no action runs, though exit is still announced.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use crate::display::{self, ColourManager};
use crate::plugin::interfaces::{
    ApplicationListener, HostsCleanup, InputListener, Reporter, StoragesPreparation,
    ON_APPLICATION_EXIT, ON_APPLICATION_START, ON_HOSTS_CLEANUP_REQ, ON_NEXT_ACTION,
    ON_STORAGES_CLEANUP_REQUEST, ON_STORAGES_PREP_REQUEST, SUMMARY,
};
use crate::plugin::compatibility::version_to_date_string;
use crate::plugin::{ComponentManager, DispatchReport};

/// Upper bound on actions taken from input listeners in one session
pub const DEFAULT_MAX_ACTIONS: usize = 1000;

/// What happened during a session
#[derive(Debug, Clone, Default)]
pub struct SessionOutcome {
    pub actions: Vec<String>,
    pub dispatch_failures: usize,
    pub summary: Vec<String>,
}

impl SessionOutcome {
    fn record(&mut self, report: DispatchReport) {
        self.dispatch_failures += report.failures.len();
    }
}

fn max_actions(manager: &ComponentManager) -> Result<usize> {
    match manager.config().get_value("RUN", "max_actions") {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("RUN.max_actions is not a number: {}", value)),
        None => Ok(DEFAULT_MAX_ACTIONS),
    }
}

/// Run one session against a configured manager
pub fn run_session(manager: &ComponentManager) -> Result<SessionOutcome> {
    let mut outcome = SessionOutcome::default();
    let limit = max_actions(manager)?;

    info!("Session starting with {} enabled component(s)",
        manager.summaries().iter().filter(|s| s.enabled).count());

    let listeners = manager.extension_point::<dyn ApplicationListener>();
    outcome.record(listeners.notify(ON_APPLICATION_START, |c| c.on_application_start()));

    let cleanup = manager
        .extension_point::<dyn HostsCleanup>()
        .broadcast(ON_HOSTS_CLEANUP_REQ, |c| c.on_hosts_cleanup_req());

    if let Err(e) = cleanup {
        warn!("Hosts cleanup failed, skipping the run: {}", e);
        outcome.record(listeners.notify(ON_APPLICATION_EXIT, |c| c.on_application_exit()));
        return Err(e).context("Session aborted");
    }

    let storages = manager.extension_point::<dyn StoragesPreparation>();
    outcome.record(storages.notify(ON_STORAGES_PREP_REQUEST, |c| c.on_storages_prep_request()));

    let inputs = manager.extension_point::<dyn InputListener>();
    let mut input_failures = 0;
    while outcome.actions.len() < limit {
        let next = inputs.first_some(ON_NEXT_ACTION, |c| {
            c.on_next_action().map_err(|e| {
                input_failures += 1;
                e
            })
        });
        match next {
            Some(action) => {
                info!("Running action: {}", action);
                outcome.actions.push(action);
            }
            None => break,
        }
    }
    outcome.dispatch_failures += input_failures;
    if outcome.actions.len() >= limit && inputs.any(|c| c.has_pending_action()) {
        warn!("Stopped after {} action(s); RUN.max_actions reached", limit);
    }

    outcome.record(storages.notify(ON_STORAGES_CLEANUP_REQUEST, |c| c.on_storages_cleanup_request()));
    outcome.record(listeners.notify(ON_APPLICATION_EXIT, |c| c.on_application_exit()));

    let mut report_failures = 0;
    outcome.summary = manager
        .extension_point::<dyn Reporter>()
        .gather(SUMMARY, |c| {
            c.summary().map_err(|e| {
                report_failures += 1;
                e
            })
        })
        .into_iter()
        .flatten()
        .collect();
    outcome.dispatch_failures += report_failures;

    debug!("Session finished: {:?}", outcome);
    info!(
        "Session finished: {} action(s), {} dispatch failure(s)",
        outcome.actions.len(),
        outcome.dispatch_failures
    );
    Ok(outcome)
}

/// Print the component table for `--list-plugins`
pub fn handle_list_plugins(manager: &ComponentManager, colours: &ColourManager) {
    let api_version = manager.registry().api_version();
    println!(
        "{} {}",
        colours.highlight("Components:"),
        colours.muted(&format!("(component API {})", version_to_date_string(api_version)))
    );
    print!("{}", display::render_component_table(&manager.summaries(), colours));
}

/// Print the session summary lines
pub fn print_summary(outcome: &SessionOutcome, colours: &ColourManager) {
    if outcome.summary.is_empty() {
        return;
    }
    println!("{}", colours.highlight("Summary:"));
    for line in &outcome.summary {
        println!("  {}", line);
    }
    if outcome.dispatch_failures > 0 {
        println!("  {}", colours.error(&format!("{} dispatch failure(s)", outcome.dispatch_failures)));
    }
}
