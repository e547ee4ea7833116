//! Hosts Cleanup Component
//!
//! Cleans the hosts listed in `PARAMETERS.vds` before a run. Enabled with
//! `--cleanup` or `RUN.cleanup`.

use clap::{Arg, ArgAction, Command};
use log::info;
use parking_lot::Mutex;
use crate::config::ConfigManager;
use crate::implements;
use crate::plugin::component::{Claims, Component, ComponentClass};
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::interfaces::{HostsCleanup, Reporter};
use crate::plugin::predicate::EnableRule;
use crate::plugin::settings::RunParams;

pub const CLEANUP_ARG: &str = "cleanup";

#[derive(Default)]
struct CleanupState {
    hosts: Vec<String>,
    cleaned: Vec<String>,
}

pub struct HostsCleaner {
    state: Mutex<CleanupState>,
}

impl HostsCleaner {
    pub fn hosts(&self) -> Vec<String> {
        self.state.lock().hosts.clone()
    }

    pub fn cleaned(&self) -> Vec<String> {
        self.state.lock().cleaned.clone()
    }
}

impl Component for HostsCleaner {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Cleans hosts from PARAMETERS.vds before the run"
    }

    fn enable_rule(&self) -> EnableRule {
        EnableRule::never().flag(CLEANUP_ARG).switch("RUN", "cleanup")
    }

    fn add_options(&self, command: Command) -> Command {
        command.arg(
            Arg::new(CLEANUP_ARG)
                .long("cleanup")
                .action(ArgAction::SetTrue)
                .help("Clean hosts before running"),
        )
    }

    fn configure(&self, params: &RunParams, config: &mut ConfigManager) -> PluginResult<()> {
        let hosts = config.get_list("PARAMETERS", "vds");
        if hosts.is_empty() && self.is_enabled(params, config)? {
            return Err(PluginError::configuration_error("hosts cleanup requested but PARAMETERS.vds is empty"));
        }
        self.state.lock().hosts = hosts;
        Ok(())
    }
}

impl ComponentClass for HostsCleaner {
    const NAME: &'static str = "hosts_cleanup";

    fn construct() -> Self {
        Self { state: Mutex::new(CleanupState::default()) }
    }

    fn claims(claims: &mut Claims<Self>) {
        implements!(claims, HostsCleanup, Reporter);
    }
}

impl HostsCleanup for HostsCleaner {
    fn on_hosts_cleanup_req(&self) -> PluginResult<()> {
        let mut state = self.state.lock();
        let hosts = state.hosts.clone();
        for host in hosts {
            info!("Cleaning host {}", host);
            state.cleaned.push(host);
        }
        Ok(())
    }
}

impl Reporter for HostsCleaner {
    fn summary(&self) -> PluginResult<Option<String>> {
        let state = self.state.lock();
        if state.cleaned.is_empty() {
            return Ok(None);
        }
        Ok(Some(format!("{}: cleaned {}", Self::NAME, state.cleaned.join(", "))))
    }
}
