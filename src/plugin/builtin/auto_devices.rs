//! Automatic Storage Devices
//!
//! Prepares the storage domains a run needs and removes them afterwards.
//! Domain names are derived at configure time and published into the
//! `AUTO_DEVICES` section, so it runs ahead of components that read them.

use clap::{Arg, ArgAction, Command};
use log::{debug, info};
use parking_lot::Mutex;
use crate::config::ConfigManager;
use crate::implements;
use crate::plugin::component::{Claims, Component, ComponentClass};
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::interfaces::{Reporter, StoragesPreparation};
use crate::plugin::predicate::EnableRule;
use crate::plugin::settings::RunParams;

pub const AUTO_DEVICES_ARG: &str = "auto-devices";
pub const AUTO_DEVICES_SECTION: &str = "AUTO_DEVICES";

const DEFAULT_STORAGE_TYPE: &str = "nfs";

#[derive(Default)]
struct DeviceState {
    domains: Vec<String>,
    prepared: Vec<String>,
    cleaned: usize,
}

pub struct AutoDevices {
    state: Mutex<DeviceState>,
}

impl AutoDevices {
    /// Storage domain names for this run
    pub fn domains(&self) -> Vec<String> {
        self.state.lock().domains.clone()
    }

    pub fn prepared(&self) -> Vec<String> {
        self.state.lock().prepared.clone()
    }

    fn derive_domains(config: &ConfigManager) -> PluginResult<Vec<String>> {
        let explicit = config.get_list("PARAMETERS", "storages");
        if !explicit.is_empty() {
            return Ok(explicit);
        }

        let storage_type = config
            .get_value("PARAMETERS", "storage_type")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_STORAGE_TYPE.to_string());

        let count = match config.get_value("PARAMETERS", "storage_count") {
            Some(value) => value.trim().parse::<usize>().map_err(|_| {
                PluginError::configuration_error(format!("PARAMETERS.storage_count is not a number: {}", value))
            })?,
            None => 1,
        };

        Ok((0..count).map(|i| format!("{}_{}_{}", Self::NAME, storage_type, i)).collect())
    }
}

impl Component for AutoDevices {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Creates and removes storage domains for the run"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn enable_rule(&self) -> EnableRule {
        EnableRule::never().flag(AUTO_DEVICES_ARG).switch("RUN", "auto_devices")
    }

    fn add_options(&self, command: Command) -> Command {
        command.arg(
            Arg::new(AUTO_DEVICES_ARG)
                .long("auto-devices")
                .action(ArgAction::SetTrue)
                .help("Create storage domains before the run and remove them after"),
        )
    }

    fn configure(&self, params: &RunParams, config: &mut ConfigManager) -> PluginResult<()> {
        if !self.is_enabled(params, config)? {
            debug!("{} disabled, nothing to publish", Self::NAME);
            return Ok(());
        }

        let domains = Self::derive_domains(config)?;
        config.set_value(AUTO_DEVICES_SECTION, "storages", domains.join(","));
        config.set_value(AUTO_DEVICES_SECTION, "count", domains.len().to_string());
        debug!("Published {} storage domain(s) into {}", domains.len(), AUTO_DEVICES_SECTION);

        self.state.lock().domains = domains;
        Ok(())
    }
}

impl ComponentClass for AutoDevices {
    const NAME: &'static str = "auto_devices";

    fn construct() -> Self {
        Self { state: Mutex::new(DeviceState::default()) }
    }

    fn claims(claims: &mut Claims<Self>) {
        implements!(claims, StoragesPreparation, Reporter);
    }
}

impl StoragesPreparation for AutoDevices {
    fn on_storages_prep_request(&self) -> PluginResult<()> {
        let mut state = self.state.lock();
        for domain in state.domains.clone() {
            if !state.prepared.contains(&domain) {
                info!("Preparing storage domain {}", domain);
                state.prepared.push(domain);
            }
        }
        Ok(())
    }

    fn on_storages_cleanup_request(&self) -> PluginResult<()> {
        let mut state = self.state.lock();
        let prepared: Vec<String> = state.prepared.drain(..).collect();
        for domain in prepared.iter().rev() {
            info!("Removing storage domain {}", domain);
        }
        state.cleaned += prepared.len();
        Ok(())
    }
}

impl Reporter for AutoDevices {
    fn summary(&self) -> PluginResult<Option<String>> {
        let state = self.state.lock();
        Ok(Some(format!(
            "{}: {} domain(s) configured, {} removed",
            Self::NAME,
            state.domains.len(),
            state.cleaned
        )))
    }
}
