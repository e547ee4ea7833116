//! Action Queue Component
//!
//! Serves "next input action" requests from actions given with `--action`
//! or listed in `RUN.actions`. Command-line actions come first.

use std::collections::VecDeque;
use clap::{Arg, ArgAction, Command};
use log::debug;
use parking_lot::Mutex;
use crate::config::ConfigManager;
use crate::implements;
use crate::plugin::component::{Claims, Component, ComponentClass};
use crate::plugin::error::PluginResult;
use crate::plugin::interfaces::{InputListener, Reporter};
use crate::plugin::settings::RunParams;

pub const ACTION_ARG: &str = "action";

#[derive(Default)]
struct QueueState {
    pending: VecDeque<String>,
    served: usize,
}

pub struct ActionQueue {
    state: Mutex<QueueState>,
}

impl ActionQueue {
    fn configured_actions(params: &RunParams, config: &ConfigManager) -> Vec<String> {
        let mut actions: Vec<String> = params.values(ACTION_ARG).to_vec();
        actions.extend(config.get_list("RUN", "actions"));
        actions
    }

    /// Actions not yet handed out
    pub fn pending(&self) -> Vec<String> {
        self.state.lock().pending.iter().cloned().collect()
    }

    pub fn served(&self) -> usize {
        self.state.lock().served
    }
}

impl Component for ActionQueue {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Feeds input actions from the command line and RUN.actions"
    }

    fn add_options(&self, command: Command) -> Command {
        command.arg(
            Arg::new(ACTION_ARG)
                .long("action")
                .value_name("ACTION")
                .action(ArgAction::Append)
                .help("Queue an input action (repeatable)"),
        )
    }

    fn configure(&self, params: &RunParams, config: &mut ConfigManager) -> PluginResult<()> {
        let actions = Self::configured_actions(params, config);
        debug!("Queued {} action(s)", actions.len());
        let mut state = self.state.lock();
        state.pending = actions.into();
        state.served = 0;
        Ok(())
    }

    fn is_enabled(&self, params: &RunParams, config: &ConfigManager) -> PluginResult<bool> {
        Ok(!Self::configured_actions(params, config).is_empty())
    }
}

impl ComponentClass for ActionQueue {
    const NAME: &'static str = "action_queue";

    fn construct() -> Self {
        Self { state: Mutex::new(QueueState::default()) }
    }

    fn claims(claims: &mut Claims<Self>) {
        implements!(claims, InputListener, Reporter);
    }
}

impl InputListener for ActionQueue {
    fn on_next_action(&self) -> PluginResult<Option<String>> {
        let mut state = self.state.lock();
        let next = state.pending.pop_front();
        if next.is_some() {
            state.served += 1;
        }
        Ok(next)
    }

    fn has_pending_action(&self) -> bool {
        !self.state.lock().pending.is_empty()
    }
}

impl Reporter for ActionQueue {
    fn summary(&self) -> PluginResult<Option<String>> {
        let state = self.state.lock();
        Ok(Some(format!(
            "{}: served {} action(s), {} left",
            Self::NAME,
            state.served,
            state.pending.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_actions_come_first() {
        let mut config = ConfigManager::empty();
        config.set_value("RUN", "actions", "migrate, shutdown");
        let params = RunParams::new().with_value(ACTION_ARG, "boot");

        let queue = ActionQueue::construct();
        queue.configure(&params, &mut config).unwrap();

        assert_eq!(queue.on_next_action().unwrap().as_deref(), Some("boot"));
        assert_eq!(queue.on_next_action().unwrap().as_deref(), Some("migrate"));
        assert_eq!(queue.on_next_action().unwrap().as_deref(), Some("shutdown"));
        assert_eq!(queue.on_next_action().unwrap(), None);
        assert_eq!(queue.served(), 3);
    }

    #[test]
    fn test_enabled_only_with_actions() {
        let queue = ActionQueue::construct();
        let mut config = ConfigManager::empty();

        assert!(!queue.is_enabled(&RunParams::new(), &config).unwrap());

        config.set_value("RUN", "actions", "boot");
        assert!(queue.is_enabled(&RunParams::new(), &config).unwrap());
    }

    #[test]
    fn test_pending_action_tracks_queue() {
        let mut config = ConfigManager::empty();
        config.set_value("RUN", "actions", "boot");
        let queue = ActionQueue::construct();
        queue.configure(&RunParams::new(), &mut config).unwrap();

        assert!(queue.has_pending_action());
        queue.on_next_action().unwrap();
        assert!(!queue.has_pending_action());
    }
}
