//! Run Journal Component
//!
//! Records when the application started and exited. Always enabled.

use chrono::{DateTime, Local};
use log::info;
use parking_lot::Mutex;
use crate::implements;
use crate::plugin::component::{Claims, Component, ComponentClass};
use crate::plugin::error::PluginResult;
use crate::plugin::interfaces::{ApplicationListener, Reporter};
use crate::plugin::predicate::EnableRule;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Default)]
struct Journal {
    started: Option<DateTime<Local>>,
    exited: Option<DateTime<Local>>,
    events: usize,
}

pub struct RunJournal {
    journal: Mutex<Journal>,
}

impl RunJournal {
    pub fn started(&self) -> Option<DateTime<Local>> {
        self.journal.lock().started
    }

    pub fn exited(&self) -> Option<DateTime<Local>> {
        self.journal.lock().exited
    }

    /// Lifecycle events received so far
    pub fn events(&self) -> usize {
        self.journal.lock().events
    }
}

impl Component for RunJournal {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Records application start and exit times"
    }

    // Last in line so the exit time covers every other listener
    fn priority(&self) -> i32 {
        -10
    }

    fn enable_rule(&self) -> EnableRule {
        EnableRule::always()
    }
}

impl ComponentClass for RunJournal {
    const NAME: &'static str = "run_journal";

    fn construct() -> Self {
        Self { journal: Mutex::new(Journal::default()) }
    }

    fn claims(claims: &mut Claims<Self>) {
        implements!(claims, ApplicationListener, Reporter);
    }
}

impl ApplicationListener for RunJournal {
    fn on_application_start(&self) -> PluginResult<()> {
        let now = Local::now();
        info!("Session started at {}", now.format(TIME_FORMAT));
        let mut journal = self.journal.lock();
        journal.started = Some(now);
        journal.events += 1;
        Ok(())
    }

    fn on_application_exit(&self) -> PluginResult<()> {
        let now = Local::now();
        info!("Session exited at {}", now.format(TIME_FORMAT));
        let mut journal = self.journal.lock();
        journal.exited = Some(now);
        journal.events += 1;
        Ok(())
    }
}

impl Reporter for RunJournal {
    fn summary(&self) -> PluginResult<Option<String>> {
        let journal = self.journal.lock();
        let line = match (journal.started, journal.exited) {
            (Some(start), Some(exit)) => format!(
                "{}: {} to {} ({}s)",
                Self::NAME,
                start.format(TIME_FORMAT),
                exit.format(TIME_FORMAT),
                (exit - start).num_seconds()
            ),
            (Some(start), None) => format!("{}: started {}", Self::NAME, start.format(TIME_FORMAT)),
            _ => return Ok(None),
        };
        Ok(Some(line))
    }
}
