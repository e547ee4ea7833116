//! Colour decisions for terminal output
//!
//! Precedence: `--no-color`, then `--color`, then `NO_COLOR`, then whether
//! stdout is a terminal.

use std::io::IsTerminal;
use colored::{ColoredString, Colorize};
use crate::plugin::ComponentState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColourManager {
    enabled: bool,
}

impl ColourManager {
    /// Resolve colour use from the command-line flags and environment
    pub fn from_args(no_color: bool, color: bool) -> Self {
        let enabled = if no_color {
            false
        } else if color {
            true
        } else if std::env::var_os("NO_COLOR").is_some() {
            false
        } else {
            std::io::stdout().is_terminal()
        };
        Self { enabled }
    }

    pub fn with_colours(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn colours_enabled(&self) -> bool {
        self.enabled
    }

    pub fn highlight(&self, text: &str) -> ColoredString {
        self.paint(text, |s| s.bold())
    }

    pub fn error(&self, text: &str) -> ColoredString {
        self.paint(text, |s| s.red())
    }

    pub fn success(&self, text: &str) -> ColoredString {
        self.paint(text, |s| s.green())
    }

    pub fn muted(&self, text: &str) -> ColoredString {
        self.paint(text, |s| s.dimmed())
    }

    /// Colour a line according to a component's state
    pub fn for_state(&self, text: &str, state: &ComponentState, enabled: bool) -> ColoredString {
        match (state, enabled) {
            (ComponentState::Failed(_), _) => self.error(text),
            (_, true) => self.success(text),
            (_, false) => self.muted(text),
        }
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> ColoredString {
        if self.enabled {
            style(text)
        } else {
            text.normal()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_color_flag_wins() {
        assert!(!ColourManager::from_args(true, false).colours_enabled());
        assert!(ColourManager::from_args(false, true).colours_enabled());
    }

    #[test]
    fn test_disabled_output_is_plain() {
        let colours = ColourManager::with_colours(false);
        let failed = ComponentState::Failed("bad".to_string());

        assert_eq!(colours.for_state("hosts_cleanup", &failed, false).to_string(), "hosts_cleanup");
        assert_eq!(colours.highlight("Name").to_string(), "Name");
    }
}
