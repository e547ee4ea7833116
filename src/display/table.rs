//! Component listing tables

use prettytable::{format, Cell, Row, Table};
use crate::display::ColourManager;
use crate::plugin::ComponentSummary;

const HEADERS: [&str; 5] = ["Component", "Interfaces", "Priority", "State", "Enabled"];

/// Format a compact table with headers and rows using the clean format
pub fn format_compact_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table.add_row(Row::new(headers.iter().map(|h| Cell::new(h)).collect()));
    for row in rows {
        table.add_row(Row::new(row.iter().map(|c| Cell::new(c)).collect()));
    }

    table
        .to_string()
        .lines()
        .map(|line| format!("  {}\n", line.trim_end()))
        .collect()
}

/// One table row per component
pub fn component_rows(summaries: &[ComponentSummary]) -> Vec<Vec<String>> {
    summaries
        .iter()
        .map(|s| {
            vec![
                s.name.clone(),
                if s.interfaces.is_empty() { "-".to_string() } else { s.interfaces.join(", ") },
                s.priority.to_string(),
                s.state.to_string(),
                if s.enabled { "yes".to_string() } else { "no".to_string() },
            ]
        })
        .collect()
}

/// Render the component listing; each row is coloured by component state
pub fn render_component_table(summaries: &[ComponentSummary], colours: &ColourManager) -> String {
    let plain = format_compact_table(&HEADERS, &component_rows(summaries));
    if plain.is_empty() {
        return format!("  {}\n", colours.muted("No components registered"));
    }

    let mut output = String::new();
    for (index, line) in plain.lines().enumerate() {
        let painted = match index.checked_sub(1).and_then(|i| summaries.get(i)) {
            Some(summary) => colours.for_state(line, &summary.state, summary.enabled),
            None => colours.highlight(line),
        };
        output.push_str(&painted.to_string());
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::ComponentState;

    fn summary(name: &str, enabled: bool, state: ComponentState) -> ComponentSummary {
        ComponentSummary {
            name: name.to_string(),
            description: String::new(),
            interfaces: vec!["IHostsCleanup".to_string(), "IReporter".to_string()],
            priority: 0,
            state,
            enabled,
        }
    }

    #[test]
    fn test_empty_rows_render_nothing() {
        assert!(format_compact_table(&HEADERS, &[]).is_empty());
    }

    #[test]
    fn test_component_table_lists_every_component() {
        let summaries = vec![
            summary("hosts_cleanup", true, ComponentState::Configured),
            summary("auto_devices", false, ComponentState::Failed("no storages".to_string())),
        ];
        let output = render_component_table(&summaries, &ColourManager::with_colours(false));
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Component"));
        assert!(lines[1].contains("hosts_cleanup"));
        assert!(lines[1].contains("IHostsCleanup, IReporter"));
        assert!(lines[1].trim_end().ends_with("yes"));
        assert!(lines[2].contains("failed: no storages"));
        assert!(lines.iter().all(|line| line.starts_with("  ")));
    }
}
