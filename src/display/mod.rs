//! Display module for colour handling and component listings

pub mod colours;
pub mod table;

pub use colours::ColourManager;
pub use table::{component_rows, format_compact_table, render_component_table};
