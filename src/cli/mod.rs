//! CLI module containing argument parsing and related functionality

pub mod args;
pub mod initial_args;

pub use args::{build_command, parse_with_components, validate_args, Args};
pub use initial_args::InitialArgs;
