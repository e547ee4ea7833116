use std::ffi::OsString;
use std::path::PathBuf;
use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser};
use log::debug;
use crate::plugin::{ComponentManager, RunParams};

/// Test run driver with pluggable components
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "plmanagement")]
#[command(about = "Runs a test session through registered components: hosts cleanup, storage preparation, input actions and reporting")]
#[command(version)]
pub struct Args {
    /// Verbose output (debug level logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (error level logging only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug output (trace level logging)
    #[arg(long)]
    pub debug: bool,

    /// Log format: text or json
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log file path for file output
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level for file output (independent of console level)
    #[arg(long, value_name = "LEVEL")]
    pub log_file_level: Option<String>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Configuration section overlaying every other section
    #[arg(long, value_name = "SECTION")]
    pub config_name: Option<String>,

    /// List registered components and exit
    #[arg(long)]
    pub list_plugins: bool,

    /// Write the effective configuration to FILE and exit
    #[arg(long, value_name = "FILE")]
    pub export_config: Option<PathBuf>,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,

    /// Force coloured output even when redirected
    #[arg(long, conflicts_with = "no_color")]
    pub color: bool,
}

/// Base command with every component's options merged in
pub fn build_command(manager: &ComponentManager) -> clap::Command {
    manager.add_options(Args::command())
}

/// Parse base arguments and component options in one pass
pub fn parse_with_components<I, T>(manager: &ComponentManager, argv: I) -> std::result::Result<(Args, RunParams), clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command(manager).try_get_matches_from(argv)?;
    let args = Args::from_arg_matches(&matches)?;
    let params = RunParams::from_matches(&matches);
    debug!("Parsed CLI arguments: {:?}", args);
    Ok((args, params))
}

/// Validate CLI argument combinations
pub fn validate_args(args: &Args) -> Result<()> {
    let log_flags_count = [args.verbose, args.quiet, args.debug]
        .iter()
        .filter(|&&flag| flag)
        .count();

    if log_flags_count > 1 {
        return Err(anyhow::anyhow!(
            "Conflicting log level flags: only one of --verbose, --quiet, or --debug may be specified"
        ));
    }

    match args.log_format.to_lowercase().as_str() {
        "text" | "json" => {}
        _ => {
            return Err(anyhow::anyhow!(
                "Invalid log format '{}'. Valid options: text, json",
                args.log_format
            ))
        }
    }

    if let Some(ref level) = args.log_file_level {
        crate::logging::parse_log_level(level)?;
    }

    if args.log_file_level.is_some() && args.log_file.is_none() {
        return Err(anyhow::anyhow!("--log-file-level requires --log-file to be specified"));
    }

    Ok(())
}
