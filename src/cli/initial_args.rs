//! First-stage argument parsing
//!
//! Configuration has to be loaded before components exist, and components
//! contribute options to the full parser. This parser picks out only the
//! configuration arguments and ignores everything else.

use std::ffi::OsString;
use std::path::PathBuf;
use clap::{Arg, ArgAction, ArgMatches, Command};

/// Configuration arguments known before components are loaded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitialArgs {
    pub config_file: Option<PathBuf>,
    pub config_name: Option<String>,
}

impl InitialArgs {
    pub fn parse_from_env() -> Self {
        Self::parse_from_args(std::env::args_os())
    }

    /// Parse a full argument list, ignoring arguments this stage does not know
    pub fn parse_from_args<I, T>(argv: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let command = Command::new("plmanagement")
            .disable_help_flag(true)
            .disable_version_flag(true)
            .arg(Arg::new("config-file").long("config-file").value_name("FILE"))
            .arg(Arg::new("config-name").long("config-name").value_name("SECTION"))
            .arg(Arg::new("rest").num_args(0..).action(ArgAction::Append).allow_hyphen_values(true).trailing_var_arg(true))
            .allow_external_subcommands(true)
            .ignore_errors(true);

        match command.try_get_matches_from(argv) {
            Ok(matches) => Self::from_matches(&matches),
            Err(_) => Self::default(),
        }
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config_file: matches.get_one::<String>("config-file").map(PathBuf::from),
            config_name: matches.get_one::<String>("config-name").cloned(),
        }
    }
}
