use std::process;
use anyhow::Result;
use log::{error, info};
use plmanagement::{app, cli, display, logging};

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("Application error: {:#}", e);
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    // Configuration first: components need it before the full parser exists
    let initial = cli::InitialArgs::parse_from_env();
    let config = app::load_configuration(&initial)?;
    let mut manager = app::create_manager(config)?;

    let (args, params) = match cli::parse_with_components(&manager, std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(e) => e.exit(),
    };
    cli::validate_args(&args)?;

    let log_config = app::configure_logging(&args, manager.config())?;
    logging::init_logger(log_config)?;
    info!("plmanagement {} starting", env!("CARGO_PKG_VERSION"));

    let failures = manager.configure_all(params)?;
    let colours = display::ColourManager::from_args(args.no_color, args.color);

    if let Some(export_path) = &args.export_config {
        app::handle_export_config(manager.config(), export_path)?;
        return Ok(0);
    }

    if args.list_plugins {
        app::handle_list_plugins(&manager, &colours);
        return Ok(0);
    }

    let outcome = app::run_session(&manager)?;
    app::print_summary(&outcome, &colours);

    Ok(if failures.is_empty() && outcome.dispatch_failures == 0 { 0 } else { 2 })
}
