//! Application orchestration module

pub mod initialization;
pub mod execution;

pub use initialization::{
    build_registry,
    configure_logging,
    create_manager,
    handle_export_config,
    load_configuration,
};
pub use execution::{handle_list_plugins, print_summary, run_session, SessionOutcome};
