pub mod app;
pub mod cli;
pub mod config;
pub mod display;
pub mod logging;
pub mod plugin;
