//! QR console demo entry point.
//!
//! Registers a few arithmetic commands and runs the interactive loop on
//! stdin/stdout. The shell configuration is read from the TOML file named by
//! the first argument or `QR_CONSOLE_CONFIG`; without one the defaults apply
//! with a `hello` greeting.

mod demo_commands;

use std::path::PathBuf;

use anyhow::{Context, Result};

use qr_console::{CommandRegistry, Shell};
use qr_types::config::ShellConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("QR_CONSOLE_CONFIG").ok())
        .map(PathBuf::from);
    let config = match &config_path {
        Some(path) => ShellConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ShellConfig::default().with_greeting("hello"),
    };
    log::info!(
        "Starting {} (throw_errors = {})",
        config.program_name,
        config.throw_errors
    );

    let mut registry = CommandRegistry::new(&config.program_name);
    demo_commands::register_demo_commands(&mut registry)?;

    Shell::new(registry, config).run()?;
    log::info!("Console shut down cleanly");
    Ok(())
}
