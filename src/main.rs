//! sol - live-preview a single HTML file with generated utility CSS.

mod cli;
mod config;
mod core;
mod document;
mod embed;
mod logger;
mod palette;
mod reload;
mod serve;
mod style;
mod watch;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use owo_colors::OwoColorize;

use cli::Cli;
use config::ServeConfig;
use reload::Registry;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    println!(
        "{} {}",
        "sol".bold(),
        format!("shadcn one-liner (version {})", env!("CARGO_PKG_VERSION")).dimmed()
    );

    // Everything fatal happens before the listener binds
    let (config, config_path) = ServeConfig::load(&cli)?;
    if let Some(path) = &config_path {
        debug!("serve"; "config from {}", path.display());
    }
    let palette = palette::lookup(config.theme.name())?;
    debug!("serve"; "theme {} ({} bytes of palette)", config.theme, palette.len());

    let registry = Arc::new(Registry::new());
    let watcher = watch::watch(&config.file, registry.clone(), config.debounce)
        .with_context(|| format!("cannot live-reload {}", config.file.display()))?;
    log!("watch"; "watching {}", config.file.display());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    let result = runtime.block_on(serve::run(&config, registry));

    watcher.stop();
    if core::is_shutdown() {
        log!("serve"; "stopped");
    }
    result
}
