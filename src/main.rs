//! mdview - live viewer for a single Markdown file.

mod actor;
mod cli;
mod config;
mod core;
mod embed;
mod logger;
mod reload;
mod render;
mod utils;

use clap::{ColorChoice, CommandFactory, Parser};
use cli::Cli;
use config::ViewerConfig;
use core::StartupError;

fn main() {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    if let Err(e) = run(&cli) {
        report(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), StartupError> {
    let config = ViewerConfig::load(cli)?;
    logger::set_verbose(config.verbose);
    cli::serve::serve(&config)
}

/// Print a startup failure with its cause chain.
fn report(error: &StartupError) {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    log!("error"; "{}", message);

    if error.wants_usage() {
        let mut command = Cli::command();
        eprintln!("\n{}", command.render_usage());
        eprintln!("Example: {} ./docs.md", command.get_name());
    }
}
