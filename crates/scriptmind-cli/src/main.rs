//! Scriptmind CLI - Extract memories from movie scripts and chat about them.

use anyhow::Context;
use clap::Parser;
use scriptmind_cli::cli::{ConfigAction, ConfigArgs};
use scriptmind_cli::commands;
use scriptmind_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref();
    let config = match (&cli.command, Config::load(config_path)) {
        // A broken file must not block writing a fresh one
        (Command::Config(ConfigArgs { action: ConfigAction::Init { .. } }), Err(_)) => Config::default(),
        (_, loaded) => loaded.with_context(|| match config_path {
            Some(path) => format!("failed to load {}", path.display()),
            None => "failed to load configuration".to_string(),
        })?,
    };

    // Determine output format
    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Extract(args) => commands::execute_extract(args, &config, &formatter).await?,
        Command::Show(args) => commands::execute_show(args, &formatter)?,
        Command::Ask(args) => commands::execute_ask(args, &config, &formatter).await?,
        Command::Chat(args) => commands::execute_chat(args, &config, &formatter).await?,
        Command::Config(args) => commands::execute_config(args, &config, config_path, &formatter)?,
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
