// ABOUTME: Entry point for the nodelink CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::CreateArgs;
use nodelink::config::{self, CONFIG_FILENAME, Config};
use nodelink::error::Result;
use nodelink::output::Output;
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(cli.output.into());

    if let Err(e) = run(cli, &output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    let cwd = env::current_dir()?;
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init { force } => {
            config::init_config(&cwd, force)?;
            output.success(&format!("Created {CONFIG_FILENAME}"));
            Ok(())
        }
        Commands::Classify { status } => commands::classify(&status, output),
        Commands::Create {
            target,
            subnet,
            mode,
            ip_address,
            default_gateway,
        } => {
            let config = load_config(config_path, &cwd)?;
            let args = CreateArgs {
                subnet,
                mode,
                ip_address,
                default_gateway,
            };
            commands::create(&config, &target, args, output).await
        }
        Commands::Read { target, link } => {
            let config = load_config(config_path, &cwd)?;
            commands::read(&config, &target, link, output).await
        }
        Commands::Update {
            target,
            link,
            default_gateway,
        } => {
            let config = load_config(config_path, &cwd)?;
            commands::update(&config, &target, link, default_gateway, output).await
        }
        Commands::Delete { target, link } => {
            let config = load_config(config_path, &cwd)?;
            commands::delete(&config, &target, link, output).await
        }
    }
}

/// Load the config named by `--config`, or discover one from `cwd`.
fn load_config(path: Option<&Path>, cwd: &Path) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::discover_or_default(cwd),
    }
}
