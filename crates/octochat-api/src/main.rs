//! Octochat CLI entry point.
//!
//! Binary name: `octochat`
//!
//! Parses CLI arguments, sets up tracing, loads configuration and the remote
//! clients, then dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use octochat_observe::tracing_setup::{
    TracingOptions, init_tracing, shutdown_tracing, verbosity_directive,
};
use octochat_types::config::RenderMode;

use cli::build::OutputMode;
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = TracingOptions::new(verbosity_directive(cli.verbose, cli.quiet))
        .with_json(cli.log_json)
        .with_otel_from_env();
    if let Err(e) = init_tracing(&options) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Commands that need neither configuration nor network
    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(*shell, &mut cmd, "octochat", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Name { url } => return cli::status::name(url, cli.json),
        _ => {}
    }

    let state = AppState::init(cli.config.as_deref()).await?;
    let output = OutputMode {
        json: cli.json,
        quiet: cli.quiet,
        render: if cli.plain {
            RenderMode::Plain
        } else {
            state.config.render
        },
    };

    match cli.command {
        Commands::Build { url, no_chat } => {
            cli::build::build(&state, &url, no_chat, output).await?;
        }
        Commands::Chat { bot } => {
            cli::build::chat(&state, &bot, output).await?;
        }
        Commands::Status { url } => {
            cli::status::status(&state, &url, cli.json).await?;
        }
        Commands::Delete { url, force } => {
            cli::delete::delete(&state, &url, force, cli.json).await?;
        }
        Commands::Config => {
            cli::config::show(&state, cli.json)?;
        }
        Commands::Completions { .. } | Commands::Name { .. } => unreachable!("handled above"),
    }

    Ok(())
}
