//! `octochat config`: print the effective configuration.

use anyhow::Result;
use console::style;

use crate::state::AppState;

pub fn show(state: &AppState, json: bool) -> Result<()> {
    let config = &state.config;
    let token = if state.auth.has_token() {
        "set"
    } else {
        "not set"
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "path": state.config_path.display().to_string(),
                "builder_url": config.builder_url(),
                "runtime_url": config.runtime_url(),
                "access_token": token,
                "config": config,
            }))?
        );
        return Ok(());
    }

    println!();
    println!(
        "  {}  {}",
        style("File:").bold(),
        style(state.config_path.display()).dim()
    );
    println!("  {}  {}", style("Builder:").bold(), config.builder_url());
    println!("  {}  {}", style("Runtime:").bold(), config.runtime_url());
    println!(
        "  {}  {} ({})",
        style("Token:").bold(),
        token,
        style(&config.credentials.token_env).dim()
    );
    println!();
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
