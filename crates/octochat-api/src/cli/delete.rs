//! `octochat delete`: remove the bot built from a source URL.

use anyhow::Result;
use console::style;
use dialoguer::Confirm;

use octochat_core::naming::bot_name_from_url;
use octochat_core::remote::tracker::BotTracker;

use crate::state::AppState;

use super::spinner;

pub async fn delete(state: &AppState, url: &str, force: bool, json: bool) -> Result<()> {
    let url = url.trim();
    let bot_name = bot_name_from_url(url)?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Permanently delete bot '{}' built from {url}?",
                style(&bot_name).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let progress = (!json).then(|| spinner(format!("Deleting {bot_name}...")));
    let result = state.tracker.delete(url).await;
    if let Some(progress) = &progress {
        progress.finish_and_clear();
    }
    result?;

    if json {
        println!(
            "{}",
            serde_json::json!({"deleted": true, "url": url, "bot_name": bot_name})
        );
    } else {
        println!(
            "  {} Deletion of '{}' scheduled.",
            style("✓").red().bold(),
            style(&bot_name).cyan()
        );
    }
    Ok(())
}
