//! `octochat status` and `octochat name`.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use octochat_core::naming::bot_name_from_url;
use octochat_core::remote::tracker::BotTracker;
use octochat_types::bot::{BotStage, BotStatusReport};

use crate::state::AppState;

/// Look up the build stage of the bot for `url`.
pub async fn status(state: &AppState, url: &str, json: bool) -> Result<()> {
    let url = url.trim();
    let report = state.tracker.describe(url).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "url": url,
                "bot_name": report.bot_name,
                "stage": report.stage,
                "in_progress": report.stage.is_in_progress(),
            }))?
        );
        return Ok(());
    }

    println!();
    println!("{}", status_table(url, &report));
    if report.stage == BotStage::DoesNotExist {
        println!(
            "\n  {}",
            style(format!("Build it with: octochat build {url}")).dim()
        );
    }
    println!();
    Ok(())
}

fn status_table(url: &str, report: &BotStatusReport) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Bot").fg(Color::White),
        Cell::new("Stage").fg(Color::White),
        Cell::new("Source URL").fg(Color::White),
    ]);

    let stage_color = match report.stage {
        BotStage::Ready => Color::Green,
        BotStage::DoesNotExist => Color::DarkGrey,
        _ => Color::Yellow,
    };
    table.add_row(vec![
        Cell::new(report.bot_name.as_str()).fg(Color::Cyan),
        Cell::new(report.stage.to_string()).fg(stage_color),
        Cell::new(url),
    ]);
    table
}

/// Print the bot name the builder assigns to `url`.
pub fn name(url: &str, json: bool) -> Result<()> {
    let bot_name = bot_name_from_url(url)?;
    if json {
        println!(
            "{}",
            serde_json::json!({"url": url.trim(), "bot_name": bot_name})
        );
    } else {
        println!("{bot_name}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use octochat_types::bot::BotName;

    #[test]
    fn test_status_table_lists_report() {
        let report = BotStatusReport {
            bot_name: BotName::new("Examplecomdo").unwrap(),
            stage: BotStage::Building,
        };
        let rendered = status_table("http://example.com/docs", &report).to_string();
        assert!(rendered.contains("Examplecomdo"));
        assert!(rendered.contains("BUILDING"));
        assert!(rendered.contains("http://example.com/docs"));
    }
}
