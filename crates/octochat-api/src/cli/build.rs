//! `octochat build` and `octochat chat`: get a bot online, then talk to it.

use anyhow::Result;
use console::style;

use octochat_types::bot::BotName;
use octochat_types::config::RenderMode;

use crate::state::AppState;

use super::chat::loop_runner::run_chat_loop;
use super::spinner;
use super::wait::wait_for_bot;

/// Output switches shared by the build and chat commands.
#[derive(Debug, Clone, Copy)]
pub struct OutputMode {
    pub json: bool,
    pub quiet: bool,
    pub render: RenderMode,
}

impl OutputMode {
    fn interactive(&self) -> bool {
        !self.json && !self.quiet
    }
}

/// Request a build for `url`, wait for readiness, then chat unless `no_chat`.
pub async fn build(state: &AppState, url: &str, no_chat: bool, output: OutputMode) -> Result<()> {
    let mut controller = state.controller();
    let events = controller.subscribe();

    let progress = output
        .interactive()
        .then(|| spinner(format!("Requesting build for {}...", style(url.trim()).cyan())));

    let accepted = match controller.request_build(url).await {
        Ok(accepted) => accepted,
        Err(err) => {
            if let Some(progress) = &progress {
                progress.finish_and_clear();
            }
            return Err(err.into());
        }
    };

    if let Some(progress) = &progress {
        let verb = if accepted.already_existed {
            "Found existing bot"
        } else {
            "Building"
        };
        progress.set_message(format!(
            "{verb} {}, waiting for it to come online...",
            style(&accepted.bot_name).cyan()
        ));
    }

    let outcome = wait_for_bot(&mut controller, events, progress.as_ref()).await;
    if let Some(progress) = &progress {
        progress.finish_and_clear();
    }
    let outcome = outcome?;

    if output.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "bot_name": accepted.bot_name,
                "already_existed": accepted.already_existed,
                "ready": outcome.is_ready(),
                "probes": outcome.attempts(),
            }))?
        );
    }
    if !outcome.is_ready() {
        anyhow::bail!(
            "bot '{}' did not come online: {}",
            accepted.bot_name,
            outcome.describe()
        );
    }

    if !output.quiet && !output.json {
        println!(
            "  {} Bot '{}' is ready ({}).",
            style("✓").green().bold(),
            style(&accepted.bot_name).cyan(),
            outcome.describe()
        );
    }

    if no_chat || output.json {
        return Ok(());
    }
    run_chat_loop(&controller, &state.config.runtime_url(), output.render).await
}

/// Attach to an existing bot, verify it answers, then chat.
pub async fn chat(state: &AppState, bot: &str, output: OutputMode) -> Result<()> {
    let bot_name = BotName::new(bot)?;
    let mut controller = state.controller();
    let events = controller.subscribe();

    controller.attach_bot(bot_name.clone()).await?;

    let progress = output
        .interactive()
        .then(|| spinner(format!("Connecting to {}...", style(&bot_name).cyan())));
    let outcome = wait_for_bot(&mut controller, events, progress.as_ref()).await;
    if let Some(progress) = &progress {
        progress.finish_and_clear();
    }
    let outcome = outcome?;

    if !outcome.is_ready() {
        anyhow::bail!("bot '{bot_name}' is not answering: {}", outcome.describe());
    }
    if output.json {
        println!(
            "{}",
            serde_json::json!({"bot_name": bot_name, "ready": true, "probes": outcome.attempts()})
        );
        return Ok(());
    }

    run_chat_loop(&controller, &state.config.runtime_url(), output.render).await
}
