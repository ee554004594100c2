//! Waiting for a freshly attached bot to come online.

use console::style;
use indicatif::ProgressBar;
use tokio::sync::broadcast;

use octochat_core::readiness::poller::PollOutcome;
use octochat_types::event::SessionEvent;

use crate::state::ConcreteController;

/// Drive the readiness task to completion, updating `spinner` from probe
/// events. Ctrl+C cancels the poller and returns its `Cancelled` outcome.
pub async fn wait_for_bot(
    controller: &mut ConcreteController,
    mut events: broadcast::Receiver<SessionEvent>,
    spinner: Option<&ProgressBar>,
) -> anyhow::Result<PollOutcome> {
    {
        let wait = controller.wait_until_ready();
        tokio::pin!(wait);

        loop {
            tokio::select! {
                outcome = &mut wait => return Ok(outcome?),
                Ok(event) = events.recv() => {
                    if let Some(spinner) = spinner {
                        update_spinner(spinner, &event);
                    }
                }
                _ = tokio::signal::ctrl_c() => break,
            }
        }
    }

    tracing::info!("Interrupted while waiting for bot readiness");
    controller.cancel_readiness();
    Ok(controller.wait_until_ready().await?)
}

fn update_spinner(spinner: &ProgressBar, event: &SessionEvent) {
    match event {
        SessionEvent::ProbeFailed {
            bot_name, attempt, ..
        } => spinner.set_message(format!(
            "Waiting for {} to come online {}",
            style(bot_name).cyan(),
            style(format!("(probe {attempt})")).dim()
        )),
        SessionEvent::ChatEnabled { bot_name } => {
            spinner.set_message(format!("{} is ready", style(bot_name).cyan()));
        }
        _ => {}
    }
}
