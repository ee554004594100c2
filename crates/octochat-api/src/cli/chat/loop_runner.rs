//! Main chat loop orchestration.
//!
//! Runs once the session's bot is ready: welcome banner, input loop with
//! slash commands, one runtime call per message, and rendered replies.

use console::style;

use octochat_core::session::controller::{SendOutcome, SkipReason};
use octochat_types::chat::{ChatMessage, Sender};
use octochat_types::config::RenderMode;

use crate::cli::spinner;
use crate::state::ConcreteController;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

/// Chat with the controller's bot until the user exits.
pub async fn run_chat_loop(
    controller: &ConcreteController,
    runtime_url: &str,
    render: RenderMode,
) -> anyhow::Result<()> {
    let session = controller.session().await;
    let bot_name = session
        .bot_name
        .as_ref()
        .map(|name| name.to_string())
        .ok_or_else(|| anyhow::anyhow!("no bot attached to this session"))?;
    if !session.can_send() {
        anyhow::bail!("bot '{bot_name}' is not ready for chat yet");
    }

    print_welcome_banner(&bot_name, runtime_url, &session.id.to_string());

    let renderer = ChatRenderer::new(render, Some(crossterm::style::Color::Cyan));
    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut input, _writer) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match input.read_line().await {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Line(text) if text.is_empty() => continue,
            InputEvent::Line(text) => text,
        };

        if let Some(command) = commands::parse(&text) {
            match command {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => input.clear(),
                ChatCommand::History(limit) => {
                    let messages = match limit {
                        Some(n) => controller.history(n).await,
                        None => controller.transcript().await,
                    };
                    print_history(&messages, &bot_name);
                }
                ChatCommand::Status => {
                    let session = controller.session().await;
                    let (sent, received) = controller.message_counts().await;
                    println!();
                    println!("  {}  {}", style("Bot:").bold(), style(&bot_name).cyan());
                    println!("  {}  {}", style("Status:").bold(), session.status);
                    println!("  {}  {sent} sent, {received} received", style("Messages:").bold());
                    println!();
                }
                ChatCommand::Exit => break,
                ChatCommand::Unknown(name) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(name).dim()
                    );
                }
            }
            continue;
        }

        let thinking = spinner("thinking...");
        let outcome = controller.send_message(&text).await;
        thinking.finish_and_clear();

        match outcome {
            SendOutcome::Delivered(reply) => {
                println!();
                println!("  {}", style(&bot_name).cyan().bold());
                for line in renderer.render(&reply.text).lines() {
                    println!("  {line}");
                }
                println!();
            }
            SendOutcome::Failed(err) => {
                eprintln!("\n  {} Message not delivered: {err}", style("!").red().bold());
                eprintln!("  {}", style("Type a message to retry, /exit to quit.").dim());
            }
            SendOutcome::Skipped(SkipReason::EmptyMessage) => {}
            SendOutcome::Skipped(SkipReason::ChatDisabled) => {
                eprintln!("\n  {} Chat is not enabled for this session.", style("!").yellow().bold());
            }
        }
    }

    input.flush();
    println!("\n  {}", style("Session ended.").dim());
    Ok(())
}

fn print_history(messages: &[ChatMessage], bot_name: &str) {
    println!();
    if messages.is_empty() {
        println!("  {}", style("No messages yet.").dim());
    }
    for message in messages {
        let label = match message.sender {
            Sender::User => style("You".to_string()).green(),
            Sender::Bot => style(bot_name.to_string()).cyan(),
        };
        println!(
            "  {} {} {}",
            style(message.created_at.format("%H:%M:%S")).dim(),
            label.bold(),
            preview(&message.text, 100)
        );
    }
    println!();
}

/// First `max` characters of `text` on one line.
fn preview(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}
