//! Slash commands available inside the chat loop.

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Show the last `n` transcript entries (all when `None`).
    History(Option<usize>),
    /// Show the session state and message counts.
    Status,
    Exit,
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/clear" | "/cls" => ChatCommand::Clear,
        "/history" => match arg {
            None => ChatCommand::History(None),
            Some(n) => match n.parse::<usize>() {
                Ok(n) if n > 0 => ChatCommand::History(Some(n)),
                _ => ChatCommand::Unknown(format!("/history expects a positive number, got '{n}'")),
            },
        },
        "/status" => ChatCommand::Status,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (name, help) in [
        ("/help", "Show this help message"),
        ("/clear", "Clear the screen"),
        ("/history [n]", "Show the conversation so far"),
        ("/status", "Show the bot and session state"),
        ("/exit", "End the chat session"),
    ] {
        println!("  {:<14} {}", style(name).cyan(), help);
    }
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
        assert_eq!(parse("  /HELP  "), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_exit() {
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/quit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/q"), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_history() {
        assert_eq!(parse("/history"), Some(ChatCommand::History(None)));
        assert_eq!(parse("/history 5"), Some(ChatCommand::History(Some(5))));
        assert!(matches!(parse("/history zero"), Some(ChatCommand::Unknown(_))));
        assert!(matches!(parse("/history 0"), Some(ChatCommand::Unknown(_))));
    }

    #[test]
    fn test_parse_status_and_clear() {
        assert_eq!(parse("/status"), Some(ChatCommand::Status));
        assert_eq!(parse("/cls"), Some(ChatCommand::Clear));
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("hello world"), None);
        assert_eq!(parse("what is /help?"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/foo bar"), Some(ChatCommand::Unknown("/foo".to_string())));
    }
}
