//! Welcome banner display for chat sessions.

use console::style;

/// Print the banner shown when chat is enabled.
pub fn print_welcome_banner(bot_name: &str, runtime_url: &str, session_id: &str) {
    println!();
    println!("  {} {}", style("*").cyan().bold(), style(bot_name).cyan().bold());
    println!();
    println!("  {}  {}", style("Runtime:").bold(), style(runtime_url).dim());
    println!(
        "  {}  {}",
        style("Session:").bold(),
        style(&session_id[..8.min(session_id.len())]).dim()
    );
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}
