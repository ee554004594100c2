//! Reply rendering: termimad markdown or verbatim text.

use crossterm::style::Color;
use termimad::MadSkin;

use octochat_types::config::RenderMode;

/// Formats bot replies for the terminal.
pub struct ChatRenderer {
    skin: MadSkin,
    mode: RenderMode,
}

impl ChatRenderer {
    /// `accent` colours headers and bold text in markdown mode.
    pub fn new(mode: RenderMode, accent: Option<Color>) -> Self {
        let mut skin = MadSkin::default_dark();
        if let Some(color) = accent {
            let color = to_termimad(color);
            skin.bold.set_fg(color);
            skin.headers[0].set_fg(color);
            skin.headers[1].set_fg(color);
        }
        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);

        Self { skin, mode }
    }

    /// Render one reply. Plain mode returns the text unchanged.
    pub fn render(&self, text: &str) -> String {
        match self.mode {
            RenderMode::Plain => text.to_string(),
            RenderMode::Markdown => self.skin.term_text(text).to_string(),
        }
    }
}

fn to_termimad(color: Color) -> termimad::crossterm::style::Color {
    use termimad::crossterm::style::Color as Tc;
    match color {
        Color::Cyan => Tc::Cyan,
        Color::Green => Tc::Green,
        Color::Yellow => Tc::Yellow,
        Color::Magenta => Tc::Magenta,
        Color::Blue => Tc::Blue,
        Color::Red => Tc::Red,
        Color::Rgb { r, g, b } => Tc::Rgb { r, g, b },
        _ => Tc::Cyan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_is_verbatim() {
        let renderer = ChatRenderer::new(RenderMode::Plain, None);
        let text = "**Hello** _there_\n- one\n- two";
        assert_eq!(renderer.render(text), text);
    }

    #[test]
    fn test_markdown_keeps_words() {
        let renderer = ChatRenderer::new(RenderMode::Markdown, Some(Color::Cyan));
        let rendered = renderer.render("Hello **world**");
        assert!(rendered.contains("Hello"));
        assert!(rendered.contains("world"));
        assert!(!rendered.contains("**"));
    }

    #[test]
    fn test_accent_mapping() {
        assert_eq!(
            to_termimad(Color::Rgb { r: 1, g: 2, b: 3 }),
            termimad::crossterm::style::Color::Rgb { r: 1, g: 2, b: 3 }
        );
        assert_eq!(to_termimad(Color::Grey), termimad::crossterm::style::Color::Cyan);
    }
}
