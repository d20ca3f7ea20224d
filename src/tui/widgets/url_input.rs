use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Config;
use crate::tui::widgets::color::parse_color;

const PLACEHOLDER: &str = "https://danbooru.donmai.us/posts/...";

/// Single-line text input holding the post URL
#[derive(Debug, Clone, Default)]
pub struct UrlInput {
    text: String,
    cursor: usize, // in chars, not bytes
}

impl UrlInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_string(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_index(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch.is_control() {
            return;
        }
        let idx = self.byte_index();
        self.text.insert(idx, ch);
        self.cursor += 1;
    }

    /// Insert pasted text. Line breaks are dropped, a URL never spans lines
    pub fn insert_str(&mut self, s: &str) {
        for ch in s.chars().filter(|c| !c.is_control()) {
            self.insert_char(ch);
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let idx = self.byte_index();
        self.text.remove(idx);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let idx = self.byte_index();
            self.text.remove(idx);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}

pub fn render_url_input(
    f: &mut Frame,
    area: Rect,
    input: &UrlInput,
    focused: bool,
    loading: bool,
    config: &Config,
) {
    let theme = config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let accent = parse_color(&theme.accent);

    let title = if loading { "Post URL - Analyzing..." } else { "Post URL" };
    let border_style = if focused {
        Style::default().fg(accent)
    } else {
        Style::default().fg(fg_color)
    };

    let inner_width = area.width.saturating_sub(2) as usize;
    // Keep the cursor in view for URLs longer than the box
    let scroll = input.cursor().saturating_sub(inner_width.saturating_sub(1));

    let line = if input.value().is_empty() {
        Line::from(Span::styled(
            PLACEHOLDER,
            Style::default().fg(fg_color).add_modifier(Modifier::DIM),
        ))
    } else {
        let visible: String = input.value().chars().skip(scroll).take(inner_width).collect();
        Line::from(Span::styled(visible, Style::default().fg(fg_color)))
    };

    let paragraph = Paragraph::new(line)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(border_style),
        )
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(paragraph, area);

    if focused && !loading {
        let x = area.x + 1 + (input.cursor() - scroll) as u16;
        f.set_cursor_position(Position::new(x, area.y + 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_cursor_movement() {
        let mut input = UrlInput::new();
        input.insert_str("posts/1");
        assert_eq!(input.value(), "posts/1");
        assert_eq!(input.cursor(), 7);

        input.move_home();
        input.insert_char('/');
        assert_eq!(input.value(), "/posts/1");

        input.move_end();
        input.backspace();
        input.insert_char('2');
        assert_eq!(input.value(), "/posts/2");
    }

    #[test]
    fn paste_drops_line_breaks() {
        let mut input = UrlInput::new();
        input.insert_str("https://danbooru.donmai.us/posts/5\n");
        assert_eq!(input.value(), "https://danbooru.donmai.us/posts/5");
    }

    #[test]
    fn handles_multibyte_characters() {
        let mut input = UrlInput::from_string("タグ");
        input.move_left();
        input.backspace();
        assert_eq!(input.value(), "グ");
        input.delete();
        assert_eq!(input.value(), "");
        input.delete();
        input.backspace();
        assert_eq!(input.cursor(), 0);
    }
}
