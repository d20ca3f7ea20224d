use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::Config;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

const SEPARATOR: &str = " • ";
const ELLIPSIS: &str = "...";

/// Join as many hints as fit in `max_width` columns, ending in "..." when some were dropped
pub fn fit_key_hints(key_hints: &[String], max_width: usize) -> String {
    let mut text = String::new();

    for (i, hint) in key_hints.iter().enumerate() {
        let sep = if i == 0 { "" } else { SEPARATOR };
        let would_be = text.chars().count() + sep.chars().count() + hint.chars().count();
        if would_be > max_width {
            let keep = max_width.saturating_sub(ELLIPSIS.len());
            let source = if text.is_empty() { hint.as_str() } else { text.as_str() };
            let mut truncated: String = source.chars().take(keep).collect();
            truncated.push_str(ELLIPSIS);
            return truncated;
        }
        text.push_str(sep);
        text.push_str(hint);
    }

    text
}

pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    message: Option<&str>,
    key_hints: &[String],
    config: &Config,
) {
    let theme = config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let max_width = area.width as usize;

    let (content, style) = match message {
        Some(msg) => {
            // Status messages get a highlighted background for visibility
            let msg_fg = get_contrast_text_color(highlight_bg);
            let content = if msg.chars().count() > max_width {
                msg.chars().take(max_width.saturating_sub(ELLIPSIS.len())).collect::<String>() + ELLIPSIS
            } else {
                msg.to_string()
            };
            (content, Style::default().fg(msg_fg).bg(highlight_bg).add_modifier(Modifier::BOLD))
        }
        None => (
            fit_key_hints(key_hints, max_width),
            Style::default().fg(fg_color).bg(bg_color),
        ),
    };

    f.render_widget(Paragraph::new(content).style(style), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hints() -> Vec<String> {
        vec!["q: Quit".to_string(), "c: Copy".to_string(), "o: Open".to_string()]
    }

    #[test]
    fn all_hints_fit() {
        assert_eq!(fit_key_hints(&hints(), 80), "q: Quit • c: Copy • o: Open");
    }

    #[test]
    fn overflowing_hints_are_elided() {
        let text = fit_key_hints(&hints(), 20);
        assert_eq!(text, "q: Quit • c: Copy...");
        assert!(text.chars().count() <= 20);
    }

    #[test]
    fn single_long_hint_is_truncated() {
        assert_eq!(fit_key_hints(&["abcdefghij".to_string()], 6), "abc...");
    }
}
