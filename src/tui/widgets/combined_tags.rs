use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::Config;
use crate::tags::count_tags;
use crate::tui::widgets::color::parse_color;

pub fn render_combined_tags(f: &mut Frame, area: Rect, combined: &str, copied: bool, config: &Config) {
    let theme = config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let accent = parse_color(&theme.accent);

    let mut title = vec![Span::raw(format!("Combined Tags ({})", count_tags(combined)))];
    if copied {
        title.push(Span::styled(
            " ✓ Copied",
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ));
    }

    let paragraph = Paragraph::new(combined.to_string())
        .block(Block::default().borders(Borders::ALL).title(Line::from(title)))
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
