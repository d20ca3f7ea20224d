use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::Config;
use crate::models::{CategorizedTags, CategoryVisibility, TagCategory};
use crate::tags::count_tags;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

/// Text of one toggle, e.g. "[x] 1 Artist (3)"
pub fn toggle_label(category: TagCategory, visible: bool, tags: Option<&CategorizedTags>) -> String {
    let mark = if visible { "x" } else { " " };
    let count = tags
        .map(|tags| format!(" ({})", count_tags(tags.get(category))))
        .unwrap_or_default();
    format!("[{}] {} {}{}", mark, category.index() + 1, category.label(), count)
}

pub fn render_category_toggles(
    f: &mut Frame,
    area: Rect,
    visibility: &CategoryVisibility,
    tags: Option<&CategorizedTags>,
    selected: TagCategory,
    focused: bool,
    config: &Config,
) {
    let theme = config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let accent = parse_color(&theme.accent);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let mut spans = Vec::new();
    for (i, category) in TagCategory::ALL.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let visible = visibility.is_visible(category);
        let style = if focused && category == selected {
            Style::default().fg(highlight_fg).bg(highlight_bg).add_modifier(Modifier::BOLD)
        } else if visible {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(fg_color).add_modifier(Modifier::DIM)
        };
        spans.push(Span::styled(toggle_label(category, visible, tags), style));
    }

    let border_style = if focused {
        Style::default().fg(accent)
    } else {
        Style::default().fg(fg_color)
    };
    let paragraph = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Categories")
                .border_style(border_style),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}
