use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::Config;
use crate::models::Post;
use crate::tui::widgets::color::parse_color;

/// Shows the analysed post, a loading placeholder, or the last error
pub fn render_post_info(
    f: &mut Frame,
    area: Rect,
    post: Option<&Post>,
    page_url: Option<&str>,
    error: Option<&str>,
    loading: bool,
    config: &Config,
) {
    let theme = config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let accent = parse_color(&theme.accent);
    let error_color = parse_color(&theme.error);

    let label = |text: &'static str| Span::styled(text, Style::default().fg(accent).add_modifier(Modifier::BOLD));

    let mut lines = Vec::new();
    if let Some(message) = error {
        lines.push(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(error_color).add_modifier(Modifier::BOLD),
        )));
    }

    if loading {
        lines.push(Line::from(Span::styled(
            "Fetching post from Danbooru...",
            Style::default().fg(fg_color).add_modifier(Modifier::DIM),
        )));
    } else if let Some(post) = post {
        lines.push(Line::from(vec![label("Post:    "), Span::raw(post.id.to_string())]));
        if let Some(url) = page_url {
            lines.push(Line::from(vec![label("Link:    "), Span::raw(url.to_string())]));
        }
        let preview = post.preview_file_url.as_deref().unwrap_or("(not available)");
        lines.push(Line::from(vec![label("Preview: "), Span::raw(preview.to_string())]));
    } else if error.is_none() {
        lines.push(Line::from(Span::styled(
            "Paste a post URL and press Enter to extract its tags",
            Style::default().fg(fg_color).add_modifier(Modifier::DIM),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Post"))
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}
