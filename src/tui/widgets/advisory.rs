use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::Config;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::popup_area;
use crate::utils::format_key_binding_for_display;

/// One-time warning about heavy API use in this session
pub fn render_advisory(f: &mut Frame, area: Rect, request_count: u32, config: &Config) {
    let theme = config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let warning = parse_color(&theme.warning);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let popup_area = popup_area(area, 50, 40);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(Span::styled(
            "API usage warning",
            Style::default().fg(warning).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "You have made {} requests in this session. The Danbooru API is free, \
             but please use it considerately to avoid being rate limited.",
            request_count
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "> Understood ({}) <",
                format_key_binding_for_display(&config.key_bindings.dismiss)
            ),
            Style::default().fg(highlight_fg).bg(highlight_bg),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(warning))
            .title("Warning")
            .title_alignment(Alignment::Center)
            .style(Style::default().fg(fg_color).bg(bg_color)))
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    f.render_widget(paragraph, popup_area);
}
