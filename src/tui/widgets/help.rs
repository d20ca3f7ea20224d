use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::Config;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;
use crate::utils::format_key_binding_for_display as key;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let theme = config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);

    let popup_area = popup_area(area, 60, 70);
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(Block::default()
            .borders(Borders::ALL)
            .title("Help - Key Bindings")
            .title_alignment(Alignment::Center)
            .style(Style::default().fg(fg_color).bg(bg_color)))
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

fn build_help_text(config: &Config) -> String {
    let kb = &config.key_bindings;
    let mut text = String::new();

    text.push_str("URL input:\n");
    text.push_str(&format!("  {}: Analyze post\n", key(&kb.analyze)));
    text.push_str("  Ctrl+v / terminal paste: Paste URL\n");
    text.push_str("  Ctrl+u: Clear input\n");
    text.push_str("  Esc: Leave input\n");
    text.push('\n');

    text.push_str("Categories:\n");
    text.push_str("  1-5: Toggle artist / copyright / character / general / meta\n");
    text.push_str(&format!("  {} / {}: Select category\n", key(&kb.category_left), key(&kb.category_right)));
    text.push_str(&format!("  {}: Toggle selected category\n", key(&kb.toggle_category)));
    text.push_str(&format!("  {}: Copy combined tags\n", key(&kb.copy)));
    text.push_str(&format!("  {}: Open post in browser\n", key(&kb.open_post)));
    text.push_str(&format!("  {}: Quit\n", key(&kb.quit)));
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Switch between input and categories\n", key(&kb.toggle_focus)));
    text.push_str(&format!("  {}: Show/hide help\n", key(&kb.help)));
    text.push_str("  Ctrl+c: Quit\n");

    text
}
