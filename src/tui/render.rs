use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};

use crate::tui::app::{AdvisoryState, Focus};
use crate::tui::widgets::{
    advisory::render_advisory,
    category_toggles::render_category_toggles,
    color::parse_color,
    combined_tags::render_combined_tags,
    help::render_help,
    post_info::render_post_info,
    status_bar::render_status_bar,
    url_input::render_url_input,
};
use crate::tui::{App, Layout};
use crate::utils::format_key_binding_for_display as key;

pub fn render(f: &mut Frame, app: &App, layout: &Layout) {
    let theme = app.config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("Danbooru Tag Extractor")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, f.area());

    // Popups own the keyboard, so nothing underneath shows focus
    let popup_open = app.ui.show_help || app.advisory == AdvisoryState::Shown;
    let focus = (!popup_open).then_some(app.ui.focus);

    render_url_input(
        f,
        layout.input_area,
        &app.input,
        focus == Some(Focus::Input),
        app.is_loading(),
        &app.config,
    );

    let page_url = app.post_page_url();
    render_post_info(
        f,
        layout.post_area,
        app.analysis.post.as_ref(),
        page_url.as_deref(),
        app.analysis.error.as_deref(),
        app.is_loading(),
        &app.config,
    );

    render_category_toggles(
        f,
        layout.toggles_area,
        &app.visibility,
        app.analysis.tags.as_ref(),
        app.ui.selected_category,
        focus == Some(Focus::Categories),
        &app.config,
    );

    render_combined_tags(
        f,
        layout.tags_area,
        &app.combined_tags(),
        app.copied_indicator_active(),
        &app.config,
    );

    let key_hints = get_key_hints(app);
    render_status_bar(
        f,
        layout.status_area,
        app.status.message.as_deref(),
        &key_hints,
        &app.config,
    );

    if app.ui.show_help {
        render_help(f, f.area(), &app.config);
    }

    if app.advisory == AdvisoryState::Shown {
        render_advisory(f, f.area(), app.request_count, &app.config);
    }
}

pub fn get_key_hints(app: &App) -> Vec<String> {
    let kb = &app.config.key_bindings;

    if app.advisory == AdvisoryState::Shown {
        return vec![format!("{} or Esc: Dismiss", key(&kb.dismiss))];
    }
    if app.ui.show_help {
        return vec![format!("Esc or {}: Close help", key(&kb.help))];
    }

    match app.ui.focus {
        Focus::Input => vec![
            format!("{}: Analyze", key(&kb.analyze)),
            format!("{}: Categories", key(&kb.toggle_focus)),
            "Ctrl+u: Clear".to_string(),
            format!("{}: Help", key(&kb.help)),
            "Ctrl+c: Quit".to_string(),
        ],
        Focus::Categories => vec![
            "1-5: Toggle".to_string(),
            format!("{}: Copy", key(&kb.copy)),
            format!("{}: Open post", key(&kb.open_post)),
            format!("{}: Edit URL", key(&kb.toggle_focus)),
            format!("{}: Help", key(&kb.help)),
            format!("{}: Quit", key(&kb.quit)),
        ],
    }
}
