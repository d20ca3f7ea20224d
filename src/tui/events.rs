use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    size as terminal_size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use std::time::Duration;
use tracing::{info, warn};

use crate::models::TagCategory;
use crate::tui::app::{AdvisoryState, Focus};
use crate::tui::clipboard::ClipboardWriter;
use crate::tui::error::TuiError;
use crate::tui::{App, Layout};
use crate::utils::{has_primary_modifier, matches_key_event};

/// Guard that ensures terminal state is restored even on panic
/// If the terminal is left in raw mode or alternate screen, the user's terminal will be unusable.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    /// Initialize terminal state and return a guard
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut guard = Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: false,
        };
        execute!(io::stdout(), EnterAlternateScreen, EnableBracketedPaste)?;
        guard.alternate_screen_enabled = true;

        Ok(guard)
    }

    /// Manually restore terminal state (called on normal exit)
    /// After calling this, the guard will do nothing on drop
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Ignore errors in drop - we're already in a cleanup path
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App, clipboard: &mut dyn ClipboardWriter) -> Result<(), TuiError> {
    app.config
        .validate()
        .map_err(|e| TuiError::KeyBindingError(e.to_string()))?;

    // Check terminal size before entering alternate screen
    // This allows us to show a helpful error message in the normal terminal
    let (width, height) = terminal_size()?;
    let min_width = Layout::MIN_WIDTH + 2;
    let min_height = Layout::MIN_HEIGHT + 2;
    if width < min_width || height < min_height {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width, min_height
        )));
    }

    let mut guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    info!("tui started");

    loop {
        app.poll_pending();
        app.check_timeouts();

        terminal.draw(|f| {
            let layout = Layout::calculate(f.area());
            crate::tui::render::render(f, &app, &layout);
        })?;

        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                // Only process Press events (ignore Release events to prevent double-processing on Windows)
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    if handle_key_event(&mut app, key_event, clipboard)? {
                        break;
                    }
                }
                Event::Paste(text) => handle_paste(&mut app, &text),
                _ => {}
            }
        }
    }

    guard.restore()?;
    info!(requests = app.request_count, "tui exited");

    Ok(())
}

/// Bracketed paste from the terminal goes straight into the URL input
pub fn handle_paste(app: &mut App, text: &str) {
    if app.advisory == AdvisoryState::Shown || app.ui.show_help || app.is_loading() {
        return;
    }
    app.ui.focus = Focus::Input;
    app.input.insert_str(text);
}

/// Returns `true` when the application should quit
pub fn handle_key_event(
    app: &mut App,
    key_event: KeyEvent,
    clipboard: &mut dyn ClipboardWriter,
) -> Result<bool, TuiError> {
    // Raw mode swallows SIGINT, so Ctrl+C always quits
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key_event.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        return Ok(true);
    }

    let kb = app.config.key_bindings.clone();

    // The advisory is modal until dismissed
    if app.advisory == AdvisoryState::Shown {
        if key_event.code == KeyCode::Esc || matches_key_event(key_event, &kb.dismiss) {
            app.dismiss_advisory();
        }
        return Ok(false);
    }

    if app.ui.show_help {
        if key_event.code == KeyCode::Esc || matches_key_event(key_event, &kb.help) {
            app.ui.show_help = false;
        }
        return Ok(false);
    }

    if matches_key_event(key_event, &kb.help) {
        app.ui.show_help = true;
        return Ok(false);
    }

    if matches_key_event(key_event, &kb.toggle_focus) || key_event.code == KeyCode::BackTab {
        app.toggle_focus();
        return Ok(false);
    }

    match app.ui.focus {
        Focus::Input => {
            handle_input_mode(app, key_event, clipboard, &kb.analyze);
            Ok(false)
        }
        Focus::Categories => handle_categories_mode(app, key_event, clipboard),
    }
}

fn handle_input_mode(
    app: &mut App,
    key_event: KeyEvent,
    clipboard: &mut dyn ClipboardWriter,
    analyze_binding: &str,
) {
    if matches_key_event(key_event, analyze_binding) {
        app.start_analysis();
        return;
    }

    if key_event.code == KeyCode::Esc {
        app.ui.focus = Focus::Categories;
        return;
    }

    // The input is read-only while a request is in flight
    if app.is_loading() {
        return;
    }

    if has_primary_modifier(key_event.modifiers) {
        match key_event.code {
            KeyCode::Char('v') | KeyCode::Char('V') => match clipboard.get_text() {
                Ok(text) => app.input.insert_str(&text),
                Err(e) => {
                    warn!(error = %e, "paste failed");
                    app.set_status_message(e.to_string());
                }
            },
            KeyCode::Char('u') | KeyCode::Char('U') => app.input.clear(),
            _ => {}
        }
        return;
    }

    match key_event.code {
        KeyCode::Char(c) => app.input.insert_char(c),
        KeyCode::Backspace => app.input.backspace(),
        KeyCode::Delete => app.input.delete(),
        KeyCode::Left => app.input.move_left(),
        KeyCode::Right => app.input.move_right(),
        KeyCode::Home => app.input.move_home(),
        KeyCode::End => app.input.move_end(),
        _ => {}
    }
}

fn handle_categories_mode(
    app: &mut App,
    key_event: KeyEvent,
    clipboard: &mut dyn ClipboardWriter,
) -> Result<bool, TuiError> {
    let kb = app.config.key_bindings.clone();

    if matches_key_event(key_event, &kb.quit) {
        return Ok(true);
    }

    if let KeyCode::Char(c @ '1'..='5') = key_event.code {
        let index = c as usize - '1' as usize;
        if let Some(category) = TagCategory::from_index(index) {
            app.ui.selected_category = category;
            app.toggle_category(category);
        }
        return Ok(false);
    }

    if matches_key_event(key_event, &kb.analyze) {
        app.start_analysis();
    } else if matches_key_event(key_event, &kb.toggle_category) {
        app.toggle_selected_category();
    } else if matches_key_event(key_event, &kb.category_left) {
        app.select_previous_category();
    } else if matches_key_event(key_event, &kb.category_right) {
        app.select_next_category();
    } else if matches_key_event(key_event, &kb.copy) {
        app.copy_combined_tags(clipboard);
    } else if matches_key_event(key_event, &kb.open_post) {
        open_post(app);
    }

    Ok(false)
}

fn open_post(app: &mut App) {
    let Some(url) = app.post_page_url() else {
        return;
    };

    match open::that_detached(&url) {
        Ok(()) => {
            info!(%url, "opened post in browser");
            app.set_status_message(format!("Opened {}", url));
        }
        Err(e) => {
            warn!(%url, error = %e, "failed to open browser");
            app.set_error(format!("Could not open {}: {}", url, e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use crate::danbooru::{ExtractError, PostSource};
    use crate::models::Post;
    use crate::tui::clipboard::ClipboardError;
    use std::sync::Arc;

    struct FixedSource;

    impl PostSource for FixedSource {
        fn fetch_post(&self, id: u64) -> Result<Post, ExtractError> {
            Ok(Post {
                id,
                tag_string_artist: "jane_doe".to_string(),
                tag_string_copyright: String::new(),
                tag_string_character: String::new(),
                tag_string_general: "1girl solo".to_string(),
                tag_string_meta: "highres".to_string(),
                preview_file_url: None,
            })
        }
    }

    #[derive(Default)]
    struct MemoryClipboard {
        contents: Option<String>,
    }

    impl ClipboardWriter for MemoryClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            self.contents = Some(text.to_string());
            Ok(())
        }

        fn get_text(&mut self) -> Result<String, ClipboardError> {
            self.contents
                .clone()
                .ok_or_else(|| ClipboardError::Read("empty".to_string()))
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn app() -> App {
        App::new(Config::default(), Arc::new(FixedSource))
    }

    fn type_text(app: &mut App, clipboard: &mut MemoryClipboard, text: &str) {
        for c in text.chars() {
            handle_key_event(app, press(KeyCode::Char(c)), clipboard).unwrap();
        }
    }

    fn wait_until_idle(app: &mut App) {
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while app.is_loading() && std::time::Instant::now() < deadline {
            app.poll_pending();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(!app.is_loading(), "analysis did not finish");
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() {
        let mut app = app();
        let mut clipboard = MemoryClipboard::default();
        assert!(handle_key_event(&mut app, ctrl('c'), &mut clipboard).unwrap());

        app.advisory = AdvisoryState::Shown;
        assert!(handle_key_event(&mut app, ctrl('c'), &mut clipboard).unwrap());
    }

    #[test]
    fn q_types_into_input_but_quits_from_categories() {
        let mut app = app();
        let mut clipboard = MemoryClipboard::default();

        assert!(!handle_key_event(&mut app, press(KeyCode::Char('q')), &mut clipboard).unwrap());
        assert_eq!(app.input.value(), "q");

        handle_key_event(&mut app, press(KeyCode::Tab), &mut clipboard).unwrap();
        assert_eq!(app.ui.focus, Focus::Categories);
        assert!(handle_key_event(&mut app, press(KeyCode::Char('q')), &mut clipboard).unwrap());
    }

    #[test]
    fn analyze_toggle_and_copy_flow() {
        let mut app = app();
        let mut clipboard = MemoryClipboard::default();

        type_text(&mut app, &mut clipboard, "https://danbooru.donmai.us/posts/12345");
        handle_key_event(&mut app, press(KeyCode::Enter), &mut clipboard).unwrap();
        wait_until_idle(&mut app);
        assert_eq!(app.ui.focus, Focus::Categories);

        handle_key_event(&mut app, press(KeyCode::Char('5')), &mut clipboard).unwrap();
        assert!(app.visibility.meta);
        assert_eq!(app.ui.selected_category, TagCategory::Meta);

        handle_key_event(&mut app, press(KeyCode::Char('c')), &mut clipboard).unwrap();
        assert_eq!(
            clipboard.contents.as_deref(),
            Some("jane_doe, 1girl, solo, highres")
        );
        assert!(app.copied_indicator_active());
    }

    #[test]
    fn space_toggles_selected_category() {
        let mut app = app();
        let mut clipboard = MemoryClipboard::default();
        app.ui.focus = Focus::Categories;

        handle_key_event(&mut app, press(KeyCode::Right), &mut clipboard).unwrap();
        handle_key_event(&mut app, press(KeyCode::Char(' ')), &mut clipboard).unwrap();
        assert_eq!(app.ui.selected_category, TagCategory::Copyright);
        assert!(!app.visibility.copyright);
    }

    #[test]
    fn advisory_swallows_keys_until_dismissed() {
        let mut app = app();
        let mut clipboard = MemoryClipboard::default();
        app.ui.focus = Focus::Categories;
        app.advisory = AdvisoryState::Shown;

        handle_key_event(&mut app, press(KeyCode::Char('1')), &mut clipboard).unwrap();
        assert!(app.visibility.artist);
        assert!(!handle_key_event(&mut app, press(KeyCode::Char('q')), &mut clipboard).unwrap());

        handle_key_event(&mut app, press(KeyCode::Enter), &mut clipboard).unwrap();
        assert_eq!(app.advisory, AdvisoryState::Dismissed);
        assert_eq!(app.request_count, 0);
    }

    #[test]
    fn help_popup_opens_and_closes() {
        let mut app = app();
        let mut clipboard = MemoryClipboard::default();

        handle_key_event(&mut app, press(KeyCode::F(1)), &mut clipboard).unwrap();
        assert!(app.ui.show_help);
        handle_key_event(&mut app, press(KeyCode::Char('x')), &mut clipboard).unwrap();
        assert_eq!(app.input.value(), "");
        handle_key_event(&mut app, press(KeyCode::Esc), &mut clipboard).unwrap();
        assert!(!app.ui.show_help);
    }

    #[test]
    fn ctrl_v_pastes_and_ctrl_u_clears() {
        let mut app = app();
        let mut clipboard = MemoryClipboard {
            contents: Some("https://danbooru.donmai.us/posts/1".to_string()),
        };

        handle_key_event(&mut app, ctrl('v'), &mut clipboard).unwrap();
        assert_eq!(app.input.value(), "https://danbooru.donmai.us/posts/1");

        handle_key_event(&mut app, ctrl('u'), &mut clipboard).unwrap();
        assert_eq!(app.input.value(), "");
    }

    #[test]
    fn terminal_paste_moves_focus_to_input() {
        let mut app = app();
        app.ui.focus = Focus::Categories;
        handle_paste(&mut app, "https://danbooru.donmai.us/posts/9\r\n");

        assert_eq!(app.ui.focus, Focus::Input);
        assert_eq!(app.input.value(), "https://danbooru.donmai.us/posts/9");
    }
}
