use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::Config;
use crate::danbooru::{self, ExtractError, Extraction, PostSource};
use crate::models::{CategorizedTags, CategoryVisibility, Post, TagCategory};
use crate::tags;
use crate::tui::clipboard::ClipboardWriter;
use crate::tui::widgets::url_input::UrlInput;

pub const EMPTY_URL_MESSAGE: &str = "Please enter a Danbooru URL.";
pub const CLIPBOARD_ERROR_MESSAGE: &str = "Could not copy the tags to the clipboard.";
const WORKER_LOST_MESSAGE: &str = "The analysis stopped unexpectedly. Please try again.";

/// How long the "Copied" indicator stays up
pub const COPIED_INDICATOR_DURATION: Duration = Duration::from_secs(2);
const STATUS_MESSAGE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Categories,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
}

/// The API usage advisory is shown at most once per session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisoryState {
    Hidden,
    Shown,
    Dismissed,
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub focus: Focus,
    pub selected_category: TagCategory,
    pub show_help: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            focus: Focus::Input,
            selected_category: TagCategory::Artist,
            show_help: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
    pub copied_at: Option<Instant>,
}

/// Outcome of the last completed analysis
#[derive(Debug, Clone, Default)]
pub struct AnalysisState {
    pub post: Option<Post>,
    pub tags: Option<CategorizedTags>,
    pub error: Option<String>,
    /// URL text the post was analysed from
    pub source_url: Option<String>,
}

pub struct App {
    pub config: Config,
    source: Arc<dyn PostSource>,
    pending: Option<Receiver<Result<Extraction, ExtractError>>>,

    pub input: UrlInput,
    pub ui: UiState,
    pub load_state: LoadState,
    pub analysis: AnalysisState,
    pub visibility: CategoryVisibility,
    pub request_count: u32,
    pub advisory: AdvisoryState,
    pub status: StatusState,
}

impl App {
    pub fn new(config: Config, source: Arc<dyn PostSource>) -> Self {
        Self {
            config,
            source,
            pending: None,
            input: UrlInput::new(),
            ui: UiState::default(),
            load_state: LoadState::Idle,
            analysis: AnalysisState::default(),
            visibility: CategoryVisibility::default(),
            request_count: 0,
            advisory: AdvisoryState::Hidden,
            status: StatusState::default(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    /// Begin analysing the URL in the input box. Ignored while a request is in flight
    pub fn start_analysis(&mut self) {
        if self.is_loading() {
            return;
        }

        let url = self.input.value().trim().to_string();
        if url.is_empty() {
            self.analysis.error = Some(EMPTY_URL_MESSAGE.to_string());
            return;
        }

        self.analysis = AnalysisState {
            source_url: Some(url.clone()),
            ..Default::default()
        };
        self.record_request();

        let id = match danbooru::parse_post_id(&url) {
            Ok(id) => id,
            Err(e) => {
                self.finish_analysis(Err(e));
                return;
            }
        };

        info!(post_id = id, attempt = self.request_count, "starting analysis");
        let source = Arc::clone(&self.source);
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = danbooru::fetch_and_categorize(source.as_ref(), id);
            // Receiver is gone if the app quit mid-request
            let _ = tx.send(result);
        });

        self.pending = Some(rx);
        self.load_state = LoadState::Loading;
    }

    fn record_request(&mut self) {
        self.request_count = self.request_count.saturating_add(1);
        if self.request_count >= self.config.request_warning_threshold
            && self.advisory == AdvisoryState::Hidden
        {
            warn!(count = self.request_count, "request advisory threshold reached");
            self.advisory = AdvisoryState::Shown;
        }
    }

    /// Check whether the background fetch has finished
    pub fn poll_pending(&mut self) {
        let Some(rx) = self.pending.as_ref() else {
            return;
        };

        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                self.finish_analysis(result);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.load_state = LoadState::Idle;
                self.analysis.error = Some(WORKER_LOST_MESSAGE.to_string());
            }
        }
    }

    pub fn finish_analysis(&mut self, result: Result<Extraction, ExtractError>) {
        self.load_state = LoadState::Idle;
        match result {
            Ok(extraction) => {
                info!(post_id = extraction.post.id, "analysis finished");
                self.analysis = AnalysisState {
                    post: Some(extraction.post),
                    tags: Some(extraction.tags),
                    error: None,
                    source_url: self.analysis.source_url.take(),
                };
                self.ui.focus = Focus::Categories;
            }
            Err(e) => {
                warn!(error = %e, "analysis failed");
                self.analysis = AnalysisState {
                    post: None,
                    tags: None,
                    error: Some(e.user_message()),
                    source_url: None,
                };
            }
        }
    }

    pub fn toggle_category(&mut self, category: TagCategory) {
        self.visibility.toggle(category);
    }

    pub fn toggle_selected_category(&mut self) {
        self.toggle_category(self.ui.selected_category);
    }

    pub fn select_next_category(&mut self) {
        let next = (self.ui.selected_category.index() + 1) % TagCategory::ALL.len();
        self.ui.selected_category = TagCategory::ALL[next];
    }

    pub fn select_previous_category(&mut self) {
        let len = TagCategory::ALL.len();
        let prev = (self.ui.selected_category.index() + len - 1) % len;
        self.ui.selected_category = TagCategory::ALL[prev];
    }

    pub fn toggle_focus(&mut self) {
        self.ui.focus = match self.ui.focus {
            Focus::Input => Focus::Categories,
            Focus::Categories => Focus::Input,
        };
    }

    /// Tags from the visible categories, re-derived on every call
    pub fn combined_tags(&self) -> String {
        self.analysis
            .tags
            .as_ref()
            .map(|tags| tags::combine(tags, &self.visibility))
            .unwrap_or_default()
    }

    pub fn copy_combined_tags(&mut self, clipboard: &mut dyn ClipboardWriter) {
        let combined = self.combined_tags();
        if combined.is_empty() {
            return;
        }

        match clipboard.set_text(&combined) {
            Ok(()) => {
                info!(chars = combined.chars().count(), "copied tags to clipboard");
                self.status.copied_at = Some(Instant::now());
            }
            Err(e) => {
                warn!(error = %e, "failed to copy tags");
                self.analysis.error = Some(CLIPBOARD_ERROR_MESSAGE.to_string());
            }
        }
    }

    pub fn copied_indicator_active(&self) -> bool {
        self.status.copied_at.is_some()
    }

    pub fn dismiss_advisory(&mut self) {
        if self.advisory == AdvisoryState::Shown {
            self.advisory = AdvisoryState::Dismissed;
        }
    }

    /// Page URL of the displayed post: the URL it was analysed from, or the
    /// configured instance's page when that text has no scheme to open
    pub fn post_page_url(&self) -> Option<String> {
        let post = self.analysis.post.as_ref()?;
        match self.analysis.source_url.as_deref() {
            Some(url) if url.starts_with("https://") || url.starts_with("http://") => {
                Some(url.to_string())
            }
            _ => Some(danbooru::post_page_url(self.config.api_base_url(), post.id)),
        }
    }

    pub fn set_error(&mut self, message: String) {
        self.analysis.error = Some(message);
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    /// Expire the status message and the "Copied" indicator
    pub fn check_timeouts(&mut self) {
        self.expire_at(Instant::now());
    }

    fn expire_at(&mut self, now: Instant) {
        if let Some(time) = self.status.message_time {
            if now.duration_since(time) >= STATUS_MESSAGE_TIMEOUT {
                self.clear_status_message();
            }
        }
        if let Some(time) = self.status.copied_at {
            if now.duration_since(time) >= COPIED_INDICATOR_DURATION {
                self.status.copied_at = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::clipboard::ClipboardError;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubSource {
        post: Option<Post>,
        not_found: bool,
        calls: AtomicUsize,
    }

    impl StubSource {
        fn with_post(post: Post) -> Arc<Self> {
            Arc::new(Self {
                post: Some(post),
                not_found: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn not_found() -> Arc<Self> {
            Arc::new(Self {
                post: None,
                not_found: true,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl PostSource for StubSource {
        fn fetch_post(&self, id: u64) -> Result<Post, ExtractError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.not_found {
                return Err(ExtractError::NotFound { id });
            }
            match &self.post {
                Some(post) => Ok(post.clone()),
                None => Err(ExtractError::Fetch { status: 500 }),
            }
        }
    }

    #[derive(Default)]
    struct MemoryClipboard {
        contents: Mutex<Option<String>>,
        fail: bool,
    }

    impl ClipboardWriter for MemoryClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::Write("denied".to_string()));
            }
            *self.contents.lock().unwrap() = Some(text.to_string());
            Ok(())
        }

        fn get_text(&mut self) -> Result<String, ClipboardError> {
            self.contents
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| ClipboardError::Read("empty".to_string()))
        }
    }

    fn sample_post() -> Post {
        Post {
            id: 12345,
            tag_string_artist: "jane_doe".to_string(),
            tag_string_copyright: String::new(),
            tag_string_character: String::new(),
            tag_string_general: "1girl solo".to_string(),
            tag_string_meta: "highres".to_string(),
            preview_file_url: Some("https://cdn.donmai.us/preview/x.jpg".to_string()),
        }
    }

    fn app_with(source: Arc<dyn PostSource>) -> App {
        App::new(Config::default(), source)
    }

    /// Block until the worker reports back, then apply the result
    fn wait_for_result(app: &mut App) {
        let rx = app.pending.take().expect("no request in flight");
        let result = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("worker did not answer");
        app.finish_analysis(result);
    }

    fn analyze(app: &mut App, url: &str) {
        app.input = UrlInput::from_string(url);
        app.start_analysis();
        if app.is_loading() {
            wait_for_result(app);
        }
    }

    #[test]
    fn successful_analysis_stores_post_and_tags() {
        let source = StubSource::with_post(sample_post());
        let mut app = app_with(source.clone());

        app.input = UrlInput::from_string("https://danbooru.donmai.us/posts/12345");
        app.start_analysis();
        assert_eq!(app.load_state, LoadState::Loading);
        wait_for_result(&mut app);

        assert_eq!(app.load_state, LoadState::Idle);
        assert_eq!(app.analysis.post, Some(sample_post()));
        assert!(app.analysis.error.is_none());
        assert_eq!(app.combined_tags(), "jane_doe, 1girl, solo");
        assert_eq!(app.request_count, 1);
        assert_eq!(app.ui.focus, Focus::Categories);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            app.post_page_url().as_deref(),
            Some("https://danbooru.donmai.us/posts/12345")
        );
    }

    #[test]
    fn empty_input_sets_error_without_loading() {
        let source = StubSource::with_post(sample_post());
        let mut app = app_with(source.clone());
        app.input = UrlInput::from_string("   ");
        app.start_analysis();

        assert_eq!(app.load_state, LoadState::Idle);
        assert_eq!(app.analysis.error.as_deref(), Some(EMPTY_URL_MESSAGE));
        assert_eq!(app.request_count, 0);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn invalid_url_fails_without_network_call() {
        let source = StubSource::with_post(sample_post());
        let mut app = app_with(source.clone());
        analyze(&mut app, "https://example.com/image.png");

        assert_eq!(app.load_state, LoadState::Idle);
        assert!(app.analysis.error.as_deref().unwrap().contains("Invalid Danbooru URL"));
        assert!(app.analysis.post.is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn not_found_clears_previous_result() {
        let mut app = app_with(StubSource::with_post(sample_post()));
        analyze(&mut app, "https://danbooru.donmai.us/posts/12345");
        assert!(app.analysis.post.is_some());

        app.source = StubSource::not_found();
        analyze(&mut app, "https://danbooru.donmai.us/posts/99");

        assert!(app.analysis.post.is_none());
        assert!(app.analysis.tags.is_none());
        assert!(app.analysis.error.as_deref().unwrap().contains("not found"));
        assert_eq!(app.combined_tags(), "");
    }

    #[test]
    fn analysis_is_ignored_while_loading() {
        let source = StubSource::with_post(sample_post());
        let mut app = app_with(source.clone());
        app.input = UrlInput::from_string("https://danbooru.donmai.us/posts/12345");
        app.start_analysis();
        app.start_analysis();
        assert_eq!(app.request_count, 1);

        wait_for_result(&mut app);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn poll_pending_applies_result() {
        let mut app = app_with(StubSource::with_post(sample_post()));
        app.input = UrlInput::from_string("https://danbooru.donmai.us/posts/12345");
        app.start_analysis();

        let deadline = Instant::now() + Duration::from_secs(5);
        while app.is_loading() && Instant::now() < deadline {
            app.poll_pending();
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!app.is_loading());
        assert!(app.analysis.post.is_some());
    }

    #[test]
    fn toggling_meta_appends_without_refetch() {
        let source = StubSource::with_post(sample_post());
        let mut app = app_with(source.clone());
        analyze(&mut app, "https://danbooru.donmai.us/posts/12345");

        app.toggle_category(TagCategory::Meta);
        assert_eq!(app.combined_tags(), "jane_doe, 1girl, solo, highres");
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(app.analysis.post, Some(sample_post()));
    }

    #[test]
    fn selected_category_wraps_both_ways() {
        let mut app = app_with(StubSource::with_post(sample_post()));
        app.select_previous_category();
        assert_eq!(app.ui.selected_category, TagCategory::Meta);
        app.select_next_category();
        assert_eq!(app.ui.selected_category, TagCategory::Artist);

        app.toggle_selected_category();
        assert!(!app.visibility.artist);
    }

    #[test]
    fn advisory_shown_on_fiftieth_attempt_and_never_rearms() {
        let mut app = app_with(StubSource::with_post(sample_post()));
        for _ in 0..49 {
            analyze(&mut app, "https://danbooru.donmai.us/posts/12345");
        }
        assert_eq!(app.advisory, AdvisoryState::Hidden);

        analyze(&mut app, "https://danbooru.donmai.us/posts/12345");
        assert_eq!(app.request_count, 50);
        assert_eq!(app.advisory, AdvisoryState::Shown);

        app.dismiss_advisory();
        assert_eq!(app.advisory, AdvisoryState::Dismissed);
        assert_eq!(app.request_count, 50);
        assert!(app.analysis.post.is_some());

        analyze(&mut app, "https://danbooru.donmai.us/posts/12345");
        assert_eq!(app.request_count, 51);
        assert_eq!(app.advisory, AdvisoryState::Dismissed);
    }

    #[test]
    fn advisory_threshold_follows_config() {
        let mut config = Config::default();
        config.request_warning_threshold = 2;
        let mut app = App::new(config, StubSource::with_post(sample_post()));

        analyze(&mut app, "not a url");
        assert_eq!(app.advisory, AdvisoryState::Hidden);
        analyze(&mut app, "still not a url");
        assert_eq!(app.advisory, AdvisoryState::Shown);
    }

    #[test]
    fn copy_writes_combined_tags_and_sets_indicator() {
        let mut app = app_with(StubSource::with_post(sample_post()));
        analyze(&mut app, "https://danbooru.donmai.us/posts/12345");

        let mut clipboard = MemoryClipboard::default();
        app.copy_combined_tags(&mut clipboard);

        assert_eq!(clipboard.get_text().unwrap(), "jane_doe, 1girl, solo");
        assert!(app.copied_indicator_active());

        let copied_at = app.status.copied_at.unwrap();
        app.expire_at(copied_at + Duration::from_millis(1999));
        assert!(app.copied_indicator_active());
        app.expire_at(copied_at + COPIED_INDICATOR_DURATION);
        assert!(!app.copied_indicator_active());
    }

    #[test]
    fn new_analysis_leaves_copied_indicator_running() {
        let mut app = app_with(StubSource::with_post(sample_post()));
        analyze(&mut app, "https://danbooru.donmai.us/posts/12345");
        app.copy_combined_tags(&mut MemoryClipboard::default());
        let copied_at = app.status.copied_at.unwrap();

        analyze(&mut app, "https://danbooru.donmai.us/posts/12345");
        assert_eq!(app.status.copied_at, Some(copied_at));

        app.expire_at(copied_at + COPIED_INDICATOR_DURATION);
        assert!(!app.copied_indicator_active());
    }

    #[test]
    fn page_url_is_the_pasted_url() {
        let mut config = Config::default();
        config.api_base_url = "https://mirror.example".to_string();
        let mut app = App::new(config, StubSource::with_post(sample_post()));

        analyze(&mut app, "  https://danbooru.donmai.us/posts/12345?q=solo  ");
        assert_eq!(
            app.post_page_url().as_deref(),
            Some("https://danbooru.donmai.us/posts/12345?q=solo")
        );

        // No scheme to hand to the browser
        analyze(&mut app, "danbooru.donmai.us/posts/12345");
        assert_eq!(
            app.post_page_url().as_deref(),
            Some("https://mirror.example/posts/12345")
        );

        app.source = StubSource::not_found();
        analyze(&mut app, "https://danbooru.donmai.us/posts/1");
        assert!(app.analysis.source_url.is_none());
        assert!(app.post_page_url().is_none());
    }

    #[test]
    fn copy_with_nothing_to_copy_is_noop() {
        let mut app = app_with(StubSource::with_post(sample_post()));
        let mut clipboard = MemoryClipboard::default();
        app.copy_combined_tags(&mut clipboard);

        assert!(clipboard.get_text().is_err());
        assert!(!app.copied_indicator_active());
        assert!(app.analysis.error.is_none());
    }

    #[test]
    fn copy_failure_keeps_post_and_reports_error() {
        let mut app = app_with(StubSource::with_post(sample_post()));
        analyze(&mut app, "https://danbooru.donmai.us/posts/12345");

        let mut clipboard = MemoryClipboard {
            fail: true,
            ..Default::default()
        };
        app.copy_combined_tags(&mut clipboard);

        assert_eq!(app.analysis.error.as_deref(), Some(CLIPBOARD_ERROR_MESSAGE));
        assert!(app.analysis.post.is_some());
        assert!(!app.copied_indicator_active());
    }
}
