use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Failed to access clipboard: {0}")]
    Unavailable(String),
    #[error("Failed to write to clipboard: {0}")]
    Write(String),
    #[error("Failed to read from clipboard: {0}")]
    Read(String),
}

/// Destination for copied tag strings
pub trait ClipboardWriter {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;

    /// Current clipboard text, used for pasting into the URL input
    fn get_text(&mut self) -> Result<String, ClipboardError>;
}

/// System clipboard backed by arboard.
/// The handle is opened on first use and kept for the whole session, since on
/// X11 the copied text is only served while a handle is alive
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new().map_err(|e| {
                warn!(error = %e, "clipboard unavailable");
                ClipboardError::Unavailable(e.to_string())
            })?;
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("clipboard handle missing".to_string()))
    }
}

impl ClipboardWriter for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.handle()?
            .set_text(text)
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }

    fn get_text(&mut self) -> Result<String, ClipboardError> {
        self.handle()?
            .get_text()
            .map_err(|e| ClipboardError::Read(e.to_string()))
    }
}
