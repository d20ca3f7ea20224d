pub mod app;
pub mod clipboard;
pub mod error;
pub mod events;
pub mod layout;
pub mod render;
pub mod widgets;

pub use app::{AdvisoryState, App, Focus, LoadState};
pub use clipboard::{ClipboardError, ClipboardWriter, SystemClipboard};
pub use error::TuiError;
pub use events::run_event_loop;
pub use layout::Layout;
pub use render::render;
