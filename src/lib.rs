pub mod cli;
pub mod config;
pub mod danbooru;
pub mod logging;
pub mod models;
pub mod tags;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use danbooru::{DanbooruClient, ExtractError, Extraction, PostSource};
pub use models::{CategorizedTags, CategoryVisibility, Post, TagCategory};
