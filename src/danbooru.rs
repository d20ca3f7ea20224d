use regex::Regex;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{CategorizedTags, Post};
use crate::tags::categorize;

/// Base URL of the public Danbooru instance
pub const DEFAULT_API_BASE_URL: &str = "https://danbooru.donmai.us";

static POST_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/posts/(\d+)").expect("post id pattern is a valid regex"));

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid Danbooru URL. Use a URL like \"https://danbooru.donmai.us/posts/...\".")]
    InvalidUrl,
    #[error("Post {id} was not found. Please check the URL.")]
    NotFound { id: u64 },
    #[error("Failed to fetch data from Danbooru. Status: {status}")]
    Fetch { status: u16 },
    #[error("Failed to reach Danbooru: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Failed to decode the Danbooru response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ExtractError {
    /// Message shown to the user in place of the analysed post
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// A fetched post together with its categorized tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub post: Post,
    pub tags: CategorizedTags,
}

/// Anything that can look up a post by id
pub trait PostSource: Send + Sync {
    fn fetch_post(&self, id: u64) -> Result<Post, ExtractError>;
}

/// Pull the numeric post id out of free-form URL text
pub fn parse_post_id(url_text: &str) -> Result<u64, ExtractError> {
    let captures = POST_ID_PATTERN
        .captures(url_text)
        .ok_or(ExtractError::InvalidUrl)?;
    // Digits that overflow u64 cannot name a real post
    captures[1].parse().map_err(|_| ExtractError::InvalidUrl)
}

/// Map a non-success response status onto the matching error
pub fn check_status(id: u64, status: StatusCode) -> Result<(), ExtractError> {
    if status.is_success() {
        Ok(())
    } else if status == StatusCode::NOT_FOUND {
        Err(ExtractError::NotFound { id })
    } else {
        Err(ExtractError::Fetch {
            status: status.as_u16(),
        })
    }
}

/// Fetch a post and split its tags. Issues exactly one request through `source`
pub fn extract(source: &dyn PostSource, url_text: &str) -> Result<Extraction, ExtractError> {
    let id = parse_post_id(url_text)?;
    fetch_and_categorize(source, id)
}

/// Same as `extract` but for an id that was already parsed
pub fn fetch_and_categorize(source: &dyn PostSource, id: u64) -> Result<Extraction, ExtractError> {
    info!(post_id = id, "fetching post");
    let post = source.fetch_post(id).inspect_err(|e| {
        warn!(post_id = id, error = %e, "failed to fetch post");
    })?;
    let tags = categorize(&post);
    Ok(Extraction { post, tags })
}

/// Blocking client for the Danbooru JSON API
#[derive(Debug, Clone)]
pub struct DanbooruClient {
    client: Client,
    api_base_url: String,
}

impl DanbooruClient {
    pub fn new(config: &Config) -> Result<Self, ExtractError> {
        let mut builder = Client::builder().user_agent(config.http.user_agent.clone());
        if let Some(secs) = config.http.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(ExtractError::Client)?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url().to_string(),
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// JSON endpoint for a post
    pub fn post_json_url(&self, id: u64) -> String {
        format!("{}/posts/{}.json", self.api_base_url, id)
    }

    /// Human-facing page for a post
    pub fn post_page_url(&self, id: u64) -> String {
        post_page_url(&self.api_base_url, id)
    }
}

impl PostSource for DanbooruClient {
    fn fetch_post(&self, id: u64) -> Result<Post, ExtractError> {
        let url = self.post_json_url(id);
        debug!(%url, "requesting post");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(ExtractError::Transport)?;
        let status = response.status();
        check_status(id, status)?;

        let text = response.text().map_err(ExtractError::Transport)?;
        let post: Post = serde_json::from_str(&text)?;
        debug!(post_id = post.id, "decoded post");

        Ok(post)
    }
}

/// Page URL for a post on the given instance
pub fn post_page_url(api_base_url: &str, id: u64) -> String {
    format!("{}/posts/{}", api_base_url.trim_end_matches('/'), id)
}
