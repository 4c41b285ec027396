/// Capabilities the background worker needs from its environment.
///
/// Production implementations live in `chrome.rs`; tests swap in the
/// in-memory fakes from `testing.rs`. JS promises are not `Send`, so
/// every trait is `?Send`.
use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::Result;
use crate::tab_data::{BrowserTab, ExtractedContent, GroupColor, MemoryInfo};

/// `chrome.tabs` / `chrome.tabGroups`
#[async_trait(?Send)]
pub trait TabsApi {
    /// All open tabs, in browser enumeration order
    async fn query_all(&self) -> Result<Vec<BrowserTab>>;

    async fn get(&self, tab_id: i32) -> Result<BrowserTab>;

    /// Put the tabs into a new group and return its id
    async fn group(&self, tab_ids: &[i32]) -> Result<i32>;

    async fn update_group(&self, group_id: i32, title: &str, color: GroupColor) -> Result<()>;

    async fn remove(&self, tab_ids: &[i32]) -> Result<()>;
}

/// `chrome.storage.local`
#[async_trait(?Send)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    async fn set(&self, key: &str, value: Value) -> Result<()>;
}

/// `chrome.system.memory`
#[async_trait(?Send)]
pub trait SystemMemory {
    async fn info(&self) -> Result<MemoryInfo>;
}

/// Status and body of a finished HTTP exchange
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport for the clustering service. Only connection-level failures
/// are errors here; non-2xx replies come back as `HttpReply`.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn get(&self, url: &Url) -> Result<HttpReply>;

    async fn post_json(&self, url: &Url, body: &str) -> Result<HttpReply>;
}

/// The content script injected into each page
#[async_trait(?Send)]
pub trait ContentExtractor {
    async fn extract(&self, tab_id: i32) -> Result<ExtractedContent>;
}

pub trait Clock {
    /// Milliseconds since the epoch
    fn now_ms(&self) -> f64;
}
