/// In-memory stand-ins for the browser, storage and network
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::browser::{
    Clock, ContentExtractor, HttpReply, HttpTransport, KeyValueStore, SystemMemory, TabsApi,
};
use crate::error::{BackgroundError, Result};
use crate::tab_data::{BrowserTab, Engagement, ExtractedContent, GroupColor, MemoryInfo};

pub const NOW_MS: f64 = 1_700_000_000_000.0;
pub const HOUR_MS: f64 = 3_600_000.0;

pub fn tab(id: i32, url: &str, title: &str) -> BrowserTab {
    BrowserTab {
        id: Some(id),
        url: Some(url.to_string()),
        title: Some(title.to_string()),
        last_accessed: Some(NOW_MS),
        ..Default::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupUpdate {
    pub group_id: i32,
    pub title: String,
    pub color: GroupColor,
}

#[derive(Default)]
pub struct FakeTabs {
    pub tabs: RefCell<Vec<BrowserTab>>,
    pub groups: RefCell<Vec<Vec<i32>>>,
    pub updates: RefCell<Vec<GroupUpdate>>,
    pub removed: RefCell<Vec<i32>>,
    pub fail_query: Cell<bool>,
    pub fail_update: Cell<bool>,
    pub fail_remove: Cell<bool>,
}

impl FakeTabs {
    pub fn with_tabs(tabs: Vec<BrowserTab>) -> Self {
        FakeTabs {
            tabs: RefCell::new(tabs),
            ..Default::default()
        }
    }

    pub fn touched(&self) -> bool {
        !self.groups.borrow().is_empty()
            || !self.updates.borrow().is_empty()
            || !self.removed.borrow().is_empty()
    }
}

#[async_trait(?Send)]
impl TabsApi for FakeTabs {
    async fn query_all(&self) -> Result<Vec<BrowserTab>> {
        if self.fail_query.get() {
            return Err(BackgroundError::Browser("tabs.query failed".to_string()));
        }
        Ok(self.tabs.borrow().clone())
    }

    async fn get(&self, tab_id: i32) -> Result<BrowserTab> {
        self.tabs
            .borrow()
            .iter()
            .find(|t| t.id == Some(tab_id))
            .cloned()
            .ok_or_else(|| BackgroundError::Browser(format!("No tab with id: {}.", tab_id)))
    }

    async fn group(&self, tab_ids: &[i32]) -> Result<i32> {
        let mut groups = self.groups.borrow_mut();
        groups.push(tab_ids.to_vec());
        let group_id = 100 + groups.len() as i32;
        for t in self.tabs.borrow_mut().iter_mut() {
            if t.id.is_some_and(|id| tab_ids.contains(&id)) {
                t.group_id = group_id;
            }
        }
        Ok(group_id)
    }

    async fn update_group(&self, group_id: i32, title: &str, color: GroupColor) -> Result<()> {
        if self.fail_update.get() {
            return Err(BackgroundError::Browser(format!("No group with id: {}.", group_id)));
        }
        self.updates.borrow_mut().push(GroupUpdate {
            group_id,
            title: title.to_string(),
            color,
        });
        Ok(())
    }

    async fn remove(&self, tab_ids: &[i32]) -> Result<()> {
        if self.fail_remove.get() {
            return Err(BackgroundError::Browser("tabs.remove failed".to_string()));
        }
        self.removed.borrow_mut().extend_from_slice(tab_ids);
        self.tabs.borrow_mut().retain(|t| !t.id.is_some_and(|id| tab_ids.contains(&id)));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_raw(&self, key: &str) -> Option<Value> {
        self.values.borrow().get(key).cloned()
    }

    pub fn set_raw(&self, key: &str, value: Value) {
        self.values.borrow_mut().insert(key.to_string(), value);
    }
}

#[async_trait(?Send)]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.get_raw(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.set_raw(key, value);
        Ok(())
    }
}

pub struct FakeMemory(pub MemoryInfo);

#[async_trait(?Send)]
impl SystemMemory for FakeMemory {
    async fn info(&self) -> Result<MemoryInfo> {
        Ok(self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentRequest {
    pub method: &'static str,
    pub url: String,
    pub body: Option<String>,
}

/// Replies with a canned response, or a network error when `reply` is None
pub struct FakeHttp {
    pub reply: RefCell<Option<HttpReply>>,
    pub sent: RefCell<Vec<SentRequest>>,
}

impl FakeHttp {
    pub fn replying(status: u16, body: &str) -> Self {
        FakeHttp {
            reply: RefCell::new(Some(HttpReply {
                status,
                body: body.to_string(),
            })),
            sent: RefCell::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        FakeHttp {
            reply: RefCell::new(None),
            sent: RefCell::new(Vec::new()),
        }
    }

    fn respond(&self) -> Result<HttpReply> {
        self.reply
            .borrow()
            .clone()
            .ok_or_else(|| BackgroundError::Network("connection refused".to_string()))
    }

    /// Body of the last POST, parsed
    pub fn last_json(&self) -> Value {
        let sent = self.sent.borrow();
        let body = sent.last().and_then(|r| r.body.as_deref()).unwrap_or("null");
        serde_json::from_str(body).unwrap()
    }
}

#[async_trait(?Send)]
impl HttpTransport for FakeHttp {
    async fn get(&self, url: &Url) -> Result<HttpReply> {
        self.sent.borrow_mut().push(SentRequest {
            method: "GET",
            url: url.to_string(),
            body: None,
        });
        self.respond()
    }

    async fn post_json(&self, url: &Url, body: &str) -> Result<HttpReply> {
        self.sent.borrow_mut().push(SentRequest {
            method: "POST",
            url: url.to_string(),
            body: Some(body.to_string()),
        });
        self.respond()
    }
}

/// Answers every tab with the same engagement reading. Real content
/// scripts do not know their tab id, so the reply may carry another one.
pub struct FakeExtractor {
    pub engagement: Engagement,
    pub reported_tab_id: Option<i32>,
}

#[async_trait(?Send)]
impl ContentExtractor for FakeExtractor {
    async fn extract(&self, tab_id: i32) -> Result<ExtractedContent> {
        if tab_id < 0 {
            return Err(BackgroundError::Browser(
                "Could not establish connection. Receiving end does not exist.".to_string(),
            ));
        }
        Ok(ExtractedContent {
            tab_id: self.reported_tab_id.unwrap_or(tab_id),
            url: format!("https://example.com/{}", tab_id),
            title: format!("Page {}", tab_id),
            text: "body".to_string(),
            keywords: vec!["example".to_string()],
            engagement: self.engagement,
        })
    }
}

pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now_ms(&self) -> f64 {
        self.0
    }
}
