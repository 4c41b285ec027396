/// Data structures for Tab Chronicle
use serde::{Deserialize, Serialize};

/// `chrome.tabGroups.TAB_GROUP_ID_NONE`
pub const GROUP_ID_NONE: i32 = -1;

/// Longest body text sent to the clustering service
pub const MAX_TEXT_CHARS: usize = 1000;

/// A tab as the browser reports it. Special pages may lack an id or url.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrowserTab {
    pub id: Option<i32>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub fav_icon_url: Option<String>,
    pub pinned: bool,
    pub active: bool,
    pub group_id: i32,
    /// Milliseconds since the epoch
    pub last_accessed: Option<f64>,
}

impl Default for BrowserTab {
    fn default() -> Self {
        BrowserTab {
            id: None,
            url: None,
            title: None,
            fav_icon_url: None,
            pinned: false,
            active: false,
            group_id: GROUP_ID_NONE,
            last_accessed: None,
        }
    }
}

impl BrowserTab {
    /// Id and url, when the tab has a usable (non-zero) identity
    pub fn identity(&self) -> Option<(i32, &str)> {
        match (self.id, self.url.as_deref()) {
            (Some(id), Some(url)) if id != 0 && !url.is_empty() => Some((id, url)),
            _ => None,
        }
    }

    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

/// Information about a browser tab, scored for the popup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: i32,
    pub url: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
    pub pinned: bool,
    pub active: bool,
    pub group_id: i32,
    pub last_accessed: Option<f64>,
    pub importance_score: u8,
}

impl TabInfo {
    pub fn is_grouped(&self) -> bool {
        self.group_id != GROUP_ID_NONE
    }
}

/// What the clustering service sees of a tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabContent {
    pub tab_id: i32,
    pub url: String,
    pub title: String,
    pub text: String,
    pub keywords: Vec<String>,
}

/// Colors accepted by `chrome.tabGroups.update`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    Grey,
    #[default]
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
    Orange,
}

impl GroupColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupColor::Grey => "grey",
            GroupColor::Blue => "blue",
            GroupColor::Red => "red",
            GroupColor::Yellow => "yellow",
            GroupColor::Green => "green",
            GroupColor::Pink => "pink",
            GroupColor::Purple => "purple",
            GroupColor::Cyan => "cyan",
            GroupColor::Orange => "orange",
        }
    }
}

/// One group proposed by the clustering service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterResult {
    pub id: String,
    pub name: String,
    pub color: GroupColor,
    pub tab_ids: Vec<i32>,
    pub confidence: f64,
}

/// Raw reading from `chrome.system.memory.getInfo`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
    pub capacity: f64,
    pub available_capacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStatus {
    pub total: f64,
    pub available: f64,
    pub used: f64,
    pub usage_percent: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engagement {
    pub scroll_depth: f64,
    pub time_on_page: f64,
}

/// Interaction metadata kept per tab across requests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TabMetadata {
    pub engagement: Option<Engagement>,
    pub keywords: Vec<String>,
    pub last_extracted: Option<f64>,
}

/// Reply of the content script to `EXTRACT_CONTENT`. Every field may
/// be missing; `tab_id` is whatever the page believes and is not used
/// as a storage key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedContent {
    pub tab_id: i32,
    pub url: String,
    pub title: String,
    pub text: String,
    pub keywords: Vec<String>,
    pub engagement: Engagement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseSummary {
    pub closed_count: usize,
    pub message: String,
}

/// Cut `text` to at most `max` characters without splitting a char
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
