/// Persisted settings and per-tab metadata in chrome.storage.local

use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::browser::KeyValueStore;
use crate::error::Result;
use crate::tab_data::{ExtractedContent, TabMetadata};

pub const SETTINGS_KEY: &str = "settings";
pub const TAB_METADATA_KEY: &str = "tabMetadata";

/// User settings, written once on install
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub auto_group_enabled: bool,
    /// Percent of system memory
    pub memory_threshold: u32,
    /// Minutes without access before a tab counts as inactive
    pub inactive_threshold: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            auto_group_enabled: false,
            memory_threshold: 80,
            inactive_threshold: 30,
        }
    }
}

/// Interaction metadata keyed by tab id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataTable {
    entries: HashMap<i32, TabMetadata>,
}

impl MetadataTable {
    pub fn new() -> Self {
        MetadataTable {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, tab_id: i32) -> Option<&TabMetadata> {
        self.entries.get(&tab_id)
    }

    /// Merge an extraction into `tab_id`'s entry and return the new entry.
    /// The id the content script reports is not trusted.
    pub fn record_extraction(
        &mut self,
        tab_id: i32,
        content: &ExtractedContent,
        now_ms: f64,
    ) -> &TabMetadata {
        let entry = self.entries.entry(tab_id).or_default();
        entry.engagement = Some(content.engagement);
        entry.keywords = content.keywords.clone();
        entry.last_extracted = Some(now_ms);
        entry
    }

    pub fn remove(&mut self, tab_id: i32) -> bool {
        self.entries.remove(&tab_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Typed view over the extension's key-value store
pub struct ExtensionStorage<'a> {
    kv: &'a dyn KeyValueStore,
}

impl<'a> ExtensionStorage<'a> {
    pub fn new(kv: &'a dyn KeyValueStore) -> Self {
        ExtensionStorage { kv }
    }

    pub async fn load_settings(&self) -> Result<Settings> {
        match self.kv.get(SETTINGS_KEY).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Settings::default()),
        }
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.kv.set(SETTINGS_KEY, serde_json::to_value(settings)?).await
    }

    /// Store default settings unless some are already present.
    /// Returns whether anything was written.
    pub async fn initialize_settings(&self) -> Result<bool> {
        if self.kv.get(SETTINGS_KEY).await?.is_some() {
            debug!("Settings already initialized");
            return Ok(false);
        }

        self.save_settings(&Settings::default()).await?;
        info!("Initialized default settings");
        Ok(true)
    }

    pub async fn load_metadata(&self) -> Result<MetadataTable> {
        match self.kv.get(TAB_METADATA_KEY).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(MetadataTable::new()),
        }
    }

    pub async fn save_metadata(&self, table: &MetadataTable) -> Result<()> {
        self.kv.set(TAB_METADATA_KEY, serde_json::to_value(table)?).await
    }

    pub async fn record_extraction(
        &self,
        tab_id: i32,
        content: &ExtractedContent,
        now_ms: f64,
    ) -> Result<TabMetadata> {
        let mut table = self.load_metadata().await?;
        let entry = table.record_extraction(tab_id, content, now_ms).clone();
        self.save_metadata(&table).await?;
        Ok(entry)
    }

    /// Drop a closed tab's entry. Returns whether one existed.
    pub async fn forget_tab(&self, tab_id: i32) -> Result<bool> {
        let mut table = self.load_metadata().await?;
        if !table.remove(tab_id) {
            return Ok(false);
        }
        self.save_metadata(&table).await?;
        Ok(true)
    }
}
