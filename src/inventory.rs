/// Tab inventory: every open tab with its importance score

use log::debug;

use crate::browser::TabsApi;
use crate::error::Result;
use crate::scoring::{importance_score, is_inactive};
use crate::storage::{ExtensionStorage, MetadataTable};
use crate::tab_data::{BrowserTab, TabInfo, TabMetadata};

/// Query all tabs and score each one. Browser order is kept; tabs
/// without an id or url are left out. Any failed query fails the whole
/// inventory.
pub async fn build_inventory(
    tabs: &dyn TabsApi,
    storage: &ExtensionStorage<'_>,
    now_ms: f64,
) -> Result<Vec<TabInfo>> {
    let browser_tabs = tabs.query_all().await?;
    let metadata = storage.load_metadata().await?;

    let inventory = score_tabs(&browser_tabs, &metadata, now_ms);
    debug!("Inventory: {} of {} tabs", inventory.len(), browser_tabs.len());
    Ok(inventory)
}

/// Tabs unused for longer than `threshold_minutes`, least important first
pub async fn inactive_tabs(
    tabs: &dyn TabsApi,
    storage: &ExtensionStorage<'_>,
    now_ms: f64,
    threshold_minutes: u32,
) -> Result<Vec<TabInfo>> {
    let inventory = build_inventory(tabs, storage, now_ms).await?;
    Ok(select_inactive(inventory, now_ms, threshold_minutes))
}

fn select_inactive(inventory: Vec<TabInfo>, now_ms: f64, threshold_minutes: u32) -> Vec<TabInfo> {
    let mut inactive: Vec<TabInfo> = inventory
        .into_iter()
        .filter(|tab| {
            is_inactive(tab.pinned, tab.active, tab.last_accessed, now_ms, threshold_minutes)
        })
        .collect();

    // Stable sort keeps browser order among equal scores
    inactive.sort_by_key(|tab| tab.importance_score);
    inactive
}

pub fn score_tabs(
    browser_tabs: &[BrowserTab],
    metadata: &MetadataTable,
    now_ms: f64,
) -> Vec<TabInfo> {
    let empty = TabMetadata::default();

    browser_tabs
        .iter()
        .filter_map(|tab| {
            let (id, url) = tab.identity()?;
            let tab_metadata = metadata.get(id).unwrap_or(&empty);

            Some(TabInfo {
                id,
                url: url.to_string(),
                title: tab.title_or_empty().to_string(),
                fav_icon_url: tab.fav_icon_url.clone(),
                pinned: tab.pinned,
                active: tab.active,
                group_id: tab.group_id,
                last_accessed: tab.last_accessed,
                importance_score: importance_score(tab, tab_metadata, now_ms),
            })
        })
        .collect()
}
