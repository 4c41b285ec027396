/// Tab operations: grouping, closing, applying clusters, memory status

use log::{info, warn};

use crate::browser::{SystemMemory, TabsApi};
use crate::error::{BackgroundError, Result};
use crate::tab_data::{CloseSummary, ClusterResult, GroupColor, MemoryInfo, MemoryStatus};

/// How many closed titles the summary names
const SUMMARY_TITLES: usize = 3;

/// Group the tabs, then title and color the group.
///
/// Two browser calls: if labelling fails the group is left in place
/// with the browser's default look.
pub async fn create_tab_group(
    tabs: &dyn TabsApi,
    tab_ids: &[i32],
    title: &str,
    color: Option<GroupColor>,
) -> Result<i32> {
    if tab_ids.is_empty() {
        return Err(BackgroundError::NoTabs);
    }

    let group_id = tabs.group(tab_ids).await?;
    let color = color.unwrap_or_default();

    if let Err(e) = tabs.update_group(group_id, title, color).await {
        warn!("Group {} created but not labelled: {}", group_id, e);
        return Err(e);
    }

    info!("Created group {} \"{}\" with {} tabs", group_id, title, tab_ids.len());
    Ok(group_id)
}

/// Close the tabs and describe what was closed. Titles are read first so
/// the summary can name them; any failed read or removal fails it all.
pub async fn close_tabs(tabs: &dyn TabsApi, tab_ids: &[i32]) -> Result<CloseSummary> {
    if tab_ids.is_empty() {
        return Err(BackgroundError::NoTabs);
    }

    let mut titles = Vec::with_capacity(tab_ids.len());
    for &tab_id in tab_ids {
        let tab = tabs.get(tab_id).await?;
        titles.push(tab.title_or_empty().to_string());
    }

    tabs.remove(tab_ids).await?;

    let message = close_message(&titles);
    info!("{}", message);
    Ok(CloseSummary {
        closed_count: titles.len(),
        message,
    })
}

/// "Closed 4 tabs: A, B, C..."
pub fn close_message(titles: &[String]) -> String {
    let named: Vec<&str> = titles.iter().take(SUMMARY_TITLES).map(String::as_str).collect();
    let ellipsis = if titles.len() > SUMMARY_TITLES { "..." } else { "" };

    format!("Closed {} tabs: {}{}", titles.len(), named.join(", "), ellipsis)
}

/// Materialize each cluster as a browser group, in order. Stops at the
/// first failure; groups created before it stay.
pub async fn apply_clusters(tabs: &dyn TabsApi, clusters: &[ClusterResult]) -> Result<Vec<i32>> {
    let mut group_ids = Vec::with_capacity(clusters.len());

    for cluster in clusters {
        if cluster.tab_ids.is_empty() {
            warn!("Skipping empty cluster {}", cluster.id);
            continue;
        }
        let group_id =
            create_tab_group(tabs, &cluster.tab_ids, &cluster.name, Some(cluster.color)).await?;
        group_ids.push(group_id);
    }

    Ok(group_ids)
}

pub async fn memory_status(memory: &dyn SystemMemory) -> Result<MemoryStatus> {
    Ok(summarize_memory(memory.info().await?))
}

pub fn summarize_memory(info: MemoryInfo) -> MemoryStatus {
    let used = info.capacity - info.available_capacity;
    let usage_percent = if info.capacity > 0.0 {
        used / info.capacity * 100.0
    } else {
        0.0
    };

    MemoryStatus {
        total: info.capacity,
        available: info.available_capacity,
        used,
        usage_percent,
    }
}
