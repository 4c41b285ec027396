/// Client for the remote clustering service

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::browser::{HttpTransport, TabsApi};
use crate::config::Config;
use crate::error::{BackgroundError, Result};
use crate::tab_data::{truncate_chars, BrowserTab, ClusterResult, TabContent, MAX_TEXT_CHARS};

/// Browser-internal pages never leave the machine
pub const RESERVED_PREFIXES: [&str; 2] = ["chrome://", "chrome-extension://"];

#[derive(Debug, Serialize)]
struct ClusterRequest<'a> {
    tabs: &'a [TabContent],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendHealth {
    pub status: String,
}

pub fn is_reserved_url(url: &str) -> bool {
    RESERVED_PREFIXES.iter().any(|prefix| url.starts_with(prefix))
}

/// Content for every tab the service may see. The title stands in for
/// page text until the content script supplies more.
pub fn build_cluster_payload(tabs: &[BrowserTab]) -> Vec<TabContent> {
    tabs.iter()
        .filter_map(|tab| {
            let (tab_id, url) = tab.identity()?;
            if is_reserved_url(url) {
                return None;
            }

            let title = tab.title_or_empty().to_string();
            Some(TabContent {
                tab_id,
                url: url.to_string(),
                text: truncate_chars(&title, MAX_TEXT_CHARS),
                title,
                keywords: Vec::new(),
            })
        })
        .collect()
}

/// Send all eligible open tabs to the service and return its clusters
/// as-is. No retries: a failure is reported to the caller.
pub async fn request_clusters(
    tabs: &dyn TabsApi,
    http: &dyn HttpTransport,
    config: &Config,
) -> Result<Vec<ClusterResult>> {
    let contents = build_cluster_payload(&tabs.query_all().await?);
    info!("Requesting clusters for {} tabs", contents.len());

    let body = serde_json::to_string(&ClusterRequest { tabs: &contents })?;
    let reply = http.post_json(config.cluster_endpoint(), &body).await?;

    if !reply.is_success() {
        warn!("Clustering service returned {}", reply.status);
        return Err(BackgroundError::Backend(reply.status));
    }

    let clusters: Vec<ClusterResult> = serde_json::from_str(&reply.body)?;
    info!("Received {} clusters", clusters.len());
    Ok(clusters)
}

pub async fn check_backend(http: &dyn HttpTransport, config: &Config) -> Result<BackendHealth> {
    let reply = http.get(config.health_endpoint()).await?;

    if !reply.is_success() {
        return Err(BackgroundError::Backend(reply.status));
    }

    Ok(serde_json::from_str(&reply.body)?)
}
