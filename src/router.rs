/// Message routing for the background worker

use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;

use crate::browser::{Clock, ContentExtractor, HttpTransport, KeyValueStore, SystemMemory, TabsApi};
use crate::clustering::{check_backend, request_clusters};
use crate::config::Config;
use crate::error::{BackgroundError, Result};
use crate::inventory::{build_inventory, inactive_tabs};
use crate::message::{MessageResponse, Request, Sender};
use crate::operations::{apply_clusters, close_tabs, create_tab_group, memory_status};
use crate::storage::ExtensionStorage;
use crate::tab_data::{TabInfo, TabMetadata};

/// The background coordinator: owns the capabilities and answers every
/// request with a `MessageResponse`.
///
/// Requests are not serialized against each other. Two overlapping
/// mutations on the same tabs interleave at their await points.
pub struct Background {
    config: Config,
    tabs: Box<dyn TabsApi>,
    store: Box<dyn KeyValueStore>,
    memory: Box<dyn SystemMemory>,
    http: Box<dyn HttpTransport>,
    extractor: Box<dyn ContentExtractor>,
    clock: Box<dyn Clock>,
}

impl Background {
    pub fn new(
        config: Config,
        tabs: Box<dyn TabsApi>,
        store: Box<dyn KeyValueStore>,
        memory: Box<dyn SystemMemory>,
        http: Box<dyn HttpTransport>,
        extractor: Box<dyn ContentExtractor>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Background {
            config,
            tabs,
            store,
            memory,
            http,
            extractor,
            clock,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> ExtensionStorage<'_> {
        ExtensionStorage::new(self.store.as_ref())
    }

    /// Answer one raw message. Never fails: errors come back in the
    /// envelope.
    pub async fn handle(&self, raw: Value, sender: &Sender) -> MessageResponse<Value> {
        let kind = raw.get("type").and_then(Value::as_str).unwrap_or("<missing>");
        info!("Received message: {}", kind);
        if let Some(url) = &sender.url {
            debug!("Sent from {}", url);
        }

        let result = match Request::parse(raw) {
            Ok(request) => self.dispatch(request, sender).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            warn!("Request failed: {}", e);
        }
        result.into()
    }

    async fn dispatch(&self, request: Request, sender: &Sender) -> Result<Value> {
        match request {
            Request::GetAllTabs => to_data(self.get_all_tabs().await?),
            Request::GetMemoryStatus => to_data(memory_status(self.memory.as_ref()).await?),
            Request::ClusterTabs => {
                let clusters =
                    request_clusters(self.tabs.as_ref(), self.http.as_ref(), &self.config).await?;
                to_data(clusters)
            }
            Request::CloseTabs(payload) => {
                to_data(close_tabs(self.tabs.as_ref(), &payload.tab_ids).await?)
            }
            Request::CreateTabGroup(payload) => {
                let tabs = self.tabs.as_ref();
                let group_id =
                    create_tab_group(tabs, &payload.tab_ids, &payload.title, payload.color).await?;
                to_data(group_id)
            }
            Request::ApplyClusters(payload) => {
                to_data(apply_clusters(self.tabs.as_ref(), &payload.clusters).await?)
            }
            Request::CheckBackend => {
                to_data(check_backend(self.http.as_ref(), &self.config).await?)
            }
            Request::GetSettings => to_data(self.storage().load_settings().await?),
            Request::UpdateSettings(settings) => {
                self.storage().save_settings(&settings).await?;
                to_data(settings)
            }
            Request::GetInactiveTabs => to_data(self.get_inactive_tabs().await?),
            Request::RecordEngagement(payload) => {
                let tab_id = payload
                    .tab_id
                    .or_else(|| sender.tab_id())
                    .ok_or_else(|| BackgroundError::InvalidPayload("missing tabId".to_string()))?;
                to_data(self.record_engagement(tab_id).await?)
            }
        }
    }

    async fn get_all_tabs(&self) -> Result<Vec<TabInfo>> {
        build_inventory(self.tabs.as_ref(), &self.storage(), self.clock.now_ms()).await
    }

    async fn get_inactive_tabs(&self) -> Result<Vec<TabInfo>> {
        let settings = self.storage().load_settings().await?;
        inactive_tabs(
            self.tabs.as_ref(),
            &self.storage(),
            self.clock.now_ms(),
            settings.inactive_threshold,
        )
        .await
    }

    async fn record_engagement(&self, tab_id: i32) -> Result<TabMetadata> {
        let content = self.extractor.extract(tab_id).await?;
        self.storage()
            .record_extraction(tab_id, &content, self.clock.now_ms())
            .await
    }

    /// First-install hook: store default settings if there are none
    pub async fn on_installed(&self) -> Result<bool> {
        self.storage().initialize_settings().await
    }

    /// Tab-closed hook: drop the tab's stored metadata
    pub async fn on_tab_removed(&self, tab_id: i32) -> Result<bool> {
        self.storage().forget_tab(tab_id).await
    }
}

fn to_data<T: Serialize>(data: T) -> Result<Value> {
    Ok(serde_json::to_value(data)?)
}
