/// Messages exchanged with the popup and content scripts

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BackgroundError, Result};
use crate::storage::Settings;
use crate::tab_data::{BrowserTab, ClusterResult, GroupColor};

/// A request, tagged by `type` with an optional `payload`
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    GetAllTabs,
    GetMemoryStatus,
    ClusterTabs,
    CloseTabs(TabIdsPayload),
    CreateTabGroup(CreateGroupPayload),
    ApplyClusters(ApplyClustersPayload),
    CheckBackend,
    GetSettings,
    UpdateSettings(Settings),
    GetInactiveTabs,
    RecordEngagement(TabIdPayload),
}

impl Request {
    /// Decode a raw message. An unrecognized tag is told apart from a
    /// known tag with a bad payload.
    pub fn parse(raw: Value) -> Result<Request> {
        let kind = raw
            .get("type")
            .and_then(Value::as_str)
            .ok_or(BackgroundError::UnknownMessage)?;
        let payload = raw.get("payload").cloned().unwrap_or(Value::Null);

        let request = match kind {
            "GET_ALL_TABS" => Request::GetAllTabs,
            "GET_MEMORY_STATUS" => Request::GetMemoryStatus,
            "CLUSTER_TABS" => Request::ClusterTabs,
            "CLOSE_TABS" => Request::CloseTabs(decode(payload)?),
            "CREATE_TAB_GROUP" => Request::CreateTabGroup(decode(payload)?),
            "APPLY_CLUSTERS" => Request::ApplyClusters(decode(payload)?),
            "CHECK_BACKEND" => Request::CheckBackend,
            "GET_SETTINGS" => Request::GetSettings,
            "UPDATE_SETTINGS" => Request::UpdateSettings(decode(payload)?),
            "GET_INACTIVE_TABS" => Request::GetInactiveTabs,
            "RECORD_ENGAGEMENT" if payload.is_null() => {
                Request::RecordEngagement(TabIdPayload::default())
            }
            "RECORD_ENGAGEMENT" => Request::RecordEngagement(decode(payload)?),
            _ => return Err(BackgroundError::UnknownMessage),
        };

        Ok(request)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Request::GetAllTabs => "GET_ALL_TABS",
            Request::GetMemoryStatus => "GET_MEMORY_STATUS",
            Request::ClusterTabs => "CLUSTER_TABS",
            Request::CloseTabs(_) => "CLOSE_TABS",
            Request::CreateTabGroup(_) => "CREATE_TAB_GROUP",
            Request::ApplyClusters(_) => "APPLY_CLUSTERS",
            Request::CheckBackend => "CHECK_BACKEND",
            Request::GetSettings => "GET_SETTINGS",
            Request::UpdateSettings(_) => "UPDATE_SETTINGS",
            Request::GetInactiveTabs => "GET_INACTIVE_TABS",
            Request::RecordEngagement(_) => "RECORD_ENGAGEMENT",
        }
    }
}

fn decode<T: DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|e| BackgroundError::InvalidPayload(e.to_string()))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabIdsPayload {
    #[serde(default)]
    pub tab_ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupPayload {
    #[serde(default)]
    pub tab_ids: Vec<i32>,
    pub title: String,
    pub color: Option<GroupColor>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApplyClustersPayload {
    pub clusters: Vec<ClusterResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabIdPayload {
    pub tab_id: Option<i32>,
}

/// `chrome.runtime.MessageSender`, the part we use
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Sender {
    pub tab: Option<BrowserTab>,
    pub url: Option<String>,
}

impl Sender {
    /// An undecodable sender is treated as anonymous, so RECORD_ENGAGEMENT
    /// without a tabId fails instead of the whole message.
    pub fn or_anonymous(decoded: Result<Sender>) -> Sender {
        decoded.unwrap_or_else(|e| {
            warn!("Failed to decode message sender: {}", e);
            Sender::default()
        })
    }

    pub fn tab_id(&self) -> Option<i32> {
        self.tab.as_ref().and_then(|t| t.id)
    }
}

/// `{success, data?, error?}`; exactly one of data and error is set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> MessageResponse<T> {
    pub fn ok(data: T) -> Self {
        MessageResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        MessageResponse {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

impl<T> From<Result<T>> for MessageResponse<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => MessageResponse::ok(data),
            Err(e) => MessageResponse::failure(e.to_string()),
        }
    }
}
