/// Chrome extension implementations of the browser capabilities.
///
/// Tab, storage, memory and messaging calls go through the JS bridge in
/// `background.js`; HTTP goes through `reqwest`, which uses `fetch` on
/// wasm32.

use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::browser::{
    Clock, ContentExtractor, HttpReply, HttpTransport, KeyValueStore, SystemMemory, TabsApi,
};
use crate::error::{BackgroundError, Result};
use crate::tab_data::{BrowserTab, ExtractedContent, GroupColor, MemoryInfo};

// Import JS bridge functions
#[wasm_bindgen(module = "/background.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn queryTabs() -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getTab(tab_id: i32) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn groupTabs(tab_ids: JsValue) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn updateTabGroup(
        group_id: i32,
        title: &str,
        color: &str,
    ) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeTabs(tab_ids: JsValue) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getMemoryInfo() -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendTabMessage(tab_id: i32, message: JsValue) -> std::result::Result<JsValue, JsValue>;
}

/// Message text of a rejected JS promise
pub fn js_error(value: JsValue) -> BackgroundError {
    let message = match value.dyn_ref::<js_sys::Error>() {
        Some(error) => String::from(error.message()),
        None => value.as_string().unwrap_or_else(|| format!("{:?}", value)),
    };
    BackgroundError::Browser(message)
}

pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| BackgroundError::Parse(e.to_string()))
}

pub fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T> {
    serde_wasm_bindgen::from_value(value).map_err(|e| BackgroundError::Parse(e.to_string()))
}

pub struct ChromeTabs;

#[async_trait(?Send)]
impl TabsApi for ChromeTabs {
    async fn query_all(&self) -> Result<Vec<BrowserTab>> {
        from_js(queryTabs().await.map_err(js_error)?)
    }

    async fn get(&self, tab_id: i32) -> Result<BrowserTab> {
        from_js(getTab(tab_id).await.map_err(js_error)?)
    }

    async fn group(&self, tab_ids: &[i32]) -> Result<i32> {
        let group_id = groupTabs(to_js(tab_ids)?).await.map_err(js_error)?;
        from_js(group_id)
    }

    async fn update_group(&self, group_id: i32, title: &str, color: GroupColor) -> Result<()> {
        updateTabGroup(group_id, title, color.as_str()).await.map_err(js_error)?;
        Ok(())
    }

    async fn remove(&self, tab_ids: &[i32]) -> Result<()> {
        removeTabs(to_js(tab_ids)?).await.map_err(js_error)?;
        Ok(())
    }
}

pub struct ChromeStorage;

#[async_trait(?Send)]
impl KeyValueStore for ChromeStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let value = getStorage(key).await.map_err(js_error)?;
        if value.is_null() || value.is_undefined() {
            return Ok(None);
        }
        Ok(Some(from_js(value)?))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        setStorage(key, to_js(&value)?).await.map_err(js_error)?;
        Ok(())
    }
}

pub struct ChromeMemory;

#[async_trait(?Send)]
impl SystemMemory for ChromeMemory {
    async fn info(&self) -> Result<MemoryInfo> {
        from_js(getMemoryInfo().await.map_err(js_error)?)
    }
}

/// Asks the content script in a tab for its page content
pub struct ChromeContentExtractor;

#[async_trait(?Send)]
impl ContentExtractor for ChromeContentExtractor {
    async fn extract(&self, tab_id: i32) -> Result<ExtractedContent> {
        let request = to_js(&serde_json::json!({ "type": "EXTRACT_CONTENT" }))?;
        let reply = sendTabMessage(tab_id, request).await.map_err(js_error)?;
        from_js(reply)
    }
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        ReqwestTransport {
            client: reqwest::Client::new(),
        }
    }

    async fn finish(response: reqwest::Response) -> Result<HttpReply> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| BackgroundError::Network(e.to_string()))?;
        debug!("HTTP {} ({} bytes)", status, body.len());
        Ok(HttpReply { status, body })
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<HttpReply> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| BackgroundError::Network(e.to_string()))?;
        Self::finish(response).await
    }

    async fn post_json(&self, url: &Url, body: &str) -> Result<HttpReply> {
        let response = self
            .client
            .post(url.as_str())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| BackgroundError::Network(e.to_string()))?;
        Self::finish(response).await
    }
}

pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_types_fill_every_capability() {
        let _tabs: Box<dyn TabsApi> = Box::new(ChromeTabs);
        let _kv: Box<dyn KeyValueStore> = Box::new(ChromeStorage);
        let _memory: Box<dyn SystemMemory> = Box::new(ChromeMemory);
        let _extractor: Box<dyn ContentExtractor> = Box::new(ChromeContentExtractor);
        let _http: Box<dyn HttpTransport> = Box::new(ReqwestTransport::default());
    }
}
