/// Tab Chronicle - background worker for the Chrome extension
/// Built with Rust + WASM

pub mod browser;
pub mod chrome;
pub mod clustering;
pub mod config;
pub mod error;
pub mod inventory;
pub mod message;
pub mod operations;
pub mod router;
pub mod scoring;
pub mod storage;
pub mod tab_data;

#[cfg(test)]
mod testing;

use std::cell::RefCell;
use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::prelude::*;

use crate::chrome::{
    from_js, to_js, BrowserClock, ChromeContentExtractor, ChromeMemory, ChromeStorage, ChromeTabs,
    ReqwestTransport,
};
use crate::config::Config;
use crate::message::{MessageResponse, Sender};
use crate::router::Background;

thread_local! {
    static BACKGROUND: RefCell<Option<Rc<Background>>> = const { RefCell::new(None) };
}

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

fn chrome_background(config: Config) -> Background {
    Background::new(
        config,
        Box::new(ChromeTabs),
        Box::new(ChromeStorage),
        Box::new(ChromeMemory),
        Box::new(ReqwestTransport::new()),
        Box::new(ChromeContentExtractor),
        Box::new(BrowserClock),
    )
}

/// The worker, built with the default config on first use
fn background() -> Rc<Background> {
    BACKGROUND.with(|cell| {
        cell.borrow_mut()
            .get_or_insert_with(|| Rc::new(chrome_background(Config::default())))
            .clone()
    })
}

/// Point the worker at a clustering service. Call before the first
/// message; later calls replace the worker.
#[wasm_bindgen]
pub fn init_background(backend_url: Option<String>) -> Result<(), JsValue> {
    let config = match backend_url {
        Some(url) => Config::from_base(&url).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => Config::default(),
    };
    let worker = chrome_background(config);
    info!("Clustering service at {}", worker.config().backend_url());

    BACKGROUND.with(|cell| *cell.borrow_mut() = Some(Rc::new(worker)));
    Ok(())
}

/// `chrome.runtime.onMessage` entry point. Resolves to the response
/// envelope; never rejects.
#[wasm_bindgen]
pub async fn handle_message(message: JsValue, sender: JsValue) -> JsValue {
    let sender = Sender::or_anonymous(from_js(sender));

    let response = match from_js::<serde_json::Value>(message) {
        Ok(raw) => background().handle(raw, &sender).await,
        Err(e) => MessageResponse::failure(e.to_string()),
    };

    to_js(&response).unwrap_or_else(|e| {
        warn!("Failed to serialize response: {}", e);
        to_js(&MessageResponse::<()>::failure(e.to_string())).unwrap_or(JsValue::NULL)
    })
}

/// `chrome.runtime.onInstalled`
#[wasm_bindgen]
pub async fn on_installed() -> Result<(), JsValue> {
    background()
        .on_installed()
        .await
        .map(|_| ())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// `chrome.tabs.onRemoved`
#[wasm_bindgen]
pub async fn on_tab_removed(tab_id: i32) -> Result<(), JsValue> {
    background()
        .on_tab_removed(tab_id)
        .await
        .map(|_| ())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
