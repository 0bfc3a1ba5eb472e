/// Channel Whitelist - blocks YouTube channels that are not on your whitelist
/// Built with Rust + WASM + Yew

mod background;
mod bridge;
mod channel;
mod config;
mod content;
mod coordinator;
mod dom;
mod error;
mod filter;
mod gate;
mod identifier;
mod messages;
mod page_data;
mod storage;
mod watcher;
mod whitelist;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export URL-based channel extraction for JavaScript access
#[wasm_bindgen]
pub fn channel_id_from_url(url: &str) -> Option<String> {
    channel::channel_from_href(url).map(|id| id.to_string())
}

// Start the page watcher in a content script
#[wasm_bindgen]
pub fn start_content_script(config: JsValue) {
    let config = if config.is_undefined() || config.is_null() {
        config::WatcherConfig::default()
    } else {
        match bridge::from_js::<serde_json::Value>(config) {
            Ok(value) => config::WatcherConfig::from_json(value),
            Err(e) => {
                log::warn!("Unreadable content script config, using defaults: {}", e);
                config::WatcherConfig::default()
            }
        }
    };

    content::start(config);
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
