/// Content script: binds the page watcher to the live YouTube document

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlAnchorElement, HtmlButtonElement, HtmlElement, Window};

use crate::bridge::{from_js, send_request};
use crate::channel::ChannelId;
use crate::config::{InterstitialRendering, WatcherConfig};
use crate::dom::{FeedEntry, Page, PageDom, PROCESSED_ATTRIBUTE, selectors, unprocessed_feed_selector};
use crate::gate::{
    ADD_BUTTON_ID, ADD_LABEL, ADDED_LABEL, ADDING_LABEL, CHANNEL_DISPLAY_ID, GO_BACK_BUTTON_ID,
    channel_label, interstitial_markup,
};
use crate::messages::{MutationResponse, Request};
use crate::storage;
use crate::watcher::{Command, PageEvent, PageWatcher};
use crate::whitelist::WhitelistState;

/// Pause between a successful add and the reload, so the confirmation is visible
const RELOAD_DELAY_MS: u32 = 500;

#[wasm_bindgen(module = "/js/content.js")]
extern "C" {
    fn observeMutations(callback: &js_sys::Function);

    fn onDocumentReady(callback: &js_sys::Function);

    fn readInitialData() -> JsValue;

    #[wasm_bindgen(catch)]
    fn replaceDocument(markup: &str) -> Result<(), JsValue>;
}

type SharedWatcher = Rc<RefCell<PageWatcher<WebPage>>>;

/// The current document, seen through the `Page` traits
pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn current() -> Option<WebPage> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(WebPage { window, document })
    }

    fn wire_go_back(&self) {
        let Some(button) = self.document.get_element_by_id(GO_BACK_BUTTON_ID) else {
            warn!("Interstitial has no go-back button");
            return;
        };

        let window = self.window.clone();
        let onclick = Closure::<dyn FnMut()>::new(move || {
            if let Err(e) = window.history().and_then(|history| history.back()) {
                warn!("History back failed: {:?}", e);
            }
        });
        listen_click(&button, &onclick);
        onclick.forget();
    }

    fn wire_add_button(&self, channel_id: ChannelId) {
        let Some(button) = self
            .document
            .get_element_by_id(ADD_BUTTON_ID)
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
        else {
            warn!("Interstitial has no add button");
            return;
        };

        let onclick = Closure::<dyn FnMut()>::new({
            let button = button.clone();
            move || {
                button.set_text_content(Some(ADDING_LABEL));
                button.set_disabled(true);

                let button = button.clone();
                let channel_id = channel_id.clone();
                spawn_local(async move {
                    let request = Request::AddToWhitelist {
                        channel_id: channel_id.clone(),
                    };
                    match send_request::<MutationResponse>(&request).await {
                        Ok(response) if response.success => {
                            info!("Whitelisted {} from the interstitial", channel_id);
                            button.set_text_content(Some(ADDED_LABEL));
                            schedule(RELOAD_DELAY_MS, reload);
                        }
                        Ok(response) => {
                            warn!("Add to whitelist rejected: {:?}", response.message);
                            reset_add_button(&button);
                        }
                        Err(e) => {
                            warn!("Add to whitelist failed: {}", e);
                            reset_add_button(&button);
                        }
                    }
                });
            }
        });
        listen_click(&button, &onclick);
        onclick.forget();
    }
}

/// A feed entry element
pub struct WebEntry(HtmlElement);

impl FeedEntry for WebEntry {
    fn is_processed(&self) -> bool {
        self.0.has_attribute(PROCESSED_ATTRIBUTE)
    }

    fn mark_processed(&self) {
        if let Err(e) = self.0.set_attribute(PROCESSED_ATTRIBUTE, "true") {
            debug!("Could not mark feed entry: {:?}", e);
        }
    }

    fn channel_href(&self) -> Option<String> {
        let link = self
            .0
            .query_selector(selectors::ENTRY_CHANNEL_LINK)
            .ok()
            .flatten()?;
        anchor_href(&link)
    }

    fn hide(&self) {
        if let Err(e) = self.0.style().set_property("display", "none") {
            debug!("Could not hide feed entry: {:?}", e);
        }
    }
}

impl PageDom for WebPage {
    type Entry = WebEntry;

    fn anchor_href(&self, selector: &str) -> Option<String> {
        let link = self.document.query_selector(selector).ok().flatten()?;
        anchor_href(&link)
    }

    fn initial_data(&self) -> Option<serde_json::Value> {
        let data = readInitialData();
        if data.is_undefined() || data.is_null() {
            return None;
        }

        match from_js::<serde_json::Value>(data) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Unreadable ytInitialData: {}", e);
                None
            }
        }
    }

    fn feed_entries(&self) -> Vec<WebEntry> {
        let Ok(nodes) = self.document.query_selector_all(&unprocessed_feed_selector()) else {
            return Vec::new();
        };

        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .map(WebEntry)
            .collect()
    }
}

impl Page for WebPage {
    fn url(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn show_interstitial(&self, channel_id: &ChannelId, rendering: InterstitialRendering) {
        if let Err(e) = replaceDocument(&interstitial_markup(channel_id, rendering)) {
            warn!("Could not replace the document: {:?}", e);
            return;
        }

        if rendering == InterstitialRendering::TextContent {
            if let Some(slot) = self.document.get_element_by_id(CHANNEL_DISPLAY_ID) {
                slot.set_text_content(Some(&channel_label(channel_id)));
            }
        }

        self.wire_go_back();
        self.wire_add_button(channel_id.clone());
    }
}

fn anchor_href(element: &Element) -> Option<String> {
    match element.dyn_ref::<HtmlAnchorElement>() {
        Some(anchor) => Some(anchor.href()),
        None => element.get_attribute("href"),
    }
}

fn listen_click(element: &Element, callback: &Closure<dyn FnMut()>) {
    if let Err(e) = element.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref()) {
        warn!("Could not attach click handler: {:?}", e);
    }
}

fn reset_add_button(button: &HtmlButtonElement) {
    button.set_text_content(Some(ADD_LABEL));
    button.set_disabled(false);
}

/// Delay in the form `setTimeout`/`setInterval` take; oversized values saturate
/// instead of wrapping negative
fn timer_delay(delay_ms: u32) -> i32 {
    i32::try_from(delay_ms).unwrap_or(i32::MAX)
}

fn schedule(delay_ms: u32, f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let callback = Closure::once_into_js(f);
    if let Err(e) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), timer_delay(delay_ms))
    {
        warn!("Could not schedule timer: {:?}", e);
    }
}

fn reload() {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().reload() {
            warn!("Reload failed: {:?}", e);
        }
    }
}

fn dispatch(watcher: &SharedWatcher, event: PageEvent) {
    let commands = match watcher.try_borrow_mut() {
        Ok(mut watcher) => watcher.dispatch(event),
        Err(_) => {
            warn!("Page watcher busy, dropping {:?}", event);
            return;
        }
    };

    for command in commands {
        match command {
            Command::ScheduleCheck {
                generation,
                delay_ms,
            } => {
                let watcher = Rc::clone(watcher);
                schedule(delay_ms, move || {
                    dispatch(&watcher, PageEvent::DebounceElapsed { generation })
                });
            }
            Command::Reload => reload(),
        }
    }
}

/// Hook the watcher up to page events and load the whitelist
pub fn start(config: WatcherConfig) {
    let Some(page) = WebPage::current() else {
        warn!("No document to watch");
        return;
    };

    let window = page.window.clone();
    let rescan_interval_ms = config.rescan_interval_ms;
    let watcher: SharedWatcher = Rc::new(RefCell::new(PageWatcher::new(page, config)));

    {
        let watcher = Rc::clone(&watcher);
        let on_mutation = Closure::<dyn FnMut()>::new(move || dispatch(&watcher, PageEvent::DomMutated));
        observeMutations(on_mutation.as_ref().unchecked_ref());
        on_mutation.forget();
    }

    {
        let watcher = Rc::clone(&watcher);
        storage::on_settings_changed(move |patch| {
            dispatch(&watcher, PageEvent::StorageChanged(patch))
        });
    }

    {
        let watcher = Rc::clone(&watcher);
        let on_tick = Closure::<dyn FnMut()>::new(move || dispatch(&watcher, PageEvent::FeedRescan));
        if let Err(e) = window.set_interval_with_callback_and_timeout_and_arguments_0(
            on_tick.as_ref().unchecked_ref(),
            timer_delay(rescan_interval_ms),
        ) {
            warn!("Could not start feed re-scan: {:?}", e);
        }
        on_tick.forget();
    }

    {
        let watcher = Rc::clone(&watcher);
        let on_ready = Closure::<dyn FnMut()>::new(move || dispatch(&watcher, PageEvent::DocumentReady));
        onDocumentReady(on_ready.as_ref().unchecked_ref());
        on_ready.forget();
    }

    spawn_local(async move {
        match send_request::<WhitelistState>(&Request::GetWhitelist).await {
            Ok(whitelist) => dispatch(&watcher, PageEvent::WhitelistLoaded(whitelist)),
            Err(e) => warn!("Could not load whitelist, leaving page unfiltered: {}", e),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_delay_saturates() {
        assert_eq!(timer_delay(500), 500);
        assert_eq!(timer_delay(i32::MAX as u32), i32::MAX);
        assert_eq!(timer_delay(3_000_000_000), i32::MAX);
    }
}
