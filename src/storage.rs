/// chrome.storage.sync access for the whitelist settings

use crate::bridge::{from_js, to_js};
use crate::error::ExtensionError;
use crate::whitelist::{SettingsPatch, StoredSettings};
use log::warn;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/js/storage.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn readSettings() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn writeSettings(patch: JsValue) -> Result<(), JsValue>;

    fn onSettingsChanged(callback: &js_sys::Function);
}

pub async fn load_settings() -> Result<StoredSettings, ExtensionError> {
    let settings_js = readSettings().await?;

    if settings_js.is_null() || settings_js.is_undefined() {
        Ok(StoredSettings::default())
    } else {
        from_js(settings_js)
    }
}

pub async fn save_settings(patch: &SettingsPatch) -> Result<(), ExtensionError> {
    if patch.is_empty() {
        return Ok(());
    }

    writeSettings(to_js(patch)?).await?;
    Ok(())
}

/// Subscribe to changes of the synced settings for the lifetime of the page
pub fn on_settings_changed(mut callback: impl FnMut(SettingsPatch) + 'static) {
    let listener = Closure::<dyn FnMut(JsValue)>::new(move |patch_js: JsValue| {
        match from_js::<SettingsPatch>(patch_js) {
            Ok(patch) => callback(patch),
            Err(e) => warn!("Ignoring malformed settings change: {}", e),
        }
    });

    onSettingsChanged(listener.as_ref().unchecked_ref());
    listener.forget();
}
