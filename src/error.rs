/// Error type for everything that crosses the JS bridge

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtensionError {
    #[error("Please enter a channel ID or @username")]
    EmptyChannelId,

    #[error("Invalid channel ID format: {0:?}. Use either a channel ID (e.g., UCxxxxxxx) or @username")]
    InvalidChannelId(String),

    #[error("Bridge call failed: {0}")]
    Bridge(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl From<JsValue> for ExtensionError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        ExtensionError::Bridge(message)
    }
}

impl From<serde_wasm_bindgen::Error> for ExtensionError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        ExtensionError::Serialization(err.to_string())
    }
}

impl From<ExtensionError> for JsValue {
    fn from(err: ExtensionError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
