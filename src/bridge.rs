/// JsValue conversions and runtime messaging

use crate::error::ExtensionError;
use crate::messages::Request;
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/js/runtime.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn sendMessage(message: JsValue) -> Result<JsValue, JsValue>;
}

/// Serialize to plain JS objects (no `Map`s), which is what the chrome APIs expect
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, ExtensionError> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

pub fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, ExtensionError> {
    Ok(serde_wasm_bindgen::from_value(value)?)
}

/// Send a request to the background worker and decode its reply
pub async fn send_request<R: DeserializeOwned>(request: &Request) -> Result<R, ExtensionError> {
    let response = sendMessage(to_js(request)?).await?;

    if response.is_undefined() || response.is_null() {
        return Err(ExtensionError::Bridge(
            "No response from background worker".to_string(),
        ));
    }

    from_js(response)
}
