/// Background worker: owns all writes that come in over runtime messaging

use crate::bridge::{from_js, to_js};
use crate::coordinator::handle_request;
use crate::messages::{MutationResponse, Request, Response};
use crate::storage::{load_settings, save_settings};
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;

/// Seed defaults for settings that have never been written
#[wasm_bindgen]
pub async fn handle_install() -> Result<(), JsValue> {
    let stored = load_settings().await?;
    let defaults = stored.missing_defaults();

    if defaults.is_empty() {
        debug!("Settings already present, nothing to seed");
        return Ok(());
    }

    info!("Seeding default settings: {:?}", defaults);
    save_settings(&defaults).await?;
    Ok(())
}

/// Answer a `chrome.runtime` message
#[wasm_bindgen]
pub async fn handle_message(request: JsValue) -> Result<JsValue, JsValue> {
    let response = match from_js::<Request>(request) {
        Ok(request) => respond(request).await,
        Err(e) => {
            warn!("Rejecting malformed request: {}", e);
            Response::Mutation(MutationResponse::failure(format!("Unrecognized request: {}", e)))
        }
    };

    Ok(to_js(&response)?)
}

async fn respond(request: Request) -> Response {
    let mut state = match load_settings().await {
        Ok(stored) => stored.into_state(),
        Err(e) => {
            warn!("Could not read settings: {}", e);
            return Response::Mutation(MutationResponse::failure(e.to_string()));
        }
    };

    let handled = handle_request(request, &mut state);

    if let Some(patch) = handled.save {
        if let Err(e) = save_settings(&patch).await {
            warn!("Could not save settings: {}", e);
            return Response::Mutation(MutationResponse::failure(e.to_string()));
        }
    }

    handled.response
}
