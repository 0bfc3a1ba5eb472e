/// Messages exchanged between the content script, the popup and the background worker
use crate::channel::ChannelId;
use crate::whitelist::WhitelistState;
use serde::{Deserialize, Serialize};

/// A request sent through `chrome.runtime.sendMessage`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    GetWhitelist,
    AddToWhitelist {
        #[serde(rename = "channelId")]
        channel_id: ChannelId,
    },
    RemoveFromWhitelist {
        #[serde(rename = "channelId")]
        channel_id: ChannelId,
    },
}

/// Reply to an add or remove request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MutationResponse {
    pub fn ok() -> Self {
        MutationResponse {
            success: true,
            message: None,
        }
    }

    pub fn ok_with(message: impl Into<String>) -> Self {
        MutationResponse {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        MutationResponse {
            success: false,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Whitelist(WhitelistState),
    Mutation(MutationResponse),
}
