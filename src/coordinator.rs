/// Request handling for the background worker.
///
/// The coordinator owns no state of its own: every request is applied to the
/// settings just read from storage, and any resulting change is handed back as
/// a patch for the caller to write.

use crate::messages::{MutationResponse, Request, Response};
use crate::whitelist::{AddOutcome, SettingsPatch, WhitelistState};
use log::{debug, info};

pub const ALREADY_WHITELISTED: &str = "Already whitelisted";
pub const NOT_IN_WHITELIST: &str = "Not in whitelist";

/// A handled request: the reply, and what to persist before sending it
#[derive(Debug, Clone, PartialEq)]
pub struct Handled {
    pub response: Response,
    pub save: Option<SettingsPatch>,
}

impl Handled {
    fn reply(response: Response) -> Self {
        Handled { response, save: None }
    }
}

pub fn handle_request(request: Request, state: &mut WhitelistState) -> Handled {
    match request {
        Request::GetWhitelist => Handled::reply(Response::Whitelist(state.clone())),

        Request::AddToWhitelist { channel_id } => match state.add(channel_id.clone()) {
            AddOutcome::Added => {
                info!("Whitelisted channel {}", channel_id);
                Handled {
                    response: Response::Mutation(MutationResponse::ok()),
                    save: Some(SettingsPatch::whitelist(state.channels.clone())),
                }
            }
            AddOutcome::AlreadyPresent => {
                debug!("Channel {} already whitelisted", channel_id);
                Handled::reply(Response::Mutation(MutationResponse::ok_with(
                    ALREADY_WHITELISTED,
                )))
            }
        },

        Request::RemoveFromWhitelist { channel_id } => {
            if state.remove(&channel_id) {
                info!("Removed channel {} from whitelist", channel_id);
                Handled {
                    response: Response::Mutation(MutationResponse::ok()),
                    save: Some(SettingsPatch::whitelist(state.channels.clone())),
                }
            } else {
                Handled::reply(Response::Mutation(MutationResponse::failure(
                    NOT_IN_WHITELIST,
                )))
            }
        }
    }
}
