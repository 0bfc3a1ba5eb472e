/// Owner lookup in a watch page's embedded `ytInitialData`.
///
/// The object is page-controlled and its shape changes without notice, so
/// every step is an optional lookup and a miss anywhere just means "not found".
use log::debug;
use serde_json::Value;

const WATCH_RESULTS: &str = "/contents/twoColumnWatchNextResults/results/results/contents";
const OWNER_BROWSE_ID: &str =
    "/videoSecondaryInfoRenderer/owner/videoOwnerRenderer/navigationEndpoint/browseEndpoint/browseId";

/// Channel browse id of the video's owner
pub fn owner_browse_id(data: &Value) -> Option<String> {
    let Some(results) = data.pointer(WATCH_RESULTS).and_then(Value::as_array) else {
        debug!("ytInitialData has no watch results");
        return None;
    };

    let browse_id = results.iter().find_map(|item| {
        item.pointer(OWNER_BROWSE_ID)
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    });

    if browse_id.is_none() {
        debug!("No video owner in {} watch results", results.len());
    }

    browse_id.map(str::to_string)
}

#[cfg(test)]
pub mod fixtures {
    use serde_json::{Value, json};

    pub fn watch_data(browse_id: &str) -> Value {
        json!({
            "contents": {
                "twoColumnWatchNextResults": {
                    "results": {
                        "results": {
                            "contents": [
                                { "videoPrimaryInfoRenderer": { "title": {} } },
                                {
                                    "videoSecondaryInfoRenderer": {
                                        "owner": {
                                            "videoOwnerRenderer": {
                                                "navigationEndpoint": {
                                                    "browseEndpoint": { "browseId": browse_id }
                                                }
                                            }
                                        }
                                    }
                                }
                            ]
                        }
                    }
                }
            }
        })
    }
}
