/// Whitelist state as stored in chrome.storage.sync

use crate::channel::ChannelId;
use serde::{Deserialize, Serialize};

/// The whitelist and the global on/off switch.
///
/// Serialized with the storage key names (`whitelist`, `enabled`), which is
/// also the shape of the `getWhitelist` response. Both keys are required when
/// decoding, so a `{ success: false, message }` failure reply is an error and
/// never an empty whitelist. Raw storage reads go through `StoredSettings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistState {
    #[serde(rename = "whitelist")]
    pub channels: Vec<ChannelId>,
    pub enabled: bool,
}

/// Result of adding a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

impl WhitelistState {
    pub fn new() -> Self {
        WhitelistState {
            channels: Vec::new(),
            enabled: true,
        }
    }

    pub fn contains(&self, channel_id: &ChannelId) -> bool {
        self.channels.contains(channel_id)
    }

    /// Append a channel unless it is already listed
    pub fn add(&mut self, channel_id: ChannelId) -> AddOutcome {
        if self.contains(&channel_id) {
            AddOutcome::AlreadyPresent
        } else {
            self.channels.push(channel_id);
            AddOutcome::Added
        }
    }

    /// Remove a channel, keeping the order of the rest. Returns false if it was not listed.
    pub fn remove(&mut self, channel_id: &ChannelId) -> bool {
        match self.channels.iter().position(|c| c == channel_id) {
            Some(index) => {
                self.channels.remove(index);
                true
            }
            None => false,
        }
    }
}

impl Default for WhitelistState {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw settings as read from storage, where either key may be absent
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StoredSettings {
    #[serde(default)]
    pub whitelist: Option<Vec<ChannelId>>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl StoredSettings {
    /// Missing whitelist means empty; the extension is on unless explicitly disabled
    pub fn into_state(self) -> WhitelistState {
        WhitelistState {
            channels: self.whitelist.unwrap_or_default(),
            enabled: self.enabled != Some(false),
        }
    }

    /// Defaults for whichever keys have never been written
    pub fn missing_defaults(&self) -> SettingsPatch {
        SettingsPatch {
            whitelist: self.whitelist.is_none().then(Vec::new),
            enabled: self.enabled.is_none().then_some(true),
        }
    }
}

/// A partial update of the stored settings.
///
/// Used both for writes and for change notifications, where only the keys
/// that changed are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelist: Option<Vec<ChannelId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl SettingsPatch {
    pub fn whitelist(channels: Vec<ChannelId>) -> Self {
        SettingsPatch {
            whitelist: Some(channels),
            enabled: None,
        }
    }

    pub fn enabled(enabled: bool) -> Self {
        SettingsPatch {
            whitelist: None,
            enabled: Some(enabled),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.whitelist.is_none() && self.enabled.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ChannelId {
        ChannelId::new(s)
    }

    #[test]
    fn test_new_state() {
        let state = WhitelistState::new();
        assert!(state.channels.is_empty());
        assert!(state.enabled);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut state = WhitelistState::new();

        assert_eq!(state.add(id("UCabc1234567")), AddOutcome::Added);
        assert_eq!(state.add(id("UCabc1234567")), AddOutcome::AlreadyPresent);

        assert_eq!(state.channels.len(), 1);
    }

    #[test]
    fn test_remove_missing_leaves_list_unchanged() {
        let mut state = WhitelistState::new();
        state.add(id("@one"));
        state.add(id("@two"));

        assert!(!state.remove(&id("@three")));
        assert_eq!(state.channels, vec![id("@one"), id("@two")]);
    }

    #[test]
    fn test_add_then_remove_restores_order() {
        let mut state = WhitelistState::new();
        state.add(id("@one"));
        state.add(id("@two"));
        state.add(id("@three"));
        let original = state.channels.clone();

        state.add(id("UCnew12345678"));
        assert!(state.remove(&id("UCnew12345678")));
        assert_eq!(state.channels, original);

        assert!(state.remove(&id("@two")));
        state.add(id("@four"));
        assert_eq!(state.channels, vec![id("@one"), id("@three"), id("@four")]);
    }

    #[test]
    fn test_stored_settings_into_state() {
        let empty = StoredSettings::default().into_state();
        assert_eq!(empty, WhitelistState::new());

        let stored = StoredSettings {
            whitelist: Some(vec![id("@one")]),
            enabled: Some(false),
        };
        let state = stored.into_state();
        assert_eq!(state.channels, vec![id("@one")]);
        assert!(!state.enabled);
    }

    #[test]
    fn test_missing_defaults_only_fills_absent_keys() {
        let fresh = StoredSettings::default().missing_defaults();
        assert_eq!(fresh.whitelist, Some(Vec::new()));
        assert_eq!(fresh.enabled, Some(true));

        let existing = StoredSettings {
            whitelist: Some(vec![id("@one")]),
            enabled: Some(false),
        };
        assert!(existing.missing_defaults().is_empty());

        let partial = StoredSettings {
            whitelist: Some(vec![id("@one")]),
            enabled: None,
        };
        assert_eq!(partial.missing_defaults(), SettingsPatch::enabled(true));
    }

    #[test]
    fn test_failure_reply_is_not_a_whitelist() {
        let reply = serde_json::json!({ "success": false, "message": "Bridge call failed: quota" });
        assert!(serde_json::from_value::<WhitelistState>(reply).is_err());

        let partial = serde_json::json!({ "enabled": true });
        assert!(serde_json::from_value::<WhitelistState>(partial).is_err());

        let reply = serde_json::json!({ "whitelist": ["@one"], "enabled": false });
        let state: WhitelistState = serde_json::from_value(reply).unwrap();
        assert_eq!(state.channels, vec![id("@one")]);
        assert!(!state.enabled);
    }

    #[test]
    fn test_serialization_uses_storage_keys() {
        let mut state = WhitelistState::new();
        state.add(id("UCabc1234567"));

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json, serde_json::json!({ "whitelist": ["UCabc1234567"], "enabled": true }));

        let patch: SettingsPatch = serde_json::from_str(r#"{"enabled": false}"#).unwrap();
        assert_eq!(patch, SettingsPatch::enabled(false));
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"enabled":false}"#);
    }
}
