/// Content script settings, passed in from the loader script
use log::warn;
use serde::{Deserialize, Serialize};

const DEFAULT_DEBOUNCE_MS: u32 = 500;
const DEFAULT_RESCAN_INTERVAL_MS: u32 = 10_000;
const MIN_RESCAN_INTERVAL_MS: u32 = 1_000;
/// Browser timers take a signed 32-bit delay
pub const MAX_TIMER_DELAY_MS: u32 = i32::MAX as u32;

/// How the rejected channel id is placed into the interstitial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InterstitialRendering {
    /// Interpolate the HTML-escaped id into the markup
    EscapedMarkup,
    /// Leave the slot empty and assign the id as text afterwards
    #[default]
    TextContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WatcherConfig {
    /// Delay between a detected navigation and the re-check, to let the new page render
    pub debounce_ms: u32,
    /// Period of the fallback feed re-scan
    pub rescan_interval_ms: u32,
    pub rendering: InterstitialRendering,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        WatcherConfig {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            rescan_interval_ms: DEFAULT_RESCAN_INTERVAL_MS,
            rendering: InterstitialRendering::default(),
        }
    }
}

impl WatcherConfig {
    /// Clamp values that would make the page thrash
    pub fn normalized(mut self) -> Self {
        if self.rescan_interval_ms < MIN_RESCAN_INTERVAL_MS {
            warn!(
                "Rescan interval {}ms too short, using {}ms",
                self.rescan_interval_ms, MIN_RESCAN_INTERVAL_MS
            );
            self.rescan_interval_ms = MIN_RESCAN_INTERVAL_MS;
        }
        if self.rescan_interval_ms > MAX_TIMER_DELAY_MS {
            warn!(
                "Rescan interval {}ms too long, using {}ms",
                self.rescan_interval_ms, MAX_TIMER_DELAY_MS
            );
            self.rescan_interval_ms = MAX_TIMER_DELAY_MS;
        }
        if self.debounce_ms > MAX_TIMER_DELAY_MS {
            warn!("Debounce {}ms too long, using {}ms", self.debounce_ms, MAX_TIMER_DELAY_MS);
            self.debounce_ms = MAX_TIMER_DELAY_MS;
        }
        self
    }

    /// Parse a config object, falling back to defaults when it is absent or malformed
    pub fn from_json(value: serde_json::Value) -> Self {
        if value.is_null() {
            return WatcherConfig::default();
        }

        match serde_json::from_value::<WatcherConfig>(value) {
            Ok(config) => config.normalized(),
            Err(e) => {
                warn!("Invalid content script config, using defaults: {}", e);
                WatcherConfig::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = WatcherConfig::default();
        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.rescan_interval_ms, 10_000);
        assert_eq!(config.rendering, InterstitialRendering::TextContent);
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let config = WatcherConfig::from_json(json!({
            "rescanIntervalMs": 5000,
            "rendering": "escapedMarkup"
        }));

        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.rescan_interval_ms, 5000);
        assert_eq!(config.rendering, InterstitialRendering::EscapedMarkup);
    }

    #[test]
    fn test_invalid_config_falls_back() {
        assert_eq!(
            WatcherConfig::from_json(json!({ "debounceMs": "soon" })),
            WatcherConfig::default()
        );
        assert_eq!(WatcherConfig::from_json(serde_json::Value::Null), WatcherConfig::default());
    }

    #[test]
    fn test_rescan_interval_is_clamped() {
        let config = WatcherConfig::from_json(json!({ "rescanIntervalMs": 10 }));
        assert_eq!(config.rescan_interval_ms, 1_000);

        let config = WatcherConfig::from_json(json!({
            "rescanIntervalMs": 3_000_000_000u64,
            "debounceMs": 4_000_000_000u64
        }));
        assert_eq!(config.rescan_interval_ms, i32::MAX as u32);
        assert_eq!(config.debounce_ms, i32::MAX as u32);
        assert!(i32::try_from(config.rescan_interval_ms).is_ok());
    }
}
