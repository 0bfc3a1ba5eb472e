/// Channel identifiers and the URL shapes that carry them
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

use crate::error::ExtensionError;

/// Platform channel IDs are 24 chars in practice; anything shorter than this is a typo
const MIN_CHANNEL_ID_LENGTH: usize = 10;

static CHANNEL_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/channel/([A-Za-z0-9_-]+)").expect("valid channel pattern"));

static HANDLE_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/@([A-Za-z0-9_-]+)").expect("valid handle pattern"));

static MANUAL_CHANNEL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid channel id pattern"));

/// A channel identifier: either a platform ID (`UC...`) or a handle (`@name`).
///
/// Compared by exact string equality, never normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        ChannelId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate an identifier typed into the popup.
    ///
    /// Surrounding whitespace is trimmed. Handles are accepted as long as they
    /// name something after the `@`; platform IDs must be at least
    /// `MIN_CHANNEL_ID_LENGTH` characters of `[A-Za-z0-9_-]`.
    pub fn parse_manual(input: &str) -> Result<ChannelId, ExtensionError> {
        let trimmed = input.trim();

        if trimmed.is_empty() || trimmed == "@" {
            return Err(ExtensionError::EmptyChannelId);
        }

        if trimmed.starts_with('@') {
            return Ok(ChannelId::new(trimmed));
        }

        if trimmed.len() < MIN_CHANNEL_ID_LENGTH || !MANUAL_CHANNEL_ID.is_match(trimmed) {
            return Err(ExtensionError::InvalidChannelId(trimmed.to_string()));
        }

        Ok(ChannelId::new(trimmed))
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What kind of page a URL points at, as far as gating is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Video,
    Channel,
    Handle,
    Other,
}

impl PageKind {
    pub fn from_url(url: &str) -> PageKind {
        let path = url_path(url);
        if path.contains("/channel/") {
            PageKind::Channel
        } else if path.contains("/@") {
            PageKind::Handle
        } else if path.contains("/watch") {
            PageKind::Video
        } else {
            PageKind::Other
        }
    }

    /// Pages that are replaced by the interstitial when their channel is not whitelisted
    pub fn is_sensitive(self) -> bool {
        !matches!(self, PageKind::Other)
    }
}

/// Path component of a URL or href.
///
/// Absolute URLs go through the `url` parser; anything else (relative hrefs
/// like `/channel/UC...`) just has its query and fragment cut off.
pub fn url_path(url: &str) -> Cow<'_, str> {
    match Url::parse(url.trim()) {
        Ok(parsed) => Cow::Owned(parsed.path().to_string()),
        Err(_) => {
            let end = url.find(|c| c == '?' || c == '#').unwrap_or(url.len());
            Cow::Borrowed(&url[..end])
        }
    }
}

/// Platform ID following `/channel/` in a path
pub fn channel_from_path(path: &str) -> Option<ChannelId> {
    CHANNEL_SEGMENT
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| ChannelId::new(m.as_str()))
}

/// Handle following `/@` in a path, returned with its `@` prefix
pub fn handle_from_path(path: &str) -> Option<ChannelId> {
    HANDLE_SEGMENT
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| ChannelId::new(format!("@{}", m.as_str())))
}

/// Channel linked by an anchor href, trying `/channel/` before `/@`
pub fn channel_from_href(href: &str) -> Option<ChannelId> {
    let path = url_path(href);
    if path.contains("/channel/") {
        channel_from_path(&path)
    } else if path.contains("/@") {
        handle_from_path(&path)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_from_path() {
        assert_eq!(
            channel_from_path("/channel/UCabc1234567/videos"),
            Some(ChannelId::new("UCabc1234567"))
        );
        assert_eq!(
            channel_from_path("/channel/UC-x_y"),
            Some(ChannelId::new("UC-x_y"))
        );
        assert_eq!(channel_from_path("/channel/"), None);
    }

    #[test]
    fn test_handle_from_path() {
        assert_eq!(
            handle_from_path("/@SomeCreator/shorts"),
            Some(ChannelId::new("@SomeCreator"))
        );
        assert_eq!(handle_from_path("/@"), None);
    }

    #[test]
    fn test_channel_from_href() {
        assert_eq!(
            channel_from_href("https://www.youtube.com/channel/UCabc1234567?view=0"),
            Some(ChannelId::new("UCabc1234567"))
        );
        assert_eq!(
            channel_from_href("/@handle_name#about"),
            Some(ChannelId::new("@handle_name"))
        );
        assert_eq!(channel_from_href("https://www.youtube.com/feed/trending"), None);
    }

    #[test]
    fn test_query_string_does_not_count_as_path() {
        assert_eq!(
            channel_from_href("https://www.youtube.com/results?q=/channel/UCabc1234567"),
            None
        );
        assert_eq!(
            PageKind::from_url("https://www.youtube.com/results?search_query=/@foo"),
            PageKind::Other
        );
    }

    #[test]
    fn test_page_kind() {
        assert_eq!(
            PageKind::from_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            PageKind::Video
        );
        assert_eq!(
            PageKind::from_url("https://www.youtube.com/channel/UCabc1234567"),
            PageKind::Channel
        );
        assert_eq!(PageKind::from_url("https://www.youtube.com/@creator"), PageKind::Handle);
        assert_eq!(PageKind::from_url("https://www.youtube.com/"), PageKind::Other);
        assert!(PageKind::Video.is_sensitive());
        assert!(PageKind::Handle.is_sensitive());
        assert!(!PageKind::Other.is_sensitive());
    }

    #[test]
    fn test_parse_manual_accepts_valid_input() {
        assert_eq!(
            ChannelId::parse_manual("  UCabcdefghij  "),
            Ok(ChannelId::new("UCabcdefghij"))
        );
        assert_eq!(ChannelId::parse_manual("@creator"), Ok(ChannelId::new("@creator")));
        assert_eq!(
            ChannelId::parse_manual("abc-def_ghi"),
            Ok(ChannelId::new("abc-def_ghi"))
        );
    }

    #[test]
    fn test_parse_manual_rejects_invalid_input() {
        assert_eq!(ChannelId::parse_manual(""), Err(ExtensionError::EmptyChannelId));
        assert_eq!(ChannelId::parse_manual("   "), Err(ExtensionError::EmptyChannelId));
        assert_eq!(ChannelId::parse_manual("@"), Err(ExtensionError::EmptyChannelId));
        assert!(matches!(
            ChannelId::parse_manual("short"),
            Err(ExtensionError::InvalidChannelId(_))
        ));
        assert!(matches!(
            ChannelId::parse_manual("bad id with spaces!"),
            Err(ExtensionError::InvalidChannelId(_))
        ));
    }

    #[test]
    fn test_channel_id_serializes_as_plain_string() {
        let id = ChannelId::new("@creator");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"@creator\"");
        let back: ChannelId = serde_json::from_str("\"UCabc1234567\"").unwrap();
        assert_eq!(back.as_str(), "UCabc1234567");
    }
}
