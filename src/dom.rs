/// The slice of the page the content script reads and writes.
///
/// Identification, gating and filtering only talk to these traits, so they can
/// run against the live document (`content::WebPage`) or a fake in tests.

use crate::channel::ChannelId;
use crate::config::InterstitialRendering;

/// Attribute set on feed entries once they have been looked at
pub const PROCESSED_ATTRIBUTE: &str = "data-whitelist-processed";

pub mod selectors {
    /// Owner link in the watch page's metadata, platform-ID form
    pub const OWNER_CHANNEL_LINK: &str =
        r#"a.yt-simple-endpoint.style-scope.yt-formatted-string[href*="/channel/"]"#;

    /// Owner link in the watch page's metadata, handle form
    pub const OWNER_HANDLE_LINK: &str =
        r#"a.yt-simple-endpoint.style-scope.yt-formatted-string[href*="/@"]"#;

    /// Elements rendering a single video in a feed, sidebar or grid
    pub const FEED_ENTRY_TAGS: &[&str] = &[
        "ytd-video-renderer",
        "ytd-grid-video-renderer",
        "ytd-compact-video-renderer",
        "ytd-rich-item-renderer",
    ];

    /// Channel link inside a feed entry
    pub const ENTRY_CHANNEL_LINK: &str = r#"a[href*="/channel/"], a[href*="/@"]"#;
}

/// Selector matching feed entries that have not been processed yet
pub fn unprocessed_feed_selector() -> String {
    selectors::FEED_ENTRY_TAGS
        .iter()
        .map(|tag| format!("{}:not([{}])", tag, PROCESSED_ATTRIBUTE))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One video entry in a feed
pub trait FeedEntry {
    fn is_processed(&self) -> bool;
    fn mark_processed(&self);
    /// href of the first channel link inside the entry
    fn channel_href(&self) -> Option<String>;
    /// Remove from layout, keeping the element in the tree
    fn hide(&self);
}

pub trait PageDom {
    type Entry: FeedEntry;

    /// href of the first anchor matching `selector`
    fn anchor_href(&self, selector: &str) -> Option<String>;

    /// The page's embedded `ytInitialData`, if any
    fn initial_data(&self) -> Option<serde_json::Value>;

    /// Feed entries not yet marked processed. May over-report; callers re-check.
    fn feed_entries(&self) -> Vec<Self::Entry>;
}

pub trait Page: PageDom {
    fn url(&self) -> String;

    /// Replace the whole document with the block interstitial for `channel_id`
    fn show_interstitial(&self, channel_id: &ChannelId, rendering: InterstitialRendering);
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Debug, Clone, Default)]
    pub struct FakeEntry {
        pub href: Option<String>,
        pub processed: Rc<Cell<bool>>,
        pub hidden: Rc<Cell<bool>>,
    }

    impl FakeEntry {
        pub fn linking_to(href: &str) -> Self {
            FakeEntry {
                href: Some(href.to_string()),
                ..Default::default()
            }
        }

        pub fn without_link() -> Self {
            FakeEntry::default()
        }
    }

    impl FeedEntry for FakeEntry {
        fn is_processed(&self) -> bool {
            self.processed.get()
        }

        fn mark_processed(&self) {
            self.processed.set(true);
        }

        fn channel_href(&self) -> Option<String> {
            self.href.clone()
        }

        fn hide(&self) {
            self.hidden.set(true);
        }
    }

    #[derive(Debug, Default)]
    pub struct FakePage {
        pub url: RefCell<String>,
        pub anchors: RefCell<HashMap<&'static str, String>>,
        pub initial_data: RefCell<Option<serde_json::Value>>,
        pub entries: RefCell<Vec<FakeEntry>>,
        pub interstitials: RefCell<Vec<ChannelId>>,
    }

    impl FakePage {
        pub fn at(url: &str) -> Self {
            let page = FakePage::default();
            page.navigate(url);
            page
        }

        pub fn navigate(&self, url: &str) {
            *self.url.borrow_mut() = url.to_string();
        }

        pub fn with_anchor(self, selector: &'static str, href: &str) -> Self {
            self.anchors.borrow_mut().insert(selector, href.to_string());
            self
        }

        pub fn with_initial_data(self, data: serde_json::Value) -> Self {
            *self.initial_data.borrow_mut() = Some(data);
            self
        }

        pub fn add_entry(&self, entry: FakeEntry) {
            self.entries.borrow_mut().push(entry);
        }

        pub fn hidden_count(&self) -> usize {
            self.entries.borrow().iter().filter(|e| e.hidden.get()).count()
        }
    }

    impl PageDom for FakePage {
        type Entry = FakeEntry;

        fn anchor_href(&self, selector: &str) -> Option<String> {
            self.anchors.borrow().get(selector).cloned()
        }

        fn initial_data(&self) -> Option<serde_json::Value> {
            self.initial_data.borrow().clone()
        }

        fn feed_entries(&self) -> Vec<FakeEntry> {
            self.entries.borrow().clone()
        }
    }

    impl Page for FakePage {
        fn url(&self) -> String {
            self.url.borrow().clone()
        }

        fn show_interstitial(&self, channel_id: &ChannelId, _rendering: InterstitialRendering) {
            self.interstitials.borrow_mut().push(channel_id.clone());
        }
    }
}
