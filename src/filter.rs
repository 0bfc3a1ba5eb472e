/// Hides feed and recommendation entries from channels that are not whitelisted

use crate::channel::channel_from_href;
use crate::dom::{FeedEntry, PageDom};
use crate::whitelist::WhitelistState;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Entries seen for the first time in this pass
    pub scanned: usize,
    pub hidden: usize,
}

/// Hide every new feed entry whose channel is known and not whitelisted.
///
/// Entries are marked processed whether or not they get hidden, so repeated
/// passes only look at new elements. Entries without a recognizable channel
/// link are left visible.
pub fn filter_feed<D: PageDom + ?Sized>(dom: &D, state: &WhitelistState) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    if !state.enabled {
        return outcome;
    }

    for entry in dom.feed_entries() {
        if entry.is_processed() {
            continue;
        }
        entry.mark_processed();
        outcome.scanned += 1;

        let channel_id = entry.channel_href().as_deref().and_then(channel_from_href);
        if let Some(channel_id) = channel_id {
            if !state.contains(&channel_id) {
                entry.hide();
                outcome.hidden += 1;
            }
        }
    }

    outcome
}
