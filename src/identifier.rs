/// Works out which channel the current page belongs to
use crate::channel::{ChannelId, channel_from_href, channel_from_path, handle_from_path, url_path};
use crate::dom::{PageDom, selectors};
use crate::page_data::owner_browse_id;
use log::debug;

/// Channel of the page at `current_url`, or None when the page has no channel context.
///
/// Order:
/// 1. `/channel/<id>` in the path → `<id>`
/// 2. `/@<name>` in the path → `@<name>`
/// 3. `/watch` pages → owner link in the DOM, then `ytInitialData`
/// 4. anything else (home, search, ...) → None
pub fn extract_channel_id<D: PageDom + ?Sized>(current_url: &str, dom: &D) -> Option<ChannelId> {
    let path = url_path(current_url);

    if path.contains("/channel/") {
        return channel_from_path(&path);
    }

    if path.contains("/@") {
        if let Some(handle) = handle_from_path(&path) {
            return Some(handle);
        }
    }

    if path.contains("/watch") {
        return extract_from_watch_page(dom);
    }

    None
}

fn extract_from_watch_page<D: PageDom + ?Sized>(dom: &D) -> Option<ChannelId> {
    let from_links = [selectors::OWNER_CHANNEL_LINK, selectors::OWNER_HANDLE_LINK]
        .into_iter()
        .find_map(|selector| dom.anchor_href(selector).as_deref().and_then(channel_from_href));

    if from_links.is_some() {
        return from_links;
    }

    let from_data = dom
        .initial_data()
        .and_then(|data| owner_browse_id(&data))
        .map(ChannelId::new);

    if from_data.is_none() {
        debug!("Could not identify the channel of this video");
    }

    from_data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::testing::FakePage;
    use crate::page_data::fixtures::watch_data;

    fn extract(page: &FakePage) -> Option<ChannelId> {
        extract_channel_id(&page.url.borrow(), page)
    }

    #[test]
    fn test_channel_url_returns_segment() {
        for id in ["UCabc1234567", "UC-_xyz", "abc"] {
            let page = FakePage::at(&format!("https://www.youtube.com/channel/{}/videos", id));
            assert_eq!(extract(&page), Some(ChannelId::new(id)));
        }
    }

    #[test]
    fn test_handle_url_returns_prefixed_name() {
        for name in ["creator", "Some_Creator-2"] {
            let page = FakePage::at(&format!("https://www.youtube.com/@{}", name));
            assert_eq!(extract(&page), Some(ChannelId::new(format!("@{}", name))));
        }
    }

    #[test]
    fn test_channel_takes_priority_over_dom() {
        let page = FakePage::at("https://www.youtube.com/channel/UCabc1234567")
            .with_anchor(selectors::OWNER_HANDLE_LINK, "https://www.youtube.com/@other");
        assert_eq!(extract(&page), Some(ChannelId::new("UCabc1234567")));
    }

    #[test]
    fn test_watch_page_uses_channel_link_first() {
        let page = FakePage::at("https://www.youtube.com/watch?v=abc")
            .with_anchor(selectors::OWNER_CHANNEL_LINK, "https://www.youtube.com/channel/UCowner12345")
            .with_anchor(selectors::OWNER_HANDLE_LINK, "https://www.youtube.com/@owner")
            .with_initial_data(watch_data("UCfromdata123"));
        assert_eq!(extract(&page), Some(ChannelId::new("UCowner12345")));
    }

    #[test]
    fn test_watch_page_falls_back_to_handle_link() {
        let page = FakePage::at("https://www.youtube.com/watch?v=abc")
            .with_anchor(selectors::OWNER_HANDLE_LINK, "https://www.youtube.com/@owner")
            .with_initial_data(watch_data("UCfromdata123"));
        assert_eq!(extract(&page), Some(ChannelId::new("@owner")));
    }

    #[test]
    fn test_watch_page_falls_back_to_initial_data() {
        let page = FakePage::at("https://www.youtube.com/watch?v=abc")
            .with_initial_data(watch_data("UCfromdata123"));
        assert_eq!(extract(&page), Some(ChannelId::new("UCfromdata123")));
    }

    #[test]
    fn test_watch_page_without_owner_is_none() {
        let page = FakePage::at("https://www.youtube.com/watch?v=abc")
            .with_initial_data(serde_json::json!({ "contents": [] }));
        assert_eq!(extract(&page), None);
    }

    #[test]
    fn test_pages_without_channel_context() {
        for url in [
            "https://www.youtube.com/",
            "https://www.youtube.com/results?search_query=rust",
            "https://www.youtube.com/feed/subscriptions",
            "https://www.youtube.com/channel/",
        ] {
            let page = FakePage::at(url)
                .with_anchor(selectors::OWNER_CHANNEL_LINK, "https://www.youtube.com/channel/UCowner12345");
            assert_eq!(extract(&page), None, "{}", url);
        }
    }
}
