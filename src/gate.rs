/// Whitelist gate: decides whether a page is blocked and builds the interstitial
use crate::channel::{ChannelId, PageKind};
use crate::config::InterstitialRendering;
use crate::dom::Page;
use crate::whitelist::WhitelistState;
use log::info;

pub const CHANNEL_DISPLAY_ID: &str = "channelDisplay";
pub const GO_BACK_BUTTON_ID: &str = "goBackButton";
pub const ADD_BUTTON_ID: &str = "addButton";

pub const ADD_LABEL: &str = "Add to Whitelist";
pub const ADDING_LABEL: &str = "Adding...";
pub const ADDED_LABEL: &str = "Added! Reloading...";

/// Everything is permitted while disabled, and pages without a channel are never gated
pub fn is_whitelisted(channel_id: Option<&ChannelId>, state: &WhitelistState) -> bool {
    !state.enabled || channel_id.is_none_or(|id| state.contains(id))
}

/// Show the interstitial if this page must be blocked.
///
/// Returns true when processing of the current navigation should stop, which
/// includes the case where the interstitial is already up. The interstitial is
/// rendered at most once per navigation (`blocked_page_shown`).
pub fn maybe_block<P: Page + ?Sized>(
    channel_id: Option<&ChannelId>,
    state: &WhitelistState,
    page_kind: PageKind,
    blocked_page_shown: &mut bool,
    page: &P,
    rendering: InterstitialRendering,
) -> bool {
    let Some(channel_id) = channel_id else {
        return false;
    };

    if is_whitelisted(Some(channel_id), state) || !page_kind.is_sensitive() {
        return false;
    }

    if !*blocked_page_shown {
        info!("Blocking {:?} page of channel {}", page_kind, channel_id);
        *blocked_page_shown = true;
        page.show_interstitial(channel_id, rendering);
    }

    true
}

/// Escape the characters that matter inside element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '&' => escaped.push_str("&amp;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Text shown in the channel slot
pub fn channel_label(channel_id: &ChannelId) -> String {
    format!("Channel: {}", channel_id.as_str())
}

/// Full document shown in place of a blocked page.
///
/// With `TextContent` the channel slot is left empty and must be filled by
/// assigning `channel_label` as text once the document is in place.
pub fn interstitial_markup(channel_id: &ChannelId, rendering: InterstitialRendering) -> String {
    let channel_slot = match rendering {
        InterstitialRendering::EscapedMarkup => escape_html(&channel_label(channel_id)),
        InterstitialRendering::TextContent => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>Channel Not Whitelisted</title>
  <style>
    body {{ margin: 0; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); display: flex; justify-content: center; align-items: center; min-height: 100vh; color: #fff; }}
    .container {{ text-align: center; padding: 40px; background: rgba(255, 255, 255, 0.1); border-radius: 20px; max-width: 500px; }}
    .icon {{ font-size: 80px; margin-bottom: 20px; }}
    .channel-id {{ background: rgba(255, 255, 255, 0.2); padding: 10px 20px; border-radius: 10px; margin: 20px 0; font-family: monospace; word-break: break-all; }}
    .buttons {{ display: flex; gap: 15px; justify-content: center; flex-wrap: wrap; }}
    button {{ padding: 12px 30px; font-size: 16px; border-radius: 25px; cursor: pointer; font-weight: 600; min-width: 120px; }}
    .btn-primary {{ background: #fff; color: #667eea; border: none; }}
    .btn-secondary {{ background: rgba(255, 255, 255, 0.2); color: #fff; border: 2px solid #fff; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="icon">🚫</div>
    <h1>Channel Not Whitelisted</h1>
    <p>This YouTube channel is not on your whitelist.</p>
    <div class="channel-id" id="{display_id}">{channel_slot}</div>
    <div class="buttons">
      <button class="btn-primary" id="{back_id}">Go Back</button>
      <button class="btn-secondary" id="{add_id}">{add_label}</button>
    </div>
  </div>
</body>
</html>"#,
        display_id = CHANNEL_DISPLAY_ID,
        channel_slot = channel_slot,
        back_id = GO_BACK_BUTTON_ID,
        add_id = ADD_BUTTON_ID,
        add_label = ADD_LABEL,
    )
}
