/// Page watcher: the content script's state machine.
///
/// Browser callbacks (mutation observer, timers, storage listener, message
/// replies) never touch the page directly. They enqueue a `PageEvent`, the
/// watcher drains the queue in order, and anything that needs the event loop
/// again (a debounced re-check, a reload) comes back out as a `Command`.
use std::collections::VecDeque;

use log::{debug, info};

use crate::channel::{ChannelId, PageKind};
use crate::config::WatcherConfig;
use crate::dom::Page;
use crate::filter::filter_feed;
use crate::gate::maybe_block;
use crate::identifier::extract_channel_id;
use crate::whitelist::{SettingsPatch, WhitelistState};

/// Per-navigation state, reset whenever the URL changes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContext {
    pub current_channel_id: Option<ChannelId>,
    pub blocked_page_shown: bool,
    pub last_url: String,
    /// Bumped on every reset; timers scheduled for an older generation are stale
    pub generation: u64,
}

impl PageContext {
    pub fn reset(&mut self, url: String) {
        self.current_channel_id = None;
        self.blocked_page_shown = false;
        self.last_url = url;
        self.generation += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Idle,
    Checking,
    /// Interstitial is up; only the next navigation leaves this state
    Blocked,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    DocumentReady,
    DomMutated,
    DebounceElapsed { generation: u64 },
    FeedRescan,
    WhitelistLoaded(WhitelistState),
    StorageChanged(SettingsPatch),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Deliver `DebounceElapsed { generation }` after `delay_ms`
    ScheduleCheck { generation: u64, delay_ms: u32 },
    Reload,
}

pub struct PageWatcher<P: Page> {
    page: P,
    config: WatcherConfig,
    /// None until the background worker has answered `getWhitelist`
    whitelist: Option<WhitelistState>,
    context: PageContext,
    state: WatcherState,
    queue: VecDeque<PageEvent>,
}

impl<P: Page> PageWatcher<P> {
    pub fn new(page: P, config: WatcherConfig) -> Self {
        let mut context = PageContext::default();
        context.reset(page.url());

        PageWatcher {
            page,
            config,
            whitelist: None,
            context,
            state: WatcherState::Idle,
            queue: VecDeque::new(),
        }
    }

    pub fn enqueue(&mut self, event: PageEvent) {
        self.queue.push_back(event);
    }

    /// Drain the queue, returning the commands for the caller to carry out
    pub fn run(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        while let Some(event) = self.queue.pop_front() {
            self.handle(event, &mut commands);
        }
        commands
    }

    pub fn dispatch(&mut self, event: PageEvent) -> Vec<Command> {
        self.enqueue(event);
        self.run()
    }

    fn handle(&mut self, event: PageEvent, commands: &mut Vec<Command>) {
        match event {
            PageEvent::DocumentReady => self.check(),

            PageEvent::DomMutated => {
                let url = self.page.url();
                if url != self.context.last_url {
                    info!("Navigated to {}", url);
                    self.context.reset(url);
                    self.state = WatcherState::Idle;
                    commands.push(Command::ScheduleCheck {
                        generation: self.context.generation,
                        delay_ms: self.config.debounce_ms,
                    });
                } else {
                    self.filter();
                }
            }

            PageEvent::DebounceElapsed { generation } => {
                if generation == self.context.generation {
                    self.check();
                } else {
                    debug!(
                        "Dropping stale re-check (generation {} < {})",
                        generation, self.context.generation
                    );
                }
            }

            PageEvent::FeedRescan => self.filter(),

            PageEvent::WhitelistLoaded(whitelist) => {
                debug!(
                    "Whitelist loaded: {} channels, enabled={}",
                    whitelist.channels.len(),
                    whitelist.enabled
                );
                self.whitelist = Some(whitelist);
                self.check();
            }

            PageEvent::StorageChanged(patch) => self.apply_storage_change(patch, commands),
        }
    }

    fn apply_storage_change(&mut self, patch: SettingsPatch, commands: &mut Vec<Command>) {
        let Some(whitelist) = self.whitelist.as_mut() else {
            debug!("Ignoring storage change before the whitelist is loaded");
            return;
        };

        if let Some(enabled) = patch.enabled {
            info!("Extension {}, reloading", if enabled { "enabled" } else { "disabled" });
            whitelist.enabled = enabled;
            if let Some(channels) = patch.whitelist {
                whitelist.channels = channels;
            }
            commands.push(Command::Reload);
            return;
        }

        if let Some(channels) = patch.whitelist {
            whitelist.channels = channels;

            if PageKind::from_url(&self.page.url()).is_sensitive() {
                info!("Whitelist changed on a channel page, reloading");
                commands.push(Command::Reload);
            } else {
                self.context.current_channel_id = None;
                self.check();
            }
        }
    }

    /// Identify the channel, gate the page, then filter the feed
    fn check(&mut self) {
        if self.state == WatcherState::Blocked {
            return;
        }

        let Some(whitelist) = self.whitelist.as_ref() else {
            debug!("Deferring check until the whitelist is loaded");
            return;
        };

        self.state = WatcherState::Checking;
        let url = self.page.url();

        if let Some(channel_id) = extract_channel_id(&url, &self.page) {
            if self.context.current_channel_id.as_ref() != Some(&channel_id) {
                debug!("Page channel is {}", channel_id);
                let blocked = maybe_block(
                    Some(&channel_id),
                    whitelist,
                    PageKind::from_url(&url),
                    &mut self.context.blocked_page_shown,
                    &self.page,
                    self.config.rendering,
                );
                self.context.current_channel_id = Some(channel_id);

                if blocked {
                    self.state = WatcherState::Blocked;
                    return;
                }
            }
        }

        self.filter();
        self.state = WatcherState::Idle;
    }

    fn filter(&mut self) {
        if self.state == WatcherState::Blocked {
            return;
        }

        if let Some(whitelist) = self.whitelist.as_ref() {
            let outcome = filter_feed(&self.page, whitelist);
            if outcome.hidden > 0 {
                debug!("Hid {} of {} new feed entries", outcome.hidden, outcome.scanned);
            }
        }
    }
}
