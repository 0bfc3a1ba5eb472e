/// Popup UI for managing the channel whitelist

use yew::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use patternfly_yew::prelude::*;
use crate::channel::ChannelId;
use crate::storage::{load_settings, on_settings_changed, save_settings};
use crate::ui::components::{ChannelRow, EmptyState, EnableToggle};
use crate::whitelist::{AddOutcome, SettingsPatch, WhitelistState};

#[derive(Clone, PartialEq)]
enum PopupState {
    Loading,
    Idle,
    Saving,
    Error(String),
}

/// How long add feedback stays on screen
const FEEDBACK_DURATION_MS: i32 = 3_000;

#[derive(Debug, Clone, PartialEq)]
enum Feedback {
    Success(String),
    Info(String),
    Invalid(String),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| PopupState::Loading);
    let whitelist = use_state(WhitelistState::new);
    let input_value = use_state(String::new);
    let feedback = use_state(|| None::<Feedback>);

    // Load settings on mount, and again whenever another context changes them
    {
        let state = state.clone();
        let whitelist = whitelist.clone();
        use_effect_with((), move |_| {
            refresh(state.clone(), whitelist.clone());
            on_settings_changed(move |_| refresh(state.clone(), whitelist.clone()));
            || ()
        });
    }

    // Dismiss feedback after a while; a newer message cancels the older timer
    {
        let feedback = feedback.clone();
        use_effect_with((*feedback).clone(), move |current| {
            let timer = feedback_timeout(current).and_then(|delay_ms| {
                let window = web_sys::window()?;
                let dismiss = Closure::<dyn FnMut()>::new(move || feedback.set(None));
                let handle = window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(
                        dismiss.as_ref().unchecked_ref(),
                        delay_ms,
                    )
                    .ok()?;
                Some((window, handle, dismiss))
            });

            move || {
                if let Some((window, handle, _dismiss)) = timer {
                    window.clear_timeout_with_handle(handle);
                }
            }
        });
    }

    let on_input = {
        let input_value = input_value.clone();
        let feedback = feedback.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                input_value.set(input.value());
            }
            if feedback.is_some() {
                feedback.set(None);
            }
        })
    };

    // Add channel handler
    let on_add = {
        let state = state.clone();
        let whitelist = whitelist.clone();
        let input_value = input_value.clone();
        let feedback = feedback.clone();

        Callback::from(move |_: ()| {
            let channel_id = match ChannelId::parse_manual(&input_value) {
                Ok(channel_id) => channel_id,
                Err(e) => {
                    feedback.set(Some(Feedback::Invalid(e.to_string())));
                    return;
                }
            };

            let mut updated = (*whitelist).clone();
            if updated.add(channel_id) == AddOutcome::AlreadyPresent {
                feedback.set(Some(Feedback::Info(
                    "This channel is already in your whitelist".to_string(),
                )));
                return;
            }

            let state = state.clone();
            let whitelist = whitelist.clone();
            let input_value = input_value.clone();
            let feedback = feedback.clone();

            state.set(PopupState::Saving);
            spawn_local(async move {
                match save_settings(&SettingsPatch::whitelist(updated.channels.clone())).await {
                    Ok(()) => {
                        whitelist.set(updated);
                        input_value.set(String::new());
                        feedback.set(Some(Feedback::Success(
                            "Channel added successfully!".to_string(),
                        )));
                        state.set(PopupState::Idle);
                    }
                    Err(e) => {
                        state.set(PopupState::Error(format!("Failed to save: {}", e)));
                    }
                }
            });
        })
    };

    let on_keypress = {
        let on_add = on_add.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                on_add.emit(());
            }
        })
    };

    // Remove channel handler
    let on_remove = {
        let state = state.clone();
        let whitelist = whitelist.clone();

        Callback::from(move |channel_id: ChannelId| {
            let mut updated = (*whitelist).clone();
            if !updated.remove(&channel_id) {
                return;
            }

            let state = state.clone();
            let whitelist = whitelist.clone();

            state.set(PopupState::Saving);
            spawn_local(async move {
                match save_settings(&SettingsPatch::whitelist(updated.channels.clone())).await {
                    Ok(()) => {
                        whitelist.set(updated);
                        state.set(PopupState::Idle);
                    }
                    Err(e) => {
                        state.set(PopupState::Error(format!("Failed to save: {}", e)));
                    }
                }
            });
        })
    };

    // Enable/disable toggle
    let on_toggle = {
        let state = state.clone();
        let whitelist = whitelist.clone();

        Callback::from(move |enabled: bool| {
            let state = state.clone();
            let whitelist = whitelist.clone();

            spawn_local(async move {
                match save_settings(&SettingsPatch::enabled(enabled)).await {
                    Ok(()) => {
                        log::info!("Extension {}", if enabled { "enabled" } else { "disabled" });
                        let mut updated = (*whitelist).clone();
                        updated.enabled = enabled;
                        whitelist.set(updated);
                    }
                    Err(e) => {
                        state.set(PopupState::Error(format!("Failed to save: {}", e)));
                    }
                }
            });
        })
    };

    let is_busy = matches!(*state, PopupState::Loading | PopupState::Saving);

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Channel Whitelist"}</h1>

            <EnableToggle enabled={whitelist.enabled} on_toggle={on_toggle} disabled={is_busy} />

            // Status display
            {match &*state {
                PopupState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                    </div>
                },
                PopupState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                PopupState::Idle | PopupState::Saving => html! {}
            }}

            // Add feedback
            {match &*feedback {
                Some(Feedback::Success(msg)) => html! {
                    <Alert r#type={AlertType::Success} title={msg.clone()} inline={true}></Alert>
                },
                Some(Feedback::Info(msg)) => html! {
                    <Alert r#type={AlertType::Info} title={msg.clone()} inline={true}></Alert>
                },
                Some(Feedback::Invalid(msg)) => html! {
                    <Alert r#type={AlertType::Warning} title={msg.clone()} inline={true}></Alert>
                },
                None => html! {}
            }}

            <div class="add-row">
                <input
                    type="text"
                    class="channel-input"
                    placeholder="Channel ID (UC...) or @username"
                    value={(*input_value).clone()}
                    oninput={on_input}
                    onkeypress={on_keypress}
                />
                <Button onclick={on_add.reform(|_: MouseEvent| ())} disabled={is_busy} variant={ButtonVariant::Primary}>
                    {"Add"}
                </Button>
            </div>

            <h2 class="list-title">
                {format!("Whitelisted channels ({})", whitelist.channels.len())}
            </h2>

            if whitelist.channels.is_empty() {
                <EmptyState />
            } else {
                <div class="channel-list">
                    {for whitelist.channels.iter().map(|channel_id| html! {
                        <ChannelRow
                            key={channel_id.to_string()}
                            channel_id={channel_id.clone()}
                            on_remove={on_remove.clone()}
                            disabled={is_busy}
                        />
                    })}
                </div>
            }

            <p class="footer-popup">
                {"Channel Whitelist v0.1.0"}
            </p>
        </div>
    }
}

// Helper functions

fn refresh(state: UseStateHandle<PopupState>, whitelist: UseStateHandle<WhitelistState>) {
    spawn_local(async move {
        match load_settings().await {
            Ok(stored) => {
                whitelist.set(stored.into_state());
                state.set(PopupState::Idle);
            }
            Err(e) => {
                state.set(PopupState::Error(format!("Failed to load: {}", e)));
            }
        }
    });
}

/// Delay before the given feedback is dismissed, if there is any to dismiss
fn feedback_timeout(feedback: &Option<Feedback>) -> Option<i32> {
    feedback.as_ref().map(|_| FEEDBACK_DURATION_MS)
}
