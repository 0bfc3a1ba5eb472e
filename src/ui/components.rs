/// Reusable popup components

use crate::channel::ChannelId;
use patternfly_yew::prelude::*;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ChannelRowProps {
    pub channel_id: ChannelId,
    pub on_remove: Callback<ChannelId>,
    #[prop_or(false)]
    pub disabled: bool,
}

#[function_component(ChannelRow)]
pub fn channel_row(props: &ChannelRowProps) -> Html {
    let on_click = props.on_remove.reform({
        let channel_id = props.channel_id.clone();
        move |_: MouseEvent| channel_id.clone()
    });

    html! {
        <div class="channel-item">
            <span class="channel-id">{props.channel_id.to_string()}</span>
            <Button
                onclick={on_click}
                variant={ButtonVariant::Danger}
                size={ButtonSize::Small}
                disabled={props.disabled}
            >
                {"Remove"}
            </Button>
        </div>
    }
}

#[function_component(EmptyState)]
pub fn empty_state() -> Html {
    html! {
        <div class="empty-state">
            <div class="empty-state-icon">{"📝"}</div>
            <p class="empty-state-text">
                {"No channels whitelisted yet."}
                <br />
                {"Add a channel to get started!"}
            </p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct EnableToggleProps {
    pub enabled: bool,
    pub on_toggle: Callback<bool>,
    #[prop_or(false)]
    pub disabled: bool,
}

#[function_component(EnableToggle)]
pub fn enable_toggle(props: &EnableToggleProps) -> Html {
    let on_change = props.on_toggle.reform(|e: Event| {
        e.target_dyn_into::<web_sys::HtmlInputElement>()
            .map(|input| input.checked())
            .unwrap_or(true)
    });

    html! {
        <label class="enable-toggle">
            <input
                type="checkbox"
                checked={props.enabled}
                onchange={on_change}
                disabled={props.disabled}
            />
            {if props.enabled { "Blocking enabled" } else { "Blocking disabled" }}
        </label>
    }
}
