use yew::prelude::*;

use crate::dom::ViewportHandle;

const PRESET_FACTORS: [f64; 4] = [2.0, 3.0, 5.0, 10.0];

#[derive(Properties, PartialEq, Clone)]
pub struct LimitsPanelProps {
    pub viewport: ViewportHandle,
    pub on_close: Callback<()>,
}

/// Diagnostic view of the pan limits with expansion factor presets.
#[function_component]
pub fn LimitsPanel(props: &LimitsPanelProps) -> Html {
    // bumped to re-read the engine after a change
    let revision = use_state(|| 0u32);

    let info = props
        .viewport
        .with(|e| e.limits_info())
        .and_then(|info| serde_json::to_string_pretty(&info).ok())
        .unwrap_or_else(|| "viewport not initialised".to_string());

    let refresh = {
        let revision = revision.clone();
        Callback::from(move |_| revision.set(*revision + 1))
    };
    let presets = PRESET_FACTORS.iter().map(|&factor| {
        let vp = props.viewport.clone();
        let revision = revision.clone();
        let onclick = Callback::from(move |_| {
            vp.with(|e| e.set_limit_expansion_factor(factor));
            revision.set(*revision + 1);
        });
        html! { <button {onclick}>{ format!("{factor}x") }</button> }
    });
    let close = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {
        <div class="limits-panel" style="position:absolute; left:12px; bottom:12px; background:rgba(17,24,39,0.92); color:#e5e7eb; border-radius:8px; padding:10px 12px; font-size:12px; z-index:25; max-width:320px;">
            <div style="display:flex; justify-content:space-between; align-items:center; margin-bottom:6px;">
                <strong>{"Pan limits"}</strong>
                <button onclick={close} style="padding:2px 6px;">{"×"}</button>
            </div>
            <pre style="margin:0 0 8px 0; max-height:220px; overflow:auto;">{ info }</pre>
            <div style="display:flex; gap:6px; flex-wrap:wrap;">
                { for presets }
                <button onclick={refresh}>{"Refresh"}</button>
            </div>
        </div>
    }
}
