use yew::prelude::*;

use crate::dom::ViewportHandle;

#[derive(Properties, PartialEq, Clone)]
pub struct ZoomControlsProps {
    pub viewport: ViewportHandle,
    /// Enable state of these two is driven by the engine after every change.
    pub zoom_in_ref: NodeRef,
    pub zoom_out_ref: NodeRef,
}

#[function_component(ZoomControls)]
pub fn zoom_controls(props: &ZoomControlsProps) -> Html {
    let zi = {
        let vp = props.viewport.clone();
        Callback::from(move |_| {
            vp.with(|e| e.zoom_in());
        })
    };
    let zo = {
        let vp = props.viewport.clone();
        Callback::from(move |_| {
            vp.with(|e| e.zoom_out());
        })
    };
    let reset = {
        let vp = props.viewport.clone();
        Callback::from(move |_| {
            vp.with(|e| e.reset_zoom());
        })
    };
    html! {<div class="zoom-controls" style="position:absolute; right:12px; bottom:12px; background:rgba(255,255,255,0.92); border:1px solid #e5e7eb; border-radius:8px; padding:6px; display:flex; flex-direction:column; gap:6px; z-index:20;">
        <button id="zoom-in" ref={props.zoom_in_ref.clone()} title="Aproximar" onclick={zi}> {"+"} </button>
        <button id="zoom-out" ref={props.zoom_out_ref.clone()} title="Afastar" onclick={zo}> {"−"} </button>
        <button id="reset-zoom" title="Restaurar" onclick={reset}> {"⟲"} </button>
    </div>}
}
