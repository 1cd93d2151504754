use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct LoadingOverlayProps {
    pub show: bool,
    #[prop_or(AttrValue::Static("Carregando mapa..."))]
    pub message: AttrValue,
}

#[function_component(LoadingOverlay)]
pub fn loading_overlay(props: &LoadingOverlayProps) -> Html {
    if !props.show {
        return html! {};
    }
    html! {
        <div id="loading" style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(255,255,255,0.85); z-index:30; font-size:15px; color:#374151;">
            { props.message.clone() }
        </div>
    }
}
