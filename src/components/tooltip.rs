use yew::prelude::*;

/// Pointer position (client pixels) and summary of the hovered place.
#[derive(Clone, Debug, PartialEq)]
pub struct HoverInfo {
    pub name: String,
    pub offices: usize,
    pub client_x: f64,
    pub client_y: f64,
}

pub fn office_count_label(n: usize) -> String {
    match n {
        0 => "Termo de outra Promotoria".to_string(),
        1 => "1 promotoria".to_string(),
        n => format!("{n} promotorias"),
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct TooltipProps {
    pub hover: Option<HoverInfo>,
}

#[function_component]
pub fn Tooltip(props: &TooltipProps) -> Html {
    let Some(h) = &props.hover else {
        return html! {};
    };
    let style = format!(
        "position:fixed; left:{}px; top:{}px; background:#fff; color:#111827; border:1px solid #e5e7eb; border-radius:6px; padding:6px 10px; box-shadow:0 4px 12px rgba(0,0,0,0.15); pointer-events:none; z-index:40;",
        h.client_x + 10.0,
        h.client_y - 10.0
    );
    html! {
        <div class="tooltip" {style}>
            <div style="font-weight:600; margin-bottom:0.25rem;">{ h.name.clone() }</div>
            <div style="font-size:0.875rem; color:#6b7280;">{ office_count_label(h.offices) }</div>
        </div>
    }
}
