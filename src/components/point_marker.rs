use yew::prelude::*;

use super::tooltip::HoverInfo;

const COLOR_WITH_OFFICES: &str = "#10b981";
const COLOR_WITHOUT_OFFICES: &str = "#f59e0b";
const COLOR_SELECTED: &str = "#dc2626";

#[derive(Properties, PartialEq, Clone)]
pub struct PointMarkerProps {
    pub name: AttrValue,
    /// Position in percent of the untransformed image.
    pub x: f64,
    pub y: f64,
    pub offices: usize,
    pub has_vacancy: bool,
    pub selected: bool,
    pub on_select: Callback<String>,
    pub on_hover: Callback<Option<HoverInfo>>,
}

#[function_component]
pub fn PointMarker(props: &PointMarkerProps) -> Html {
    let hovered = use_state(|| false);

    let (color, scale, z) = if props.selected {
        (COLOR_SELECTED, 2.0, 30)
    } else if *hovered {
        (marker_color(props.offices), 1.5, 20)
    } else {
        (marker_color(props.offices), 1.0, 10)
    };
    let style = format!(
        "position:absolute; left:{}%; top:{}%; width:8px; height:8px; background-color:{color}; border-radius:50%; border:2px solid white; box-shadow:0 2px 4px rgba(0,0,0,0.3); cursor:pointer; transform:translate(-50%, -50%) scale({scale}); transition:all 0.3s ease; z-index:{z}; pointer-events:auto;",
        props.x, props.y
    );
    let class = classes!(
        "point-marker",
        props.has_vacancy.then_some("has-vacancy"),
        props.selected.then_some("selected")
    );

    let onmouseenter = {
        let hovered = hovered.clone();
        let on_hover = props.on_hover.clone();
        let name = props.name.to_string();
        let offices = props.offices;
        Callback::from(move |e: MouseEvent| {
            hovered.set(true);
            on_hover.emit(Some(HoverInfo {
                name: name.clone(),
                offices,
                client_x: e.client_x() as f64,
                client_y: e.client_y() as f64,
            }));
        })
    };
    let onmouseleave = {
        let hovered = hovered.clone();
        let on_hover = props.on_hover.clone();
        Callback::from(move |_: MouseEvent| {
            hovered.set(false);
            on_hover.emit(None);
        })
    };
    let onclick = {
        let on_select = props.on_select.clone();
        let name = props.name.to_string();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_select.emit(name.clone());
        })
    };

    html! {
        <div {class} {style} data-name={props.name.clone()} {onmouseenter} {onmouseleave} {onclick}></div>
    }
}

fn marker_color(offices: usize) -> &'static str {
    if offices > 0 {
        COLOR_WITH_OFFICES
    } else {
        COLOR_WITHOUT_OFFICES
    }
}
