use std::rc::Rc;

use web_sys::{Element, HtmlButtonElement, HtmlElement};
use yew::prelude::*;

use super::{point_marker::PointMarker, tooltip::HoverInfo, zoom_controls::ZoomControls};
use crate::config::ViewportConfig;
use crate::dom::{AnimationFrameScheduler, DomSurface, InputBindings, ViewportHandle};
use crate::model::Dataset;
use crate::state::{PointFilter, ViewportEngine};

const MAP_WRAPPER_ID: &str = "map-wrapper";
const MAP_IMAGE_ID: &str = "map-image";

#[derive(Properties, PartialEq, Clone)]
pub struct MapViewProps {
    pub viewport: ViewportHandle,
    pub config: ViewportConfig,
    pub image_url: AttrValue,
    pub dataset: Option<Rc<Dataset>>,
    pub filter: PointFilter,
    pub selected: Option<String>,
    pub on_select: Callback<String>,
    pub on_clear: Callback<()>,
    pub on_hover: Callback<Option<HoverInfo>>,
}

/// The map image and its point overlay, both driven by one viewport engine.
#[function_component(MapView)]
pub fn map_view(props: &MapViewProps) -> Html {
    let wrapper_ref = use_node_ref();
    let image_ref = use_node_ref();
    let overlay_ref = use_node_ref();
    let zoom_in_ref = use_node_ref();
    let zoom_out_ref = use_node_ref();

    // Engine + listeners live exactly as long as this view is mounted
    {
        let wrapper_ref = wrapper_ref.clone();
        let image_ref = image_ref.clone();
        let overlay_ref = overlay_ref.clone();
        let zoom_in_ref = zoom_in_ref.clone();
        let zoom_out_ref = zoom_out_ref.clone();
        let viewport = props.viewport.clone();
        let config = props.config.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window();
            let document = window.as_ref().and_then(|w| w.document());
            let wrapper = wrapper_ref.cast::<HtmlElement>();
            let layers: Vec<HtmlElement> = [image_ref, overlay_ref]
                .iter()
                .filter_map(|r| r.cast::<HtmlElement>())
                .collect();
            let surface = DomSurface::new(
                wrapper.clone(),
                layers,
                zoom_in_ref.cast::<HtmlButtonElement>(),
                zoom_out_ref.cast::<HtmlButtonElement>(),
            );

            let mut bindings = None;
            match window {
                Some(window) => {
                    let scheduler = AnimationFrameScheduler::new(window, &viewport);
                    viewport.install(ViewportEngine::new(
                        config,
                        Box::new(surface),
                        Box::new(scheduler),
                    ));
                    match (&wrapper, &document) {
                        (Some(w), Some(d)) => {
                            bindings = Some(InputBindings::attach(w, d, &viewport));
                        }
                        _ => log::warn!("map wrapper or document missing; pan/zoom input disabled"),
                    }
                }
                None => log::warn!("no window; viewport engine not started"),
            }

            move || {
                drop(bindings);
                if let Some(mut engine) = viewport.take() {
                    engine.destroy();
                }
            }
        });
    }

    let onclick = {
        let on_clear = props.on_clear.clone();
        Callback::from(move |e: MouseEvent| {
            let hit_background = e
                .target_dyn_into::<Element>()
                .map(|t| t.id() == MAP_WRAPPER_ID || t.id() == MAP_IMAGE_ID)
                .unwrap_or(false);
            if hit_background {
                on_clear.emit(());
            }
        })
    };

    let markers = props.dataset.iter().flat_map(|ds| {
        ds.places
            .iter()
            .filter(|(_, place)| props.filter.matches(place))
            .map(|(name, place)| {
                let selected = props.selected.as_deref() == Some(name.as_str());
                html! {
                    <PointMarker
                        key={name.clone()}
                        name={AttrValue::from(name.clone())}
                        x={place.coords.x}
                        y={place.coords.y}
                        offices={place.offices.len()}
                        has_vacancy={place.has_vacancy()}
                        {selected}
                        on_select={props.on_select.clone()}
                        on_hover={props.on_hover.clone()}
                    />
                }
            })
            .collect::<Vec<_>>()
    });

    let layer_style = "position:absolute; inset:0; width:100%; height:100%;";
    let filtering_vacancies = matches!(props.filter, PointFilter::VacantTier(_));

    html! {
        <div class={classes!("map-container", filtering_vacancies.then_some("filtering-vacancies"))} style="position:relative; flex:1; min-height:0; overflow:hidden;">
            <div id={MAP_WRAPPER_ID} ref={wrapper_ref} {onclick} style="position:relative; width:100%; height:100%; overflow:hidden; touch-action:none; user-select:none;">
                <img id={MAP_IMAGE_ID} ref={image_ref} src={props.image_url.clone()} alt="Mapa" draggable="false"
                    style={format!("{layer_style} object-fit:fill; display:block;")} />
                <div id="points-layer" ref={overlay_ref} style={format!("{layer_style} pointer-events:none;")}>
                    { for markers }
                </div>
            </div>
            <ZoomControls viewport={props.viewport.clone()} zoom_in_ref={zoom_in_ref} zoom_out_ref={zoom_out_ref} />
        </div>
    }
}
