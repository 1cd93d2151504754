use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{HtmlElement, KeyboardEvent};
use yew::prelude::*;

use super::{
    filter_select::FilterSelect, info_panel::InfoPanel, limits_panel::LimitsPanel,
    loading_overlay::LoadingOverlay, map_view::MapView, office_modal::OfficeModal,
    search_bar::SearchBar, tooltip::HoverInfo, tooltip::Tooltip,
};
use crate::config::AppConfig;
use crate::dom::ViewportHandle;
use crate::loader::load_dataset;
use crate::model::{Dataset, Office};
use crate::state::PointFilter;
use crate::state::filter::filter_stats;

#[derive(Properties, PartialEq, Clone)]
pub struct AppProps {
    pub config: AppConfig,
}

fn typing_in_field(e: &KeyboardEvent) -> bool {
    e.target()
        .and_then(|t| t.dyn_into::<HtmlElement>().ok())
        .map(|el| matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT"))
        .unwrap_or(false)
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let viewport = use_state(ViewportHandle::default);
    let dataset = use_state(|| None::<Rc<Dataset>>);
    let selected = use_state(|| None::<String>);
    let filter = use_state(PointFilter::default);
    let hover = use_state(|| None::<HoverInfo>);
    let modal = use_state(|| None::<Office>);
    let show_limits = use_state(|| props.config.debug_panel);

    // Load dataset once
    {
        let dataset = dataset.clone();
        let url = props.config.data_url.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                let ds = load_dataset(&url).await;
                dataset.set(Some(Rc::new(ds)));
            });
            || ()
        });
    }

    // Global shortcuts: Escape clears, L toggles the limits panel
    {
        let selected = selected.clone();
        let modal = modal.clone();
        let show_limits = show_limits.clone();
        use_effect_with(*show_limits, move |&limits_open| {
            let document = web_sys::window().and_then(|w| w.document());
            let listener = Closure::<dyn FnMut(KeyboardEvent)>::new(move |e: KeyboardEvent| {
                match e.key().as_str() {
                    "Escape" => {
                        modal.set(None);
                        selected.set(None);
                    }
                    "l" | "L" if !typing_in_field(&e) => {
                        log::debug!("limits panel {}", if limits_open { "closed" } else { "opened" });
                        show_limits.set(!limits_open);
                    }
                    _ => {}
                }
            });
            if let Some(doc) = &document
                && let Err(e) =
                    doc.add_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref())
            {
                log::warn!("could not listen for keydown: {e:?}");
            }
            move || {
                if let Some(doc) = document {
                    let _ = doc.remove_event_listener_with_callback(
                        "keydown",
                        listener.as_ref().unchecked_ref(),
                    );
                }
            }
        });
    }

    let on_select = {
        let selected = selected.clone();
        Callback::from(move |name: String| {
            log::info!("selected {name}");
            selected.set(Some(name));
        })
    };
    let on_clear = {
        let selected = selected.clone();
        Callback::from(move |_: ()| {
            if selected.is_some() {
                log::debug!("selection cleared");
                selected.set(None);
            }
        })
    };
    let on_pick = {
        let selected = selected.clone();
        let dataset = dataset.clone();
        let viewport = (*viewport).clone();
        let focus_scale = props.config.viewport.focus_scale;
        Callback::from(move |name: String| {
            let coords = dataset
                .as_deref()
                .and_then(|ds| ds.place(&name))
                .map(|p| p.coords);
            match coords {
                Some(c) => {
                    log::info!("focusing {name} at ({}, {})", c.x, c.y);
                    viewport.with(|e| e.zoom_to_percent(c.x, c.y, focus_scale));
                    selected.set(Some(name));
                }
                None => log::warn!("search picked unknown place {name}"),
            }
        })
    };
    let on_filter = {
        let filter = filter.clone();
        let selected = selected.clone();
        let dataset = dataset.clone();
        Callback::from(move |f: PointFilter| {
            log::info!("filter: {}", f.label());
            // selection hidden by the new filter is dropped
            let hidden = selected
                .as_deref()
                .zip(dataset.as_deref())
                .and_then(|(name, ds)| ds.place(name))
                .is_some_and(|p| !f.matches(p));
            if hidden {
                selected.set(None);
            }
            filter.set(f);
        })
    };
    let on_hover = {
        let hover = hover.clone();
        Callback::from(move |h: Option<HoverInfo>| hover.set(h))
    };
    let on_open_office = {
        let modal = modal.clone();
        Callback::from(move |o: Office| modal.set(Some(o)))
    };
    let close_modal = {
        let modal = modal.clone();
        Callback::from(move |_: ()| modal.set(None))
    };
    let close_limits = {
        let show_limits = show_limits.clone();
        Callback::from(move |_: ()| show_limits.set(false))
    };

    let stats = dataset.as_deref().map(|ds| filter_stats(ds, &filter));
    let info_panel = selected
        .as_deref()
        .zip(dataset.as_deref())
        .and_then(|(name, ds)| ds.place(name).map(|p| (name.to_string(), p.clone())))
        .map(|(name, place)| {
            html! {
                <InfoPanel name={name} {place} on_close={on_clear.clone()} on_open_office={on_open_office.clone()} />
            }
        });

    html! {
        <div id="app" style="display:flex; flex-direction:column; height:100vh; font-family:system-ui, sans-serif;">
            <header style="display:flex; flex-wrap:wrap; align-items:center; gap:12px; padding:8px 12px; border-bottom:1px solid #e5e7eb; background:#f9fafb;">
                <h1 style="margin:0; font-size:18px;">{ "Mapa das Promotorias" }</h1>
                <SearchBar dataset={(*dataset).clone()} {on_pick} />
                <FilterSelect value={(*filter).clone()} on_change={on_filter} {stats} />
            </header>
            <main style="position:relative; display:flex; flex:1; min-height:0;">
                <MapView
                    viewport={(*viewport).clone()}
                    config={props.config.viewport.clone()}
                    image_url={AttrValue::from(props.config.image_url.clone())}
                    dataset={(*dataset).clone()}
                    filter={(*filter).clone()}
                    selected={(*selected).clone()}
                    {on_select}
                    on_clear={on_clear.clone()}
                    {on_hover}
                />
                { for info_panel }
                <LoadingOverlay show={dataset.is_none()} />
                if *show_limits {
                    <LimitsPanel viewport={(*viewport).clone()} on_close={close_limits} />
                }
            </main>
            <Tooltip hover={(*hover).clone()} />
            if let Some(office) = (*modal).clone() {
                <OfficeModal {office} on_close={close_modal} />
            }
        </div>
    }
}
