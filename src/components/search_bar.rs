use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::tooltip::office_count_label;
use crate::model::Dataset;
use crate::state::filter::{exact_match, search_places};

const CLEAR_AFTER_PICK_MS: i32 = 3000;

#[derive(Properties, PartialEq, Clone)]
pub struct SearchBarProps {
    pub dataset: Option<Rc<Dataset>>,
    pub on_pick: Callback<String>,
}

type TimerSlot = Rc<RefCell<Option<i32>>>;

fn cancel_timer(slot: &TimerSlot) {
    if let Some(id) = slot.borrow_mut().take()
        && let Some(window) = web_sys::window()
    {
        window.clear_timeout_with_handle(id);
    }
}

fn schedule_clear(slot: &TimerSlot, query: UseStateHandle<String>) {
    cancel_timer(slot);
    let Some(window) = web_sys::window() else {
        return;
    };
    let cb = Closure::once_into_js(move || query.set(String::new()));
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        cb.unchecked_ref(),
        CLEAR_AFTER_PICK_MS,
    ) {
        Ok(id) => *slot.borrow_mut() = Some(id),
        Err(e) => log::warn!("could not schedule search clear: {e:?}"),
    }
}

#[function_component]
pub fn SearchBar(props: &SearchBarProps) -> Html {
    let query = use_state(String::new);
    let active = use_state(|| None::<usize>);
    let open = use_state(|| false);
    let timer: TimerSlot = use_mut_ref(|| None);

    {
        let timer = timer.clone();
        use_effect_with((), move |_| move || cancel_timer(&timer));
    }

    let results = props
        .dataset
        .as_deref()
        .map(|ds| search_places(ds, &query))
        .unwrap_or_default();

    let pick = {
        let query = query.clone();
        let active = active.clone();
        let open = open.clone();
        let timer = timer.clone();
        let on_pick = props.on_pick.clone();
        Rc::new(move |name: String| {
            query.set(name.clone());
            active.set(None);
            open.set(false);
            schedule_clear(&timer, query.clone());
            on_pick.emit(name);
        })
    };

    let oninput = {
        let query = query.clone();
        let active = active.clone();
        let open = open.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            query.set(input.value());
            active.set(None);
            open.set(true);
        })
    };

    let onkeydown = {
        let query = query.clone();
        let active = active.clone();
        let open = open.clone();
        let results = results.clone();
        let pick = pick.clone();
        Callback::from(move |e: KeyboardEvent| match e.key().as_str() {
            "ArrowDown" if !results.is_empty() => {
                e.prevent_default();
                let next = active.map_or(0, |i| (i + 1).min(results.len() - 1));
                active.set(Some(next));
                open.set(true);
            }
            "ArrowUp" if !results.is_empty() => {
                e.prevent_default();
                active.set(Some(active.map_or(0, |i| i.saturating_sub(1))));
            }
            "Enter" => {
                e.prevent_default();
                let chosen = active
                    .and_then(|i| results.get(i))
                    .or_else(|| exact_match(&results, &query))
                    .or_else(|| (results.len() == 1).then(|| &results[0]));
                if let Some(name) = chosen {
                    pick(name.clone());
                }
            }
            "Escape" => {
                open.set(false);
                active.set(None);
                let input: HtmlInputElement = e.target_unchecked_into();
                let _ = input.blur();
            }
            _ => {}
        })
    };

    let onfocus = {
        let open = open.clone();
        Callback::from(move |_: FocusEvent| open.set(true))
    };
    let onblur = {
        let open = open.clone();
        Callback::from(move |_: FocusEvent| open.set(false))
    };
    let clear = {
        let query = query.clone();
        let active = active.clone();
        let timer = timer.clone();
        Callback::from(move |_: MouseEvent| {
            cancel_timer(&timer);
            query.set(String::new());
            active.set(None);
        })
    };

    let dropdown = if *open && !query.is_empty() {
        let items = results.iter().enumerate().map(|(i, name)| {
            let offices = props
                .dataset
                .as_deref()
                .and_then(|ds| ds.place(name))
                .map_or(0, |p| p.offices.len());
            // mousedown fires before the input's blur closes the list
            let onmousedown = {
                let pick = pick.clone();
                let name = name.clone();
                Callback::from(move |e: MouseEvent| {
                    e.prevent_default();
                    pick(name.clone());
                })
            };
            let bg = if *active == Some(i) { "#eff6ff" } else { "#fff" };
            html! {
                <li key={name.clone()} class="search-result" {onmousedown}
                    style={format!("padding:6px 10px; cursor:pointer; background:{bg}; border-bottom:1px solid #f3f4f6;")}>
                    <div style="font-weight:600;">{ name.clone() }</div>
                    <div style="font-size:12px; color:#6b7280; display:flex; justify-content:space-between;">
                        <span>{ office_count_label(offices) }</span>
                        <span>{ "Ver no mapa →" }</span>
                    </div>
                </li>
            }
        });
        html! {
            <ul class="search-results" style="position:absolute; top:100%; left:0; right:0; margin:4px 0 0; padding:0; list-style:none; background:#fff; border:1px solid #e5e7eb; border-radius:6px; max-height:280px; overflow-y:auto; box-shadow:0 4px 12px rgba(0,0,0,0.12); z-index:50;">
                if results.is_empty() {
                    <li style="padding:6px 10px; color:#9ca3af;">{ "Nenhum município encontrado" }</li>
                } else {
                    { for items }
                }
            </ul>
        }
    } else {
        html! {}
    };

    html! {
        <div class="search-bar" style="position:relative; flex:1; min-width:200px;">
            <input id="search-input" type="text" placeholder="Buscar município..." autocomplete="off"
                value={(*query).clone()} {oninput} {onkeydown} {onfocus} {onblur}
                style="width:100%; padding:6px 28px 6px 10px; border:1px solid #d1d5db; border-radius:6px; box-sizing:border-box;" />
            if !query.is_empty() {
                <button class="search-clear" title="Limpar" onclick={clear}
                    style="position:absolute; right:4px; top:50%; transform:translateY(-50%); border:none; background:none; cursor:pointer; color:#6b7280;">{ "×" }</button>
            }
            { dropdown }
        </div>
    }
}
