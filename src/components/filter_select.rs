use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::state::PointFilter;
use crate::state::filter::FilterStats;

const OPTIONS: [&str; 7] = ["", "1", "2", "3", "vaga-1", "vaga-2", "vaga-3"];

#[derive(Properties, PartialEq, Clone)]
pub struct FilterSelectProps {
    pub value: PointFilter,
    pub on_change: Callback<PointFilter>,
    #[prop_or_default]
    pub stats: Option<FilterStats>,
}

#[function_component]
pub fn FilterSelect(props: &FilterSelectProps) -> Html {
    let onchange = {
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            on_change.emit(PointFilter::parse(&select.value()));
        })
    };

    let current = props.value.as_value();
    let options = OPTIONS.iter().map(|&v| {
        let label = PointFilter::parse(v).label();
        html! { <option value={v} selected={current == v}>{ label }</option> }
    });

    let active = props.value != PointFilter::All;
    let border = if active { "#2563eb" } else { "#d1d5db" };
    let summary = props.stats.as_ref().map(|s| {
        format!("{} municípios · {} promotorias", s.places, s.offices)
    });

    html! {
        <div class={classes!("filter-select", active.then_some("active"))} style="display:flex; align-items:center; gap:8px;">
            <select id="filter-select" {onchange}
                style={format!("padding:6px 8px; border:1px solid {border}; border-radius:6px; background:#fff;")}>
                { for options }
            </select>
            if let Some(text) = summary {
                <span class="filter-stats" style="font-size:12px; color:#6b7280;">{ text }</span>
            }
        </div>
    }
}
