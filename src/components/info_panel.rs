use yew::prelude::*;

use super::tooltip::office_count_label;
use crate::model::{Office, Place};

#[derive(Properties, PartialEq, Clone)]
pub struct InfoPanelProps {
    pub name: AttrValue,
    pub place: Place,
    pub on_close: Callback<()>,
    pub on_open_office: Callback<Office>,
}

/// Side panel for the selected place, offices grouped by tier.
#[function_component]
pub fn InfoPanel(props: &InfoPanelProps) -> Html {
    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let body = if props.place.has_offices() {
        let groups = props.place.offices_by_tier().into_iter().map(|(tier, offices)| {
            let heading = format!("{tier}ª Entrância ({})", office_count_label(offices.len()));
            let rows = offices.into_iter().map(|office| {
                let onclick = {
                    let on_open = props.on_open_office.clone();
                    let office = office.clone();
                    Callback::from(move |_: MouseEvent| on_open.emit(office.clone()))
                };
                let vacant = office.is_vacant();
                let holder = office
                    .holder
                    .clone()
                    .filter(|h| !h.trim().is_empty())
                    .unwrap_or_else(|| "Sem titular".to_string());
                html! {
                    <li class={classes!("office-item", vacant.then_some("vacant"))} {onclick}
                        style="padding:6px 8px; border:1px solid #e5e7eb; border-radius:6px; margin-bottom:6px; cursor:pointer;">
                        <div style="font-weight:600; font-size:14px;">{ office.title.clone() }</div>
                        <div style={format!("font-size:12px; color:{};", if vacant { "#dc2626" } else { "#6b7280" })}>
                            { holder }
                        </div>
                    </li>
                }
            });
            html! {
                <section key={tier.clone()} class="tier-group" style="margin-bottom:12px;">
                    <h4 style="margin:0 0 6px; font-size:13px; color:#374151;">{ heading }</h4>
                    <ul style="list-style:none; margin:0; padding:0;">{ for rows }</ul>
                </section>
            }
        });
        html! { <>{ for groups }</> }
    } else {
        html! { <p style="color:#6b7280; font-style:italic;">{ "Termo de outra Promotoria" }</p> }
    };

    html! {
        <aside id="info-panel" style="width:320px; max-width:40vw; overflow-y:auto; background:#fff; border-left:1px solid #e5e7eb; padding:12px; box-sizing:border-box;">
            <div style="display:flex; justify-content:space-between; align-items:center; margin-bottom:8px;">
                <h3 style="margin:0;">{ props.name.clone() }</h3>
                <button title="Fechar" onclick={close} style="border:none; background:none; cursor:pointer; font-size:18px;">{ "×" }</button>
            </div>
            <div style="font-size:13px; color:#6b7280; margin-bottom:10px;">
                { format!("Total: {}", office_count_label(props.place.offices.len())) }
            </div>
            { body }
        </aside>
    }
}
