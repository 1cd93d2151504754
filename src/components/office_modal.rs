use yew::prelude::*;

use crate::model::{DetailKind, Office};

#[derive(Properties, PartialEq, Clone)]
pub struct OfficeModalProps {
    pub office: Office,
    pub on_close: Callback<()>,
}

fn maps_link(address: &str) -> String {
    let q: String = js_sys::encode_uri_component(address).into();
    format!("https://www.google.com/maps/search/?api=1&query={q}")
}

#[function_component]
pub fn OfficeModal(props: &OfficeModalProps) -> Html {
    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    let keep_open = Callback::from(|e: MouseEvent| e.stop_propagation());

    let rows = props.office.detail_rows().into_iter().map(|row| {
        let value = match row.kind {
            DetailKind::Address => html! {
                <>
                    { row.value.clone() }
                    {" "}
                    <a href={maps_link(&row.value)} target="_blank" rel="noopener noreferrer">{ "Ver no Google Maps" }</a>
                </>
            },
            DetailKind::Text => html! { <>{ row.value.clone() }</> },
        };
        html! {
            <div class="detail-row" style="margin-bottom:8px;">
                <div style="font-size:12px; color:#6b7280;">{ row.label.clone() }</div>
                <div style="font-size:14px; white-space:pre-wrap;">{ value }</div>
            </div>
        }
    });

    html! {
        <div class="modal-backdrop" onclick={close.clone()}
            style="position:fixed; inset:0; background:rgba(0,0,0,0.45); display:flex; align-items:center; justify-content:center; z-index:60;">
            <div class="modal" onclick={keep_open}
                style="background:#fff; border-radius:8px; padding:16px; width:min(520px, 92vw); max-height:80vh; overflow-y:auto; box-shadow:0 10px 30px rgba(0,0,0,0.25);">
                <div style="display:flex; justify-content:space-between; align-items:center; margin-bottom:12px;">
                    <h3 style="margin:0;">{ props.office.title.clone() }</h3>
                    <button title="Fechar" onclick={close} style="border:none; background:none; cursor:pointer; font-size:18px;">{ "×" }</button>
                </div>
                { for rows }
            </div>
        </div>
    }
}
