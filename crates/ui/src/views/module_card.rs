use dioxus::prelude::*;

use crate::vm::{ModuleCardVm, NavRequest};

#[component]
pub(crate) fn ModuleCard(card: ModuleCardVm, on_navigate: Callback<NavRequest>) -> Element {
    let module_id = card.id.clone();
    rsx! {
        div { class: "card",
            h3 { "{card.title}" }
            p { "{card.description}" }
            p { class: "note", "{card.lessons_label}" }
            div { class: "card-actions",
                button {
                    class: "btn small",
                    r#type: "button",
                    "data-module": "{card.id}",
                    onclick: move |_| on_navigate.call(NavRequest::OpenModule(module_id.clone())),
                    "Open"
                }
            }
        }
    }
}
