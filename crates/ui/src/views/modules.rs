use dioxus::prelude::*;

use crate::context::AppContext;
use crate::vm::{NavRequest, map_module_list};

use super::module_card::ModuleCard;

#[component]
pub fn ModulesView(filter: String, on_navigate: Callback<NavRequest>) -> Element {
    let ctx = use_context::<AppContext>();
    let list = map_module_list(&ctx.modules_index(), &filter);

    rsx! {
        div { class: "page modules-page",
            h2 { "Modules" }
            input {
                id: "module-search",
                r#type: "search",
                placeholder: "Search by title, id, or tag",
                aria_label: "Search modules",
                value: "{list.filter}",
                oninput: move |evt| on_navigate.call(NavRequest::Modules { filter: evt.value() }),
            }
            div { class: "module-list", id: "module-list",
                if let Some(message) = list.empty_message {
                    p { "{message}" }
                }
                for card in list.cards {
                    ModuleCard { key: "{card.id}", card: card.clone(), on_navigate }
                }
            }
        }
    }
}
