use dioxus::prelude::*;

use crate::context::AppContext;
use crate::vm::{NavRequest, map_home_suggestions};

use super::module_card::ModuleCard;

#[component]
pub fn HomeView(on_navigate: Callback<NavRequest>) -> Element {
    let ctx = use_context::<AppContext>();
    let cards = map_home_suggestions(&ctx.modules_index());

    rsx! {
        div { class: "page home-page",
            h2 { "Learn anywhere, even offline" }
            p { "Pick a module to start, or browse the full catalog." }
            div { class: "suggestions", id: "home-suggestions",
                for card in cards {
                    ModuleCard { key: "{card.id}", card: card.clone(), on_navigate }
                }
            }
            button {
                class: "btn",
                r#type: "button",
                onclick: move |_| on_navigate.call(NavRequest::Modules { filter: String::new() }),
                "Browse all modules"
            }
        }
    }
}
