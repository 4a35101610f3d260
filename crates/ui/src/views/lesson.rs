use std::collections::HashMap;

use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{LessonContext, NavRequest, map_lesson, resolve_graphic};

use super::quiz::QuizPanel;

/// One lesson page. Mount it keyed by module and lesson so per-lesson state resets.
#[component]
pub fn LessonView(lesson: LessonContext, on_navigate: Callback<NavRequest>) -> Element {
    let ctx = use_context::<AppContext>();
    let vm = map_lesson(&lesson.module, &lesson.lessons, lesson.index, &ctx.quiz());

    let sources: Vec<String> = vm
        .as_ref()
        .map(|vm| {
            vm.markup
                .external_graphics()
                .map(|graphic| graphic.src.clone())
                .collect()
        })
        .unwrap_or_default();
    let gateway = ctx.gateway();
    let graphics = use_resource(move || {
        let gateway = gateway.clone();
        let sources = sources.clone();
        async move {
            let mut resolved = HashMap::new();
            for src in sources {
                let resolution = resolve_graphic(&gateway, &src).await;
                resolved.insert(src, resolution);
            }
            Ok::<_, ViewError>(resolved)
        }
    });

    let Some(vm) = vm else {
        return rsx! {
            div { class: "page lesson-page",
                p { "{ViewError::Unknown.message()}" }
            }
        };
    };

    let content_html = match view_state_from_resource(graphics) {
        ViewState::Ready(resolved) => vm.markup.to_html(&resolved),
        ViewState::Idle | ViewState::Loading | ViewState::Error(_) => vm.markup.initial_html(),
    };
    let previous = vm.previous.clone();
    let next = vm.next.clone();
    let no_previous = previous.is_none();
    let no_next = next.is_none();
    let quiz = vm.quiz.clone();

    rsx! {
        div { class: "page lesson-page",
            button {
                class: "btn small",
                id: "back-to-modules",
                r#type: "button",
                onclick: move |_| on_navigate.call(NavRequest::BackToModules),
                "Back to modules"
            }
            article { class: "lesson", id: "lesson-article",
                header {
                    h2 { "{vm.title}" }
                    p { class: "meta", "{vm.meta}" }
                }
                section { class: "content", dangerous_inner_html: "{content_html}" }
                nav { class: "lesson-nav",
                    button {
                        class: "btn small",
                        id: "prev-lesson",
                        r#type: "button",
                        disabled: no_previous,
                        onclick: move |_| {
                            if let Some(id) = previous.clone() {
                                on_navigate.call(NavRequest::GoToLesson(id));
                            }
                        },
                        "Previous"
                    }
                    button {
                        class: "btn small",
                        id: "next-lesson",
                        r#type: "button",
                        disabled: no_next,
                        onclick: move |_| {
                            if let Some(id) = next.clone() {
                                on_navigate.call(NavRequest::GoToLesson(id));
                            }
                        },
                        "Next"
                    }
                }
            }
            if let Some(quiz) = quiz {
                QuizPanel { quiz }
            }
        }
    }
}
