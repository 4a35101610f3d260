use dioxus::document::eval;
use dioxus::prelude::*;

use services::GatewayState;

use crate::context::AppContext;
use crate::views::{
    HomeView, LessonView, ModulesView, ProgressView, audio_buttons_script, focus_main_script,
};
use crate::vm::{NavCommand, NavRequest, View, ViewController, record_visit};

const STYLE: &str = r"
.app-root { font-family: system-ui, sans-serif; margin: 0 auto; max-width: 60rem; padding: 1rem; }
.site-nav { display: flex; gap: .5rem; }
.card { border: 1px solid #ccc; border-radius: .5rem; padding: .75rem; margin: .5rem 0; }
.choice { border: 1px solid #999; border-radius: .25rem; padding: .5rem; margin: .25rem 0; cursor: pointer; }
.choice[aria-checked='true'] { background: #e6f0ff; border-color: #36c; }
.notice, .error { color: #a00; }
.ten-frame { display: inline-grid; grid-template-columns: repeat(5, 1.5rem); gap: 2px; }
.ten-frame .cell { height: 1.5rem; border: 1px solid #666; }
.ten-frame .cell.filled { background: #36c; }
";

fn run_script(name: &'static str, script: String) {
    spawn(async move {
        if let Err(err) = eval(&script).await {
            log::warn!("{name} script failed: {err:?}");
        }
    });
}

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let controller = use_signal(|| ViewController::new(ctx.modules_index().as_ref().clone()));

    let navigate = {
        let loader = ctx.loader();
        let progress = ctx.progress();
        use_callback(move |request: NavRequest| {
            let mut controller = controller;
            let command = controller.write().request(request);
            if let NavCommand::FetchLessons { ticket, module } = command {
                let loader = loader.clone();
                let progress = progress.clone();
                spawn(async move {
                    let result = loader.load_lessons(&module).await;
                    let completion = controller.write().complete(ticket, result);
                    record_visit(&progress, &completion).await;
                });
            }
        })
    };

    use_effect(move || {
        run_script("audio buttons", audio_buttons_script());
    });

    use_effect(move || {
        let _view = controller.read().view();
        run_script("focus", focus_main_script().to_owned());
    });

    let (view, filter, lesson, notice, loading) = {
        let current = controller.read();
        (
            current.view(),
            current.filter().to_owned(),
            current.lesson().cloned(),
            current.notice(),
            current.is_loading(),
        )
    };
    let lesson_key = lesson
        .as_ref()
        .and_then(|context| {
            let lesson = context.lesson_id()?;
            Some(format!("{}/{lesson}", context.module.id))
        })
        .unwrap_or_default();
    let offline_ready = ctx.gateway().state() == GatewayState::Activated;

    rsx! {
        document::Title { "Offline Lessons" }
        style { "{STYLE}" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                header { class: "site-header",
                    h1 { "Offline Lessons" }
                    nav { class: "site-nav", aria_label: "Main",
                        NavButton { label: "Home", view: View::Home, current: view, request: NavRequest::Home, on_navigate: navigate }
                        NavButton {
                            label: "Modules",
                            view: View::Modules,
                            current: view,
                            request: NavRequest::Modules { filter: String::new() },
                            on_navigate: navigate,
                        }
                        NavButton { label: "Progress", view: View::Progress, current: view, request: NavRequest::Progress, on_navigate: navigate }
                    }
                }
                if let Some(message) = notice {
                    p { class: "notice", role: "alert", "{message}" }
                }
                if loading {
                    p { class: "loading", "Loading..." }
                }
                main { id: "main", tabindex: "-1",
                    match (view, lesson) {
                        (View::Lesson, Some(lesson)) => rsx! {
                            LessonView { key: "{lesson_key}", lesson, on_navigate: navigate }
                        },
                        (View::Modules, _) => rsx! { ModulesView { filter, on_navigate: navigate } },
                        (View::Progress, _) => rsx! { ProgressView {} },
                        (View::Home | View::Lesson, _) => rsx! { HomeView { on_navigate: navigate } },
                    }
                }
                footer { class: "site-footer",
                    if offline_ready {
                        p { class: "note", "Lessons you open stay available offline." }
                    } else {
                        p { class: "note", "Offline copy not ready; lessons need a connection." }
                    }
                }
            }
        }
    }
}

#[component]
fn NavButton(
    label: &'static str,
    view: View,
    current: View,
    request: NavRequest,
    on_navigate: Callback<NavRequest>,
) -> Element {
    let active = view == current;
    rsx! {
        button {
            class: if active { "btn nav-btn active" } else { "btn nav-btn" },
            r#type: "button",
            aria_current: if active { "page" } else { "false" },
            onclick: move |_| on_navigate.call(request.clone()),
            "{label}"
        }
    }
}
