use dioxus::prelude::*;

use services::{QuizError, QuizInput, QuizKey, QuizState};

use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::{QUIZ_HEADING, QuizChoiceVm, QuizVm};

fn quiz_key(key: &Key) -> QuizKey {
    match key {
        Key::Enter => QuizKey::Enter,
        Key::Character(value) if value == " " => QuizKey::Space,
        _ => QuizKey::Other,
    }
}

#[component]
pub(crate) fn QuizPanel(quiz: QuizState) -> Element {
    let ctx = use_context::<AppContext>();
    let state = use_signal(|| quiz.clone());
    let error = use_signal(|| None::<ViewError>);

    let select = {
        let engine = ctx.quiz();
        use_callback(move |input: QuizInput| {
            let engine = engine.clone();
            let mut state = state;
            let mut error = error;
            spawn(async move {
                let mut current = state.peek().clone();
                match engine.select(&mut current, input).await {
                    Ok(Some(_)) => {
                        state.set(current);
                        error.set(None);
                    }
                    Ok(None) => {}
                    Err(QuizError::Progress(err)) => {
                        log::warn!("quiz answer was not saved: {err}");
                        error.set(Some(ViewError::NotSaved));
                    }
                    Err(err) => {
                        log::warn!("quiz input rejected: {err}");
                        error.set(Some(ViewError::Unknown));
                    }
                }
            });
        })
    };

    let vm = QuizVm::from(&*state.read());

    rsx! {
        section { class: "quiz", id: "quiz-area",
            h3 { "{QUIZ_HEADING}" }
            p { "{vm.prompt}" }
            div { class: "choices", role: "radiogroup", aria_label: "Quiz choices",
                for choice in vm.choices {
                    QuizChoice { key: "{choice.index}", choice: choice.clone(), on_select: select }
                }
            }
            div { class: "result", id: "quiz-result", aria_live: "polite",
                if let Some(result) = vm.result {
                    "{result}"
                }
            }
            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }
        }
    }
}

#[component]
fn QuizChoice(choice: QuizChoiceVm, on_select: Callback<QuizInput>) -> Element {
    let index = choice.index;
    rsx! {
        div {
            class: "choice",
            role: "radio",
            tabindex: "0",
            "data-index": "{index}",
            aria_checked: "{choice.checked}",
            onclick: move |_| on_select.call(QuizInput::Pointer { choice: index }),
            onkeydown: move |evt: KeyboardEvent| {
                let key = quiz_key(&evt.data.key());
                if key != QuizKey::Other {
                    evt.prevent_default();
                    on_select.call(QuizInput::Key { choice: index, key });
                }
            },
            "{choice.label}"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_and_space_activate_other_keys_do_not() {
        assert_eq!(quiz_key(&Key::Enter), QuizKey::Enter);
        assert_eq!(quiz_key(&Key::Character(" ".into())), QuizKey::Space);
        assert_eq!(quiz_key(&Key::Character("a".into())), QuizKey::Other);
        assert_eq!(quiz_key(&Key::Tab), QuizKey::Other);
    }
}
