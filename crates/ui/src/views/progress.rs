use std::path::Path;

use dioxus::prelude::*;

use services::{ClearOutcome, Confirmation, EXPORT_FILE_NAME, ProgressError, ProgressService};

use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::{
    CLEAR_CONFIRM_PROMPT, IMPORT_EMPTY_MESSAGE, IMPORT_FAILED_MESSAGE, IMPORT_SUCCEEDED_MESSAGE,
    map_progress_rows,
};

/// Write the pretty snapshot to `path`.
pub(crate) async fn export_progress_file(
    progress: &ProgressService,
    path: &Path,
) -> Result<(), ViewError> {
    let raw = progress.export_snapshot().map_err(|err| {
        log::warn!("could not encode progress: {err}");
        ViewError::Unknown
    })?;
    tokio::fs::write(path, raw).await.map_err(|err| {
        log::warn!("could not write {}: {err}", path.display());
        ViewError::Unknown
    })
}

/// Replace progress with the snapshot stored at `path`, returning the status line.
pub(crate) async fn import_progress_file(
    progress: &ProgressService,
    path: &str,
) -> Result<&'static str, ViewError> {
    let path = path.trim();
    if path.is_empty() {
        return Ok(IMPORT_EMPTY_MESSAGE);
    }
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(err) => {
            log::warn!("could not read {path}: {err}");
            return Ok(IMPORT_FAILED_MESSAGE);
        }
    };
    match progress.import_snapshot(&raw).await {
        Ok(_) => Ok(IMPORT_SUCCEEDED_MESSAGE),
        Err(ProgressError::InvalidSnapshot) => Ok(IMPORT_FAILED_MESSAGE),
        Err(err) => {
            log::warn!("imported progress was not saved: {err}");
            Err(ViewError::NotSaved)
        }
    }
}

#[component]
pub fn ProgressView() -> Element {
    let ctx = use_context::<AppContext>();
    let revision = use_signal(|| 0_u64);
    let status = use_signal(|| None::<String>);
    let error = use_signal(|| None::<ViewError>);
    let mut confirming = use_signal(|| false);
    let mut import_path = use_signal(String::new);
    let mut export_path = use_signal(|| EXPORT_FILE_NAME.to_owned());

    // Re-read the snapshot whenever an action bumps the revision.
    let _ = revision();
    let rows = map_progress_rows(&ctx.modules_index(), &ctx.progress().snapshot());

    let on_export = {
        let progress = ctx.progress();
        use_callback(move |()| {
            let progress = progress.clone();
            let mut status = status;
            let mut error = error;
            let path = export_path.peek().trim().to_owned();
            spawn(async move {
                match export_progress_file(&progress, Path::new(&path)).await {
                    Ok(()) => {
                        status.set(Some(format!("Progress saved to {path}.")));
                        error.set(None);
                    }
                    Err(err) => error.set(Some(err)),
                }
            });
        })
    };

    let on_import = {
        let progress = ctx.progress();
        use_callback(move |()| {
            let progress = progress.clone();
            let mut status = status;
            let mut error = error;
            let mut revision = revision;
            let path = import_path.peek().clone();
            spawn(async move {
                match import_progress_file(&progress, &path).await {
                    Ok(message) => {
                        status.set(Some(message.to_owned()));
                        error.set(None);
                        *revision.write() += 1;
                    }
                    Err(err) => error.set(Some(err)),
                }
            });
        })
    };

    let on_clear = {
        let progress = ctx.progress();
        use_callback(move |confirmation: Confirmation| {
            let progress = progress.clone();
            let mut status = status;
            let mut error = error;
            let mut revision = revision;
            confirming.set(false);
            spawn(async move {
                match progress.clear(confirmation).await {
                    Ok(ClearOutcome::Cleared) => {
                        status.set(Some("Progress cleared.".to_owned()));
                        error.set(None);
                        *revision.write() += 1;
                    }
                    Ok(ClearOutcome::Cancelled) => {}
                    Err(err) => {
                        log::warn!("could not clear progress: {err}");
                        error.set(Some(ViewError::NotSaved));
                    }
                }
            });
        })
    };

    rsx! {
        div { class: "page progress-page",
            h2 { "Your progress" }
            div { class: "progress-summary", id: "progress-summary",
                for row in rows {
                    div { key: "{row.module_id}", class: "card",
                        h3 { "{row.title}" }
                        p { "{row.summary()}" }
                    }
                }
            }
            if let Some(message) = status() {
                p { class: "status", role: "status", "{message}" }
            }
            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }
            section { class: "progress-actions",
                h3 { "Export" }
                input {
                    id: "export-path",
                    r#type: "text",
                    aria_label: "Export file",
                    value: "{export_path}",
                    oninput: move |evt| export_path.set(evt.value()),
                }
                button {
                    class: "btn",
                    id: "export-progress",
                    r#type: "button",
                    onclick: move |_| on_export.call(()),
                    "Export progress"
                }
                h3 { "Import" }
                input {
                    id: "import-file",
                    r#type: "text",
                    aria_label: "Progress file to import",
                    placeholder: "{EXPORT_FILE_NAME}",
                    value: "{import_path}",
                    oninput: move |evt| import_path.set(evt.value()),
                }
                button {
                    class: "btn",
                    id: "import-progress",
                    r#type: "button",
                    onclick: move |_| on_import.call(()),
                    "Import progress"
                }
                h3 { "Reset" }
                if confirming() {
                    div { class: "confirm", role: "alertdialog",
                        p { "{CLEAR_CONFIRM_PROMPT}" }
                        button {
                            class: "btn btn-danger",
                            id: "clear-confirm",
                            r#type: "button",
                            onclick: move |_| on_clear.call(Confirmation::Confirmed),
                            "Erase progress"
                        }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| on_clear.call(Confirmation::Declined),
                            "Cancel"
                        }
                    }
                } else {
                    button {
                        class: "btn btn-secondary",
                        id: "clear-progress",
                        r#type: "button",
                        onclick: move |_| confirming.set(true),
                        "Clear progress"
                    }
                }
            }
        }
    }
}
