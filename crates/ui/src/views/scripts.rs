use crate::render::AUDIO_SRC_ATTR;

/// Installs one document-level click listener that plays the clip named by the
/// clicked button's audio attribute. Safe to run on every render.
pub(crate) fn audio_buttons_script() -> String {
    format!(
        r#"(function() {{
                    if (window.__lessonAudioButtons) return;
                    window.__lessonAudioButtons = true;
                    document.addEventListener("click", (event) => {{
                        const button = event.target.closest("[{attr}]");
                        if (!button) return;
                        const src = button.getAttribute("{attr}");
                        if (!src) return;
                        new Audio(src).play().catch(() => {{}});
                    }});
                }})();"#,
        attr = AUDIO_SRC_ATTR,
    )
}

/// Moves focus to the page's main region after a view switch.
pub(crate) fn focus_main_script() -> &'static str {
    r#"document.getElementById("main")?.focus();"#
}
