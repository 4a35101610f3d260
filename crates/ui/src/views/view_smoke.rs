use lesson_core::model::{LessonId, ModuleId};

use crate::vm::{CORRECT_MESSAGE, NO_MATCHES_MESSAGE, QUIZ_HEADING};

use super::test_harness::{
    HALF_SVG, MARKUP_QUIZ_JSON, ViewKind, fractions_lesson, lesson_from_json, setup_view_harness,
};

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_module_cards() {
    let mut harness = setup_view_harness(ViewKind::Home).await;
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("Fractions"), "missing module title in {html}");
    assert!(html.contains("Lessons: 2"), "missing lesson count in {html}");
    assert!(html.contains("Lessons: Unknown"), "missing unknown count in {html}");
    assert!(html.contains("Open"), "missing open button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn modules_view_smoke_filters_and_reports_no_matches() {
    let mut harness = setup_view_harness(ViewKind::Modules("reading".into())).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Phonics"), "missing tag match in {html}");
    assert!(!html.contains("Fractions"), "unexpected module in {html}");

    let mut harness = setup_view_harness(ViewKind::Modules("zzz".into())).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains(NO_MATCHES_MESSAGE), "missing empty message in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn lesson_view_smoke_escapes_text_and_resolves_graphics() {
    let mut harness = setup_view_harness(ViewKind::Lesson(fractions_lesson(0))).await;
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("Module: Fractions — Level: General"), "missing meta in {html}");
    assert!(html.contains("Split &lt;evenly&gt;"), "text not escaped in {html}");
    assert!(html.contains("Previous"), "missing nav in {html}");
    assert!(html.contains("Next"), "missing nav in {html}");
    assert!(!html.contains(QUIZ_HEADING), "lesson has no quiz: {html}");

    for _ in 0..3 {
        harness.drive_async().await;
    }
    let html = harness.render();
    assert!(html.contains(HALF_SVG), "graphic not inlined in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn lesson_view_smoke_restores_quiz_answer() {
    let mut harness = setup_view_harness(ViewKind::Lesson(fractions_lesson(1))).await;
    harness
        .progress
        .set_answer(
            &ModuleId::new("fractions").unwrap(),
            &LessonId::new("quarters").unwrap(),
            1,
        )
        .await
        .expect("set answer");

    harness.rebuild();
    let html = harness.render();
    assert!(html.contains(QUIZ_HEADING), "missing quiz in {html}");
    assert!(html.contains("radiogroup"), "missing radiogroup in {html}");
    assert!(html.contains(r#"aria-checked="true""#), "answer not restored in {html}");
    assert!(html.contains(CORRECT_MESSAGE), "missing result in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn lesson_view_smoke_escapes_quiz_prompt_and_choices() {
    let lesson = lesson_from_json(MARKUP_QUIZ_JSON, 0);
    let mut harness = setup_view_harness(ViewKind::Lesson(lesson)).await;
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains(QUIZ_HEADING), "missing quiz in {html}");
    assert!(!html.contains("<script>"), "raw tag leaked in {html}");
    assert!(!html.contains("<b>"), "raw title markup in {html}");
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"), "prompt not escaped in {html}");
    assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"), "choice not escaped in {html}");
    assert!(html.contains("Tom &amp; "), "ampersand not escaped in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn progress_view_smoke_counts_visits() {
    let mut harness = setup_view_harness(ViewKind::Progress).await;
    harness
        .progress
        .mark_visited(
            &ModuleId::new("fractions").unwrap(),
            &LessonId::new("halves").unwrap(),
        )
        .await
        .expect("mark visited");

    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("1 of 2 lessons visited."), "missing summary in {html}");
    assert!(html.contains("0 of 0 lessons visited."), "missing summary in {html}");
    assert!(html.contains("Clear progress"), "missing clear action in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn shell_smoke_starts_on_home_with_navigation() {
    let mut harness = setup_view_harness(ViewKind::Shell).await;
    harness.rebuild();
    let html = harness.render();
    for label in ["Home", "Modules", "Progress"] {
        assert!(html.contains(label), "missing {label} in {html}");
    }
    assert!(html.contains("Lessons: 2"), "home not shown in {html}");
    assert!(html.contains("Offline copy not ready"), "missing cache note in {html}");
}
