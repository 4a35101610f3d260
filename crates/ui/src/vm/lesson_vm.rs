use lesson_core::model::{Lesson, LessonCollection, LessonId, Module};
use services::{GatewayRequest, OfflineGateway, QuizEngine, QuizState};

use crate::render::{GraphicResolution, LessonMarkup, render_blocks};

/// Lesson page model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonVm {
    pub module_title: String,
    pub lesson_id: LessonId,
    pub title: String,
    pub meta: String,
    pub markup: LessonMarkup,
    pub previous: Option<LessonId>,
    pub next: Option<LessonId>,
    /// Quiz with any stored answer already restored.
    pub quiz: Option<QuizState>,
}

#[must_use]
pub fn lesson_meta(module: &Module, lesson: &Lesson) -> String {
    format!("Module: {} — Level: {}", module.title, lesson.level_label())
}

/// Build the page model for the lesson at `index`.
#[must_use]
pub fn map_lesson(
    module: &Module,
    lessons: &LessonCollection,
    index: usize,
    quiz: &QuizEngine,
) -> Option<LessonVm> {
    let lesson = lessons.get(index)?;
    let quiz = quiz.open(&module.id, &lesson.id, lesson.quiz.as_ref());
    Some(LessonVm {
        module_title: module.title.clone(),
        lesson_id: lesson.id.clone(),
        title: lesson.title.clone(),
        meta: lesson_meta(module, lesson),
        markup: render_blocks(&lesson.content),
        previous: lessons.previous(index).map(|l| l.id.clone()),
        next: lessons.next(index).map(|l| l.id.clone()),
        quiz,
    })
}

/// Fetch an external SVG through the gateway.
///
/// Anything but a successful response that looks like SVG falls back to `<img>`.
pub async fn resolve_graphic(gateway: &OfflineGateway, src: &str) -> GraphicResolution {
    let request = match GatewayRequest::get(src) {
        Ok(request) => request,
        Err(err) => {
            log::debug!("graphic {src} not fetchable: {err}");
            return GraphicResolution::Fallback;
        }
    };
    match gateway.handle(&request).await {
        Ok(response) if response.is_success() => {
            let body = response.text();
            if body.contains("<svg") {
                GraphicResolution::Inline(body)
            } else {
                GraphicResolution::Fallback
            }
        }
        Ok(response) => {
            log::debug!("graphic {src} returned status {}", response.status);
            GraphicResolution::Fallback
        }
        Err(err) => {
            log::warn!("graphic {src} unavailable: {err}");
            GraphicResolution::Fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use lesson_core::model::{CacheManifest, LessonsDocument, ModuleId};
    use services::{MemoryNetwork, ProgressService};
    use storage::repository::InMemoryRepository;

    fn module() -> Module {
        Module {
            id: ModuleId::new("m1").unwrap(),
            title: "Fractions".into(),
            description: None,
            tags: Default::default(),
            lesson_count: Some(2),
        }
    }

    fn lessons() -> LessonCollection {
        let doc: LessonsDocument = serde_json::from_str(
            r#"{"lessons":[
                {"id":"l1","title":"Halves","content":[{"type":"p","text":"Split <evenly>"}]},
                {"id":"l2","title":"Quarters","level":"Beginner",
                 "quiz":{"prompt":"4/4?","choices":["1","2"],"answer":0}}
            ]}"#,
        )
        .unwrap();
        LessonCollection::from_document(doc).0
    }

    #[tokio::test]
    async fn lesson_page_model_has_navigation_and_quiz() {
        let progress = Arc::new(ProgressService::open(Arc::new(InMemoryRepository::new())).await);
        let quiz = QuizEngine::new(progress);
        let lessons = lessons();

        let first = map_lesson(&module(), &lessons, 0, &quiz).unwrap();
        assert_eq!(first.meta, "Module: Fractions — Level: General");
        assert_eq!(first.previous, None);
        assert_eq!(first.next, Some(LessonId::new("l2").unwrap()));
        assert!(first.quiz.is_none());
        assert_eq!(first.markup.initial_html(), "<p>Split &lt;evenly&gt;</p>");

        let second = map_lesson(&module(), &lessons, 1, &quiz).unwrap();
        assert_eq!(second.meta, "Module: Fractions — Level: Beginner");
        assert_eq!(second.previous, Some(LessonId::new("l1").unwrap()));
        assert_eq!(second.next, None);
        assert_eq!(second.quiz.unwrap().spec.choices.len(), 2);

        assert!(map_lesson(&module(), &lessons, 2, &quiz).is_none());
    }

    #[tokio::test]
    async fn graphics_inline_on_success_and_fall_back_otherwise() {
        let origin = MemoryNetwork::new()
            .with_file("/img/ok.svg", "<svg viewBox=\"0 0 1 1\"></svg>")
            .with_file("/img/not-svg.svg", "plain text");
        let gateway = OfflineGateway::new(
            CacheManifest::default_shell(1),
            Arc::new(InMemoryRepository::new()),
            Arc::new(origin),
        );

        assert_eq!(
            resolve_graphic(&gateway, "/img/ok.svg").await,
            GraphicResolution::Inline("<svg viewBox=\"0 0 1 1\"></svg>".into())
        );
        assert_eq!(
            resolve_graphic(&gateway, "/img/not-svg.svg").await,
            GraphicResolution::Fallback
        );
        assert_eq!(
            resolve_graphic(&gateway, "/img/missing.svg").await,
            GraphicResolution::Fallback
        );
    }
}
