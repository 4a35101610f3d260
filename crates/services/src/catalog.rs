use std::sync::Arc;

use serde::de::DeserializeOwned;

use lesson_core::model::{
    LessonCollection, LessonsDocument, ModuleId, ModulesDocument, ModulesIndex, QuizSpec,
};

use crate::error::LoaderError;
use crate::gateway::{GatewayRequest, OfflineGateway};

/// Location of the modules index below the content root.
pub const MODULES_INDEX_PATH: &str = "/modules/index.json";

/// Location of a module's lesson collection below the content root.
#[must_use]
pub fn lessons_path(module: &ModuleId) -> String {
    format!("/modules/{module}/lessons.json")
}

/// Fetches the modules index and per-module lesson collections through the gateway.
#[derive(Clone)]
pub struct CatalogLoader {
    gateway: Arc<OfflineGateway>,
}

impl CatalogLoader {
    #[must_use]
    pub fn new(gateway: Arc<OfflineGateway>) -> Self {
        Self { gateway }
    }

    /// Load the modules index.
    ///
    /// Never fails: any error is logged and yields the empty index.
    pub async fn load_modules_index(&self) -> ModulesIndex {
        match self.fetch_json::<ModulesDocument>(MODULES_INDEX_PATH).await {
            Ok(doc) => {
                let (index, dropped) = ModulesIndex::from_document(doc);
                if !dropped.is_empty() {
                    log::warn!("modules index repeats ids {dropped:?}; kept the first of each");
                }
                log::info!("loaded {} modules", index.len());
                index
            }
            Err(err) => {
                log::warn!("could not load modules index: {err}");
                ModulesIndex::empty()
            }
        }
    }

    /// Load the lessons of `module`. Collections are never cached here; every
    /// call goes through the gateway.
    ///
    /// # Errors
    ///
    /// Returns `LoaderError::InvalidModuleId` if the id cannot form a path segment.
    /// Returns `LoaderError::Gateway` if the resource is unavailable.
    /// Returns `LoaderError::Status` for a non-2xx response.
    /// Returns `LoaderError::Decode` if the body is not a lessons document.
    pub async fn load_lessons(&self, module: &ModuleId) -> Result<LessonCollection, LoaderError> {
        if !module.is_path_safe() {
            return Err(LoaderError::InvalidModuleId(module.clone()));
        }
        let doc = self
            .fetch_json::<LessonsDocument>(&lessons_path(module))
            .await?;
        let (lessons, dropped) = LessonCollection::from_document(doc);
        if !dropped.is_empty() {
            log::warn!("module {module} repeats lesson ids {dropped:?}; kept the first of each");
        }
        for lesson in lessons.lessons() {
            if let Some(err) = &lesson.quiz_error {
                log::warn!("lesson {module}/{} quiz dropped: {err}", lesson.id);
            }
            // Kept as authored; such a quiz can never be answered correctly.
            if let Some(Err(err)) = lesson.quiz.as_ref().map(QuizSpec::validate) {
                log::warn!("lesson {module}/{} has a malformed quiz: {err}", lesson.id);
            }
        }
        Ok(lessons)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, LoaderError> {
        let request = GatewayRequest::get(path)?;
        let response = self.gateway.handle(&request).await?;
        if !response.is_success() {
            return Err(LoaderError::Status {
                path: path.to_owned(),
                status: response.status,
            });
        }
        serde_json::from_slice(&response.body).map_err(|source| LoaderError::Decode {
            path: path.to_owned(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::MemoryNetwork;
    use lesson_core::model::{CacheManifest, LessonId};
    use storage::repository::InMemoryRepository;

    fn loader(origin: &MemoryNetwork) -> CatalogLoader {
        let gateway = OfflineGateway::new(
            CacheManifest::default_shell(1),
            Arc::new(InMemoryRepository::new()),
            Arc::new(origin.clone()),
        );
        CatalogLoader::new(Arc::new(gateway))
    }

    fn module(id: &str) -> ModuleId {
        ModuleId::new(id).unwrap()
    }

    #[tokio::test]
    async fn index_keeps_order_and_first_duplicate() {
        let origin = MemoryNetwork::new().with_file(
            MODULES_INDEX_PATH,
            r#"{"modules":[
                {"id":"m2","title":"Second","lesson_count":2},
                {"id":"m1","title":"First","tags":["math"]},
                {"id":"m2","title":"Duplicate"}
            ]}"#,
        );
        let index = loader(&origin).load_modules_index().await;
        let titles: Vec<_> = index.modules().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn index_failures_degrade_to_empty() {
        let missing = MemoryNetwork::new();
        assert!(loader(&missing).load_modules_index().await.is_empty());

        let broken = MemoryNetwork::new().with_file(MODULES_INDEX_PATH, "{not json");
        assert!(loader(&broken).load_modules_index().await.is_empty());
    }

    #[tokio::test]
    async fn lessons_are_fetched_on_every_call() {
        let origin = MemoryNetwork::new().with_file(
            "/modules/m1/lessons.json",
            r#"{"lessons":[{"id":"l1","title":"One","content":[{"type":"p","text":"hi"}]}]}"#,
        );
        let loader = loader(&origin);

        let first = loader.load_lessons(&module("m1")).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first.first().unwrap().id, LessonId::new("l1").unwrap());

        origin.insert(
            "/modules/m1/lessons.json",
            r#"{"lessons":[{"id":"l1","title":"One"},{"id":"l2","title":"Two"}]}"#,
        );
        assert_eq!(loader.load_lessons(&module("m1")).await.unwrap().len(), 2);
        assert_eq!(origin.fetch_count(), 2);
    }

    #[tokio::test]
    async fn malformed_quiz_keeps_the_rest_of_the_module() {
        let origin = MemoryNetwork::new().with_file(
            "/modules/m1/lessons.json",
            r#"{"lessons":[
                {"id":"a","title":"A","quiz":{"prompt":"?","choices":["x","y"],"answer":1}},
                {"id":"b","title":"B","quiz":{"prompt":"?","choices":["x"],"answer":-1}}
            ]}"#,
        );
        let lessons = loader(&origin).load_lessons(&module("m1")).await.unwrap();

        assert_eq!(lessons.len(), 2);
        assert_eq!(lessons.get(0).unwrap().quiz.as_ref().unwrap().answer_index, 1);
        let b = lessons.get(1).unwrap();
        assert_eq!(b.title, "B");
        assert!(b.quiz.is_none());
    }

    #[tokio::test]
    async fn lesson_errors_are_reported() {
        let origin = MemoryNetwork::new().with_file("/modules/bad/lessons.json", "[]");
        let loader = loader(&origin);

        assert!(matches!(
            loader.load_lessons(&module("none")).await,
            Err(LoaderError::Status { status: 404, .. })
        ));
        assert!(matches!(
            loader.load_lessons(&module("bad")).await,
            Err(LoaderError::Decode { .. })
        ));
        assert!(matches!(
            loader.load_lessons(&module("..")).await,
            Err(LoaderError::InvalidModuleId(_))
        ));
    }

    #[test]
    fn lesson_paths_follow_the_content_layout() {
        assert_eq!(lessons_path(&module("fractions")), "/modules/fractions/lessons.json");
    }
}
