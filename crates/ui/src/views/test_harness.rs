use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use lesson_core::model::{
    CacheManifest, LessonCollection, LessonsDocument, Module, ModulesDocument, ModulesIndex,
};
use services::{
    AppServices, CatalogLoader, MemoryNetwork, OfflineGateway, ProgressService, QuizEngine,
};
use storage::repository::Storage;

use crate::app::App;
use crate::context::{UiApp, build_app_context};
use crate::views::{HomeView, LessonView, ModulesView, ProgressView};
use crate::vm::{LessonContext, NavRequest};

pub const INDEX_JSON: &str = r#"{"modules":[
    {"id":"fractions","title":"Fractions","description":"Parts of a whole","tags":["math"],"lesson_count":2},
    {"id":"phonics","title":"Phonics","tags":["reading"]}
]}"#;

pub const FRACTIONS_JSON: &str = r#"{"lessons":[
    {"id":"halves","title":"Halves","content":[
        {"type":"p","text":"Split <evenly>"},
        {"type":"svg","src":"/img/half.svg","alt":"A half"}
    ]},
    {"id":"quarters","title":"Quarters","level":"Beginner",
     "quiz":{"prompt":"How many quarters make a whole?","choices":["2","4"],"answer":1}}
]}"#;

pub const HALF_SVG: &str = r#"<svg viewBox="0 0 2 1"><rect width="1" height="1"/></svg>"#;

#[derive(Clone)]
struct TestApp {
    index: ModulesIndex,
    services: AppServices,
}

impl UiApp for TestApp {
    fn modules_index(&self) -> ModulesIndex {
        self.index.clone()
    }

    fn gateway(&self) -> Arc<OfflineGateway> {
        self.services.gateway()
    }

    fn loader(&self) -> Arc<CatalogLoader> {
        self.services.loader()
    }

    fn progress(&self) -> Arc<ProgressService> {
        self.services.progress()
    }

    fn quiz(&self) -> Arc<QuizEngine> {
        self.services.quiz()
    }
}

#[derive(Clone, PartialEq)]
pub enum ViewKind {
    Shell,
    Home,
    Modules(String),
    Lesson(LessonContext),
    Progress,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewHarnessRoot(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    let on_navigate = use_callback(|_: NavRequest| {});
    match props.view {
        ViewKind::Shell => rsx! { App {} },
        ViewKind::Home => rsx! { HomeView { on_navigate } },
        ViewKind::Modules(filter) => rsx! { ModulesView { filter, on_navigate } },
        ViewKind::Lesson(lesson) => rsx! { LessonView { lesson, on_navigate } },
        ViewKind::Progress => rsx! { ProgressView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub progress: Arc<ProgressService>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn sample_index() -> ModulesIndex {
    let doc: ModulesDocument = serde_json::from_str(INDEX_JSON).expect("index json");
    ModulesIndex::from_document(doc).0
}

pub const MARKUP_QUIZ_JSON: &str = r#"{"lessons":[
    {"id":"tricky","title":"Tricky <b>","quiz":{
        "prompt":"Is <script>alert(1)</script> & \"safe\"?",
        "choices":["<script>x</script>","Tom & \"Jerry\""],
        "answer":0}}
]}"#;

pub fn fractions_lesson(index: usize) -> LessonContext {
    lesson_from_json(FRACTIONS_JSON, index)
}

pub fn lesson_from_json(json: &str, index: usize) -> LessonContext {
    let doc: LessonsDocument = serde_json::from_str(json).expect("lessons json");
    let module: Module = sample_index().modules()[0].clone();
    LessonContext {
        module,
        lessons: LessonCollection::from_document(doc).0,
        index,
    }
}

pub async fn setup_view_harness(view: ViewKind) -> ViewHarness {
    let origin = MemoryNetwork::new()
        .with_file("/modules/index.json", INDEX_JSON)
        .with_file("/modules/fractions/lessons.json", FRACTIONS_JSON)
        .with_file("/img/half.svg", HALF_SVG);
    let services = AppServices::new(
        Storage::in_memory(),
        Arc::new(origin),
        CacheManifest::default_shell(1),
    )
    .await;
    let progress = services.progress();

    let app = Arc::new(TestApp {
        index: sample_index(),
        services,
    });
    let dom = VirtualDom::new_with_props(ViewHarnessRoot, ViewHarnessProps { app, view });

    ViewHarness { dom, progress }
}
