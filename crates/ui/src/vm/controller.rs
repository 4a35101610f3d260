//! Navigation state machine over the home, modules, lesson and progress views.
//!
//! The controller performs no I/O. A request that needs a lesson collection
//! yields a [`NavCommand::FetchLessons`] tagged with a [`NavTicket`]; the caller
//! fetches and hands the result back through [`ViewController::complete`].
//! Results for a ticket that has since been superseded are dropped.

use lesson_core::model::{LessonCollection, LessonId, Module, ModuleId, ModulesIndex};
use services::{CatalogLoader, LoaderError, ProgressService};

pub const NO_LESSONS_MESSAGE: &str = "Module has no lessons defined.";
pub const LOAD_FAILED_MESSAGE: &str = "Could not load lessons for this module.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Home,
    Modules,
    Lesson,
    Progress,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavRequest {
    Home,
    Modules { filter: String },
    OpenModule(ModuleId),
    GoToLesson(LessonId),
    BackToModules,
    Progress,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NavTicket(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavCommand {
    None,
    FetchLessons { ticket: NavTicket, module: ModuleId },
}

/// What applying a fetch result did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// The ticket was superseded; nothing changed.
    Stale,
    /// A lesson became current and should be recorded as visited.
    Entered { module: ModuleId, lesson: LessonId },
    /// The result applied but no lesson was entered.
    Unchanged,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum LessonTarget {
    First,
    Lesson(LessonId),
}

#[derive(Clone, Debug)]
struct PendingFetch {
    ticket: NavTicket,
    module: Module,
    target: LessonTarget,
}

/// Module and lesson collection behind the current lesson page.
#[derive(Clone, Debug, PartialEq)]
pub struct LessonContext {
    pub module: Module,
    pub lessons: LessonCollection,
    pub index: usize,
}

impl LessonContext {
    #[must_use]
    pub fn lesson_id(&self) -> Option<&LessonId> {
        self.lessons.get(self.index).map(|lesson| &lesson.id)
    }
}

#[derive(Clone, Debug)]
pub struct ViewController {
    index: ModulesIndex,
    view: View,
    filter: String,
    lesson: Option<LessonContext>,
    pending: Option<PendingFetch>,
    next_ticket: u64,
    notice: Option<&'static str>,
}

impl ViewController {
    #[must_use]
    pub fn new(index: ModulesIndex) -> Self {
        Self {
            index,
            view: View::Home,
            filter: String::new(),
            lesson: None,
            pending: None,
            next_ticket: 0,
            notice: None,
        }
    }

    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    #[must_use]
    pub fn index(&self) -> &ModulesIndex {
        &self.index
    }

    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    #[must_use]
    pub fn lesson(&self) -> Option<&LessonContext> {
        self.lesson.as_ref()
    }

    /// Message for the last failed or empty module load, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    fn issue(&mut self, module: Module, target: LessonTarget) -> NavCommand {
        self.next_ticket += 1;
        let ticket = NavTicket(self.next_ticket);
        let module_id = module.id.clone();
        self.pending = Some(PendingFetch {
            ticket,
            module,
            target,
        });
        NavCommand::FetchLessons {
            ticket,
            module: module_id,
        }
    }

    /// Apply a navigation request. Any outstanding fetch is superseded.
    pub fn request(&mut self, request: NavRequest) -> NavCommand {
        self.pending = None;
        self.notice = None;
        match request {
            NavRequest::Home => {
                self.view = View::Home;
                NavCommand::None
            }
            NavRequest::Modules { filter } => {
                self.filter = filter;
                self.view = View::Modules;
                NavCommand::None
            }
            NavRequest::BackToModules => {
                self.view = View::Modules;
                NavCommand::None
            }
            NavRequest::Progress => {
                self.view = View::Progress;
                NavCommand::None
            }
            NavRequest::OpenModule(id) => match self.index.get(&id) {
                Some(module) => {
                    let module = module.clone();
                    self.issue(module, LessonTarget::First)
                }
                None => {
                    log::debug!("ignoring request for unknown module {id}");
                    NavCommand::None
                }
            },
            NavRequest::GoToLesson(id) => match &self.lesson {
                Some(context) => {
                    let module = context.module.clone();
                    self.issue(module, LessonTarget::Lesson(id))
                }
                None => NavCommand::None,
            },
        }
    }

    /// Apply the result of a fetch issued by [`ViewController::request`].
    pub fn complete(
        &mut self,
        ticket: NavTicket,
        result: Result<LessonCollection, LoaderError>,
    ) -> Completion {
        let Some(pending) = self.pending.take_if(|pending| pending.ticket == ticket) else {
            log::debug!("dropping stale lesson response {ticket:?}");
            return Completion::Stale;
        };

        let lessons = match result {
            Ok(lessons) => lessons,
            Err(err) => {
                log::warn!("could not load lessons for {}: {err}", pending.module.id);
                self.notice = Some(LOAD_FAILED_MESSAGE);
                return Completion::Unchanged;
            }
        };

        let index = match &pending.target {
            LessonTarget::First if lessons.is_empty() => {
                self.notice = Some(NO_LESSONS_MESSAGE);
                return Completion::Unchanged;
            }
            LessonTarget::First => 0,
            LessonTarget::Lesson(id) => match lessons.position(id) {
                Some(index) => index,
                None => {
                    log::debug!("lesson {id} is no longer in module {}", pending.module.id);
                    return Completion::Unchanged;
                }
            },
        };

        let context = LessonContext {
            module: pending.module,
            lessons,
            index,
        };
        let completion = match context.lesson_id() {
            Some(lesson) => Completion::Entered {
                module: context.module.id.clone(),
                lesson: lesson.clone(),
            },
            None => Completion::Unchanged,
        };
        self.lesson = Some(context);
        self.view = View::Lesson;
        completion
    }

    /// Run a request to completion: fetch what it needs, apply the result and
    /// record the entered lesson as visited.
    pub async fn navigate(
        &mut self,
        request: NavRequest,
        loader: &CatalogLoader,
        progress: &ProgressService,
    ) -> Completion {
        match self.request(request) {
            NavCommand::None => Completion::Unchanged,
            NavCommand::FetchLessons { ticket, module } => {
                let result = loader.load_lessons(&module).await;
                let completion = self.complete(ticket, result);
                record_visit(progress, &completion).await;
                completion
            }
        }
    }
}

/// Mark the entered lesson visited; persistence failures are logged.
pub async fn record_visit(progress: &ProgressService, completion: &Completion) {
    if let Completion::Entered { module, lesson } = completion {
        if let Err(err) = progress.mark_visited(module, lesson).await {
            log::warn!("could not record visit to {module}/{lesson}: {err}");
        }
    }
}
