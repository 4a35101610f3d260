mod controller;
mod lesson_vm;
mod module_vm;
mod progress_vm;
mod quiz_vm;

pub use controller::{
    Completion, LOAD_FAILED_MESSAGE, LessonContext, NO_LESSONS_MESSAGE, NavCommand, NavRequest,
    NavTicket, View, ViewController, record_visit,
};
pub use lesson_vm::{LessonVm, lesson_meta, map_lesson, resolve_graphic};
pub use module_vm::{
    ModuleCardVm, ModuleListVm, NO_MATCHES_MESSAGE, map_home_suggestions, map_module_list,
};
pub use progress_vm::{
    CLEAR_CONFIRM_PROMPT, IMPORT_EMPTY_MESSAGE, IMPORT_FAILED_MESSAGE, IMPORT_SUCCEEDED_MESSAGE,
    ProgressRowVm, map_progress_rows,
};
pub use quiz_vm::{CORRECT_MESSAGE, INCORRECT_MESSAGE, QUIZ_HEADING, QuizChoiceVm, QuizVm};
