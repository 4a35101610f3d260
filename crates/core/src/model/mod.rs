pub mod content;
mod ids;
mod lesson;
mod manifest;
mod module;
mod progress;
mod quiz;

pub use content::{
    AudioBlock, ContentBlock, ImageBlock, LinkBlock, NumberLine, PhonemePair, VectorGraphic,
    WordAudio,
};
pub use ids::{LessonId, ModuleId, ParseIdError};

pub use lesson::{DEFAULT_LEVEL, Lesson, LessonCollection, LessonsDocument};
pub use manifest::{
    CACHE_NAME_PREFIX, CacheManifest, DEFAULT_SHELL_ASSETS, ManifestError, versioned_cache_name,
};
pub use module::{HOME_SUGGESTION_COUNT, Module, ModulesDocument, ModulesIndex};
pub use progress::ProgressState;
pub use quiz::{QuizSpec, QuizSpecError};
