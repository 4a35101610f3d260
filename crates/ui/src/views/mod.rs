mod home;
mod lesson;
mod module_card;
mod modules;
mod progress;
mod quiz;
mod scripts;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use home::HomeView;
pub use lesson::LessonView;
pub use modules::ModulesView;
pub use progress::ProgressView;
pub use state::{ViewError, ViewState, view_state_from_resource};

pub(crate) use scripts::{audio_buttons_script, focus_main_script};
