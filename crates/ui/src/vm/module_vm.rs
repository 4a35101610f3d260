use lesson_core::model::{Module, ModuleId, ModulesIndex};

/// Shown when a search matches no module.
pub const NO_MATCHES_MESSAGE: &str = "No modules matched your search.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleCardVm {
    pub id: ModuleId,
    pub title: String,
    pub description: String,
    pub lessons_label: String,
}

impl From<&Module> for ModuleCardVm {
    fn from(module: &Module) -> Self {
        let lessons = module
            .lesson_count
            .map_or_else(|| "Unknown".to_owned(), |count| count.to_string());
        Self {
            id: module.id.clone(),
            title: module.title.clone(),
            description: module.description.clone().unwrap_or_default(),
            lessons_label: format!("Lessons: {lessons}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleListVm {
    pub filter: String,
    pub cards: Vec<ModuleCardVm>,
    pub empty_message: Option<&'static str>,
}

#[must_use]
pub fn map_home_suggestions(index: &ModulesIndex) -> Vec<ModuleCardVm> {
    index.suggestions().iter().map(ModuleCardVm::from).collect()
}

#[must_use]
pub fn map_module_list(index: &ModulesIndex, filter: &str) -> ModuleListVm {
    let cards: Vec<ModuleCardVm> = index.filter(filter).map(ModuleCardVm::from).collect();
    let empty_message = cards.is_empty().then_some(NO_MATCHES_MESSAGE);
    ModuleListVm {
        filter: filter.to_owned(),
        cards,
        empty_message,
    }
}
