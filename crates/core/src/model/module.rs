use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::ids::ModuleId;

/// Number of modules offered as suggestions on the home page.
pub const HOME_SUGGESTION_COUNT: usize = 6;

/// A named collection of lessons sharing a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Declared number of lessons; `None` when the index omits it.
    #[serde(default, alias = "lessonCount", skip_serializing_if = "Option::is_none")]
    pub lesson_count: Option<u32>,
}

impl Module {
    /// Case-insensitive match on id, title, or any tag. An empty query matches everything.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.id.as_str().to_lowercase().contains(&query)
            || self.title.to_lowercase().contains(&query)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(&query))
    }

    /// Declared lesson count, treating a missing count as zero.
    #[must_use]
    pub fn declared_lessons(&self) -> u32 {
        self.lesson_count.unwrap_or(0)
    }
}

/// On-disk shape of the modules index file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModulesDocument {
    #[serde(default)]
    pub modules: Vec<Module>,
}

/// Ordered catalog of modules, loaded once per session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModulesIndex {
    modules: Vec<Module>,
}

impl ModulesIndex {
    /// Builds an index keeping the first occurrence of every module id.
    ///
    /// Returns the index and the ids of dropped duplicates.
    #[must_use]
    pub fn from_modules(modules: Vec<Module>) -> (Self, Vec<ModuleId>) {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(modules.len());
        let mut dropped = Vec::new();
        for module in modules {
            if seen.insert(module.id.clone()) {
                kept.push(module);
            } else {
                dropped.push(module.id);
            }
        }
        (Self { modules: kept }, dropped)
    }

    #[must_use]
    pub fn from_document(doc: ModulesDocument) -> (Self, Vec<ModuleId>) {
        Self::from_modules(doc.modules)
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn get(&self, id: &ModuleId) -> Option<&Module> {
        self.modules.iter().find(|module| &module.id == id)
    }

    /// Modules matching the search text, in index order.
    pub fn filter<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a Module> + 'a {
        self.modules.iter().filter(move |module| module.matches_query(query))
    }

    /// The first few modules shown on the home page.
    #[must_use]
    pub fn suggestions(&self) -> &[Module] {
        let end = self.modules.len().min(HOME_SUGGESTION_COUNT);
        &self.modules[..end]
    }
}
