use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::ids::{LessonId, ModuleId};

/// Durable record of visited lessons and selected quiz answers.
///
/// This is the sole unit of persistence: it is read whole and written whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    #[serde(default)]
    visited: BTreeMap<ModuleId, BTreeMap<LessonId, bool>>,
    #[serde(default)]
    answers: BTreeMap<ModuleId, BTreeMap<LessonId, i64>>,
}

impl ProgressState {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty() && self.answers.is_empty()
    }

    pub fn mark_visited(&mut self, module: &ModuleId, lesson: &LessonId) {
        self.visited
            .entry(module.clone())
            .or_default()
            .insert(lesson.clone(), true);
    }

    /// Records the selected choice, replacing any earlier selection.
    pub fn set_answer(&mut self, module: &ModuleId, lesson: &LessonId, index: i64) {
        self.answers
            .entry(module.clone())
            .or_default()
            .insert(lesson.clone(), index);
    }

    #[must_use]
    pub fn answer(&self, module: &ModuleId, lesson: &LessonId) -> Option<i64> {
        self.answers.get(module)?.get(lesson).copied()
    }

    #[must_use]
    pub fn is_visited(&self, module: &ModuleId, lesson: &LessonId) -> bool {
        self.visited
            .get(module)
            .and_then(|lessons| lessons.get(lesson))
            .copied()
            .unwrap_or(false)
    }

    /// Number of lessons in `module` flagged as visited.
    #[must_use]
    pub fn visited_count(&self, module: &ModuleId) -> usize {
        self.visited
            .get(module)
            .map_or(0, |lessons| lessons.values().filter(|seen| **seen).count())
    }

    /// Builds a state from any JSON object.
    ///
    /// Returns `None` when `value` is not an object. Inside an object, members and
    /// entries of the wrong shape are skipped so the result is always well formed.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let root = value.as_object()?;
        let visited = nested_entries(root.get("visited"), Value::as_bool);
        let answers = nested_entries(root.get("answers"), Value::as_i64);
        Some(Self { visited, answers })
    }

    /// Parses serialized progress, returning `None` for invalid JSON or a non-object.
    #[must_use]
    pub fn from_json(raw: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(raw).ok()?;
        Self::from_value(&value)
    }
}

fn nested_entries<T>(
    member: Option<&Value>,
    leaf: impl Fn(&Value) -> Option<T>,
) -> BTreeMap<ModuleId, BTreeMap<LessonId, T>> {
    let Some(modules) = member.and_then(Value::as_object) else {
        return BTreeMap::new();
    };
    modules
        .iter()
        .filter_map(|(module, lessons)| {
            let module = ModuleId::new(module.as_str()).ok()?;
            let lessons = lessons.as_object().map(|map| lesson_entries(map, &leaf))?;
            Some((module, lessons))
        })
        .collect()
}

fn lesson_entries<T>(
    map: &Map<String, Value>,
    leaf: &impl Fn(&Value) -> Option<T>,
) -> BTreeMap<LessonId, T> {
    map.iter()
        .filter_map(|(lesson, value)| {
            let lesson = LessonId::new(lesson.as_str()).ok()?;
            Some((lesson, leaf(value)?))
        })
        .collect()
}
