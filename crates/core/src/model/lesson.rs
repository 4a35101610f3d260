use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::model::content::ContentBlock;
use crate::model::ids::LessonId;
use crate::model::quiz::QuizSpec;

/// Level label shown when a lesson does not declare one.
pub const DEFAULT_LEVEL: &str = "General";

/// An ordered sequence of content blocks plus an optional quiz.
///
/// A quiz whose shape does not decode is dropped and the lesson is kept;
/// `quiz_error` then says why.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "AuthoredLesson")]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    pub level: Option<String>,
    pub content: Vec<ContentBlock>,
    pub quiz: Option<QuizSpec>,
    pub quiz_error: Option<String>,
}

#[derive(Deserialize)]
struct AuthoredLesson {
    id: LessonId,
    title: String,
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    quiz: Option<Value>,
}

impl From<AuthoredLesson> for Lesson {
    fn from(raw: AuthoredLesson) -> Self {
        let (quiz, quiz_error) = match raw.quiz.filter(|value| !value.is_null()) {
            None => (None, None),
            Some(value) => match serde_json::from_value::<QuizSpec>(value) {
                Ok(quiz) => (Some(quiz), None),
                Err(err) => (None, Some(err.to_string())),
            },
        };
        Self {
            id: raw.id,
            title: raw.title,
            level: raw.level,
            content: raw.content,
            quiz,
            quiz_error,
        }
    }
}

impl Lesson {
    #[must_use]
    pub fn level_label(&self) -> &str {
        self.level.as_deref().unwrap_or(DEFAULT_LEVEL)
    }
}

/// On-disk shape of a module's lesson file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LessonsDocument {
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// Ordered lessons of one module; order defines previous/next adjacency.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LessonCollection {
    lessons: Vec<Lesson>,
}

impl LessonCollection {
    /// Builds a collection keeping the first lesson for every id.
    ///
    /// Returns the collection and the ids of dropped duplicates.
    #[must_use]
    pub fn from_lessons(lessons: Vec<Lesson>) -> (Self, Vec<LessonId>) {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(lessons.len());
        let mut dropped = Vec::new();
        for lesson in lessons {
            if seen.insert(lesson.id.clone()) {
                kept.push(lesson);
            } else {
                dropped.push(lesson.id);
            }
        }
        (Self { lessons: kept }, dropped)
    }

    #[must_use]
    pub fn from_document(doc: LessonsDocument) -> (Self, Vec<LessonId>) {
        Self::from_lessons(doc.lessons)
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    #[must_use]
    pub fn first(&self) -> Option<&Lesson> {
        self.lessons.first()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Lesson> {
        self.lessons.get(index)
    }

    #[must_use]
    pub fn position(&self, id: &LessonId) -> Option<usize> {
        self.lessons.iter().position(|lesson| &lesson.id == id)
    }

    /// The lesson before `index`, if any.
    #[must_use]
    pub fn previous(&self, index: usize) -> Option<&Lesson> {
        index.checked_sub(1).and_then(|prev| self.lessons.get(prev))
    }

    /// The lesson after `index`, if any.
    #[must_use]
    pub fn next(&self, index: usize) -> Option<&Lesson> {
        self.lessons.get(index.checked_add(1)?)
    }
}
