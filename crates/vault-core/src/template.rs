//! Assessment templates.
//!
//! Templates are owned by the surrounding application. The vault only reads
//! them through [`TemplateSource`] to label answers during export.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Expected answer shape for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum AnswerType {
    FreeText,
    /// Integer scale from `min` to `max` inclusive
    Scale { min: i64, max: i64 },
}

/// A single question in an assessment template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub answer_type: AnswerType,
}

impl Question {
    pub fn free_text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            answer_type: AnswerType::FreeText,
        }
    }

    pub fn scale(id: impl Into<String>, text: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            answer_type: AnswerType::Scale { min, max },
        }
    }
}

/// Ordered question list for one kind of self-assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentTemplate {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl AssessmentTemplate {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            questions: Vec::new(),
        }
    }

    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }
}

/// Supplies assessment templates by id.
pub trait TemplateSource {
    fn template(&self, id: &str) -> Option<AssessmentTemplate>;
}

/// In-memory template source.
#[derive(Debug, Clone, Default)]
pub struct StaticTemplates {
    templates: HashMap<String, AssessmentTemplate>,
}

impl StaticTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, template: AssessmentTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn with(mut self, template: AssessmentTemplate) -> Self {
        self.insert(template);
        self
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Templates sorted by id.
    pub fn list(&self) -> Vec<&AssessmentTemplate> {
        let mut templates: Vec<_> = self.templates.values().collect();
        templates.sort_by(|a, b| a.id.cmp(&b.id));
        templates
    }
}

impl FromIterator<AssessmentTemplate> for StaticTemplates {
    fn from_iter<I: IntoIterator<Item = AssessmentTemplate>>(iter: I) -> Self {
        let mut templates = Self::new();
        for template in iter {
            templates.insert(template);
        }
        templates
    }
}

impl TemplateSource for StaticTemplates {
    fn template(&self, id: &str) -> Option<AssessmentTemplate> {
        self.templates.get(id).cloned()
    }
}
