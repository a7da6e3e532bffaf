// src/models/question.rs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{error::AppError, utils::id::QuestionId};

/// One answer option of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Single uppercase letter (`A`..`Z`), unique within the question.
    pub label: String,
    pub text: String,
}

/// A multiple-choice question from the static bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// `<chapterCode>-<seq>`, e.g. `saa03-7`.
    pub id: String,
    pub question: String,
    pub choices: Vec<Choice>,
    /// Labels of the correct choices.
    pub answer: Vec<String>,
    /// True iff more than one label is correct.
    pub multi_select: bool,
    pub explanation: String,
}

impl Question {
    /// Text before the first hyphen of the id.
    pub fn chapter_code(&self) -> &str {
        self.id.split('-').next().unwrap_or(&self.id)
    }

    pub fn has_choice(&self, label: &str) -> bool {
        self.choices.iter().any(|c| c.label == label)
    }

    /// The correct labels, sorted.
    pub fn sorted_answer(&self) -> Vec<String> {
        let mut answer = self.answer.clone();
        answer.sort();
        answer
    }

    /// A selection is correct when, sorted, it equals the sorted answer exactly.
    pub fn is_correct<'a, I>(&self, selection: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut given: Vec<&String> = selection.into_iter().collect();
        given.sort();
        let expected = self.sorted_answer();
        given.len() == expected.len() && given.iter().zip(&expected).all(|(g, e)| *g == e)
    }

    /// Checks the record invariants and returns its parsed id.
    pub fn validate(&self) -> Result<QuestionId, AppError> {
        let id = QuestionId::parse(&self.id)?;
        let invalid = |reason: String| AppError::BadRequest(format!("Question {}: {}", self.id, reason));

        if self.choices.is_empty() {
            return Err(invalid("has no choices".to_string()));
        }

        let mut labels = HashSet::new();
        for choice in &self.choices {
            if !is_choice_label(&choice.label) {
                return Err(invalid(format!("invalid choice label '{}'", choice.label)));
            }
            if !labels.insert(choice.label.as_str()) {
                return Err(invalid(format!("duplicate choice label '{}'", choice.label)));
            }
        }

        if self.answer.is_empty() {
            return Err(invalid("answer is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for label in &self.answer {
            if !labels.contains(label.as_str()) {
                return Err(invalid(format!("answer '{}' is not one of the choices", label)));
            }
            if !seen.insert(label.as_str()) {
                return Err(invalid(format!("answer '{}' listed twice", label)));
            }
        }

        if self.multi_select != (self.answer.len() > 1) {
            return Err(invalid(format!(
                "multiSelect is {} but {} answer(s) given",
                self.multi_select,
                self.answer.len()
            )));
        }

        Ok(id)
    }
}

fn is_choice_label(label: &str) -> bool {
    let mut chars = label.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_uppercase())
}
