// src/store/questions.rs

use std::{
    collections::{BTreeMap, HashSet},
    path::Path,
};

use serde::Serialize;

use crate::{error::AppError, models::question::Question};

/// Chapter counts across the whole bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSummary {
    pub chapters: BTreeMap<String, usize>,
    pub total_questions: usize,
}

/// Read-only question bank, validated and indexed by chapter once at load time.
#[derive(Debug, Default)]
pub struct QuestionStore {
    questions: Vec<Question>,
    /// Chapter code -> positions in `questions`, in dataset order.
    by_chapter: BTreeMap<String, Vec<usize>>,
}

impl QuestionStore {
    /// Validates every record and builds the chapter index.
    pub fn new(questions: Vec<Question>) -> Result<Self, AppError> {
        let mut ids = HashSet::new();
        let mut by_chapter: BTreeMap<String, Vec<usize>> = BTreeMap::new();

        for (idx, question) in questions.iter().enumerate() {
            let id = question.validate()?;
            if !ids.insert(question.id.as_str()) {
                return Err(AppError::BadRequest(format!(
                    "Duplicate question id '{}'",
                    question.id
                )));
            }
            by_chapter.entry(id.chapter).or_default().push(idx);
        }

        Ok(Self {
            questions,
            by_chapter,
        })
    }

    /// Loads the bank from a JSON array of questions.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Transient(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let questions: Vec<Question> = serde_json::from_str(&raw)?;
        let store = Self::new(questions)?;

        tracing::info!(
            "Loaded {} questions in {} chapters from {}",
            store.len(),
            store.by_chapter.len(),
            path.display()
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Question count per chapter code, plus the bank total.
    pub fn list_chapters(&self) -> ChapterSummary {
        ChapterSummary {
            chapters: self
                .by_chapter
                .iter()
                .map(|(code, idx)| (code.clone(), idx.len()))
                .collect(),
            total_questions: self.questions.len(),
        }
    }

    /// Questions whose chapter code equals `chapter`. Unknown chapters yield an empty list.
    pub fn list_by_chapter(&self, chapter: &str) -> Vec<Question> {
        self.by_chapter
            .get(chapter)
            .map(|idx| idx.iter().map(|&i| self.questions[i].clone()).collect())
            .unwrap_or_default()
    }

    /// Questions whose id starts with `exam`.
    ///
    /// This is a raw prefix match, so `saa1` also matches `saa10`..`saa19`.
    pub fn list_by_exam(&self, exam: &str) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| q.id.starts_with(exam))
            .cloned()
            .collect()
    }
}
