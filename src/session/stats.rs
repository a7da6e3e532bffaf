// src/session/stats.rs

use serde::Serialize;

use crate::models::question::Question;

/// A question answered wrongly (or left unanswered), with what the user picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncorrectQuestion {
    /// Position in the quiz, 0-based.
    pub index: usize,
    pub question: Question,
    pub given: Vec<String>,
}

/// Summary shown on the completion screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStats {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    /// Rounded to the nearest whole percent; 0 for an empty quiz.
    pub percentage: u32,
    pub elapsed_secs: u64,
    pub incorrect_questions: Vec<IncorrectQuestion>,
}

impl CompletionStats {
    /// Scores `questions` against `given(index)`, the sorted labels chosen for each position.
    pub fn compute<F>(questions: &[Question], given: F, elapsed_secs: u64) -> Self
    where
        F: Fn(usize) -> Vec<String>,
    {
        let mut correct = 0;
        let mut incorrect_questions = Vec::new();

        for (index, question) in questions.iter().enumerate() {
            let selection = given(index);
            if question.is_correct(&selection) {
                correct += 1;
            } else {
                incorrect_questions.push(IncorrectQuestion {
                    index,
                    question: question.clone(),
                    given: selection,
                });
            }
        }

        let total = questions.len();
        Self {
            total,
            correct,
            incorrect: incorrect_questions.len(),
            percentage: percentage(correct, total),
            elapsed_secs,
            incorrect_questions,
        }
    }
}

fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}
