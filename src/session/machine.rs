// src/session/machine.rs

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use chrono::{DateTime, Utc};
use rand::{Rng, seq::SliceRandom};

use crate::{
    error::AppError,
    models::{
        exam::{Exam, find_exam},
        history::RecordHistoryRequest,
        question::Question,
    },
    session::{source::QuestionSource, stats::CompletionStats},
    utils::id::chapter_ordinal,
};

/// The four screens of the quiz flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    ExamSelection,
    ChapterSelection,
    Quiz,
    Completion,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Screen::ExamSelection => "exam-selection",
            Screen::ChapterSelection => "chapter-selection",
            Screen::Quiz => "quiz",
            Screen::Completion => "completion",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("'{action}' is not available on the {screen} screen")]
    WrongScreen { action: &'static str, screen: Screen },

    #[error("Unknown exam '{0}'")]
    UnknownExam(String),

    #[error("No exam selected")]
    NoExamSelected,

    #[error("Unknown chapter '{0}'")]
    UnknownChapter(String),

    #[error("Chapter '{0}' has no questions")]
    EmptyChapter(String),

    #[error("Question has no choice '{0}'")]
    UnknownChoice(String),

    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    #[error("Question {0} does not exist")]
    InvalidIndex(usize),

    #[error("Submit the last question before finishing")]
    NotFinished,

    #[error("No chapter to continue with")]
    NoNextChapter,

    #[error("Request failed: {0}")]
    Backend(#[from] AppError),
}

/// Per-attempt answer state. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizState {
    pub current: usize,
    /// Question index -> selected labels, kept sorted.
    pub answers: BTreeMap<usize, BTreeSet<String>>,
    pub submitted: BTreeSet<usize>,
    pub start_time: DateTime<Utc>,
}

impl QuizState {
    fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            current: 0,
            answers: BTreeMap::new(),
            submitted: BTreeSet::new(),
            start_time,
        }
    }

    /// Sorted labels selected for `index`.
    pub fn selection(&self, index: usize) -> Vec<String> {
        self.answers
            .get(&index)
            .map(|labels| labels.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_submitted(&self, index: usize) -> bool {
        self.submitted.contains(&index)
    }
}

/// Everything that can happen to a session.
#[derive(Debug, Clone)]
pub enum Action {
    SelectExam(String),
    BackToExams,
    SetShuffle(bool),
    /// A chapter's questions arrived, already in play order.
    ChapterLoaded {
        chapter: String,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    },
    BackToChapters,
    SelectAnswer(String),
    SubmitAnswer,
    Next,
    Previous,
    GoTo(usize),
    Complete,
    /// Flip the shuffle toggle and go back to chapter selection.
    ShuffleAndReset,
    Tick(DateTime<Utc>),
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::SelectExam(_) => "select exam",
            Action::BackToExams => "back to exams",
            Action::SetShuffle(_) => "set shuffle",
            Action::ChapterLoaded { .. } => "load chapter",
            Action::BackToChapters => "back to chapters",
            Action::SelectAnswer(_) => "select answer",
            Action::SubmitAnswer => "submit answer",
            Action::Next => "next question",
            Action::Previous => "previous question",
            Action::GoTo(_) => "go to question",
            Action::Complete => "complete",
            Action::ShuffleAndReset => "shuffle and reset",
            Action::Tick(_) => "tick",
        }
    }
}

/// One user's walk through exam selection, chapter selection, the quiz and its summary.
#[derive(Debug, Clone)]
pub struct QuizSession {
    screen: Screen,
    exam: Option<&'static Exam>,
    chapter: Option<String>,
    shuffle: bool,
    questions: Vec<Question>,
    state: Option<QuizState>,
    elapsed_secs: u64,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            screen: Screen::ExamSelection,
            exam: None,
            chapter: None,
            shuffle: false,
            questions: Vec::new(),
            state: None,
            elapsed_secs: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn exam(&self) -> Option<&'static Exam> {
        self.exam
    }

    pub fn chapter(&self) -> Option<&str> {
        self.chapter.as_deref()
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn state(&self) -> Option<&QuizState> {
        self.state.as_ref()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn current_index(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.current)
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index())
    }

    pub fn is_submitted(&self, index: usize) -> bool {
        self.state.as_ref().is_some_and(|s| s.is_submitted(index))
    }

    pub fn selection(&self, index: usize) -> Vec<String> {
        self.state
            .as_ref()
            .map(|s| s.selection(index))
            .unwrap_or_default()
    }

    pub fn is_answer_correct(&self, index: usize) -> bool {
        self.questions
            .get(index)
            .is_some_and(|q| q.is_correct(&self.selection(index)))
    }

    pub fn is_last_question(&self) -> bool {
        !self.questions.is_empty() && self.current_index() + 1 == self.questions.len()
    }

    /// True when the user may finish the quiz.
    pub fn can_complete(&self) -> bool {
        self.screen == Screen::Quiz
            && self.is_last_question()
            && self.is_submitted(self.current_index())
    }

    /// Code of the chapter following the current one, if the exam has one.
    pub fn next_chapter(&self) -> Option<String> {
        let exam = self.exam?;
        exam.next_chapter(self.chapter.as_deref()?)
    }

    pub fn stats(&self) -> CompletionStats {
        CompletionStats::compute(&self.questions, |idx| self.selection(idx), self.elapsed_secs)
    }

    /// A history submission for the finished attempt. Saving it is up to the caller.
    pub fn history_request(&self) -> Option<RecordHistoryRequest> {
        if self.screen != Screen::Completion {
            return None;
        }
        let exam = self.exam?;
        let chapter = self.chapter.clone()?;
        let stats = self.stats();
        let title = chapter_ordinal(exam.code, &chapter).map(|n| exam.chapter(n).name);

        Some(RecordHistoryRequest {
            exam: exam.code.to_string(),
            chapter,
            title,
            total: u32::try_from(stats.total).unwrap_or(u32::MAX),
            correct: u32::try_from(stats.correct).unwrap_or(u32::MAX),
            duration: stats.elapsed_secs,
        })
    }

    fn expect_screen(&self, action: &'static str, allowed: &[Screen]) -> Result<(), SessionError> {
        if allowed.contains(&self.screen) {
            Ok(())
        } else {
            Err(SessionError::WrongScreen {
                action,
                screen: self.screen,
            })
        }
    }

    /// A chapter must belong to the selected exam and be within its length.
    fn check_chapter(&self, chapter: &str) -> Result<(), SessionError> {
        let exam = self.exam.ok_or(SessionError::NoExamSelected)?;
        match chapter_ordinal(exam.code, chapter) {
            Some(n) if (1..=exam.chapter_count).contains(&n) => Ok(()),
            _ => Err(SessionError::UnknownChapter(chapter.to_string())),
        }
    }

    fn quiz_state(&mut self) -> &mut QuizState {
        self.state.get_or_insert_with(|| QuizState::new(Utc::now()))
    }

    /// The transition function. A failed action leaves the session unchanged.
    pub fn apply(&mut self, action: Action) -> Result<(), SessionError> {
        use Screen::*;

        let name = action.name();
        match action {
            Action::SelectExam(code) => {
                self.expect_screen(name, &[ExamSelection])?;
                let exam = find_exam(&code).ok_or(SessionError::UnknownExam(code))?;
                self.exam = Some(exam);
                self.screen = ChapterSelection;
            }
            Action::BackToExams => {
                self.expect_screen(name, &[ChapterSelection])?;
                self.screen = ExamSelection;
            }
            Action::SetShuffle(on) => {
                self.expect_screen(name, &[ChapterSelection])?;
                self.shuffle = on;
            }
            Action::ChapterLoaded {
                chapter,
                questions,
                started_at,
            } => {
                self.expect_screen(name, &[ChapterSelection, Completion])?;
                self.check_chapter(&chapter)?;
                if questions.is_empty() {
                    return Err(SessionError::EmptyChapter(chapter));
                }
                self.chapter = Some(chapter);
                self.questions = questions;
                self.state = Some(QuizState::new(started_at));
                self.elapsed_secs = 0;
                self.screen = Quiz;
            }
            Action::BackToChapters => {
                self.expect_screen(name, &[Quiz])?;
                self.screen = ChapterSelection;
            }
            Action::SelectAnswer(label) => {
                self.expect_screen(name, &[Quiz])?;
                let index = self.current_index();
                if self.is_submitted(index) {
                    return Ok(());
                }
                let question = self
                    .questions
                    .get(index)
                    .ok_or(SessionError::InvalidIndex(index))?;
                if !question.has_choice(&label) {
                    return Err(SessionError::UnknownChoice(label));
                }
                let multi_select = question.multi_select;

                let selection = self.quiz_state().answers.entry(index).or_default();
                if !multi_select {
                    selection.clear();
                    selection.insert(label);
                } else if !selection.remove(&label) {
                    selection.insert(label);
                }
            }
            Action::SubmitAnswer => {
                self.expect_screen(name, &[Quiz])?;
                let index = self.current_index();
                let state = self.quiz_state();
                if state.answers.get(&index).is_some_and(|s| !s.is_empty()) {
                    state.submitted.insert(index);
                }
            }
            Action::Next => {
                self.expect_screen(name, &[Quiz])?;
                let last = self.questions.len().saturating_sub(1);
                let state = self.quiz_state();
                if state.current < last {
                    state.current += 1;
                }
            }
            Action::Previous => {
                self.expect_screen(name, &[Quiz])?;
                let state = self.quiz_state();
                state.current = state.current.saturating_sub(1);
            }
            Action::GoTo(index) => {
                self.expect_screen(name, &[Quiz])?;
                if index >= self.questions.len() {
                    return Err(SessionError::InvalidIndex(index));
                }
                self.quiz_state().current = index;
            }
            Action::Complete => {
                self.expect_screen(name, &[Quiz])?;
                if !self.can_complete() {
                    return Err(SessionError::NotFinished);
                }
                self.screen = Completion;
            }
            Action::ShuffleAndReset => {
                self.expect_screen(name, &[Completion])?;
                self.shuffle = !self.shuffle;
                self.chapter = None;
                self.questions.clear();
                self.state = None;
                self.elapsed_secs = 0;
                self.screen = ChapterSelection;
            }
            Action::Tick(now) => {
                if self.screen != Quiz {
                    return Ok(());
                }
                if let Some(state) = &self.state {
                    let secs = (now - state.start_time).num_seconds().max(0) as u64;
                    self.elapsed_secs = self.elapsed_secs.max(secs);
                }
            }
        }

        Ok(())
    }

    /// Puts `questions` in play order, permuting them when shuffle is on.
    pub fn arrange<R: Rng + ?Sized>(&self, mut questions: Vec<Question>, rng: &mut R) -> Vec<Question> {
        if self.shuffle {
            questions.shuffle(rng);
        }
        questions
    }

    /// Starts `chapter` with already fetched questions.
    pub fn start_chapter<R: Rng + ?Sized>(
        &mut self,
        chapter: &str,
        questions: Vec<Question>,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        let questions = self.arrange(questions, rng);
        self.apply(Action::ChapterLoaded {
            chapter: chapter.to_string(),
            questions,
            started_at: now,
        })
    }

    /// Fetches `chapter` from `source` and starts it.
    /// On a fetch failure the session stays where it was.
    pub async fn select_chapter<S>(&mut self, source: &S, chapter: &str) -> Result<(), SessionError>
    where
        S: QuestionSource + ?Sized,
    {
        if !matches!(self.screen, Screen::ChapterSelection | Screen::Completion) {
            return Err(SessionError::WrongScreen {
                action: "load chapter",
                screen: self.screen,
            });
        }
        self.check_chapter(chapter)?;

        let questions = source.fetch_chapter(chapter).await.map_err(|e| {
            tracing::error!("Error loading questions for {}: {}", chapter, e);
            SessionError::Backend(e)
        })?;

        self.start_chapter(chapter, questions, &mut rand::thread_rng(), Utc::now())
    }

    /// Restarts the current chapter from the completion screen.
    pub async fn redo<S>(&mut self, source: &S) -> Result<(), SessionError>
    where
        S: QuestionSource + ?Sized,
    {
        let chapter = match (self.screen, self.chapter.clone()) {
            (Screen::Completion, Some(chapter)) => chapter,
            (screen, _) => {
                return Err(SessionError::WrongScreen {
                    action: "redo",
                    screen,
                });
            }
        };
        self.select_chapter(source, &chapter).await
    }

    /// Moves on to the following chapter from the completion screen.
    pub async fn advance<S>(&mut self, source: &S) -> Result<(), SessionError>
    where
        S: QuestionSource + ?Sized,
    {
        if self.screen != Screen::Completion {
            return Err(SessionError::WrongScreen {
                action: "next chapter",
                screen: self.screen,
            });
        }
        let next = self.next_chapter().ok_or(SessionError::NoNextChapter)?;
        self.select_chapter(source, &next).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::models::question::fixtures::question;

    fn chapter_questions() -> Vec<Question> {
        vec![
            question("saa03-1", &["A"], 'D'),
            question("saa03-2", &["B", "D"], 'E'),
            question("saa03-3", &["C"], 'D'),
        ]
    }

    fn in_quiz() -> QuizSession {
        let mut session = QuizSession::new();
        session.apply(Action::SelectExam("saa".into())).unwrap();
        session
            .start_chapter("saa03", chapter_questions(), &mut StdRng::seed_from_u64(1), Utc::now())
            .unwrap();
        session
    }

    fn select(session: &mut QuizSession, label: &str) {
        session.apply(Action::SelectAnswer(label.into())).unwrap();
    }

    #[test]
    fn exam_selection_moves_to_chapters() {
        let mut session = QuizSession::new();
        assert_eq!(session.screen(), Screen::ExamSelection);
        session.apply(Action::SelectExam("clf".into())).unwrap();
        assert_eq!(session.screen(), Screen::ChapterSelection);
        assert_eq!(session.exam().map(|e| e.code), Some("clf"));

        session.apply(Action::BackToExams).unwrap();
        assert_eq!(session.screen(), Screen::ExamSelection);
    }

    #[test]
    fn unknown_exam_is_rejected() {
        let mut session = QuizSession::new();
        let err = session.apply(Action::SelectExam("xyz".into())).unwrap_err();
        assert!(matches!(err, SessionError::UnknownExam(_)));
        assert_eq!(session.screen(), Screen::ExamSelection);
    }

    #[test]
    fn single_select_replaces_selection() {
        let mut session = in_quiz();
        select(&mut session, "A");
        select(&mut session, "B");
        assert_eq!(session.selection(0), ["B"]);
    }

    #[test]
    fn multi_select_toggles_and_sorts() {
        let mut session = in_quiz();
        session.apply(Action::GoTo(1)).unwrap();
        select(&mut session, "A");
        select(&mut session, "C");
        select(&mut session, "A");
        assert_eq!(session.selection(1), ["C"]);

        select(&mut session, "E");
        select(&mut session, "B");
        assert_eq!(session.selection(1), ["B", "C", "E"]);
    }

    #[test]
    fn unknown_choice_is_rejected() {
        let mut session = in_quiz();
        let err = session.apply(Action::SelectAnswer("Z".into())).unwrap_err();
        assert!(matches!(err, SessionError::UnknownChoice(_)));
        assert!(session.selection(0).is_empty());
    }

    #[test]
    fn submit_without_selection_is_noop() {
        let mut session = in_quiz();
        session.apply(Action::SubmitAnswer).unwrap();
        assert!(!session.is_submitted(0));
    }

    #[test]
    fn submitted_question_ignores_new_selections() {
        let mut session = in_quiz();
        select(&mut session, "A");
        session.apply(Action::SubmitAnswer).unwrap();
        session.apply(Action::SubmitAnswer).unwrap();
        assert!(session.is_submitted(0));

        select(&mut session, "B");
        assert_eq!(session.selection(0), ["A"]);
        assert!(session.is_answer_correct(0));
    }

    #[test]
    fn navigation_is_clamped() {
        let mut session = in_quiz();
        session.apply(Action::Previous).unwrap();
        assert_eq!(session.current_index(), 0);

        session.apply(Action::Next).unwrap();
        session.apply(Action::Next).unwrap();
        session.apply(Action::Next).unwrap();
        assert_eq!(session.current_index(), 2);

        session.apply(Action::GoTo(0)).unwrap();
        assert_eq!(session.current_index(), 0);
        assert!(matches!(
            session.apply(Action::GoTo(3)),
            Err(SessionError::InvalidIndex(3))
        ));
    }

    #[test]
    fn completion_requires_last_question_submitted() {
        let mut session = in_quiz();
        assert!(matches!(session.apply(Action::Complete), Err(SessionError::NotFinished)));

        session.apply(Action::GoTo(2)).unwrap();
        assert!(matches!(session.apply(Action::Complete), Err(SessionError::NotFinished)));

        select(&mut session, "C");
        session.apply(Action::SubmitAnswer).unwrap();
        session.apply(Action::Complete).unwrap();
        assert_eq!(session.screen(), Screen::Completion);

        let stats = session.stats();
        assert_eq!(stats.correct, 1);
        assert_eq!(stats.incorrect, 2);
    }

    #[test]
    fn empty_chapter_stays_on_chapter_selection() {
        let mut session = QuizSession::new();
        session.apply(Action::SelectExam("saa".into())).unwrap();
        let err = session
            .start_chapter("saa99", Vec::new(), &mut StdRng::seed_from_u64(1), Utc::now())
            .unwrap_err();
        assert!(matches!(err, SessionError::EmptyChapter(_)));
        assert_eq!(session.screen(), Screen::ChapterSelection);
    }

    #[test]
    fn chapter_of_another_exam_is_rejected() {
        let mut session = QuizSession::new();
        session.apply(Action::SelectExam("saa".into())).unwrap();
        let questions = vec![question("clf01-1", &["A"], 'D')];
        let err = session
            .start_chapter("clf01", questions, &mut StdRng::seed_from_u64(1), Utc::now())
            .unwrap_err();
        assert!(matches!(err, SessionError::UnknownChapter(ref c) if c == "clf01"));
        assert_eq!(session.screen(), Screen::ChapterSelection);
        assert!(session.chapter().is_none());
        assert!(session.questions().is_empty());

        let err = session
            .start_chapter("saa106", chapter_questions(), &mut StdRng::seed_from_u64(1), Utc::now())
            .unwrap_err();
        assert!(matches!(err, SessionError::UnknownChapter(_)));
    }

    #[test]
    fn shuffle_permutes_questions() {
        let mut session = QuizSession::new();
        session.apply(Action::SelectExam("saa".into())).unwrap();
        session.apply(Action::SetShuffle(true)).unwrap();

        let many: Vec<Question> = (1..=30)
            .map(|n| question(&format!("saa03-{}", n), &["A"], 'D'))
            .collect();
        session
            .start_chapter("saa03", many.clone(), &mut StdRng::seed_from_u64(7), Utc::now())
            .unwrap();

        let mut shuffled: Vec<_> = session.questions().iter().map(|q| q.id.clone()).collect();
        let original: Vec<_> = many.iter().map(|q| q.id.clone()).collect();
        assert_ne!(shuffled, original);
        shuffled.sort();
        let mut sorted = original;
        sorted.sort();
        assert_eq!(shuffled, sorted);
    }

    #[test]
    fn shuffle_and_reset_clears_chapter() {
        let mut session = in_quiz();
        session.apply(Action::GoTo(2)).unwrap();
        select(&mut session, "A");
        session.apply(Action::SubmitAnswer).unwrap();
        session.apply(Action::Complete).unwrap();

        session.apply(Action::ShuffleAndReset).unwrap();
        assert_eq!(session.screen(), Screen::ChapterSelection);
        assert!(session.shuffle());
        assert!(session.chapter().is_none());
        assert!(session.questions().is_empty());
        assert!(session.state().is_none());
    }

    #[test]
    fn elapsed_time_never_decreases() {
        let start = Utc::now();
        let mut session = QuizSession::new();
        session.apply(Action::SelectExam("saa".into())).unwrap();
        session
            .start_chapter("saa03", chapter_questions(), &mut StdRng::seed_from_u64(1), start)
            .unwrap();

        session.apply(Action::Tick(start + Duration::seconds(5))).unwrap();
        assert_eq!(session.elapsed_secs(), 5);
        session.apply(Action::Tick(start + Duration::seconds(3))).unwrap();
        assert_eq!(session.elapsed_secs(), 5);
        session.apply(Action::Tick(start + Duration::seconds(65))).unwrap();
        assert_eq!(session.elapsed_secs(), 65);
    }

    #[test]
    fn next_chapter_respects_exam_length() {
        let mut session = QuizSession::new();
        session.apply(Action::SelectExam("clf".into())).unwrap();
        session
            .start_chapter("clf35", chapter_questions(), &mut StdRng::seed_from_u64(1), Utc::now())
            .unwrap();
        assert_eq!(session.next_chapter(), None);

        let mut session = in_quiz();
        assert_eq!(session.next_chapter().as_deref(), Some("saa04"));
        session.apply(Action::BackToChapters).unwrap();
        assert_eq!(session.screen(), Screen::ChapterSelection);
    }

    #[test]
    fn history_request_only_after_completion() {
        let mut session = in_quiz();
        assert!(session.history_request().is_none());

        session.apply(Action::GoTo(2)).unwrap();
        select(&mut session, "C");
        session.apply(Action::SubmitAnswer).unwrap();
        session.apply(Action::Complete).unwrap();

        let req = session.history_request().unwrap();
        assert_eq!(req.exam, "saa");
        assert_eq!(req.chapter, "saa03");
        assert_eq!(req.title.as_deref(), Some("SAA - Chapter 3"));
        assert_eq!((req.total, req.correct), (3, 1));
    }

    #[test]
    fn actions_on_wrong_screen_fail() {
        let mut session = QuizSession::new();
        assert!(matches!(
            session.apply(Action::SubmitAnswer),
            Err(SessionError::WrongScreen { .. })
        ));
        assert!(matches!(
            session.apply(Action::ShuffleAndReset),
            Err(SessionError::WrongScreen { .. })
        ));
    }
}
