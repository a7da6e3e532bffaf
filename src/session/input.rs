// src/session/input.rs

//! Line input on the quiz screen.

use crate::session::machine::{Action, QuizSession, SessionError};

/// Maps one line typed on the quiz screen to the actions it stands for.
///
/// Choice labels win, case-insensitively, so `b` picks choice B. Navigation
/// uses whole words: `next`, `prev`, `back`, `finish` and `go <n>`. An empty
/// line submits. Every label is checked against the current question before
/// anything is returned, so a line with one bad letter changes nothing.
pub fn quiz_actions(session: &QuizSession, input: &str) -> Result<Vec<Action>, SessionError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(vec![Action::SubmitAnswer]);
    }

    let question = session
        .current_question()
        .ok_or(SessionError::InvalidIndex(session.current_index()))?;

    let letters: Vec<String> = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase().to_string())
        .collect();
    let all_letters = letters.iter().all(|l| l.chars().all(|c| c.is_ascii_alphabetic()));
    if all_letters && letters.iter().all(|l| question.has_choice(l)) {
        let mut labels: Vec<String> = Vec::with_capacity(letters.len());
        for label in letters {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        return Ok(labels.into_iter().map(Action::SelectAnswer).collect());
    }

    let lowered = input.to_ascii_lowercase();
    let action = match lowered.as_str() {
        "next" => Action::Next,
        "prev" | "previous" => Action::Previous,
        "back" => Action::BackToChapters,
        "finish" => Action::Complete,
        other => match other.strip_prefix("go ") {
            Some(target) => {
                let n: usize = target.trim().parse().unwrap_or(0);
                let index = n.checked_sub(1).ok_or(SessionError::InvalidIndex(n))?;
                Action::GoTo(index)
            }
            None if all_letters => {
                let bad = letters
                    .into_iter()
                    .find(|l| !question.has_choice(l))
                    .unwrap_or_default();
                return Err(SessionError::UnknownChoice(bad));
            }
            None => return Err(SessionError::UnknownCommand(input.to_string())),
        },
    };
    Ok(vec![action])
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{models::question::fixtures::question, session::machine::Screen};

    fn session() -> QuizSession {
        let mut session = QuizSession::new();
        session.apply(Action::SelectExam("saa".into())).unwrap();
        session
            .start_chapter(
                "saa03",
                vec![question("saa03-1", &["A", "C"], 'D'), question("saa03-2", &["B"], 'D')],
                &mut StdRng::seed_from_u64(1),
                Utc::now(),
            )
            .unwrap();
        session
    }

    fn run(session: &mut QuizSession, input: &str) -> Result<(), SessionError> {
        for action in quiz_actions(session, input)? {
            session.apply(action)?;
        }
        Ok(())
    }

    #[test]
    fn single_letter_b_selects_choice_b() {
        let mut session = session();
        run(&mut session, "b").unwrap();
        assert_eq!(session.screen(), Screen::Quiz);
        assert_eq!(session.selection(0), ["B"]);
    }

    #[test]
    fn letters_are_case_insensitive_and_may_be_spaced() {
        let mut session = session();
        run(&mut session, "a C").unwrap();
        assert_eq!(session.selection(0), ["A", "C"]);
    }

    #[test]
    fn repeated_letter_counts_once() {
        let mut session = session();
        run(&mut session, "AA").unwrap();
        assert_eq!(session.selection(0), ["A"]);
    }

    #[test]
    fn one_bad_letter_changes_nothing() {
        let mut session = session();
        let err = run(&mut session, "AZ").unwrap_err();
        assert!(matches!(err, SessionError::UnknownChoice(ref l) if l == "Z"));
        assert!(session.selection(0).is_empty());
    }

    #[test]
    fn word_commands_navigate() {
        let mut session = session();
        run(&mut session, "next").unwrap();
        assert_eq!(session.current_index(), 1);
        run(&mut session, "PREV").unwrap();
        assert_eq!(session.current_index(), 0);
        run(&mut session, "go 2").unwrap();
        assert_eq!(session.current_index(), 1);
        run(&mut session, "back").unwrap();
        assert_eq!(session.screen(), Screen::ChapterSelection);
    }

    #[test]
    fn empty_line_submits() {
        let mut session = session();
        run(&mut session, "a").unwrap();
        run(&mut session, "c").unwrap();
        run(&mut session, "").unwrap();
        assert!(session.is_submitted(0));
    }

    #[test]
    fn finish_completes_after_last_submit() {
        let mut session = session();
        run(&mut session, "go 2").unwrap();
        run(&mut session, "b").unwrap();
        run(&mut session, "  ").unwrap();
        run(&mut session, "finish").unwrap();
        assert_eq!(session.screen(), Screen::Completion);
    }

    #[test]
    fn bad_jump_and_unknown_input_are_errors() {
        let session = session();
        assert!(matches!(quiz_actions(&session, "go 0"), Err(SessionError::InvalidIndex(0))));
        assert!(matches!(quiz_actions(&session, "go x"), Err(SessionError::InvalidIndex(0))));
        assert!(matches!(quiz_actions(&session, "42"), Err(SessionError::UnknownCommand(_))));
    }
}
