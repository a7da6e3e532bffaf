// src/session/render.rs

//! Plain-text views of each screen.

use std::fmt::Write;

use crate::{
    models::exam::EXAMS,
    session::machine::{QuizSession, Screen},
    utils::time::format_elapsed,
};

/// The question strip is only drawn for chapters up to this size.
const MAX_NAV_QUESTIONS: usize = 20;

pub fn render(session: &QuizSession) -> String {
    match session.screen() {
        Screen::ExamSelection => exam_selection(),
        Screen::ChapterSelection => chapter_selection(session),
        Screen::Quiz => quiz(session),
        Screen::Completion => completion(session),
    }
}

pub fn exam_selection() -> String {
    let mut out = String::from("AWS certification practice\n\n");
    for (i, exam) in EXAMS.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {:<4} {} ({} chapters)",
            i + 1,
            exam.code.to_uppercase(),
            exam.name,
            exam.chapter_count
        );
    }
    out.push_str("\nPick an exam by number or code, or 'q' to quit.\n");
    out
}

pub fn chapter_selection(session: &QuizSession) -> String {
    let Some(exam) = session.exam() else {
        return exam_selection();
    };

    let mut out = format!("{}\n", exam.name);
    let _ = writeln!(
        out,
        "Shuffle: {}\n",
        if session.shuffle() { "on" } else { "off" }
    );

    for chunk in exam.chapters().chunks(10) {
        let row: Vec<String> = chunk.iter().map(|c| format!("{:>4}", c.num)).collect();
        let _ = writeln!(out, "{}", row.join(""));
    }
    out.push_str("\nPick a chapter number, 's' to toggle shuffle, 'b' to go back.\n");
    out
}

pub fn quiz(session: &QuizSession) -> String {
    let Some(question) = session.current_question() else {
        return String::from("No questions loaded.\n");
    };
    let index = session.current_index();
    let total = session.questions().len();
    let submitted = session.is_submitted(index);
    let selection = session.selection(index);

    let mut out = String::new();
    let _ = writeln!(out, "{}", status_line(session));
    let _ = writeln!(out, "{}", progress_bar(index + 1, total, 30));

    if total <= MAX_NAV_QUESTIONS {
        let strip: Vec<String> = (0..total)
            .map(|i| {
                let mark = if i == index {
                    '>'
                } else if !session.is_submitted(i) {
                    ' '
                } else if session.is_answer_correct(i) {
                    '+'
                } else {
                    'x'
                };
                format!("{}{}", mark, i + 1)
            })
            .collect();
        let _ = writeln!(out, "{}", strip.join(" "));
    }

    let _ = writeln!(out, "\n{}", question.question);
    if question.multi_select {
        let _ = writeln!(out, "(select {})", question.answer.len());
    }
    out.push('\n');

    for choice in &question.choices {
        let selected = selection.contains(&choice.label);
        let verdict = if !submitted {
            ""
        } else if question.answer.contains(&choice.label) {
            "  correct"
        } else if selected {
            "  wrong"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "  [{}] {}. {}{}",
            if selected { 'x' } else { ' ' },
            choice.label,
            choice.text,
            verdict
        );
    }

    if submitted {
        let headline = if session.is_answer_correct(index) {
            "Correct!"
        } else {
            "Explanation"
        };
        let _ = writeln!(out, "\n{}: {}", headline, question.explanation);
    }

    out.push('\n');
    out.push_str(&quiz_hint(session, submitted));
    out
}

/// Position and running time; redrawn on its own while the quiz waits for input.
pub fn status_line(session: &QuizSession) -> String {
    format!(
        "Question {} / {}    elapsed {}",
        session.current_index() + 1,
        session.questions().len(),
        format_elapsed(session.elapsed_secs())
    )
}

fn quiz_hint(session: &QuizSession, submitted: bool) -> String {
    let mut hints = vec!["letters to choose"];
    if !submitted {
        hints.push("enter to submit");
    } else if session.can_complete() {
        hints.push("'finish' to finish");
    } else {
        hints.push("'next'");
    }
    hints.extend(["'prev'", "'go <n>' jump", "'back'", "'quit'"]);
    format!("{}\n", hints.join(", "))
}

pub fn completion(session: &QuizSession) -> String {
    let stats = session.stats();
    let mut out = String::from("Quiz complete!\n\n");
    let _ = writeln!(out, "{}%", stats.percentage);
    let _ = writeln!(out, "{} / {} correct", stats.correct, stats.total);
    let _ = writeln!(
        out,
        "correct {}  incorrect {}  time {}",
        stats.correct,
        stats.incorrect,
        format_elapsed(stats.elapsed_secs)
    );
    let _ = writeln!(out, "{}", progress_bar(stats.correct, stats.total, 30));

    if !stats.incorrect_questions.is_empty() {
        out.push_str("\nIncorrect questions\n");
        for missed in &stats.incorrect_questions {
            let _ = writeln!(out, "\nQuestion {}: {}", missed.index + 1, missed.question.question);
            let given = if missed.given.is_empty() {
                "-".to_string()
            } else {
                missed.given.join(", ")
            };
            let _ = writeln!(out, "  your answer: {}", given);
            let _ = writeln!(out, "  correct:     {}", missed.question.sorted_answer().join(", "));
            let _ = writeln!(out, "  {}", missed.question.explanation);
        }
    }

    out.push_str("\n'r' redo, 's' shuffle & reset, 'h' save to history");
    if session.next_chapter().is_some() {
        out.push_str(", 'n' next chapter");
    }
    out.push_str(", 'q' quit\n");
    out
}

fn progress_bar(done: usize, total: usize, width: usize) -> String {
    let filled = if total == 0 { 0 } else { done * width / total };
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
