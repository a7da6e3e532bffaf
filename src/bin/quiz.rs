// src/bin/quiz.rs

//! Terminal quiz client. Talks to a server when `QUIZ_API_URL` is set,
//! otherwise reads the local question bank and keeps history in-process.

use std::{io::Write, time::Duration};

use cert_quiz::{
    client::ApiClient,
    config::Config,
    error::AppError,
    handlers::history::record,
    models::{exam::EXAMS, history::HistoryEntry},
    session::{
        Action, QuestionSource, QuizSession, Screen, SessionError,
        input::quiz_actions,
        render::{render, status_line},
    },
    store::{HistoryStore, InMemoryHistory, QuestionStore},
};
use chrono::Utc;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    time::{MissedTickBehavior, interval},
};
use tracing_subscriber::EnvFilter;

enum Backend {
    Remote(ApiClient),
    Local {
        questions: QuestionStore,
        history: InMemoryHistory,
    },
}

impl Backend {
    fn from_config(config: &Config) -> Result<Self, AppError> {
        match &config.api_url {
            Some(url) => {
                tracing::info!("Using quiz server at {}", url);
                Ok(Backend::Remote(ApiClient::new(url.clone(), config.fetch_timeout)?))
            }
            None => Ok(Backend::Local {
                questions: QuestionStore::load(&config.questions_path)?,
                history: InMemoryHistory::new(config.history_capacity),
            }),
        }
    }

    fn source(&self) -> &dyn QuestionSource {
        match self {
            Backend::Remote(client) => client,
            Backend::Local { questions, .. } => questions,
        }
    }

    async fn save(&self, session: &QuizSession) -> Result<HistoryEntry, AppError> {
        let req = session
            .history_request()
            .ok_or_else(|| AppError::BadRequest("Nothing to save yet".to_string()))?;
        match self {
            Backend::Remote(client) => client.record_history(&req).await,
            Backend::Local { history, .. } => record(history as &dyn HistoryStore, req).await,
        }
    }
}

/// What the loop should do after a line of input.
enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.rust_log))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let backend = Backend::from_config(&config)?;
    let mut session = QuizSession::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut clock = interval(Duration::from_secs(1));
    clock.set_missed_tick_behavior(MissedTickBehavior::Delay);

    println!("\n{}", render(&session));
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                session.apply(Action::Tick(Utc::now()))?;
                match handle(&mut session, &backend, line.trim()).await {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Quit) => break,
                    Err(e) => println!("! {}", e),
                }
                session.apply(Action::Tick(Utc::now()))?;
                println!("\n{}", render(&session));
            }
            _ = clock.tick() => {
                if session.screen() != Screen::Quiz {
                    continue;
                }
                let before = session.elapsed_secs();
                session.apply(Action::Tick(Utc::now()))?;
                if session.elapsed_secs() != before {
                    print!("\r{} > ", status_line(&session));
                    std::io::stdout().flush()?;
                }
            }
        }
    }

    Ok(())
}

async fn handle(session: &mut QuizSession, backend: &Backend, input: &str) -> Result<Flow, SessionError> {
    // On the quiz screen a lone letter is a choice label.
    let quit = input.eq_ignore_ascii_case("quit")
        || (session.screen() != Screen::Quiz && input.eq_ignore_ascii_case("q"));
    if quit {
        return Ok(Flow::Quit);
    }

    match session.screen() {
        Screen::ExamSelection => {
            let code = input
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| EXAMS.get(i))
                .map_or_else(|| input.to_lowercase(), |e| e.code.to_string());
            session.apply(Action::SelectExam(code))?;
        }
        Screen::ChapterSelection => match input {
            "b" => session.apply(Action::BackToExams)?,
            "s" => session.apply(Action::SetShuffle(!session.shuffle()))?,
            _ => {
                let exam = session.exam().ok_or(SessionError::NoExamSelected)?;
                let num: u32 = input
                    .parse()
                    .ok()
                    .filter(|n| (1..=exam.chapter_count).contains(n))
                    .ok_or_else(|| SessionError::UnknownChapter(input.to_string()))?;
                let chapter = exam.chapter(num).id;
                session.select_chapter(backend.source(), &chapter).await?;
            }
        },
        Screen::Quiz => {
            for action in quiz_actions(session, input)? {
                session.apply(action)?;
            }
        }
        Screen::Completion => match input {
            "r" => session.redo(backend.source()).await?,
            "s" => session.apply(Action::ShuffleAndReset)?,
            "n" => session.advance(backend.source()).await?,
            "h" => {
                let entry = backend.save(session).await?;
                println!("Saved attempt #{} ({}/{})", entry.id, entry.correct, entry.total);
            }
            _ => {}
        },
    }

    Ok(Flow::Continue)
}
