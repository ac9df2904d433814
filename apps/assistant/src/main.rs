mod api_client;
mod config;
mod conversation;
mod errors;
mod models;
mod profile;
mod render;
mod state;

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api_client::HttpCvApi;
use crate::config::Config;
use crate::conversation::controller::{ExchangeOutcome, PendingExchange, Rejection};
use crate::conversation::cues::TerminalBell;
use crate::conversation::input::{parse_command, split_terminal_line, Command, ConfirmAction};
use crate::conversation::shortcuts;
use crate::profile::loader::ProfileStatus;
use crate::state::Session;

/// Notifications from background tasks back to the view loop.
enum UiEvent {
    ProfileChanged,
    ExchangeFinished,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr so they never interleave with the transcript.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("cv_assistant={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting CV assistant v{}", env!("CARGO_PKG_VERSION"));

    let api = HttpCvApi::new(&config)?;
    info!("CV API client initialized");

    let session = Session::new(config, Arc::new(api), Arc::new(TerminalBell));
    info!("Session {} started", session.conversation.session_id());

    run(session).await
}

async fn run(session: Session) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    info!("Using CV API at {}", session.config.api_base_url);

    spawn_profile_load(&session, tx.clone());
    print_sidebar(&session);
    for message in session.conversation.transcript() {
        println!("{}", render::render_message(&message));
    }
    let mut printed = session.conversation.len();
    println!("{}", render::render_shortcuts(true));
    println!("{}", render::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_line(&session, &line, &tx) {
                    break;
                }
                printed = print_new_messages(&session, printed);
            }
            Some(event) = rx.recv() => match event {
                UiEvent::ProfileChanged => print_sidebar(&session),
                UiEvent::ExchangeFinished => {
                    printed = print_new_messages(&session, printed);
                    println!("{}", render::render_shortcuts(session.conversation.shortcuts_enabled()));
                }
            },
        }
    }

    info!("Session {} ended", session.conversation.session_id());
    Ok(())
}

/// Handles one line of input. Returns `false` when the user asked to quit.
fn handle_line(session: &Session, line: &str, tx: &UnboundedSender<UiEvent>) -> bool {
    let conversation = &session.conversation;

    if let Some(command) = parse_command(line) {
        match command {
            Command::Quit => return false,
            Command::Help => println!("{}", render::HELP),
            Command::Retry => match session.profile.status() {
                ProfileStatus::Unavailable(_) => spawn_profile_retry(session, tx.clone()),
                ProfileStatus::Loading => println!("The profile is still loading."),
                ProfileStatus::Ready(_) => println!("The profile is already loaded."),
            },
            Command::Shortcut(number) => match shortcuts::by_number(number) {
                Some(_) if !conversation.shortcuts_enabled() => {
                    println!("{}", render::render_shortcuts(false));
                }
                Some(shortcut) => dispatch(conversation.begin_shortcut(shortcut), tx),
                None => println!("Unknown command. {}", render::HELP),
            },
            Command::Unknown(name) => println!("Unknown command {name}. {}", render::HELP),
        }
        return true;
    }

    let (text, key) = split_terminal_line(line);
    conversation.push_draft(text);
    if let ConfirmAction::Submit(question) = conversation.confirm(key) {
        dispatch(conversation.begin(&question), tx);
    }
    true
}

/// Resolves an accepted exchange on a background task.
fn dispatch(started: Result<PendingExchange, Rejection>, tx: &UnboundedSender<UiEvent>) {
    match started {
        Ok(pending) => {
            let tx = tx.clone();
            tokio::spawn(async move {
                if let ExchangeOutcome::Failed(message) = pending.resolve().await {
                    debug!("Exchange failed: {message}");
                }
                let _ = tx.send(UiEvent::ExchangeFinished);
            });
        }
        Err(Rejection::EmptyQuestion) => {}
        Err(Rejection::RequestOutstanding) => {
            println!(
                "Still waiting for the previous answer. Your text is kept: press Enter on an empty line to send it, or keep typing to add to it."
            );
        }
    }
}

fn spawn_profile_load(session: &Session, tx: UnboundedSender<UiEvent>) {
    let profile = session.profile.clone();
    tokio::spawn(async move {
        // Failures are already translated into the loader's status.
        let _ = profile.load().await;
        let _ = tx.send(UiEvent::ProfileChanged);
    });
}

fn spawn_profile_retry(session: &Session, tx: UnboundedSender<UiEvent>) {
    let profile = session.profile.clone();
    tokio::spawn(async move {
        let _ = profile.retry().await;
        let _ = tx.send(UiEvent::ProfileChanged);
    });
}

fn print_sidebar(session: &Session) {
    let profile = &session.profile;
    println!(
        "{}",
        render::render_sidebar(&profile.status(), &profile.display(), &profile.pills_for_display())
    );
}

fn print_new_messages(session: &Session, printed: usize) -> usize {
    let new_messages = session.conversation.messages_since(printed);
    for message in &new_messages {
        println!("{}", render::render_message(message));
    }
    printed + new_messages.len()
}
