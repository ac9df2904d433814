//! Conversation Controller — owns the transcript and the ask lifecycle.
//!
//! Lifecycle per question: `Idle → Sending → (Answered | Failed) → Idle`.
//! Only one exchange may be `Sending` for the whole transcript; a submission
//! made meanwhile is rejected, never queued. Because of that, the reply to
//! question N always lands before any message of question N+1.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api_client::{AskRequest, AskResponse, CvApi};
use crate::conversation::cues::{Cue, CueSink};
use crate::conversation::input::{ConfirmAction, ConfirmKey, Draft};
use crate::conversation::shortcuts::Shortcut;
use crate::errors::RemoteError;
use crate::models::message::{HistoryEntry, Message};

pub const GREETING: &str = "Hi! I'm Mayar's AI assistant. Ask me anything about his experience, \
skills, projects, or education.";
pub const FAILURE_PREFIX: &str = "Sorry — ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Sending,
}

/// Why a submission was turned into a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    EmptyQuestion,
    RequestOutstanding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    Answered,
    /// Carries the translated message that was appended after the prefix.
    Failed(String),
}

#[derive(Debug)]
struct ConversationState {
    transcript: Vec<Message>,
    phase: Phase,
    draft: Draft,
}

/// Per-session conversation state. Cheap to clone; clones share the transcript.
#[derive(Clone)]
pub struct ConversationController {
    session_id: Uuid,
    api: Arc<dyn CvApi>,
    cues: Arc<dyn CueSink>,
    state: Arc<Mutex<ConversationState>>,
}

impl ConversationController {
    /// Starts a fresh transcript seeded with the greeting.
    pub fn new(api: Arc<dyn CvApi>, cues: Arc<dyn CueSink>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            api,
            cues,
            state: Arc::new(Mutex::new(ConversationState {
                transcript: vec![Message::assistant(GREETING)],
                phase: Phase::Idle,
                draft: Draft::default(),
            })),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn transcript(&self) -> Vec<Message> {
        self.lock().transcript.clone()
    }

    /// Messages appended after the first `from` ones.
    pub fn messages_since(&self, from: usize) -> Vec<Message> {
        self.lock().transcript.iter().skip(from).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().transcript.len()
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    pub fn is_sending(&self) -> bool {
        self.phase() == Phase::Sending
    }

    pub fn shortcuts_enabled(&self) -> bool {
        !self.is_sending()
    }

    #[cfg(test)]
    pub fn draft(&self) -> String {
        self.lock().draft.as_str().to_string()
    }

    pub fn push_draft(&self, text: &str) {
        self.lock().draft.push_str(text);
    }

    /// Applies the confirm key to the draft. A `Submit` action still has to
    /// be passed to `begin`/`submit` by the caller.
    pub fn confirm(&self, key: ConfirmKey) -> ConfirmAction {
        self.lock().draft.confirm(key)
    }

    /// Validates and records a question, moving to `Sending`.
    ///
    /// On acceptance the user message is already in the transcript, the
    /// draft is cleared and the "sent" cue has fired. The returned exchange
    /// must be resolved to get back to `Idle`.
    pub fn begin(&self, question: &str) -> Result<PendingExchange, Rejection> {
        let question = question.trim();
        let request = {
            let mut state = self.lock();
            if question.is_empty() {
                return Err(Rejection::EmptyQuestion);
            }
            if state.phase == Phase::Sending {
                debug!(session_id = %self.session_id, "Submission ignored: request outstanding");
                return Err(Rejection::RequestOutstanding);
            }

            let history = state.transcript.iter().map(HistoryEntry::from).collect();
            state.transcript.push(Message::user(question));
            state.phase = Phase::Sending;
            state.draft.clear();

            AskRequest {
                question: question.to_string(),
                history,
            }
        };

        info!(session_id = %self.session_id, "Question submitted ({} chars)", question.len());
        self.cues.play(Cue::Sent);

        Ok(PendingExchange {
            controller: self.clone(),
            request,
        })
    }

    /// Shortcuts go through the same gate as typed questions.
    pub fn begin_shortcut(&self, shortcut: &Shortcut) -> Result<PendingExchange, Rejection> {
        self.begin(shortcut.question)
    }

    /// Runs a whole exchange: `begin`, then wait for the remote answer.
    #[cfg(test)]
    pub async fn submit(&self, question: &str) -> Result<ExchangeOutcome, Rejection> {
        let pending = self.begin(question)?;
        Ok(pending.resolve().await)
    }

    fn finish(&self, result: Result<AskResponse, RemoteError>) -> ExchangeOutcome {
        let (message, outcome) = match result {
            Ok(response) => (
                Message::assistant(response.answer_text()),
                ExchangeOutcome::Answered,
            ),
            Err(e) => {
                warn!(session_id = %self.session_id, "Ask failed: {e}");
                let translated = e.ask_message();
                (
                    Message::assistant(format!("{FAILURE_PREFIX}{translated}")),
                    ExchangeOutcome::Failed(translated),
                )
            }
        };

        {
            let mut state = self.lock();
            state.transcript.push(message);
            state.phase = Phase::Idle;
        }

        self.cues.play(Cue::Received);
        outcome
    }

    fn lock(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// An accepted question whose answer has not arrived yet.
///
/// There is no cancellation: drive `resolve` to completion, otherwise the
/// controller stays in `Sending`.
#[must_use = "the controller stays in Sending until the exchange is resolved"]
pub struct PendingExchange {
    controller: ConversationController,
    request: AskRequest,
}

impl PendingExchange {
    pub async fn resolve(self) -> ExchangeOutcome {
        let result = self.controller.api.ask(&self.request).await;
        self.controller.finish(result)
    }
}
