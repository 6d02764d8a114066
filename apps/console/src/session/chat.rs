//! Turn-exchange protocol for the chat assistant: advance a session by
//! exactly one user turn and one assistant turn.

use tracing::{info, warn};

use crate::engine::{Engine, EngineError, HistoryMessage};
use crate::errors::AppError;
use crate::session::{Role, SessionId, SessionKind, Transcript, Turn};

/// What the caller needs from one successful exchange, beyond the transcript
/// itself: the reply text plus the engine's confidence and escalation signal.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub reply: String,
    pub confidence: Option<f64>,
    pub escalated: bool,
}

pub struct ChatSession {
    id: SessionId,
    transcript: Transcript,
    in_flight: bool,
    hydrated: bool,
    /// Index of a provisional user turn whose exchange failed; a retry of the
    /// same text reuses it instead of appending a duplicate.
    pending_retry: Option<usize>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::with_id(SessionId::generate(SessionKind::Chat))
    }

    /// Resumes an existing session id, e.g. to hydrate its server-side
    /// history into a fresh client.
    pub fn with_id(id: SessionId) -> Self {
        ChatSession {
            id,
            transcript: Transcript::new(),
            in_flight: false,
            hydrated: false,
            pending_retry: None,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Replaces the local transcript with the engine's persisted history for
    /// this session id. Allowed exactly once, and only before any input has
    /// been accepted locally.
    pub async fn hydrate(&mut self, engine: &dyn Engine) -> Result<usize, AppError> {
        if self.hydrated || !self.transcript.is_empty() {
            return Err(AppError::HistoryAlreadyLoaded);
        }

        let messages = engine.chat_history(&self.id).await?;
        let turns = messages
            .into_iter()
            .map(turn_from_history)
            .collect::<Result<Vec<_>, _>>()?;

        info!(session_id = %self.id, turns = turns.len(), "hydrated chat history");
        self.transcript.replace_all(turns);
        self.hydrated = true;
        Ok(self.transcript.len())
    }

    /// Advances the session by one exchange.
    ///
    /// The user turn is appended optimistically before the engine call; on
    /// failure it stays in the transcript marked provisional, no assistant
    /// turn is appended, and the session remains usable for retry.
    pub async fn send(&mut self, engine: &dyn Engine, message: &str) -> Result<ChatOutcome, AppError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::Validation("Message must not be empty".to_string()));
        }
        if self.in_flight {
            return Err(AppError::ExchangeInFlight);
        }

        // One user message → at most one user turn: a retry of the text that
        // just failed reuses its provisional turn.
        let user_index = match self.pending_retry {
            Some(index) if self.transcript.turns()[index].content == message => index,
            _ => {
                let mut turn = Turn::user(message);
                turn.provisional = true;
                self.transcript.append(turn)
            }
        };
        self.pending_retry = Some(user_index);

        self.in_flight = true;
        let result = engine.chat(&self.id, message).await;
        self.in_flight = false;

        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "chat exchange failed");
                return Err(e.into());
            }
        };

        self.transcript.confirm(user_index);
        self.pending_retry = None;

        let mut assistant = Turn::assistant(reply.response.clone());
        assistant.confidence = reply.confidence;
        assistant.escalated = Some(reply.escalated);
        self.transcript.append(assistant);

        if reply.escalated {
            info!(session_id = %self.id, "query escalated to a human handler");
        }

        Ok(ChatOutcome {
            reply: reply.response,
            confidence: reply.confidence,
            escalated: reply.escalated,
        })
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

fn turn_from_history(message: HistoryMessage) -> Result<Turn, EngineError> {
    let role = match message.role.as_str() {
        "user" => Role::User,
        "assistant" => Role::Assistant,
        other => {
            return Err(EngineError::Protocol(format!(
                "unknown role '{other}' in chat history"
            )))
        }
    };
    Ok(Turn {
        role,
        content: message.message,
        confidence: message.confidence,
        escalated: Some(message.escalated),
        is_terminal: false,
        provisional: false,
        timestamp: message.timestamp,
    })
}
