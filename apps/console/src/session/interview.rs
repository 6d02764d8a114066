//! Interview conductor: a turn-exchange session with an explicit lifecycle
//! and a one-time terminal scoring event.
//!
//! Lifecycle: `NotStarted → InProgress → Completed`. `Completed` is terminal;
//! the final score lives inside that variant, so it cannot exist earlier and
//! cannot change after.

use tracing::{info, warn};

use crate::engine::{Engine, EngineError};
use crate::errors::AppError;
use crate::session::{SessionId, SessionKind, Transcript, Turn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InterviewPhase {
    NotStarted,
    InProgress,
    Completed { final_score: f64 },
}

/// Candidate details, supplied once at `start` and immutable thereafter.
#[derive(Debug, Clone)]
struct Candidate {
    name: String,
    position: String,
}

/// What one interview exchange produced: the next question, or the terminal
/// evaluation with its score.
#[derive(Debug, Clone)]
pub enum InterviewStep {
    Question {
        text: String,
        number: Option<u32>,
    },
    Evaluation {
        text: String,
        final_score: f64,
    },
}

pub struct InterviewSession {
    id: SessionId,
    candidate: Option<Candidate>,
    phase: InterviewPhase,
    transcript: Transcript,
    in_flight: bool,
}

impl InterviewSession {
    pub fn new() -> Self {
        InterviewSession {
            id: SessionId::generate(SessionKind::Interview),
            candidate: None,
            phase: InterviewPhase::NotStarted,
            transcript: Transcript::new(),
            in_flight: false,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn phase(&self) -> InterviewPhase {
        self.phase
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The final score, readable iff the interview is completed.
    pub fn final_score(&self) -> Option<f64> {
        match self.phase {
            InterviewPhase::Completed { final_score } => Some(final_score),
            _ => None,
        }
    }

    pub fn candidate_name(&self) -> Option<&str> {
        self.candidate.as_ref().map(|c| c.name.as_str())
    }

    pub fn position(&self) -> Option<&str> {
        self.candidate.as_ref().map(|c| c.position.as_str())
    }

    /// Begins the interview: stores the candidate details, asks the engine
    /// for the opening question, and transitions to `InProgress`.
    pub async fn start(
        &mut self,
        engine: &dyn Engine,
        candidate_name: &str,
        position: &str,
    ) -> Result<InterviewStep, AppError> {
        if self.phase != InterviewPhase::NotStarted {
            return Err(AppError::AlreadyStarted);
        }
        let candidate_name = candidate_name.trim();
        let position = position.trim();
        if candidate_name.is_empty() {
            return Err(AppError::Validation("Candidate name must not be empty".to_string()));
        }
        if position.is_empty() {
            return Err(AppError::Validation("Position must not be empty".to_string()));
        }
        if self.in_flight {
            return Err(AppError::ExchangeInFlight);
        }

        self.in_flight = true;
        let result = engine
            .interview(&self.id, candidate_name, position, None)
            .await;
        self.in_flight = false;

        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "interview start failed");
                return Err(e.into());
            }
        };

        self.candidate = Some(Candidate {
            name: candidate_name.to_string(),
            position: position.to_string(),
        });
        self.phase = InterviewPhase::InProgress;
        self.transcript.append(Turn::assistant(reply.response.clone()));
        info!(session_id = %self.id, position, "interview started");

        Ok(InterviewStep::Question {
            text: reply.response,
            number: reply.question_number,
        })
    }

    /// Submits one candidate answer. On a terminal reply the assistant turn
    /// is marked terminal, the score is set exactly once, and the phase
    /// transitions to `Completed`; afterwards `answer` is rejected.
    ///
    /// On engine failure the transcript is left exactly as it was.
    pub async fn answer(
        &mut self,
        engine: &dyn Engine,
        message: &str,
    ) -> Result<InterviewStep, AppError> {
        match self.phase {
            InterviewPhase::NotStarted => {
                return Err(AppError::Validation(
                    "Interview has not been started".to_string(),
                ))
            }
            InterviewPhase::Completed { .. } => return Err(AppError::SessionCompleted),
            InterviewPhase::InProgress => {}
        }
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::Validation("Answer must not be empty".to_string()));
        }
        if self.in_flight {
            return Err(AppError::ExchangeInFlight);
        }

        // Set after the phase check above, so unwrap-free access is safe.
        let candidate = self
            .candidate
            .clone()
            .ok_or_else(|| AppError::Validation("Interview has not been started".to_string()))?;

        self.in_flight = true;
        let result = engine
            .interview(&self.id, &candidate.name, &candidate.position, Some(message))
            .await;
        self.in_flight = false;

        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "interview exchange failed");
                return Err(e.into());
            }
        };

        // Validate the terminal reply fully before mutating anything.
        let step = if reply.completed {
            let final_score = reply.score.ok_or_else(|| {
                EngineError::Protocol("completed interview reply carries no score".to_string())
            })?;
            InterviewStep::Evaluation {
                text: reply.response.clone(),
                final_score,
            }
        } else {
            InterviewStep::Question {
                text: reply.response.clone(),
                number: reply.question_number,
            }
        };

        self.transcript.append(Turn::user(message));
        let mut assistant = Turn::assistant(reply.response);
        if let InterviewStep::Evaluation { final_score, .. } = &step {
            assistant.is_terminal = true;
            self.phase = InterviewPhase::Completed {
                final_score: *final_score,
            };
            info!(session_id = %self.id, final_score, "interview completed");
        }
        self.transcript.append(assistant);

        Ok(step)
    }
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::InterviewReply;
    use crate::session::Role;
    use crate::testutil::MockEngine;

    fn question(text: &str) -> InterviewReply {
        InterviewReply {
            response: text.to_string(),
            question_number: Some(1),
            completed: false,
            score: None,
        }
    }

    fn evaluation(text: &str, score: f64) -> InterviewReply {
        InterviewReply {
            response: text.to_string(),
            question_number: None,
            completed: true,
            score: Some(score),
        }
    }

    #[tokio::test]
    async fn start_appends_opening_question_and_enters_in_progress() {
        let engine = MockEngine::new();
        engine.push_interview(Ok(question("Tell me about yourself")));

        let mut session = InterviewSession::new();
        let step = session.start(&engine, "Ada", "Backend Engineer").await.unwrap();

        assert!(matches!(step, InterviewStep::Question { ref text, .. } if text == "Tell me about yourself"));
        assert_eq!(session.phase(), InterviewPhase::InProgress);
        assert_eq!(session.candidate_name(), Some("Ada"));
        assert_eq!(session.position(), Some("Backend Engineer"));

        let turns = session.transcript().turns();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, Role::Assistant);
        assert!(!turns[0].is_terminal);
    }

    #[tokio::test]
    async fn start_rejects_blank_fields_without_network_call() {
        let engine = MockEngine::new();
        let mut session = InterviewSession::new();

        assert!(matches!(
            session.start(&engine, "  ", "Backend Engineer").await.unwrap_err(),
            AppError::Validation(_)
        ));
        assert!(matches!(
            session.start(&engine, "Ada", "").await.unwrap_err(),
            AppError::Validation(_)
        ));
        assert_eq!(session.phase(), InterviewPhase::NotStarted);
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn second_start_is_rejected() {
        let engine = MockEngine::new();
        engine.push_interview(Ok(question("Q1")));

        let mut session = InterviewSession::new();
        session.start(&engine, "Ada", "Backend Engineer").await.unwrap();

        let calls = engine.calls();
        let err = session.start(&engine, "Ada", "Backend Engineer").await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyStarted));
        assert_eq!(engine.calls(), calls);
    }

    #[tokio::test]
    async fn terminal_reply_sets_score_once_and_completes() {
        let engine = MockEngine::new();
        engine.push_interview(Ok(question("Tell me about yourself")));
        engine.push_interview(Ok(evaluation("Great, final score: 82", 82.0)));

        let mut session = InterviewSession::new();
        session.start(&engine, "Ada", "Backend Engineer").await.unwrap();
        assert_eq!(session.final_score(), None);

        let step = session
            .answer(&engine, "I have 5 years of experience building services.")
            .await
            .unwrap();
        assert!(matches!(step, InterviewStep::Evaluation { final_score, .. } if final_score == 82.0));
        assert_eq!(session.phase(), InterviewPhase::Completed { final_score: 82.0 });
        assert_eq!(session.final_score(), Some(82.0));

        let last = session.transcript().last().unwrap();
        assert!(last.is_terminal);
        assert_eq!(last.role, Role::Assistant);
    }

    #[tokio::test]
    async fn answer_after_completion_is_rejected_with_no_mutation() {
        let engine = MockEngine::new();
        engine.push_interview(Ok(question("Q1")));
        engine.push_interview(Ok(evaluation("Done", 75.0)));

        let mut session = InterviewSession::new();
        session.start(&engine, "Ada", "Backend Engineer").await.unwrap();
        session.answer(&engine, "my answer").await.unwrap();

        let len_before = session.transcript().len();
        let calls_before = engine.calls();

        let err = session.answer(&engine, "one more thing").await.unwrap_err();
        assert!(matches!(err, AppError::SessionCompleted));
        assert_eq!(session.transcript().len(), len_before);
        assert_eq!(engine.calls(), calls_before);
        assert_eq!(session.final_score(), Some(75.0));
    }

    #[tokio::test]
    async fn answer_before_start_is_rejected() {
        let engine = MockEngine::new();
        let mut session = InterviewSession::new();

        let err = session.answer(&engine, "hello").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn failed_answer_leaves_transcript_untouched() {
        let engine = MockEngine::new();
        engine.push_interview(Ok(question("Q1")));
        engine.push_interview(Err(EngineError::Api {
            status: 500,
            message: "engine down".to_string(),
        }));
        engine.push_interview(Ok(question("Q2")));

        let mut session = InterviewSession::new();
        session.start(&engine, "Ada", "Backend Engineer").await.unwrap();

        let err = session.answer(&engine, "my answer").await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.phase(), InterviewPhase::InProgress);

        // Retryable: the same answer goes through on the next attempt.
        session.answer(&engine, "my answer").await.unwrap();
        assert_eq!(session.transcript().len(), 3);
    }

    #[tokio::test]
    async fn completed_reply_without_score_is_a_protocol_error() {
        let engine = MockEngine::new();
        engine.push_interview(Ok(question("Q1")));
        engine.push_interview(Ok(InterviewReply {
            response: "Done".to_string(),
            question_number: None,
            completed: true,
            score: None,
        }));

        let mut session = InterviewSession::new();
        session.start(&engine, "Ada", "Backend Engineer").await.unwrap();

        let err = session.answer(&engine, "my answer").await.unwrap_err();
        assert!(matches!(err, AppError::Engine(EngineError::Protocol(_))));
        assert_eq!(session.phase(), InterviewPhase::InProgress);
        assert_eq!(session.transcript().len(), 1);
    }

    #[tokio::test]
    async fn blank_answer_is_rejected_locally() {
        let engine = MockEngine::new();
        engine.push_interview(Ok(question("Q1")));

        let mut session = InterviewSession::new();
        session.start(&engine, "Ada", "Backend Engineer").await.unwrap();

        let calls = engine.calls();
        let err = session.answer(&engine, "   ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(engine.calls(), calls);
        assert_eq!(session.transcript().len(), 1);
    }
}
