//! Engine boundary — the single point of entry for all backend calls.
//!
//! ARCHITECTURAL RULE: no other module may touch the backend HTTP API
//! directly. Sessions and views talk to `dyn Engine`; the one production
//! implementation is [`http::HttpEngine`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::models::{DocType, DocumentRecord, ResumeCatalogItem, ScreeningResult};
use crate::session::SessionId;

pub mod http;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// One chat exchange's answer, as returned by `POST /chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub confidence: Option<f64>,
    #[serde(default)]
    pub escalated: bool,
}

/// One persisted transcript entry, as returned by `GET /chat-history/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryMessage {
    pub role: String,
    pub message: String,
    pub confidence: Option<f64>,
    #[serde(default)]
    pub escalated: bool,
    pub timestamp: DateTime<Utc>,
}

/// The engine's answer to `POST /interview`: either the next question or,
/// when `completed` is set, the terminal evaluation.
#[derive(Debug, Clone, Deserialize)]
pub struct InterviewReply {
    pub response: String,
    pub question_number: Option<u32>,
    #[serde(default)]
    pub completed: bool,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordedMessage {
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A persisted interview session, as returned by `GET /interview/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct InterviewRecord {
    pub id: String,
    pub candidate_name: String,
    pub position: String,
    #[serde(default)]
    pub messages: Vec<RecordedMessage>,
    pub evaluation: Option<String>,
    pub score: Option<f64>,
}

/// The backend engine seam. Sessions and views are written against this
/// trait so tests can script the engine without a network.
#[async_trait]
pub trait Engine: Send + Sync {
    async fn chat(&self, session_id: &SessionId, message: &str) -> Result<ChatReply, EngineError>;

    async fn chat_history(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<HistoryMessage>, EngineError>;

    /// Starts (no `message`) or continues (with `message`) an interview.
    async fn interview(
        &self,
        session_id: &SessionId,
        candidate_name: &str,
        position: &str,
        message: Option<&str>,
    ) -> Result<InterviewReply, EngineError>;

    async fn interview_record(
        &self,
        session_id: &SessionId,
    ) -> Result<InterviewRecord, EngineError>;

    async fn list_resumes(&self) -> Result<Vec<ResumeCatalogItem>, EngineError>;

    async fn upload_resume(&self, filename: &str, bytes: Vec<u8>) -> Result<(), EngineError>;

    /// Runs a screening against all uploaded resumes. The returned list is
    /// pre-sorted by score descending; callers must preserve its order.
    async fn screen_resumes(
        &self,
        job_description: &str,
    ) -> Result<Vec<ScreeningResult>, EngineError>;

    async fn list_documents(&self) -> Result<Vec<DocumentRecord>, EngineError>;

    async fn upload_document(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        doc_type: DocType,
    ) -> Result<(), EngineError>;
}
