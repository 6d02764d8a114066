//! Shared data models for the screening and document surfaces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Knowledge-base document category, as the backend's upload form names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    Hr,
    Policy,
    General,
}

impl DocType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::Hr => "hr",
            DocType::Policy => "policy",
            DocType::General => "general",
        }
    }

    /// Parses user input; the backend's form default is `hr`.
    pub fn parse(input: &str) -> Result<Self, AppError> {
        match input.trim().to_lowercase().as_str() {
            "" | "hr" => Ok(DocType::Hr),
            "policy" => Ok(DocType::Policy),
            "general" => Ok(DocType::General),
            other => Err(AppError::Validation(format!(
                "Unknown document type '{other}' (expected hr, policy, or general)"
            ))),
        }
    }
}

/// A durable uploaded resume, independent of any screening run. `score` and
/// `analysis` carry the outcome of its most recent screening, if any.
#[derive(Debug, Clone, Deserialize)]
pub struct ResumeCatalogItem {
    pub id: String,
    pub filename: String,
    pub candidate_name: Option<String>,
    pub score: Option<f64>,
    pub analysis: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// One candidate's evaluation within a single screening run. The engine
/// returns these pre-sorted by score descending; rank is never stored, it is
/// the 1-based position in the resolved display list.
#[derive(Debug, Clone, Deserialize)]
pub struct ScreeningResult {
    #[serde(rename = "resume_id")]
    pub id: String,
    pub filename: String,
    pub score: f64,
    pub analysis: Option<String>,
}

/// A knowledge-base document record; `content` is a stored preview, not the
/// full text.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub filename: String,
    pub content: String,
    pub doc_type: DocType,
    pub uploaded_at: DateTime<Utc>,
}
