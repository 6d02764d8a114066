//! HTTP implementation of the [`Engine`] trait against the backend API.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{DocType, DocumentRecord, ResumeCatalogItem, ScreeningResult};
use crate::session::SessionId;

use super::{
    ChatReply, Engine, EngineError, HistoryMessage, InterviewRecord, InterviewReply,
};

/// Outbound request timeout. Screening runs call the LLM once per resume on
/// the backend, so this is deliberately generous. There is no retry loop:
/// failures surface to the user, who re-issues the action.
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    session_id: &'a str,
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct InterviewRequest<'a> {
    session_id: &'a str,
    candidate_name: &'a str,
    position: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ScreenRequest<'a> {
    job_description: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatHistoryResponse {
    #[serde(default)]
    messages: Vec<HistoryMessage>,
}

#[derive(Debug, Deserialize)]
struct ResumesResponse {
    #[serde(default)]
    resumes: Vec<ResumeCatalogItem>,
}

#[derive(Debug, Deserialize)]
struct ScreenResponse {
    #[serde(default)]
    results: Vec<ScreeningResult>,
}

#[derive(Debug, Deserialize)]
struct DocumentsResponse {
    #[serde(default)]
    documents: Vec<DocumentRecord>,
}

/// FastAPI error body shape.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    detail: String,
}

#[derive(Clone)]
pub struct HttpEngine {
    client: Client,
    base_url: String,
}

impl HttpEngine {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a prepared request and decodes the JSON body, converting
    /// non-success statuses into `EngineError::Api` with the backend's
    /// `detail` message when one is present.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, EngineError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.detail)
                .unwrap_or(body);
            return Err(EngineError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(EngineError::Parse)
    }
}

#[async_trait]
impl Engine for HttpEngine {
    async fn chat(&self, session_id: &SessionId, message: &str) -> Result<ChatReply, EngineError> {
        debug!(session_id = %session_id, "POST /chat");
        let request = self.client.post(self.url("/chat")).json(&ChatRequest {
            session_id: session_id.as_str(),
            message,
        });
        self.execute(request).await
    }

    async fn chat_history(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<HistoryMessage>, EngineError> {
        debug!(session_id = %session_id, "GET /chat-history");
        let request = self
            .client
            .get(self.url(&format!("/chat-history/{}", session_id)));
        let body: ChatHistoryResponse = self.execute(request).await?;
        Ok(body.messages)
    }

    async fn interview(
        &self,
        session_id: &SessionId,
        candidate_name: &str,
        position: &str,
        message: Option<&str>,
    ) -> Result<InterviewReply, EngineError> {
        debug!(session_id = %session_id, continuing = message.is_some(), "POST /interview");
        let request = self
            .client
            .post(self.url("/interview"))
            .json(&InterviewRequest {
                session_id: session_id.as_str(),
                candidate_name,
                position,
                message,
            });
        self.execute(request).await
    }

    async fn interview_record(
        &self,
        session_id: &SessionId,
    ) -> Result<InterviewRecord, EngineError> {
        debug!(session_id = %session_id, "GET /interview");
        let request = self
            .client
            .get(self.url(&format!("/interview/{}", session_id)));
        self.execute(request).await
    }

    async fn list_resumes(&self) -> Result<Vec<ResumeCatalogItem>, EngineError> {
        let request = self.client.get(self.url("/resumes"));
        let body: ResumesResponse = self.execute(request).await?;
        Ok(body.resumes)
    }

    async fn upload_resume(&self, filename: &str, bytes: Vec<u8>) -> Result<(), EngineError> {
        debug!(filename, "POST /upload-resume");
        let form = Form::new().part("file", Part::bytes(bytes).file_name(filename.to_string()));
        let request = self.client.post(self.url("/upload-resume")).multipart(form);
        let _: serde_json::Value = self.execute(request).await?;
        Ok(())
    }

    async fn screen_resumes(
        &self,
        job_description: &str,
    ) -> Result<Vec<ScreeningResult>, EngineError> {
        debug!("POST /screen-resumes");
        let request = self
            .client
            .post(self.url("/screen-resumes"))
            .json(&ScreenRequest { job_description });
        let body: ScreenResponse = self.execute(request).await?;
        Ok(body.results)
    }

    async fn list_documents(&self) -> Result<Vec<DocumentRecord>, EngineError> {
        let request = self.client.get(self.url("/documents"));
        let body: DocumentsResponse = self.execute(request).await?;
        Ok(body.documents)
    }

    async fn upload_document(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        doc_type: DocType,
    ) -> Result<(), EngineError> {
        debug!(filename, doc_type = doc_type.as_str(), "POST /upload-document");
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(filename.to_string()))
            .text("doc_type", doc_type.as_str());
        let request = self
            .client
            .post(self.url("/upload-document"))
            .multipart(form);
        let _: serde_json::Value = self.execute(request).await?;
        Ok(())
    }
}
