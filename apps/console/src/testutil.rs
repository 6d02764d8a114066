//! Scripted engine double for unit tests: queued replies per operation and a
//! call counter, so "no network call happened" is a direct assertion.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::engine::{
    ChatReply, Engine, EngineError, HistoryMessage, InterviewRecord, InterviewReply,
};
use crate::models::{DocType, DocumentRecord, ResumeCatalogItem, ScreeningResult};
use crate::session::SessionId;

#[derive(Default)]
pub struct MockEngine {
    chat_replies: Mutex<VecDeque<Result<ChatReply, EngineError>>>,
    interview_replies: Mutex<VecDeque<Result<InterviewReply, EngineError>>>,
    screen_replies: Mutex<VecDeque<Result<Vec<ScreeningResult>, EngineError>>>,
    history: Mutex<Vec<HistoryMessage>>,
    resumes: Mutex<Vec<ResumeCatalogItem>>,
    documents: Mutex<Vec<DocumentRecord>>,
    record: Mutex<Option<InterviewRecord>>,
    uploads: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_chat(&self, reply: Result<ChatReply, EngineError>) {
        self.chat_replies.lock().unwrap().push_back(reply);
    }

    pub fn push_interview(&self, reply: Result<InterviewReply, EngineError>) {
        self.interview_replies.lock().unwrap().push_back(reply);
    }

    pub fn push_screen(&self, reply: Result<Vec<ScreeningResult>, EngineError>) {
        self.screen_replies.lock().unwrap().push_back(reply);
    }

    pub fn set_history(&self, messages: Vec<HistoryMessage>) {
        *self.history.lock().unwrap() = messages;
    }

    pub fn set_resumes(&self, resumes: Vec<ResumeCatalogItem>) {
        *self.resumes.lock().unwrap() = resumes;
    }

    pub fn set_documents(&self, documents: Vec<DocumentRecord>) {
        *self.documents.lock().unwrap() = documents;
    }

    pub fn set_record(&self, record: InterviewRecord) {
        *self.record.lock().unwrap() = Some(record);
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    /// Total engine calls performed, across all operations.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Engine for MockEngine {
    async fn chat(&self, _session_id: &SessionId, _message: &str) -> Result<ChatReply, EngineError> {
        self.record_call();
        self.chat_replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("MockEngine: unscripted chat call")
    }

    async fn chat_history(
        &self,
        _session_id: &SessionId,
    ) -> Result<Vec<HistoryMessage>, EngineError> {
        self.record_call();
        Ok(self.history.lock().unwrap().clone())
    }

    async fn interview(
        &self,
        _session_id: &SessionId,
        _candidate_name: &str,
        _position: &str,
        _message: Option<&str>,
    ) -> Result<InterviewReply, EngineError> {
        self.record_call();
        self.interview_replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("MockEngine: unscripted interview call")
    }

    async fn interview_record(
        &self,
        session_id: &SessionId,
    ) -> Result<InterviewRecord, EngineError> {
        self.record_call();
        self.record
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| EngineError::Api {
                status: 404,
                message: format!("Interview session not found: {session_id}"),
            })
    }

    async fn list_resumes(&self) -> Result<Vec<ResumeCatalogItem>, EngineError> {
        self.record_call();
        Ok(self.resumes.lock().unwrap().clone())
    }

    async fn upload_resume(&self, filename: &str, _bytes: Vec<u8>) -> Result<(), EngineError> {
        self.record_call();
        self.uploads.lock().unwrap().push(filename.to_string());
        Ok(())
    }

    async fn screen_resumes(
        &self,
        _job_description: &str,
    ) -> Result<Vec<ScreeningResult>, EngineError> {
        self.record_call();
        self.screen_replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("MockEngine: unscripted screen call")
    }

    async fn list_documents(&self) -> Result<Vec<DocumentRecord>, EngineError> {
        self.record_call();
        Ok(self.documents.lock().unwrap().clone())
    }

    async fn upload_document(
        &self,
        filename: &str,
        _bytes: Vec<u8>,
        _doc_type: DocType,
    ) -> Result<(), EngineError> {
        self.record_call();
        self.uploads.lock().unwrap().push(filename.to_string());
        Ok(())
    }
}
