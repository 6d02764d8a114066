//! Knowledge-base document browser: the durable document list plus uploads.

use tracing::info;

use crate::engine::Engine;
use crate::errors::AppError;
use crate::models::{DocType, DocumentRecord};
use crate::uploads;

#[derive(Default)]
pub struct DocumentLibrary {
    documents: Vec<DocumentRecord>,
}

impl DocumentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &[DocumentRecord] {
        &self.documents
    }

    pub async fn refresh(&mut self, engine: &dyn Engine) -> Result<usize, AppError> {
        self.documents = engine.list_documents().await?;
        Ok(self.documents.len())
    }

    /// Validates the file locally, uploads it under the given category, and
    /// refreshes the list.
    pub async fn upload(
        &mut self,
        engine: &dyn Engine,
        path: &str,
        doc_type: DocType,
    ) -> Result<(), AppError> {
        let filename = uploads::validate_upload(path)?;
        let bytes = tokio::fs::read(path).await?;
        engine.upload_document(&filename, bytes, doc_type).await?;
        info!(filename = %filename, doc_type = doc_type.as_str(), "document uploaded");
        self.refresh(engine).await?;
        Ok(())
    }
}
