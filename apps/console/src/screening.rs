//! Resume screening view: runs screenings and reconciles what to display.
//!
//! The view owns two independently-sourced collections and never merges
//! them: `last_run` is the transient result of the most recent screening
//! (lost when the process exits), `catalog` is the durable record of
//! uploads with each item's last persisted score. Display resolution picks
//! one source or the other, never a mix of incomparable rankings.

use tracing::info;

use crate::engine::Engine;
use crate::errors::AppError;
use crate::models::{ResumeCatalogItem, ScreeningResult};
use crate::uploads;

/// One row of the resolved display list. `rank` is the 1-based position in
/// the resolved sequence, recomputed on every resolution and never persisted.
#[derive(Debug, Clone)]
pub struct RankedResult {
    pub rank: usize,
    pub id: String,
    pub filename: String,
    pub score: f64,
    pub analysis: Option<String>,
}

/// Resolves what the screening view should display.
///
/// A non-empty `last_run` wins and is shown verbatim in the order received;
/// the engine is the sole ranking authority and nothing is re-sorted here.
/// Otherwise the catalog items carrying a persisted score are shown in
/// catalog order, a degraded view with no ranking guarantee. Neither source
/// is mutated.
pub fn resolve_display_list(
    last_run: &[ScreeningResult],
    catalog: &[ResumeCatalogItem],
) -> Vec<RankedResult> {
    if !last_run.is_empty() {
        return last_run
            .iter()
            .enumerate()
            .map(|(i, result)| RankedResult {
                rank: i + 1,
                id: result.id.clone(),
                filename: result.filename.clone(),
                score: result.score,
                analysis: result.analysis.clone(),
            })
            .collect();
    }

    catalog
        .iter()
        .filter_map(|item| {
            item.score.map(|score| (item, score))
        })
        .enumerate()
        .map(|(i, (item, score))| RankedResult {
            rank: i + 1,
            id: item.id.clone(),
            filename: item.filename.clone(),
            score,
            analysis: item.analysis.clone(),
        })
        .collect()
}

#[derive(Default)]
pub struct ScreeningView {
    catalog: Vec<ResumeCatalogItem>,
    last_run: Vec<ScreeningResult>,
}

impl ScreeningView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &[ResumeCatalogItem] {
        &self.catalog
    }

    pub fn last_run(&self) -> &[ScreeningResult] {
        &self.last_run
    }

    /// Reloads the durable catalog from the engine. The transient run is
    /// untouched.
    pub async fn refresh_catalog(&mut self, engine: &dyn Engine) -> Result<usize, AppError> {
        self.catalog = engine.list_resumes().await?;
        Ok(self.catalog.len())
    }

    /// Uploads a resume file, then refreshes the catalog so the new item is
    /// visible. The extension is validated locally before any I/O.
    pub async fn upload(&mut self, engine: &dyn Engine, path: &str) -> Result<(), AppError> {
        let filename = uploads::validate_upload(path)?;
        let bytes = tokio::fs::read(path).await?;
        engine.upload_resume(&filename, bytes).await?;
        info!(filename = %filename, "resume uploaded");
        self.refresh_catalog(engine).await?;
        Ok(())
    }

    /// Runs a screening against every uploaded resume and stores the results
    /// in the exact order the engine returned them.
    pub async fn screen(&mut self, engine: &dyn Engine, job_description: &str) -> Result<usize, AppError> {
        let job_description = job_description.trim();
        if job_description.is_empty() {
            return Err(AppError::Validation(
                "Job description must not be empty".to_string(),
            ));
        }

        let results = engine.screen_resumes(job_description).await?;
        info!(results = results.len(), "screening run finished");
        self.last_run = results;
        Ok(self.last_run.len())
    }

    /// The reconciled, rank-annotated list to display.
    pub fn display_list(&self) -> Vec<RankedResult> {
        resolve_display_list(&self.last_run, &self.catalog)
    }
}
