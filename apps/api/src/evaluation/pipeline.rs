//! Evaluation pipeline — guard → extract → prompt → model.
//!
//! Each call is one self-contained request. Nothing is cached between calls and
//! nothing is retried: extraction and model failures surface as
//! `"An error occurred: ..."` and the user decides whether to try again.

use std::str::FromStr;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::evaluation::prompts::{ATS_MATCH_PROMPT, GENERAL_EVALUATION_PROMPT};
use crate::extraction::{ExtractedContent, ExtractionError, PdfExtractor};
use crate::llm_client::{ModelClient, ModelError};

pub const MISSING_INPUT_MESSAGE: &str = "Please upload a resume and enter the job description.";

/// Which of the two evaluations the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    GeneralEvaluation,
    AtsMatch,
}

impl Action {
    pub fn prompt(self) -> &'static str {
        match self {
            Action::GeneralEvaluation => GENERAL_EVALUATION_PROMPT,
            Action::AtsMatch => ATS_MATCH_PROMPT,
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Action::GeneralEvaluation => "HR Evaluation Response",
            Action::AtsMatch => "ATS Evaluation Response",
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" | "general_evaluation" => Ok(Action::GeneralEvaluation),
            "ats" | "ats_match" => Ok(Action::AtsMatch),
            other => Err(format!("unknown action '{other}' (expected 'general' or 'ats')")),
        }
    }
}

/// The uploaded PDF, alive only for the duration of one request.
#[derive(Debug, Clone)]
pub struct UploadedResume {
    pub file_name: String,
    pub bytes: Bytes,
}

/// A successful evaluation, ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub action: Action,
    pub heading: &'static str,
    pub response: String,
}

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("{}", MISSING_INPUT_MESSAGE)]
    MissingInput,

    #[error("An error occurred: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("An error occurred: {0}")]
    Model(#[from] ModelError),
}

#[derive(Clone)]
pub struct Pipeline {
    extractor: Arc<dyn PdfExtractor>,
    model: Arc<dyn ModelClient>,
}

impl Pipeline {
    pub fn new(extractor: Arc<dyn PdfExtractor>, model: Arc<dyn ModelClient>) -> Self {
        Self { extractor, model }
    }

    pub async fn run(
        &self,
        action: Action,
        job_description: &str,
        resume: Option<UploadedResume>,
    ) -> Result<Evaluation, EvaluationError> {
        let resume = match resume {
            Some(resume) if !job_description.trim().is_empty() => resume,
            _ => return Err(EvaluationError::MissingInput),
        };

        info!(
            "Running {:?} for '{}' ({} bytes)",
            action,
            resume.file_name,
            resume.bytes.len()
        );

        let result = self.evaluate(action, job_description, resume.bytes).await;
        if let Err(e) = &result {
            warn!("{:?} for '{}' failed: {e}", action, resume.file_name);
        }
        result
    }

    async fn evaluate(
        &self,
        action: Action,
        job_description: &str,
        pdf: Bytes,
    ) -> Result<Evaluation, EvaluationError> {
        let content = self.extract(action, pdf).await?;
        debug!("Extracted {} content, calling model", content.kind());
        let response = self
            .model
            .evaluate(job_description, &content, action.prompt())
            .await?;

        Ok(Evaluation {
            action,
            heading: action.heading(),
            response,
        })
    }

    /// General evaluation always rasterizes; ATS match always extracts text.
    async fn extract(&self, action: Action, pdf: Bytes) -> Result<ExtractedContent, ExtractionError> {
        let extractor = Arc::clone(&self.extractor);
        tokio::task::spawn_blocking(move || match action {
            Action::GeneralEvaluation => extractor
                .rasterize_first_page(&pdf)
                .map(ExtractedContent::Image),
            Action::AtsMatch => extractor.extract_text(&pdf).map(ExtractedContent::Text),
        })
        .await
        .map_err(|e| ExtractionError::Task(e.to_string()))?
    }
}
