//! Axum route handlers for the Evaluation API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::evaluation::pipeline::{Action, Evaluation, UploadedResume};
use crate::state::AppState;

pub const NOT_PDF_MESSAGE: &str = "Please upload a PDF resume.";

#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    pub action: Action,
    pub heading: String,
    pub response: String,
}

impl From<Evaluation> for EvaluationResponse {
    fn from(evaluation: Evaluation) -> Self {
        Self {
            action: evaluation.action,
            heading: evaluation.heading.to_string(),
            response: evaluation.response,
        }
    }
}

#[derive(Debug, Default)]
struct EvaluationForm {
    job_description: String,
    action: Option<String>,
    resume: Option<UploadedResume>,
}

/// POST /api/v1/evaluations
///
/// Multipart form with `job_description`, `resume` (PDF) and `action` (`general` | `ats`).
/// Returns the model's text under the action's heading, unmodified.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<EvaluationResponse>, AppError> {
    let form = read_form(multipart).await?;

    let action = form
        .action
        .as_deref()
        .ok_or_else(|| AppError::Validation("action is required".to_string()))?
        .parse::<Action>()
        .map_err(AppError::Validation)?;

    let evaluation = state
        .pipeline
        .run(action, &form.job_description, form.resume)
        .await?;

    Ok(Json(evaluation.into()))
}

async fn read_form(mut multipart: Multipart) -> Result<EvaluationForm, AppError> {
    let mut form = EvaluationForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_description" => form.job_description = field.text().await?,
            "action" => form.action = Some(field.text().await?),
            "resume" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;

                // Browsers submit an empty, unnamed part when no file was chosen
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                if !is_pdf(&file_name, content_type.as_deref()) {
                    return Err(AppError::Validation(NOT_PDF_MESSAGE.to_string()));
                }
                form.resume = Some(UploadedResume { file_name, bytes });
            }
            _ => {}
        }
    }

    Ok(form)
}

fn is_pdf(file_name: &str, content_type: Option<&str>) -> bool {
    file_name.to_ascii_lowercase().ends_with(".pdf") || content_type == Some("application/pdf")
}
