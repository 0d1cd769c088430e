//! Test doubles for the extraction and model capabilities.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::extraction::{ExtractedContent, ExtractionError, ImageContent, PdfExtractor};
use crate::llm_client::{ModelClient, ModelError};

/// Counts calls per extraction mode and returns canned content.
#[derive(Default)]
pub struct RecordingExtractor {
    image_calls: AtomicUsize,
    text_calls: AtomicUsize,
    fail: bool,
}

impl RecordingExtractor {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), ExtractionError> {
        if self.fail {
            return Err(ExtractionError::Open("invalid file header".to_string()));
        }
        Ok(())
    }
}

impl PdfExtractor for RecordingExtractor {
    fn rasterize_first_page(&self, _pdf: &[u8]) -> Result<ImageContent, ExtractionError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(ImageContent {
            mime_type: "image/jpeg".to_string(),
            data: "/9j/4A==".to_string(),
        })
    }

    fn extract_text(&self, _pdf: &[u8]) -> Result<String, ExtractionError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok("Jane Doe, Rust engineer".to_string())
    }
}

#[derive(Debug, Clone)]
pub struct ModelCall {
    pub job_description: String,
    pub content: ExtractedContent,
    pub prompt: String,
}

/// Records every request and answers with a fixed reply or a fixed failure.
pub struct StubModel {
    reply: Result<String, fn() -> ModelError>,
    calls: Mutex<Vec<ModelCall>>,
}

impl StubModel {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: fn() -> ModelError) -> Self {
        Self {
            reply: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<ModelCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for StubModel {
    async fn evaluate(
        &self,
        job_description: &str,
        content: &ExtractedContent,
        prompt: &str,
    ) -> Result<String, ModelError> {
        self.calls.lock().unwrap().push(ModelCall {
            job_description: job_description.to_string(),
            content: content.clone(),
            prompt: prompt.to_string(),
        });
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(make_error) => Err(make_error()),
        }
    }
}

pub fn auth_failure() -> ModelError {
    ModelError::Api {
        status: 400,
        message: "API key not valid. Please pass a valid API key.".to_string(),
    }
}
