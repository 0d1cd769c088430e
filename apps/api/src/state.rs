use crate::config::Config;
use crate::evaluation::pipeline::Pipeline;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; no request leaves anything behind in it.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Extractor + model client behind trait objects, swapped for stubs in tests.
    pub pipeline: Pipeline,
}
