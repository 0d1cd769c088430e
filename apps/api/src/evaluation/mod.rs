// Resume evaluation: input guard, extraction mode per action, model call.
// All model calls go through llm_client; all PDF handling through extraction.

pub mod handlers;
pub mod pipeline;
pub mod prompts;
