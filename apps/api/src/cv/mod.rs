// CV ingestion: document text extraction, model call, result handling and storage.
// All model calls go through llm_client; no direct Gemini calls here.

pub mod document;
pub mod extraction;
pub mod handlers;
pub mod ingest;
pub mod prompts;
