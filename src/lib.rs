pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;
pub mod queue;

use std::sync::Arc;

use pipeline::acquire::FsTextSource;
use pipeline::llm::{LlmClient, NullLlmClient, OllamaClient};
use pipeline::observer::TracingObserver;
use pipeline::DocumentProcessor;

/// Build the capability client from settings. An empty base URL means
/// no capability is configured: the null client makes classification
/// degrade to the unknown sentinel and extraction to heuristics.
pub fn build_llm_client(settings: &config::Settings) -> Arc<dyn LlmClient> {
    if settings.llm_base_url.is_empty() {
        tracing::info!("No model endpoint configured; running without capability");
        return Arc::new(NullLlmClient);
    }
    match OllamaClient::new(&settings.llm_base_url, settings.llm_timeout_secs) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::warn!(error = %e, "Model client construction failed; running without capability");
            Arc::new(NullLlmClient)
        }
    }
}

/// Standard processor wiring: filesystem text source, settings-derived
/// capability client, tracing observer.
pub fn build_processor(settings: &config::Settings) -> DocumentProcessor {
    DocumentProcessor::new(
        Box::new(FsTextSource),
        build_llm_client(settings),
        &settings.llm_model,
        settings.max_preview_images,
        settings.attach_case_to_synthesized,
        Arc::new(TracingObserver),
    )
}
