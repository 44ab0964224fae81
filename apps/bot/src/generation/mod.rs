// Fact-check generation.
// Implements: empty/no-text short-circuits, classification, tone policy, one
// completion call, degraded replies on failure, source extraction, logging.
// All completion calls go through llm_client::CompletionService.

pub mod canned;
pub mod caption;
pub mod generator;
pub mod prompts;
pub mod sources;
