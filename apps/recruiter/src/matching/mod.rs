// Hybrid competency matching: LLM extraction of the competency model, scoring
// of candidate text against it, and ranking of a job's candidate pool.
// All LLM calls go through llm_client.

pub mod competency;
pub mod extractor;
pub mod handlers;
pub mod prompts;
pub mod ranker;
pub mod scorer;
