// Resume analysis engine.
// Implements: TF-IDF similarity scoring, skill extraction, and the
// orchestration assembling both into one report per request.
// Handlers only decode and encode; all behavior lives in the engine modules.

pub mod analyzer;
pub mod handlers;
pub mod similarity;
pub mod skills;
