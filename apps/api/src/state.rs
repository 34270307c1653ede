use std::sync::Arc;

use crate::analysis::similarity::VectorizerConfig;
use crate::annotator::Annotator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable annotator behind the statistical skill extractor.
    /// Default: LexiconAnnotator with lazy tagger initialization.
    pub annotator: Arc<dyn Annotator>,
    /// Vectorizer configuration persisted under the model dir. Scoring
    /// re-fits per request pair, so this is carried for warm starts and
    /// operational visibility, not consulted on the request path.
    #[allow(dead_code)]
    pub vectorizer: VectorizerConfig,
}
