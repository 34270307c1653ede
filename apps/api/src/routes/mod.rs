pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

/// Upload cap for resume PDFs. Real resumes are far smaller; scans of a
/// few pages still fit comfortably.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/analyze/text", post(handlers::analyze_text))
        .route(
            "/api/analyze/pdf",
            post(handlers::analyze_pdf).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/skills", post(handlers::skills))
        .with_state(state)
}

// ──────────────────────────── Tests ────────────────────────────
