use std::path::PathBuf;

use anyhow::{Context, Result};

/// Where the tagger lexicon is fetched from when the model directory does
/// not already hold a copy.
const DEFAULT_LEXICON_URL: &str =
    "https://artifacts.resumen.app/nlp/en/english_tagger.lexicon";

/// Application configuration loaded from environment variables.
/// Everything has a default, so the service starts with no environment at all.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory holding the vectorizer config and the tagger lexicon.
    pub model_dir: PathBuf,
    pub lexicon_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            model_dir: PathBuf::from(
                std::env::var("MODEL_DIR").unwrap_or_else(|_| "models".to_string()),
            ),
            lexicon_url: std::env::var("TAGGER_LEXICON_URL")
                .unwrap_or_else(|_| DEFAULT_LEXICON_URL.to_string()),
        })
    }
}
