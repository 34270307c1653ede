//! Text annotation capability.
//!
//! The analysis engine only ever needs two things from its NLP layer:
//! named entities and noun phrases. `Annotator` captures exactly that, so
//! production code can run the rule tagger while tests plug in stubs.
//! `LexiconAnnotator` owns the tagger lifecycle: the lexicon artifact is
//! loaded lazily on first use, fetched once from a configured URL if the
//! local copy is missing, and a failed initialization stays failed for the
//! life of the process.

pub mod tagger;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::errors::AppError;
use tagger::RuleTagger;

/// Filename of the tagger lexicon artifact inside the model directory.
const LEXICON_FILE: &str = "english_tagger.lexicon";

/// Entity labels the rule tagger can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityLabel {
    Organization,
    Product,
    GeoPolitical,
    WorkOfArt,
    Person,
}

impl EntityLabel {
    /// Labels that plausibly name a tool, company, platform, or credential.
    /// Person names are never skills.
    pub fn is_skill_like(self) -> bool {
        matches!(
            self,
            EntityLabel::Organization
                | EntityLabel::Product
                | EntityLabel::GeoPolitical
                | EntityLabel::WorkOfArt
        )
    }

    pub(crate) fn parse(tag: &str) -> Option<Self> {
        match tag {
            "ent:org" => Some(EntityLabel::Organization),
            "ent:product" => Some(EntityLabel::Product),
            "ent:gpe" => Some(EntityLabel::GeoPolitical),
            "ent:work_of_art" => Some(EntityLabel::WorkOfArt),
            "ent:person" => Some(EntityLabel::Person),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Surface text as it appeared in the document.
    pub text: String,
    pub label: EntityLabel,
}

/// Everything an annotator reports for one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotation {
    pub entities: Vec<Entity>,
    pub noun_phrases: Vec<String>,
}

/// Capability to annotate free text with entities and noun phrases.
#[async_trait]
pub trait Annotator: Send + Sync {
    async fn annotate(&self, text: &str) -> Result<Annotation, AppError>;
}

/// Production annotator backed by the rule tagger and its lexicon artifact.
pub struct LexiconAnnotator {
    lexicon_path: PathBuf,
    lexicon_url: String,
    /// Holds the initialization outcome, success or failure, exactly once.
    /// Concurrent first callers share one initialization; nobody retries.
    tagger: OnceCell<Result<Arc<RuleTagger>, String>>,
}

impl LexiconAnnotator {
    pub fn new(model_dir: &Path, lexicon_url: &str) -> Self {
        LexiconAnnotator {
            lexicon_path: model_dir.join(LEXICON_FILE),
            lexicon_url: lexicon_url.to_string(),
            tagger: OnceCell::new(),
        }
    }

    async fn tagger(&self) -> Result<Arc<RuleTagger>, AppError> {
        let outcome = self
            .tagger
            .get_or_init(|| initialize_tagger(&self.lexicon_path, &self.lexicon_url))
            .await;
        match outcome {
            Ok(tagger) => Ok(Arc::clone(tagger)),
            Err(reason) => Err(AppError::AnnotatorUnavailable(reason.clone())),
        }
    }
}

#[async_trait]
impl Annotator for LexiconAnnotator {
    async fn annotate(&self, text: &str) -> Result<Annotation, AppError> {
        let tagger = self.tagger().await?;
        Ok(tagger.annotate_text(text))
    }
}

/// Loads the lexicon from disk, fetching it once from the artifact URL if
/// the local file is missing or unreadable. The error string is what the
/// annotator will keep reporting, so it names both locations tried.
async fn initialize_tagger(path: &Path, url: &str) -> Result<Arc<RuleTagger>, String> {
    match RuleTagger::from_file(path) {
        Ok(tagger) => {
            info!("Tagger lexicon loaded from {}", path.display());
            return Ok(Arc::new(tagger));
        }
        Err(e) => {
            warn!(
                "Tagger lexicon unavailable at {} ({e:#}); fetching from {url}",
                path.display()
            );
        }
    }

    if let Err(e) = fetch_lexicon(url, path).await {
        return Err(format!("lexicon fetch from {url} failed: {e:#}"));
    }

    match RuleTagger::from_file(path) {
        Ok(tagger) => {
            info!("Tagger lexicon fetched to {}", path.display());
            Ok(Arc::new(tagger))
        }
        Err(e) => Err(format!(
            "lexicon at {} unreadable after fetch: {e:#}",
            path.display()
        )),
    }
}

/// Downloads the lexicon artifact and moves it into place atomically so a
/// crashed fetch never leaves a truncated file behind.
async fn fetch_lexicon(url: &str, dest: &Path) -> anyhow::Result<()> {
    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let response = reqwest::get(url).await?.error_for_status()?;
    let body = response.bytes().await?;

    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(&body)?;
    staged.persist(dest)?;
    Ok(())
}

// ──────────────────────────── Tests ────────────────────────────
