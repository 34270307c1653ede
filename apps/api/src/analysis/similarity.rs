//! TF-IDF similarity scoring between a resume and a job description.
//!
//! Each request fits a small vectorizer on exactly the two documents being
//! compared: tokenize, drop English stop words, expand to unigrams plus
//! adjacent bigrams, weight with sublinear TF and smoothed IDF, then take
//! the cosine of the two vectors. Fitting per pair keeps the score a pure
//! function of its inputs, so no corpus state survives between requests.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Vocabulary cap. Terms beyond this are dropped, highest pair-wide count
/// first, ties broken lexicographically.
const MAX_VOCABULARY: usize = 10_000;

/// Every comparison fits on exactly two documents.
const PAIR_DOCS: f64 = 2.0;

/// Filename of the persisted vectorizer configuration inside the model dir.
const VECTORIZER_CONFIG_FILE: &str = "tfidf_vectorizer.json";

// ──────────────────────────── Scoring ────────────────────────────

/// Computes the cosine similarity of the TF-IDF vectors of the two texts.
///
/// Returns a value in `[0.0, 1.0]`. Degenerate inputs (either text blank,
/// or no term surviving tokenization) score `0.0` rather than erroring.
pub fn compute_similarity(resume_text: &str, job_description: &str) -> f64 {
    if resume_text.trim().is_empty() || job_description.trim().is_empty() {
        return 0.0;
    }

    let resume_terms = term_counts(&tokenize(resume_text));
    let job_terms = term_counts(&tokenize(job_description));
    let vocabulary = build_pair_vocabulary(&resume_terms, &job_terms, MAX_VOCABULARY);
    if vocabulary.is_empty() {
        return 0.0;
    }

    let resume_vec = weight_vector(&resume_terms, &job_terms, &vocabulary);
    let job_vec = weight_vector(&job_terms, &resume_terms, &vocabulary);

    // Floating point can land a hair outside the unit interval.
    cosine(&resume_vec, &job_vec).clamp(0.0, 1.0)
}

/// Splits on Unicode word boundaries, lowercases, and keeps tokens of at
/// least two characters that are not stop words.
fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words()
        .map(str::to_lowercase)
        .filter(|w| w.chars().count() >= 2 && !is_stop_word(w))
        .collect()
}

/// Term frequencies over unigrams and space-joined adjacent bigrams.
/// Bigrams are formed after stop-word removal, so they can bridge a
/// dropped word.
fn term_counts(tokens: &[String]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }
    for pair in tokens.windows(2) {
        *counts.entry(format!("{} {}", pair[0], pair[1])).or_insert(0) += 1;
    }
    counts
}

/// Union of both documents' terms, capped at `max_features` by total count
/// across the pair (ties resolved by lexicographic order).
fn build_pair_vocabulary(
    resume_terms: &HashMap<String, usize>,
    job_terms: &HashMap<String, usize>,
    max_features: usize,
) -> Vec<String> {
    let mut totals: HashMap<&str, usize> = HashMap::new();
    for (term, count) in resume_terms.iter().chain(job_terms.iter()) {
        *totals.entry(term.as_str()).or_insert(0) += count;
    }

    let mut ranked: Vec<(&str, usize)> = totals.into_iter().collect();
    ranked.sort_by(|(term_a, count_a), (term_b, count_b)| {
        count_b.cmp(count_a).then_with(|| term_a.cmp(term_b))
    });
    ranked.truncate(max_features);
    ranked.into_iter().map(|(term, _)| term.to_string()).collect()
}

/// Sublinear TF times smoothed IDF for one document, aligned to `vocabulary`.
/// IDF uses document frequency over the pair: `ln((1 + n) / (1 + df)) + 1`
/// with `n = 2`, so a term in both documents gets IDF exactly 1.
fn weight_vector(
    own: &HashMap<String, usize>,
    other: &HashMap<String, usize>,
    vocabulary: &[String],
) -> Vec<f64> {
    vocabulary
        .iter()
        .map(|term| {
            let tf = own.get(term).copied().unwrap_or(0);
            if tf == 0 {
                return 0.0;
            }
            let df = 1 + usize::from(other.contains_key(term));
            let idf = ((1.0 + PAIR_DOCS) / (1.0 + df as f64)).ln() + 1.0;
            (1.0 + (tf as f64).ln()) * idf
        })
        .collect()
}

fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn is_stop_word(token: &str) -> bool {
    static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    STOP_WORDS
        .get_or_init(|| ENGLISH_STOP_WORDS.iter().copied().collect())
        .contains(token)
}

// ──────────────────────────── Persisted configuration ────────────────────────────

/// Vectorizer settings persisted under the model directory so every
/// deployment of the service scores with the same knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    pub max_features: usize,
    pub ngram_min: usize,
    pub ngram_max: usize,
    pub stop_words: String,
    pub min_df: usize,
    pub max_df: f64,
    pub sublinear_tf: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        VectorizerConfig {
            max_features: MAX_VOCABULARY,
            ngram_min: 1,
            ngram_max: 2,
            stop_words: "english".to_string(),
            min_df: 1,
            max_df: 0.95,
            sublinear_tf: true,
        }
    }
}

/// Loads the vectorizer configuration from the model directory, writing the
/// default one on first run so later startups find it in place.
pub fn load_or_create_config(model_dir: &Path) -> Result<VectorizerConfig> {
    let path: PathBuf = model_dir.join(VECTORIZER_CONFIG_FILE);
    if path.exists() {
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("reading vectorizer config at {}", path.display()))?;
        let config: VectorizerConfig = serde_json::from_str(&contents)
            .with_context(|| format!("parsing vectorizer config at {}", path.display()))?;
        return Ok(config);
    }

    fs::create_dir_all(model_dir)
        .with_context(|| format!("creating model dir {}", model_dir.display()))?;
    let config = VectorizerConfig::default();
    let contents = serde_json::to_string_pretty(&config).context("serializing vectorizer config")?;
    fs::write(&path, contents)
        .with_context(|| format!("writing vectorizer config to {}", path.display()))?;
    Ok(config)
}

/// Standard English stop-word list used by information-retrieval tooling
/// (the Glasgow list). Removed before n-gram generation.
#[rustfmt::skip]
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against",
    "all", "almost", "alone", "along", "already", "also", "although", "always",
    "am", "among", "amongst", "amoungst", "amount", "an", "and", "another",
    "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being",
    "below", "beside", "besides", "between", "beyond", "bill", "both",
    "bottom", "but", "by", "call", "can", "cannot", "cant", "co", "con",
    "could", "couldnt", "cry", "de", "describe", "detail", "do", "done",
    "down", "due", "during", "each", "eg", "eight", "either", "eleven",
    "else", "elsewhere", "empty", "enough", "etc", "even", "ever", "every",
    "everyone", "everything", "everywhere", "except", "few", "fifteen",
    "fifty", "fill", "find", "fire", "first", "five", "for", "former",
    "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her",
    "here", "hereafter", "hereby", "herein", "hereupon", "hers", "herself",
    "him", "himself", "his", "how", "however", "hundred", "i", "ie", "if",
    "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself",
    "keep", "last", "latter", "latterly", "least", "less", "ltd", "made",
    "many", "may", "me", "meanwhile", "might", "mill", "mine", "more",
    "moreover", "most", "mostly", "move", "much", "must", "my", "myself",
    "name", "namely", "neither", "never", "nevertheless", "next", "nine",
    "no", "nobody", "none", "noone", "nor", "not", "nothing", "now",
    "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out",
    "over", "own", "part", "per", "perhaps", "please", "put", "rather", "re",
    "same", "see", "seem", "seemed", "seeming", "seems", "serious", "several",
    "she", "should", "show", "side", "since", "sincere", "six", "sixty",
    "so", "some", "somehow", "someone", "something", "sometime", "sometimes",
    "somewhere", "still", "such", "system", "take", "ten", "than", "that",
    "the", "their", "them", "themselves", "then", "thence", "there",
    "thereafter", "thereby", "therefore", "therein", "thereupon", "these",
    "they", "thick", "thin", "third", "this", "those", "though", "three",
    "through", "throughout", "thru", "thus", "to", "together", "too", "top",
    "toward", "towards", "twelve", "twenty", "two", "un", "under", "until",
    "up", "upon", "us", "very", "via", "was", "we", "well", "were", "what",
    "whatever", "when", "whence", "whenever", "where", "whereafter",
    "whereas", "whereby", "wherein", "whereupon", "wherever", "whether",
    "which", "while", "whither", "who", "whoever", "whole", "whom", "whose",
    "why", "will", "with", "within", "without", "would", "yet", "you",
    "your", "yours", "yourself", "yourselves",
];

// ──────────────────────────── Tests ────────────────────────────
