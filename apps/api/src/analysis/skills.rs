//! Skill extraction from resume text.
//!
//! Two extractors feed one result set. The vocabulary scan finds curated
//! skill keywords as lowercase substrings of the text. The candidate
//! extractor asks the annotator for named entities and noun phrases and
//! keeps the ones shaped like skills. Their union is deduplicated and
//! returned sorted.

use std::collections::BTreeSet;

use crate::annotator::Annotator;
use crate::errors::AppError;

/// Annotation input cap; resumes are short, anything past this is noise.
const MAX_ANNOTATION_CHARS: usize = 100_000;

/// Entity length window in characters, after trimming.
const ENTITY_MIN_CHARS: usize = 2;
const ENTITY_MAX_CHARS: usize = 49;

/// Noun-phrase length window in characters, after trimming.
const PHRASE_MIN_CHARS: usize = 2;
const PHRASE_MAX_CHARS: usize = 40;

/// Noun phrases that are grammatically valid but never skills.
const PHRASE_STOPLIST: &[&str] = &["i", "we", "my", "the"];

/// Curated skill keywords matched as substrings of the lowercased text.
/// Substring matching is intentional: a resume mentioning PostgreSQL also
/// counts as mentioning SQL, and JavaScript also surfaces Java. Callers
/// rely on that recall; do not switch this to word-boundary matching.
#[rustfmt::skip]
const SKILL_VOCABULARY: &[&str] = &[
    // Languages & runtimes
    "python", "java", "javascript", "typescript", "react", "node", "node.js",
    // Backend frameworks
    "fastapi", "django", "flask",
    // Data stores
    "sql", "postgresql", "mongodb", "redis",
    // Infrastructure & cloud
    "docker", "kubernetes", "aws", "azure", "gcp", "linux", "git", "ci/cd",
    // ML & data
    "machine learning", "deep learning", "nlp", "tensorflow", "pytorch",
    "scikit-learn", "pandas", "numpy", "spacy", "tf-idf",
    // Web & APIs
    "rest api", "graphql", "html", "css", "sass", "redux", "vue", "angular",
    // Process & soft skills
    "agile", "scrum", "leadership", "communication", "problem solving",
    "team collaboration",
    // Data engineering
    "data analysis", "data science", "etl", "spark", "hadoop",
    // Design & QA
    "figma", "ui/ux", "testing", "jest", "pytest", "tdd", "oop",
];

/// Scans the lowercased text for every vocabulary keyword it contains.
pub fn match_known_skills(text: &str) -> BTreeSet<String> {
    let haystack = text.to_lowercase();
    SKILL_VOCABULARY
        .iter()
        .filter(|keyword| haystack.contains(*keyword))
        .map(|keyword| keyword.to_string())
        .collect()
}

/// Extracts skill candidates from the annotator's entities and noun phrases.
///
/// Entities survive only with a skill-like label and between 2 and 49
/// characters; noun phrases between 2 and 40 characters and off the
/// stoplist. Everything is trimmed and lowercased on the way in.
pub async fn extract_candidates(
    text: &str,
    annotator: &dyn Annotator,
) -> Result<BTreeSet<String>, AppError> {
    let annotation = annotator
        .annotate(truncate_chars(text, MAX_ANNOTATION_CHARS))
        .await?;

    let mut candidates = BTreeSet::new();
    for entity in &annotation.entities {
        if !entity.label.is_skill_like() {
            continue;
        }
        let skill = entity.text.trim().to_lowercase();
        let len = skill.chars().count();
        if (ENTITY_MIN_CHARS..=ENTITY_MAX_CHARS).contains(&len) {
            candidates.insert(skill);
        }
    }
    for phrase in &annotation.noun_phrases {
        let phrase = phrase.trim().to_lowercase();
        let len = phrase.chars().count();
        if (PHRASE_MIN_CHARS..=PHRASE_MAX_CHARS).contains(&len)
            && !PHRASE_STOPLIST.contains(&phrase.as_str())
        {
            candidates.insert(phrase);
        }
    }
    Ok(candidates)
}

/// Full extraction: vocabulary matches united with annotator candidates,
/// deduplicated, sorted ascending.
pub async fn extract_skills(
    text: &str,
    annotator: &dyn Annotator,
) -> Result<Vec<String>, AppError> {
    let mut skills = match_known_skills(text);
    skills.extend(extract_candidates(text, annotator).await?);
    Ok(skills.into_iter().collect())
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ──────────────────────────── Tests ────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotator::{Annotation, Entity, EntityLabel};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Annotator stub returning a fixed annotation.
    struct StubAnnotator {
        annotation: Annotation,
    }

    impl StubAnnotator {
        fn empty() -> Self {
            StubAnnotator { annotation: Annotation::default() }
        }
    }

    #[async_trait]
    impl Annotator for StubAnnotator {
        async fn annotate(&self, _text: &str) -> Result<Annotation, AppError> {
            Ok(self.annotation.clone())
        }
    }

    /// Annotator stub recording how many characters it was handed.
    #[derive(Default)]
    struct RecordingAnnotator {
        seen_chars: Mutex<usize>,
    }

    #[async_trait]
    impl Annotator for RecordingAnnotator {
        async fn annotate(&self, text: &str) -> Result<Annotation, AppError> {
            *self.seen_chars.lock().unwrap() = text.chars().count();
            Ok(Annotation::default())
        }
    }

    fn entity(text: &str, label: EntityLabel) -> Entity {
        Entity { text: text.to_string(), label }
    }

    #[test]
    fn test_vocabulary_scan_finds_exact_mentions() {
        let skills = match_known_skills("Built services in Python with Docker and Redis");
        assert!(skills.contains("python"));
        assert!(skills.contains("docker"));
        assert!(skills.contains("redis"));
        assert!(!skills.contains("kubernetes"));
    }

    #[test]
    fn test_vocabulary_scan_is_substring_based() {
        // JavaScript must surface both entries; this recall is relied upon.
        let skills = match_known_skills("Five years of JavaScript experience");
        assert!(skills.contains("javascript"));
        assert!(skills.contains("java"));

        let skills = match_known_skills("PostgreSQL tuning and backups");
        assert!(skills.contains("postgresql"));
        assert!(skills.contains("sql"));
    }

    #[test]
    fn test_vocabulary_scan_empty_text() {
        assert!(match_known_skills("").is_empty());
        assert!(match_known_skills("nothing relevant here").is_empty());
    }

    #[tokio::test]
    async fn test_candidates_respect_label_allow_list() {
        let stub = StubAnnotator {
            annotation: Annotation {
                entities: vec![
                    entity("GitHub", EntityLabel::Organization),
                    entity("Kubernetes", EntityLabel::Product),
                    entity("Singapore", EntityLabel::GeoPolitical),
                    entity("Clean Code", EntityLabel::WorkOfArt),
                    entity("Jane Doe", EntityLabel::Person),
                ],
                noun_phrases: vec![],
            },
        };
        let candidates = extract_candidates("irrelevant", &stub).await.unwrap();
        assert!(candidates.contains("github"));
        assert!(candidates.contains("kubernetes"));
        assert!(candidates.contains("singapore"));
        assert!(candidates.contains("clean code"));
        assert!(!candidates.contains("jane doe"));
    }

    #[tokio::test]
    async fn test_candidates_respect_length_windows() {
        let stub = StubAnnotator {
            annotation: Annotation {
                entities: vec![
                    entity("R", EntityLabel::Product),
                    entity(&"e".repeat(49), EntityLabel::Product),
                    entity(&"e".repeat(50), EntityLabel::Product),
                ],
                noun_phrases: vec![
                    "x".to_string(),
                    "p".repeat(40),
                    "p".repeat(41),
                ],
            },
        };
        let candidates = extract_candidates("irrelevant", &stub).await.unwrap();
        assert!(!candidates.contains("r"));
        assert!(candidates.contains(&"e".repeat(49)));
        assert!(!candidates.contains(&"e".repeat(50)));
        assert!(!candidates.contains("x"));
        assert!(candidates.contains(&"p".repeat(40)));
        assert!(!candidates.contains(&"p".repeat(41)));
    }

    #[tokio::test]
    async fn test_candidates_drop_stoplisted_phrases() {
        let stub = StubAnnotator {
            annotation: Annotation {
                entities: vec![],
                noun_phrases: vec![
                    "The".to_string(),
                    "We".to_string(),
                    "my".to_string(),
                    "distributed systems".to_string(),
                ],
            },
        };
        let candidates = extract_candidates("irrelevant", &stub).await.unwrap();
        assert_eq!(
            candidates.into_iter().collect::<Vec<_>>(),
            vec!["distributed systems".to_string()]
        );
    }

    #[tokio::test]
    async fn test_annotation_input_is_truncated() {
        let recorder = RecordingAnnotator::default();
        let text = "x".repeat(MAX_ANNOTATION_CHARS + 5_000);
        extract_candidates(&text, &recorder).await.unwrap();
        assert_eq!(*recorder.seen_chars.lock().unwrap(), MAX_ANNOTATION_CHARS);
    }

    #[tokio::test]
    async fn test_extraction_unions_and_sorts() {
        let stub = StubAnnotator {
            annotation: Annotation {
                entities: vec![entity("Python", EntityLabel::Product)],
                noun_phrases: vec!["cloud services".to_string()],
            },
        };
        let skills = extract_skills("Python and Docker in production", &stub)
            .await
            .unwrap();
        // "python" comes from both extractors but appears once.
        assert_eq!(skills.iter().filter(|s| *s == "python").count(), 1);
        assert!(skills.contains(&"docker".to_string()));
        assert!(skills.contains(&"cloud services".to_string()));

        let mut sorted = skills.clone();
        sorted.sort();
        assert_eq!(skills, sorted);
    }

    #[tokio::test]
    async fn test_extraction_is_idempotent() {
        let stub = StubAnnotator::empty();
        let text = "Senior Python developer, Docker and AWS";
        let first = extract_skills(text, &stub).await.unwrap();
        let second = extract_skills(text, &stub).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_vocabulary_matches_subset_of_extraction() {
        let stub = StubAnnotator::empty();
        let text = "Python, Docker, Kubernetes and machine learning work";
        let lexical = match_known_skills(text);
        let combined = extract_skills(text, &stub).await.unwrap();
        for skill in &lexical {
            assert!(combined.contains(skill));
        }
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "naïveté".repeat(3);
        let cut = truncate_chars(&text, 8);
        assert_eq!(cut.chars().count(), 8);
    }
}
