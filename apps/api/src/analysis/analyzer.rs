//! Orchestration of one full resume analysis.
//!
//! Pulls the similarity score and the extracted skills together into a
//! single report and owns the presentation rules: rounding happens here
//! and nowhere else, so the scoring and extraction layers stay exact.

use crate::analysis::similarity::compute_similarity;
use crate::analysis::skills::extract_skills;
use crate::annotator::Annotator;
use crate::errors::AppError;

/// Preview length in characters; longer resumes are cut and marked.
const PREVIEW_MAX_CHARS: usize = 500;
const PREVIEW_MARKER: &str = "...";

/// One complete analysis of a resume against a job description.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// Cosine similarity in `[0, 1]`, rounded to four decimal places.
    pub similarity_score: f64,
    /// The same score as a percentage, rounded to two decimal places.
    pub similarity_percent: f64,
    /// Sorted, deduplicated skills from both extractors.
    pub skills: Vec<String>,
    /// Opening of the resume for display alongside the numbers.
    pub resume_preview: String,
}

pub async fn analyze(
    resume_text: &str,
    job_description: &str,
    annotator: &dyn Annotator,
) -> Result<AnalysisReport, AppError> {
    let score = compute_similarity(resume_text, job_description);
    let skills = extract_skills(resume_text, annotator).await?;

    Ok(AnalysisReport {
        similarity_score: round_to(score, 4),
        similarity_percent: round_to(score * 100.0, 2),
        skills,
        resume_preview: build_preview(resume_text),
    })
}

/// First 500 characters of the text, with a truncation marker when the
/// text was longer. Cuts on character boundaries, never mid-codepoint.
fn build_preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_MAX_CHARS) {
        Some((idx, _)) => format!("{}{}", &text[..idx], PREVIEW_MARKER),
        None => text.to_string(),
    }
}

fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10_f64.powi(places as i32);
    (value * factor).round() / factor
}

// ──────────────────────────── Tests ────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotator::Annotation;
    use async_trait::async_trait;

    struct EmptyAnnotator;

    #[async_trait]
    impl Annotator for EmptyAnnotator {
        async fn annotate(&self, _text: &str) -> Result<Annotation, AppError> {
            Ok(Annotation::default())
        }
    }

    #[test]
    fn test_preview_passes_short_text_through() {
        assert_eq!(build_preview("short resume"), "short resume");
        assert_eq!(build_preview(""), "");
    }

    #[test]
    fn test_preview_of_exactly_limit_is_untouched() {
        let text = "a".repeat(500);
        assert_eq!(build_preview(&text), text);
    }

    #[test]
    fn test_preview_truncates_and_marks() {
        let text = "b".repeat(10_000);
        let preview = build_preview(&text);
        assert_eq!(preview.chars().count(), 503);
        assert!(preview.ends_with("..."));
        assert!(preview.starts_with("bbb"));
    }

    #[test]
    fn test_preview_respects_multibyte_boundaries() {
        let text = "é".repeat(600);
        let preview = build_preview(&text);
        assert_eq!(preview.chars().count(), 503);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_rounding_places() {
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(12.345678, 2), 12.35);
        assert_eq!(round_to(1.0, 4), 1.0);
        assert_eq!(round_to(0.0, 2), 0.0);
    }

    #[tokio::test]
    async fn test_analyze_matching_resume_and_job() {
        let report = analyze(
            "Experienced Python developer with Docker and AWS skills.",
            "Looking for a Python engineer familiar with Docker and cloud platforms.",
            &EmptyAnnotator,
        )
        .await
        .unwrap();

        assert!(report.similarity_score > 0.0);
        assert!(report.similarity_score <= 1.0);
        assert!(report.skills.contains(&"python".to_string()));
        assert!(report.skills.contains(&"docker".to_string()));
        assert_eq!(
            report.resume_preview,
            "Experienced Python developer with Docker and AWS skills."
        );
    }

    #[tokio::test]
    async fn test_analyze_rounds_at_the_boundary() {
        let report = analyze(
            "Rust developer who also knows Python.",
            "Python shop hiring Rust developers.",
            &EmptyAnnotator,
        )
        .await
        .unwrap();

        let score_scaled = report.similarity_score * 10_000.0;
        assert!((score_scaled - score_scaled.round()).abs() < 1e-9);
        let percent_scaled = report.similarity_percent * 100.0;
        assert!((percent_scaled - percent_scaled.round()).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_analyze_whitespace_resume_is_degenerate_not_an_error() {
        let report = analyze("   \n\t  ", "Any job description.", &EmptyAnnotator)
            .await
            .unwrap();

        assert_eq!(report.similarity_score, 0.0);
        assert_eq!(report.similarity_percent, 0.0);
        assert!(report.skills.is_empty());
        assert_eq!(report.resume_preview, "   \n\t  ");
    }
}
