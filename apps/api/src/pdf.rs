//! PDF text extraction for uploaded resumes.

use anyhow::{Context, Result};

/// Extracts the text content of an in-memory PDF document.
///
/// The result is trimmed so a scanned, image-only document comes back as
/// an empty string instead of a page of whitespace.
pub fn extract_text(data: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(data).context("parsing PDF document")?;
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_an_error() {
        assert!(extract_text(b"definitely not a pdf").is_err());
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(extract_text(b"").is_err());
    }
}
