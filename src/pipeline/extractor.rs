//! Field extraction from fetched entry pages
//!
//! Entry pages carry their data in named elements (`title`, `text`,
//! `transliteration`, `cdli_reference`). Extraction is permissive: a missing
//! non-title field becomes the `"N/A"` sentinel and the entry still yields a
//! usable partial record. A missing title is different: it signals a
//! parse-target mismatch, so the whole extraction fails and the caller skips
//! the entry.

use crate::HarvestError;
use scraper::{Html, Selector};

/// Sentinel substituted for a field the extractor could not locate
///
/// Distinct from an empty string: `""` means the field was present but
/// empty, the sentinel means it could not be found at all.
pub const NOT_AVAILABLE: &str = "N/A";

/// The normalized field set extracted from one entry page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFields {
    /// Entry title; extraction fails rather than substitute a sentinel here
    pub title: String,

    /// Translated body text, or the sentinel
    pub text: String,

    /// Transliterated source text, or the sentinel
    pub transliteration: String,

    /// External catalog reference id, or the sentinel
    pub cdli_reference: String,
}

/// Parses a fetched page body into the normalized field set
///
/// # Arguments
///
/// * `body` - The raw page markup
/// * `url` - The page URL, used only for error reporting
///
/// # Returns
///
/// * `Ok(ExtractedFields)` - Title found; other fields present or sentinel
/// * `Err(HarvestError::MissingTitle)` - No title element in the document
pub fn extract(body: &str, url: &str) -> Result<ExtractedFields, HarvestError> {
    let document = Html::parse_document(body);

    let title = element_text(&document, "title").ok_or_else(|| HarvestError::MissingTitle {
        url: url.to_string(),
    })?;

    let text = element_text(&document, "text").unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let transliteration =
        element_text(&document, "transliteration").unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let cdli_reference =
        element_text(&document, "cdli_reference").unwrap_or_else(|| NOT_AVAILABLE.to_string());

    Ok(ExtractedFields {
        title,
        text,
        transliteration,
        cdli_reference,
    })
}

/// Collects the trimmed text content of the first element matching `name`
///
/// Returns None when the element is absent or its text is empty after
/// trimming, so callers can substitute the sentinel uniformly.
fn element_text(document: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse(name).ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_ENTRY: &str = r#"
        <html><head><title>Inanna's descent to the nether world</title></head>
        <body>
            <text>From the great heaven she set her mind on the great below.</text>
            <transliteration>an gal-ta ki gal-ce3 jectug2-ga-ni na-an-gub</transliteration>
            <cdli_reference>P469682</cdli_reference>
        </body></html>
    "#;

    #[test]
    fn test_extract_all_fields() {
        let fields = extract(FULL_ENTRY, "https://example.com/myth").unwrap();
        assert_eq!(fields.title, "Inanna's descent to the nether world");
        assert_eq!(
            fields.text,
            "From the great heaven she set her mind on the great below."
        );
        assert_eq!(
            fields.transliteration,
            "an gal-ta ki gal-ce3 jectug2-ga-ni na-an-gub"
        );
        assert_eq!(fields.cdli_reference, "P469682");
    }

    #[test]
    fn test_missing_transliteration_becomes_sentinel() {
        let body = r#"
            <html><head><title>Enki and the world order</title></head>
            <body><text>Grandiloquent lord of heaven and earth.</text></body></html>
        "#;
        let fields = extract(body, "https://example.com/myth").unwrap();
        assert_eq!(fields.title, "Enki and the world order");
        assert_eq!(fields.transliteration, NOT_AVAILABLE);
        assert_eq!(fields.cdli_reference, NOT_AVAILABLE);
    }

    #[test]
    fn test_missing_text_becomes_sentinel() {
        let body = r#"<html><head><title>Fragment</title></head><body></body></html>"#;
        let fields = extract(body, "https://example.com/myth").unwrap();
        assert_eq!(fields.text, NOT_AVAILABLE);
    }

    #[test]
    fn test_missing_title_fails_extraction() {
        let body = r#"<html><body><text>Orphaned text.</text></body></html>"#;
        let err = extract(body, "https://example.com/broken").unwrap_err();
        assert!(
            matches!(err, HarvestError::MissingTitle { url } if url == "https://example.com/broken")
        );
    }

    #[test]
    fn test_empty_title_fails_extraction() {
        // Present but empty is not a usable title either
        let body = r#"<html><head><title>   </title></head><body></body></html>"#;
        assert!(extract(body, "https://example.com/blank").is_err());
    }

    #[test]
    fn test_title_whitespace_trimmed() {
        let body =
            r#"<html><head><title>  Gilgamec and Aga  </title></head><body></body></html>"#;
        let fields = extract(body, "https://example.com/myth").unwrap();
        assert_eq!(fields.title, "Gilgamec and Aga");
    }
}
