//! Corpus record construction
//!
//! A [`Record`] is the unit persisted to the corpus: the extracted fields
//! plus derived metadata (category label, thematic tags, leading-sentence
//! excerpt). Records are immutable once built and serialize to exactly the
//! seven fields downstream training tooling expects.

use crate::pipeline::extractor::{ExtractedFields, NOT_AVAILABLE};
use serde::{Deserialize, Serialize};

/// One corpus entry, serialized as a single JSON line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Entry title (never the sentinel; extraction guarantees presence)
    pub title: String,

    /// Translated body text, or `"N/A"`
    pub text: String,

    /// Transliterated source text, or `"N/A"`
    pub transliteration: String,

    /// External catalog reference id, or `"N/A"`
    pub cdli_reference: String,

    /// Free-form category label for the run (e.g. "Mythology")
    pub category: String,

    /// Thematic tags from the controlled vocabulary; unordered set semantics
    pub core_values: Vec<String>,

    /// Leading sentence of `text`, or `"N/A"` when `text` is the sentinel
    pub first_paragraph: String,
}

/// Builds an immutable record from extracted fields and run metadata
///
/// Pure function: no I/O and no failure mode of its own. A missing title
/// has already failed extraction before this point.
pub fn build_record(fields: ExtractedFields, category: &str, tags: &[String]) -> Record {
    let first_paragraph = leading_sentence(&fields.text);

    Record {
        title: fields.title,
        text: fields.text,
        transliteration: fields.transliteration,
        cdli_reference: fields.cdli_reference,
        category: category.to_string(),
        core_values: tags.to_vec(),
        first_paragraph,
    }
}

/// Returns `text` up to (but excluding) the first period
///
/// Text without a period is returned whole; the `"N/A"` sentinel passes
/// through unchanged since it contains no period.
pub fn leading_sentence(text: &str) -> String {
    match text.find('.') {
        Some(idx) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
