//! Controlled vocabulary of thematic tags
//!
//! Records carry a set of thematic tags drawn from a fixed vocabulary of
//! label -> description pairs. The vocabulary is loaded once at startup and
//! treated as read-only reference data: tag assignment validates against it,
//! and downstream distribution reporting reads the descriptions.

use crate::{ConfigError, ConfigResult};
use std::collections::BTreeMap;
use std::path::Path;

/// Fixed mapping from thematic tag label to a human-readable description
#[derive(Debug, Clone)]
pub struct ControlledVocabulary {
    entries: BTreeMap<String, String>,
}

impl ControlledVocabulary {
    /// Builds the built-in default vocabulary
    pub fn builtin() -> Self {
        let entries = [
            ("Justice", "The principle of fairness"),
            ("Freedom", "The ability to act without restraint"),
            ("Sumerian Law", "The system of laws in Sumer"),
            (
                "American Exceptionalism",
                "America's unique role in history",
            ),
            ("Truth", "Honesty and integrity"),
            ("Self-Reliance", "Independence and self-sufficiency"),
            ("Innovation", "Creating new solutions"),
            ("Honor and Integrity", "Acting with moral principles"),
            (
                "Community and Collaboration",
                "Working together for common goals",
            ),
            ("Perseverance", "The determination to keep moving forward"),
        ]
        .into_iter()
        .map(|(label, description)| (label.to_string(), description.to_string()))
        .collect();

        Self { entries }
    }

    /// Loads a vocabulary from a TOML file of `label = "description"` pairs
    ///
    /// The file replaces the built-in set wholesale rather than merging with
    /// it, so a corpus run sees exactly the vocabulary its config names.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let entries: BTreeMap<String, String> = toml::from_str(&content)?;

        if entries.is_empty() {
            return Err(ConfigError::Validation(format!(
                "vocabulary file {} contains no entries",
                path.display()
            )));
        }

        Ok(Self { entries })
    }

    /// Returns true if `label` is a known tag
    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    /// Returns the description for a tag, if known
    pub fn describe(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    /// Iterates over the tag labels in sorted order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of tags in the vocabulary
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks that every tag in `tags` belongs to this vocabulary
    pub fn validate_tags(&self, tags: &[String]) -> ConfigResult<()> {
        for tag in tags {
            if !self.contains(tag) {
                return Err(ConfigError::UnknownTag(tag.clone()));
            }
        }
        Ok(())
    }
}

impl Default for ControlledVocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}
