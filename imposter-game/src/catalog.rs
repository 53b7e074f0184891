//! Secret word catalog
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::CATEGORY_DELIMITER;

const DEFAULT_WORD_DATA: &str = include_str!("../assets/words.json");

/// How hard a word is to describe without giving it away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

pub type DifficultySet = SmallVec<[Difficulty; 3]>;

/// A single catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub categories: Vec<String>,
    pub difficulties: DifficultySet,
    #[serde(default)]
    pub imposter_hint: String,
}

impl WordEntry {
    #[must_use]
    pub fn has_difficulty(&self, difficulty: Difficulty) -> bool {
        self.difficulties.contains(&difficulty)
    }

    /// True when at least one of the entry's categories is in `wanted`.
    #[must_use]
    pub fn in_any_category(&self, wanted: &[String]) -> bool {
        self.categories.iter().any(|cat| wanted.contains(cat))
    }

    /// Categories joined for display, in catalog order.
    #[must_use]
    pub fn category_label(&self) -> String {
        self.categories.join(CATEGORY_DELIMITER)
    }

    fn check(&self, index: usize) -> Result<(), CatalogError> {
        if self.word.trim().is_empty() {
            return Err(CatalogError::BlankWord { index });
        }
        if self.categories.is_empty() {
            return Err(CatalogError::NoCategories {
                word: self.word.clone(),
            });
        }
        if self.difficulties.is_empty() {
            return Err(CatalogError::NoDifficulties {
                word: self.word.clone(),
            });
        }
        Ok(())
    }
}

/// Errors raised when catalog data is malformed.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog contains no words")]
    Empty,
    #[error("catalog entry {index} has a blank word")]
    BlankWord { index: usize },
    #[error("word '{word}' has no categories")]
    NoCategories { word: String },
    #[error("word '{word}' has no difficulties")]
    NoDifficulties { word: String },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    words: Vec<WordEntry>,
}

/// Non-empty collection of secret words.
///
/// Construction checks every entry, so selection code can rely on at least
/// one word with at least one category and difficulty being present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCatalog {
    entries: Vec<WordEntry>,
}

impl WordCatalog {
    /// Build a catalog from pre-parsed entries.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no entries or an entry is missing its
    /// word, categories, or difficulties.
    pub fn new(entries: Vec<WordEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (index, entry) in entries.iter().enumerate() {
            entry.check(index)?;
        }
        Ok(Self { entries })
    }

    /// Load catalog data from a JSON string of the form `{"words": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.words)
    }

    /// Load the catalog bundled with the crate, falling back to a single
    /// built-in word if the asset is unusable.
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_WORD_DATA).unwrap_or_else(|err| {
            log::warn!("bundled word catalog rejected ({err}); using fallback word");
            Self::fallback()
        })
    }

    fn fallback() -> Self {
        Self {
            entries: vec![WordEntry {
                word: "Coffee".to_string(),
                categories: vec!["Drinks".to_string()],
                difficulties: SmallVec::from_slice(&[Difficulty::Easy]),
                imposter_hint: "Tea".to_string(),
            }],
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every distinct category, in first-seen catalog order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for category in self.entries.iter().flat_map(|entry| &entry.categories) {
            if !seen.contains(&category.as_str()) {
                seen.push(category.as_str());
            }
        }
        seen
    }
}

/// Process-wide copy of the bundled catalog.
#[must_use]
pub fn bundled() -> &'static WordCatalog {
    static CATALOG: OnceLock<WordCatalog> = OnceLock::new();
    CATALOG.get_or_init(WordCatalog::load_from_static)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_from_json_reads_entries() {
        let json = r#"{
            "words": [
                {
                    "word": "Tea",
                    "categories": ["Drinks", "Kitchen"],
                    "difficulties": ["easy", "medium"],
                    "imposter_hint": "Coffee"
                }
            ]
        }"#;

        let catalog = WordCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        let entry = &catalog.entries()[0];
        assert_eq!(entry.category_label(), "Drinks, Kitchen");
        assert!(entry.has_difficulty(Difficulty::Medium));
        assert!(!entry.has_difficulty(Difficulty::Hard));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let err = WordCatalog::from_json(r#"{"words": []}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Empty));
    }

    #[test]
    fn entries_without_categories_or_difficulties_are_rejected() {
        let no_cat =
            r#"{"words": [{"word": "Tea", "categories": [], "difficulties": ["easy"]}]}"#;
        assert!(matches!(
            WordCatalog::from_json(no_cat).unwrap_err(),
            CatalogError::NoCategories { .. }
        ));

        let no_diff =
            r#"{"words": [{"word": "Tea", "categories": ["Drinks"], "difficulties": []}]}"#;
        assert!(matches!(
            WordCatalog::from_json(no_diff).unwrap_err(),
            CatalogError::NoDifficulties { .. }
        ));

        let blank = r#"{"words": [{"word": " ", "categories": ["Drinks"], "difficulties": ["easy"]}]}"#;
        assert!(matches!(
            WordCatalog::from_json(blank).unwrap_err(),
            CatalogError::BlankWord { index: 0 }
        ));
    }

    #[test]
    fn bundled_catalog_loads_and_lists_categories() {
        let catalog = bundled();
        assert!(catalog.len() > 1, "bundled asset should not hit the fallback");
        let categories = catalog.categories();
        assert_eq!(categories.first().copied(), Some("Drinks"));
        assert!(categories.contains(&"Space"));
        let unique: std::collections::HashSet<_> = categories.iter().collect();
        assert_eq!(unique.len(), categories.len());
    }

    #[test]
    fn missing_hint_defaults_to_blank() {
        let json = r#"{"words": [{"word": "Tea", "categories": ["Drinks"], "difficulties": ["hard"]}]}"#;
        let catalog = WordCatalog::from_json(json).unwrap();
        assert!(catalog.entries()[0].imposter_hint.is_empty());
    }
}
