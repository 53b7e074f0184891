//! Secret word selection
//!
//! Filters the catalog by the round's difficulty and category choices and
//! relaxes those filters step by step until at least one word survives. A
//! word is always produced because the catalog itself is never empty.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{Difficulty, WordCatalog, WordEntry};
use crate::settings::GameSettings;

/// What the secret word reveal needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretData {
    pub word: String,
    /// Display string, categories joined in catalog order.
    pub category: String,
    pub imposter_hint: Option<String>,
}

impl From<&WordEntry> for SecretData {
    fn from(entry: &WordEntry) -> Self {
        let hint = entry.imposter_hint.trim();
        Self {
            word: entry.word.clone(),
            category: entry.category_label(),
            imposter_hint: (!hint.is_empty()).then(|| hint.to_string()),
        }
    }
}

/// Which filter combination produced the candidate pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeStage {
    /// Both requested filters applied (a skipped filter counts as applied).
    Exact,
    /// Difficulty dropped, categories kept.
    CategoryOnly,
    /// Categories dropped, difficulty kept.
    DifficultyOnly,
    /// Whole catalog.
    Unfiltered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPick {
    pub secret: SecretData,
    pub stage: CascadeStage,
    pub pool_size: usize,
    pub catalog_index: usize,
}

fn filter_indices<'a>(
    catalog: &'a WordCatalog,
    difficulty: Option<Difficulty>,
    categories: Option<&'a [String]>,
) -> impl Iterator<Item = usize> + 'a {
    catalog
        .entries()
        .iter()
        .enumerate()
        .filter(move |(_, entry)| difficulty.is_none_or(|d| entry.has_difficulty(d)))
        .filter(move |(_, entry)| categories.is_none_or(|wanted| entry.in_any_category(wanted)))
        .map(|(idx, _)| idx)
}

fn candidate_pool(catalog: &WordCatalog, settings: &GameSettings) -> (Vec<usize>, CascadeStage) {
    let difficulty = settings.difficulty.concrete();
    let categories = (!settings.categories.is_empty()).then_some(settings.categories.as_slice());

    let exact: Vec<usize> = filter_indices(catalog, difficulty, categories).collect();
    if !exact.is_empty() {
        return (exact, CascadeStage::Exact);
    }

    if categories.is_some() {
        let category_only: Vec<usize> = filter_indices(catalog, None, categories).collect();
        if !category_only.is_empty() {
            return (category_only, CascadeStage::CategoryOnly);
        }
    }

    if difficulty.is_some() {
        let difficulty_only: Vec<usize> = filter_indices(catalog, difficulty, None).collect();
        if !difficulty_only.is_empty() {
            return (difficulty_only, CascadeStage::DifficultyOnly);
        }
    }

    ((0..catalog.len()).collect(), CascadeStage::Unfiltered)
}

/// Pick the round's secret word, reporting how far the filters were relaxed.
pub fn select_word_with_trace<R: Rng + ?Sized>(
    catalog: &WordCatalog,
    settings: &GameSettings,
    rng: &mut R,
) -> WordPick {
    let (pool, stage) = candidate_pool(catalog, settings);
    let chosen = pool[rng.gen_range(0..pool.len())];
    let entry = &catalog.entries()[chosen];

    log::debug!(
        "word selection | difficulty:{:?} categories:{} stage:{stage:?} pool:{}",
        settings.difficulty,
        settings.categories.len(),
        pool.len()
    );

    WordPick {
        secret: SecretData::from(entry),
        stage,
        pool_size: pool.len(),
        catalog_index: chosen,
    }
}

/// Pick the round's secret word.
pub fn select_word<R: Rng + ?Sized>(
    catalog: &WordCatalog,
    settings: &GameSettings,
    rng: &mut R,
) -> SecretData {
    select_word_with_trace(catalog, settings, rng).secret
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DifficultyFilter;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use smallvec::SmallVec;

    fn entry(word: &str, categories: &[&str], difficulties: &[Difficulty]) -> WordEntry {
        WordEntry {
            word: word.to_string(),
            categories: categories.iter().map(ToString::to_string).collect(),
            difficulties: SmallVec::from_slice(difficulties),
            imposter_hint: format!("{word}-ish"),
        }
    }

    fn sample_catalog() -> WordCatalog {
        WordCatalog::new(vec![
            entry("Pizza", &["Food"], &[Difficulty::Easy]),
            entry("Sushi", &["Food"], &[Difficulty::Medium]),
            entry("Moon", &["Space"], &[Difficulty::Easy]),
            entry("Nebula", &["Space"], &[Difficulty::Hard]),
            entry("Tea", &["Drinks", "Kitchen"], &[Difficulty::Easy, Difficulty::Medium]),
        ])
        .unwrap()
    }

    fn pick(settings: &GameSettings, seed: u64) -> WordPick {
        let mut rng = SmallRng::seed_from_u64(seed);
        select_word_with_trace(&sample_catalog(), settings, &mut rng)
    }

    #[test]
    fn exact_match_uses_both_filters() {
        let settings = GameSettings::default()
            .with_categories(["Food"])
            .with_difficulty(DifficultyFilter::Medium);
        let picked = pick(&settings, 1);
        assert_eq!(picked.stage, CascadeStage::Exact);
        assert_eq!(picked.pool_size, 1);
        assert_eq!(picked.secret.word, "Sushi");
    }

    #[test]
    fn random_difficulty_and_no_categories_use_whole_catalog() {
        let picked = pick(&GameSettings::default(), 4);
        assert_eq!(picked.stage, CascadeStage::Exact);
        assert_eq!(picked.pool_size, 5);
    }

    #[test]
    fn conflicting_filters_relax_to_category_first() {
        let settings = GameSettings::default()
            .with_categories(["Space"])
            .with_difficulty(DifficultyFilter::Medium);
        let picked = pick(&settings, 2);
        assert_eq!(picked.stage, CascadeStage::CategoryOnly);
        assert_eq!(picked.pool_size, 2);
        assert!(["Moon", "Nebula"].contains(&picked.secret.word.as_str()));
    }

    #[test]
    fn unknown_category_relaxes_to_difficulty() {
        let settings = GameSettings::default()
            .with_categories(["Sports"])
            .with_difficulty(DifficultyFilter::Hard);
        let picked = pick(&settings, 3);
        assert_eq!(picked.stage, CascadeStage::DifficultyOnly);
        assert_eq!(picked.secret.word, "Nebula");
    }

    #[test]
    fn unknown_category_with_random_difficulty_falls_back_to_everything() {
        let settings = GameSettings::default().with_categories(["Sports"]);
        let picked = pick(&settings, 3);
        assert_eq!(picked.stage, CascadeStage::Unfiltered);
        assert_eq!(picked.pool_size, 5);
    }

    #[test]
    fn any_matching_category_is_enough() {
        let settings = GameSettings::default().with_categories(["Kitchen", "Nothing"]);
        let picked = pick(&settings, 9);
        assert_eq!(picked.stage, CascadeStage::Exact);
        assert_eq!(picked.secret.word, "Tea");
        assert_eq!(picked.secret.category, "Drinks, Kitchen");
        assert_eq!(picked.secret.imposter_hint.as_deref(), Some("Tea-ish"));
    }

    #[test]
    fn blank_hint_becomes_none() {
        let mut plain = entry("Mug", &["Kitchen"], &[Difficulty::Easy]);
        plain.imposter_hint = "  ".to_string();
        assert_eq!(SecretData::from(&plain).imposter_hint, None);
    }
}
