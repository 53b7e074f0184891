use std::collections::HashSet;

use imposter_game::{
    CascadeStage, DifficultyFilter, GameSettings, WordCatalog, select_word,
    select_word_with_trace,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

const SINGLE_FOOD: &str = r#"{
    "words": [
        {"word": "Pizza", "categories": ["Food"], "difficulties": ["easy"], "imposter_hint": "Slice"}
    ]
}"#;

#[test]
fn unmatched_category_falls_back_to_sole_entry() {
    let catalog = WordCatalog::from_json(SINGLE_FOOD).unwrap();
    let settings = GameSettings::default()
        .with_categories(["Space"])
        .with_difficulty(DifficultyFilter::Easy);
    let mut rng = SmallRng::seed_from_u64(11);
    let pick = select_word_with_trace(&catalog, &settings, &mut rng);
    assert_eq!(pick.secret.word, "Pizza");
    assert_eq!(pick.secret.category, "Food");
    assert_eq!(pick.stage, CascadeStage::DifficultyOnly);
}

#[test]
fn unmatched_everything_still_returns_catalog_entry() {
    let catalog = WordCatalog::from_json(SINGLE_FOOD).unwrap();
    let settings = GameSettings::default()
        .with_categories(["Space"])
        .with_difficulty(DifficultyFilter::Hard);
    let mut rng = SmallRng::seed_from_u64(12);
    let pick = select_word_with_trace(&catalog, &settings, &mut rng);
    assert_eq!(pick.stage, CascadeStage::Unfiltered);
    assert_eq!(pick.secret.word, "Pizza");
}

#[test]
fn unfiltered_selection_reaches_every_bundled_word() {
    let catalog = WordCatalog::load_from_static();
    let settings = GameSettings::default();
    let mut rng = SmallRng::seed_from_u64(0xBEEF);
    let mut seen = HashSet::new();
    for _ in 0..(catalog.len() * 60) {
        seen.insert(select_word(&catalog, &settings, &mut rng).word);
    }
    let all: HashSet<String> = catalog.entries().iter().map(|e| e.word.clone()).collect();
    assert_eq!(seen, all);
}

#[test]
fn every_bundled_category_yields_an_exact_match() {
    let catalog = WordCatalog::load_from_static();
    let mut rng = SmallRng::seed_from_u64(1);
    for category in catalog.categories() {
        let settings = GameSettings::default().with_categories([category]);
        let pick = select_word_with_trace(&catalog, &settings, &mut rng);
        assert_eq!(pick.stage, CascadeStage::Exact, "category {category}");
        assert!(pick.secret.category.contains(category));
    }
}
