//! Round settings and setup validation
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Difficulty;
use crate::constants::{
    DEFAULT_IMPOSTER_COUNT, DEFAULT_TOTAL_TIME_SECS, DEFAULT_TURN_TIME_SECS,
    DEFAULT_USE_IMPOSTER_HINT, MIN_IMPOSTERS, MIN_PLAYERS,
};

/// Difficulty filter chosen at setup. `Random` accepts any difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyFilter {
    Easy,
    Medium,
    Hard,
    #[default]
    Random,
}

impl DifficultyFilter {
    /// The concrete difficulty to filter on, if any.
    #[must_use]
    pub const fn concrete(self) -> Option<Difficulty> {
        match self {
            Self::Easy => Some(Difficulty::Easy),
            Self::Medium => Some(Difficulty::Medium),
            Self::Hard => Some(Difficulty::Hard),
            Self::Random => None,
        }
    }
}

impl From<Difficulty> for DifficultyFilter {
    fn from(value: Difficulty) -> Self {
        match value {
            Difficulty::Easy => Self::Easy,
            Difficulty::Medium => Self::Medium,
            Difficulty::Hard => Self::Hard,
        }
    }
}

/// What a running-out turn timer means for the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnTimeoutPolicy {
    /// The round ends with no side declared.
    #[default]
    Neutral,
    /// The side of the player whose turn expired loses.
    AttributeToSpeaker,
}

/// Settings snapshot for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    #[serde(default = "GameSettings::default_total_time_secs")]
    pub total_time_secs: u32,
    #[serde(default = "GameSettings::default_turn_time_secs")]
    pub turn_time_secs: u32,
    #[serde(default = "GameSettings::default_imposter_count")]
    pub imposter_count: u32,
    #[serde(default = "GameSettings::default_use_imposter_hint")]
    pub use_imposter_hint: bool,
    /// Empty means every category is acceptable.
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub difficulty: DifficultyFilter,
    #[serde(default)]
    pub turn_timeout: TurnTimeoutPolicy,
}

impl GameSettings {
    const fn default_total_time_secs() -> u32 {
        DEFAULT_TOTAL_TIME_SECS
    }

    const fn default_turn_time_secs() -> u32 {
        DEFAULT_TURN_TIME_SECS
    }

    const fn default_imposter_count() -> u32 {
        DEFAULT_IMPOSTER_COUNT
    }

    const fn default_use_imposter_hint() -> bool {
        DEFAULT_USE_IMPOSTER_HINT
    }

    /// Parse settings from JSON, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: DifficultyFilter) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub const fn with_imposters(mut self, count: u32) -> Self {
        self.imposter_count = count;
        self
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            total_time_secs: Self::default_total_time_secs(),
            turn_time_secs: Self::default_turn_time_secs(),
            imposter_count: Self::default_imposter_count(),
            use_imposter_hint: Self::default_use_imposter_hint(),
            categories: Vec::new(),
            difficulty: DifficultyFilter::default(),
            turn_timeout: TurnTimeoutPolicy::default(),
        }
    }
}

/// A single setup rule that the table or settings break.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum SetupViolation {
    #[error("at least {min} players are required (got {count})")]
    TooFewPlayers { count: usize, min: usize },
    #[error("player {seat} has a blank name")]
    BlankName { seat: usize },
    #[error("at least {min} imposter is required")]
    NoImposters { min: u32 },
    #[error("imposter count {imposters} must be below the player count {players}")]
    TooManyImposters { imposters: u32, players: usize },
    #[error("total time must be positive")]
    ZeroTotalTime,
    #[error("turn time must be positive")]
    ZeroTurnTime,
}

/// Outcome of checking a proposed table against the setup rules.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error, Serialize)]
#[error("{} setup rule(s) violated", .violations.len())]
pub struct SetupReport {
    pub violations: Vec<SetupViolation>,
}

impl SetupReport {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    /// Convert into a `Result`, keeping the full list of violations.
    ///
    /// # Errors
    ///
    /// Returns the report itself when any rule is violated.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_ok() { Ok(()) } else { Err(self) }
    }
}

/// Check player names and settings before a round may start.
#[must_use]
pub fn validate_setup<S: AsRef<str>>(names: &[S], settings: &GameSettings) -> SetupReport {
    let mut violations = Vec::new();
    let count = names.len();

    if count < MIN_PLAYERS {
        violations.push(SetupViolation::TooFewPlayers {
            count,
            min: MIN_PLAYERS,
        });
    }

    // Seats identify players, so repeated names are allowed.
    for (seat, name) in names.iter().enumerate() {
        if name.as_ref().trim().is_empty() {
            violations.push(SetupViolation::BlankName { seat });
        }
    }

    if settings.imposter_count < MIN_IMPOSTERS {
        violations.push(SetupViolation::NoImposters { min: MIN_IMPOSTERS });
    } else if usize::try_from(settings.imposter_count).map_or(true, |n| n >= count) {
        violations.push(SetupViolation::TooManyImposters {
            imposters: settings.imposter_count,
            players: count,
        });
    }

    if settings.total_time_secs == 0 {
        violations.push(SetupViolation::ZeroTotalTime);
    }
    if settings.turn_time_secs == 0 {
        violations.push(SetupViolation::ZeroTurnTime);
    }

    SetupReport { violations }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Player {i}")).collect()
    }

    #[test]
    fn defaults_match_setup_screen() {
        let settings = GameSettings::default();
        assert_eq!(settings.total_time_secs, 300);
        assert_eq!(settings.turn_time_secs, 15);
        assert_eq!(settings.imposter_count, 1);
        assert!(settings.use_imposter_hint);
        assert!(settings.categories.is_empty());
        assert_eq!(settings.difficulty, DifficultyFilter::Random);
        assert_eq!(settings.turn_timeout, TurnTimeoutPolicy::Neutral);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings =
            GameSettings::from_json(r#"{"difficulty": "hard", "categories": ["Space"]}"#).unwrap();
        assert_eq!(settings.difficulty, DifficultyFilter::Hard);
        assert_eq!(settings.categories, vec!["Space".to_string()]);
        assert_eq!(settings.total_time_secs, 300);
        assert_eq!(settings.imposter_count, 1);
    }

    #[test]
    fn valid_table_passes() {
        let report = validate_setup(&names(4), &GameSettings::default());
        assert!(report.is_ok());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn two_players_is_too_few() {
        let report = validate_setup(&names(2), &GameSettings::default());
        assert!(
            report
                .violations
                .contains(&SetupViolation::TooFewPlayers { count: 2, min: 3 })
        );
    }

    #[test]
    fn imposters_must_be_fewer_than_players() {
        let settings = GameSettings::default().with_imposters(3);
        let report = validate_setup(&names(3), &settings);
        assert_eq!(
            report.violations,
            vec![SetupViolation::TooManyImposters {
                imposters: 3,
                players: 3
            }]
        );

        let ok = validate_setup(&names(4), &settings);
        assert!(ok.is_ok());
    }

    #[test]
    fn report_lists_every_violation() {
        let settings = GameSettings {
            total_time_secs: 0,
            turn_time_secs: 0,
            imposter_count: 0,
            ..GameSettings::default()
        };
        let report = validate_setup(&["Ada", " ", "Ada"], &settings);
        assert_eq!(
            report.violations,
            vec![
                SetupViolation::BlankName { seat: 1 },
                SetupViolation::NoImposters { min: 1 },
                SetupViolation::ZeroTotalTime,
                SetupViolation::ZeroTurnTime,
            ]
        );
        assert_eq!(report.to_string(), "4 setup rule(s) violated");
    }

    #[test]
    fn repeated_names_are_allowed() {
        let report = validate_setup(&["Ada", "Ada", "Bo"], &GameSettings::default());
        assert!(report.is_ok());
    }

    #[test]
    fn random_filter_has_no_concrete_difficulty() {
        assert_eq!(DifficultyFilter::Random.concrete(), None);
        assert_eq!(DifficultyFilter::Easy.concrete(), Some(Difficulty::Easy));
        assert_eq!(DifficultyFilter::from(Difficulty::Hard), DifficultyFilter::Hard);
    }
}
