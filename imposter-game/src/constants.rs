//! Centralized defaults and limits for round setup and play.
//!
//! The setup screen bounds live here so the validation rules and the
//! tester agree on what a playable table looks like.

// Setup rules --------------------------------------------------------------
pub const MIN_PLAYERS: usize = 3;
pub const MIN_IMPOSTERS: u32 = 1;

// Default settings ---------------------------------------------------------
pub const DEFAULT_TOTAL_TIME_SECS: u32 = 300;
pub const DEFAULT_TURN_TIME_SECS: u32 = 15;
pub const DEFAULT_IMPOSTER_COUNT: u32 = 1;
pub const DEFAULT_USE_IMPOSTER_HINT: bool = true;

// Secret word --------------------------------------------------------------
pub const CATEGORY_DELIMITER: &str = ", ";

// Player ids ---------------------------------------------------------------
pub(crate) const PLAYER_ID_PREFIX: &str = "p-";

// RNG stream domain tags ---------------------------------------------------
pub(crate) const STREAM_WORD: &[u8] = b"word";
pub(crate) const STREAM_ROLES: &[u8] = b"roles";
pub(crate) const STREAM_SPEAKER: &[u8] = b"speaker";

// Result headline keys -----------------------------------------------------
pub(crate) const HEADLINE_CIVILIANS: &str = "result.headline.civilians";
pub(crate) const HEADLINE_IMPOSTER: &str = "result.headline.imposter";
pub(crate) const HEADLINE_NO_CONTEST: &str = "result.headline.no_contest";
