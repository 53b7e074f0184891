//! Imposter Game Engine
//!
//! Platform-agnostic round logic for the Imposter pass-the-device word game.
//! This crate picks the secret word, deals roles, runs the round clock and
//! resolves the single end-of-round trigger. Rendering and input stay with the
//! host application.

pub mod catalog;
pub mod clock;
pub mod constants;
pub mod outcome;
pub mod reveal;
pub mod rng;
pub mod roles;
pub mod round;
pub mod selector;
pub mod settings;

// Re-export commonly used types
pub use catalog::{CatalogError, Difficulty, WordCatalog, WordEntry};
pub use clock::{RoundClock, TimerExpiry};
pub use outcome::{
    EndTrigger, ReasonCode, ResolutionContext, ResolveError, RoundResult, Side, TriggerKind,
    resolve,
};
pub use reveal::{RevealSequence, RoleCard};
pub use rng::RoundRng;
pub use roles::{Player, PlayerId, Role, assign_roles};
pub use round::{PendingDecision, Round, RoundError, RoundPhase};
pub use selector::{CascadeStage, SecretData, WordPick, select_word, select_word_with_trace};
pub use settings::{
    DifficultyFilter, GameSettings, SetupReport, SetupViolation, TurnTimeoutPolicy,
    validate_setup,
};

/// Trait for abstracting word catalog loading
/// Platform-specific implementations should provide this
pub trait CatalogLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the word catalog from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or fails validation.
    fn load_catalog(&self) -> Result<WordCatalog, Self::Error>;
}

/// Serves the catalog compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledCatalog;

impl CatalogLoader for BundledCatalog {
    type Error = std::convert::Infallible;

    fn load_catalog(&self) -> Result<WordCatalog, Self::Error> {
        Ok(catalog::bundled().clone())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError<E>
where
    E: std::error::Error + 'static,
{
    #[error("word catalog unavailable: {0}")]
    Catalog(#[source] E),
    #[error(transparent)]
    Round(#[from] RoundError),
}

/// Main game engine for starting rounds against one catalog source
pub struct RoundEngine<L>
where
    L: CatalogLoader,
{
    loader: L,
}

impl<L> RoundEngine<L>
where
    L: CatalogLoader,
{
    /// Create a new engine with the provided catalog loader
    pub const fn new(loader: L) -> Self {
        Self { loader }
    }

    /// Start a round with a fresh random seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or the table setup is
    /// invalid.
    pub fn start_round<S: AsRef<str>>(
        &self,
        names: &[S],
        settings: GameSettings,
    ) -> Result<Round, EngineError<L::Error>> {
        self.start_with_rng(names, settings, RoundRng::from_entropy())
    }

    /// Start a reproducible round from a seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or the table setup is
    /// invalid.
    pub fn start_seeded_round<S: AsRef<str>>(
        &self,
        names: &[S],
        settings: GameSettings,
        seed: u64,
    ) -> Result<Round, EngineError<L::Error>> {
        self.start_with_rng(names, settings, RoundRng::from_user_seed(seed))
    }

    fn start_with_rng<S: AsRef<str>>(
        &self,
        names: &[S],
        settings: GameSettings,
        rng: RoundRng,
    ) -> Result<Round, EngineError<L::Error>> {
        let catalog = self.loader.load_catalog().map_err(EngineError::Catalog)?;
        Ok(Round::start(names, settings, &catalog, rng)?)
    }
}
