use anyhow::{Context, Result};
use std::sync::Arc;

use imposter_game::{
    CascadeStage, EndTrigger, GameSettings, PendingDecision, Round, RoundPhase, RoundResult,
    RoundRng, WordCatalog, catalog,
};

use crate::logic::policy::{TableAction, TableStrategy, VoteChoice};

/// Safety cap on simulated seconds when a plan does not set one.
pub const DEFAULT_MAX_TICKS: u32 = 3_600;

const TABLE_NAMES: [&str; 12] = [
    "Ada", "Bo", "Cy", "Di", "Ed", "Flo", "Gus", "Hal", "Ivy", "Jo", "Kit", "Lu",
];

/// Seat names for a table of `count` players.
#[must_use]
pub fn table_names(count: usize) -> Vec<String> {
    (0..count)
        .map(|seat| match TABLE_NAMES.get(seat) {
            Some(name) => (*name).to_string(),
            None => format!("Player {}", seat + 1),
        })
        .collect()
}

/// Declarative plan for running a simulated round.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub players: usize,
    pub settings: GameSettings,
    pub strategy: TableStrategy,
    pub max_ticks: Option<u32>,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(players: usize, strategy: TableStrategy) -> Self {
        Self {
            players,
            settings: GameSettings::default(),
            strategy,
            max_ticks: None,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: GameSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub const fn with_max_ticks(mut self, max_ticks: u32) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Complete record of a simulated round.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategy: TableStrategy,
    pub ticks: u32,
    pub turns_passed: u32,
    pub pauses: u32,
    pub secret_word: String,
    pub word_stage: CascadeStage,
    pub trigger: Option<EndTrigger>,
    pub result: Option<RoundResult>,
    /// Total seconds left on the clock when play stopped.
    pub total_remaining: u32,
    pub imposter_seats: Vec<usize>,
}

impl SimulationSummary {
    #[must_use]
    pub fn outcome_label(&self) -> String {
        self.result
            .as_ref()
            .map_or_else(|| "unresolved".to_string(), |r| r.reason.to_string())
    }
}

/// Headless deterministic runner for the round engine.
#[derive(Clone)]
pub struct GameTester {
    verbose: bool,
    catalog: Arc<WordCatalog>,
}

impl GameTester {
    pub const fn new(catalog: Arc<WordCatalog>, verbose: bool) -> Self {
        Self { verbose, catalog }
    }

    #[must_use]
    pub fn try_new(verbose: bool) -> Self {
        Self::new(Arc::new(catalog::bundled().clone()), verbose)
    }

    /// Play one round from setup to resolution.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the table or an action the
    /// policy issued in a phase that should accept it.
    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
        let names = table_names(plan.players);
        let mut round = Round::start(
            &names,
            plan.settings.clone(),
            &self.catalog,
            RoundRng::from_user_seed(seed),
        )
        .context("round setup rejected")?;

        while !round.reveal_next()? {}

        let mut policy = plan.strategy.create_policy(seed);
        let max_ticks = plan.max_ticks.unwrap_or(DEFAULT_MAX_TICKS);
        let mut ticks = 0;
        let mut turns_passed = 0;
        let mut pauses = 0;

        while round.phase() == &RoundPhase::Playing && ticks < max_ticks {
            match policy.act(&round, ticks) {
                TableAction::Wait => {}
                TableAction::NextTurn => {
                    round.next_turn()?;
                    turns_passed += 1;
                }
                TableAction::TogglePause => {
                    if round.toggle_pause()? {
                        pauses += 1;
                    }
                }
                TableAction::CallVote => round.call_vote()?,
                TableAction::ImposterGuess => round.imposter_guess()?,
            }
            if round.phase() == &RoundPhase::Playing {
                round.tick()?;
                ticks += 1;
            }
        }

        if let RoundPhase::AwaitingContext { decision, .. } = round.phase().clone() {
            match decision {
                PendingDecision::Vote { skippable } => match policy.vote(&round, skippable) {
                    VoteChoice::Player(id) => {
                        round.submit_vote(&id)?;
                    }
                    VoteChoice::Skip if skippable => {
                        round.skip_vote()?;
                    }
                    VoteChoice::Skip => {
                        let fallback = round.players()[0].id.clone();
                        round.submit_vote(&fallback)?;
                    }
                },
                PendingDecision::GuessJudgment => {
                    let correct = policy.judge_guess(&round);
                    round.submit_guess(correct)?;
                }
            }
        }

        let summary = SimulationSummary {
            seed,
            strategy: plan.strategy,
            ticks,
            turns_passed,
            pauses,
            secret_word: round.secret().word.clone(),
            word_stage: round.word_stage(),
            trigger: round.trigger().cloned(),
            result: round.result().cloned(),
            total_remaining: round.clock().map_or(0, |clock| clock.total_remaining()),
            imposter_seats: round
                .players()
                .iter()
                .enumerate()
                .filter(|(_, p)| p.is_imposter())
                .map(|(seat, _)| seat)
                .collect(),
        };

        log::debug!(
            "seed {} [{}] ended on {} after {} ticks",
            seed,
            policy.name(),
            summary.outcome_label(),
            ticks
        );
        if self.verbose && summary.result.is_none() {
            println!("  ⏱️  seed {seed} hit the {max_ticks}-tick cap unresolved");
        }

        Ok(summary)
    }
}
