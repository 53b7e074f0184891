//! Round session controller
//!
//! Drives one round from the private reveal through timed play to its single
//! resolution. The first trigger moves the round out of play immediately, so
//! a late timer tick or a second button press cannot produce another result.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::WordCatalog;
use crate::clock::{RoundClock, TimerExpiry};
use crate::outcome::{
    EndTrigger, ResolutionContext, ResolveError, RoundResult, TriggerKind, resolve,
};
use crate::reveal::{RevealSequence, RoleCard};
use crate::rng::RoundRng;
use crate::roles::{Player, PlayerId, assign_roles, pick_first_speaker};
use crate::selector::{CascadeStage, SecretData, select_word_with_trace};
use crate::settings::{GameSettings, SetupReport, validate_setup};

/// Extra human input a trigger is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingDecision {
    /// Pick who the table votes out. After total time the vote may be skipped.
    Vote { skippable: bool },
    /// Judge whether the imposter's spoken guess matched the word.
    GuessJudgment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum RoundPhase {
    /// Device is being passed around for private role cards.
    Reveal,
    /// Timers running, waiting for the one trigger.
    Playing,
    /// Trigger fired; needs a vote target or a guess judgment.
    AwaitingContext {
        trigger: TriggerKind,
        decision: PendingDecision,
    },
    Resolved,
}

impl RoundPhase {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Reveal => "reveal",
            Self::Playing => "playing",
            Self::AwaitingContext { .. } => "awaiting_context",
            Self::Resolved => "resolved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("cannot start round: {0}")]
    InvalidSetup(#[from] SetupReport),
    #[error("{operation} is not allowed during the {phase} phase")]
    WrongPhase {
        operation: &'static str,
        phase: &'static str,
    },
    #[error("the round already ended on {0:?}")]
    TriggerAlreadyFired(TriggerKind),
    #[error("{0} is not allowed while the round is paused")]
    Paused(&'static str),
    #[error("a vote is required to finish this round")]
    VoteRequired,
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// One complete round: players, secret word, clock, and eventual result.
#[derive(Debug, Clone)]
pub struct Round {
    settings: GameSettings,
    players: Vec<Player>,
    secret: SecretData,
    word_stage: CascadeStage,
    reveal: RevealSequence,
    clock: Option<RoundClock>,
    phase: RoundPhase,
    trigger: Option<EndTrigger>,
    result: Option<RoundResult>,
    rng: RoundRng,
}

impl Round {
    /// Validate the table, assign roles, and pick the secret word.
    ///
    /// # Errors
    ///
    /// Returns [`RoundError::InvalidSetup`] listing every violated setup rule.
    pub fn start<S: AsRef<str>>(
        names: &[S],
        settings: GameSettings,
        catalog: &WordCatalog,
        mut rng: RoundRng,
    ) -> Result<Self, RoundError> {
        validate_setup(names, &settings).into_result()?;

        let imposter_count = usize::try_from(settings.imposter_count).unwrap_or(usize::MAX);
        let players = assign_roles(names, imposter_count, rng.roles());
        let pick = select_word_with_trace(catalog, &settings, rng.word());

        log::debug!(
            "round started | seed:{} players:{} imposters:{} word_stage:{:?}",
            rng.seed(),
            players.len(),
            settings.imposter_count,
            pick.stage
        );

        Ok(Self {
            reveal: RevealSequence::new(players.len()),
            settings,
            players,
            secret: pick.secret,
            word_stage: pick.stage,
            clock: None,
            phase: RoundPhase::Reveal,
            trigger: None,
            result: None,
            rng,
        })
    }

    /// Start a reproducible round from a user-visible seed.
    ///
    /// # Errors
    ///
    /// Returns [`RoundError::InvalidSetup`] listing every violated setup rule.
    pub fn start_seeded<S: AsRef<str>>(
        names: &[S],
        settings: GameSettings,
        catalog: &WordCatalog,
        seed: u64,
    ) -> Result<Self, RoundError> {
        Self::start(names, settings, catalog, RoundRng::from_user_seed(seed))
    }

    fn reject(&self, operation: &'static str) -> RoundError {
        let err = match (&self.phase, &self.trigger) {
            (RoundPhase::AwaitingContext { .. } | RoundPhase::Resolved, Some(trigger)) => {
                RoundError::TriggerAlreadyFired(trigger.kind())
            }
            (RoundPhase::AwaitingContext { trigger, .. }, None) => {
                RoundError::TriggerAlreadyFired(*trigger)
            }
            (phase, _) => RoundError::WrongPhase {
                operation,
                phase: phase.label(),
            },
        };
        log::warn!("rejected {operation}: {err}");
        err
    }

    fn playing_clock(&mut self, operation: &'static str) -> Result<&mut RoundClock, RoundError> {
        if self.phase != RoundPhase::Playing {
            return Err(self.reject(operation));
        }
        self.clock
            .as_mut()
            .ok_or(RoundError::WrongPhase {
                operation,
                phase: "playing",
            })
    }

    fn ensure_unpaused(&mut self, operation: &'static str) -> Result<(), RoundError> {
        if self.playing_clock(operation)?.is_paused() {
            return Err(RoundError::Paused(operation));
        }
        Ok(())
    }

    fn finish(&mut self, trigger: EndTrigger) -> Result<&RoundResult, RoundError> {
        let ctx = ResolutionContext {
            turn_timeout: self.settings.turn_timeout,
            secret: Some(&self.secret),
        };
        let result = resolve(&trigger, &self.players, ctx)?;
        self.trigger = Some(trigger);
        self.phase = RoundPhase::Resolved;
        Ok(&*self.result.insert(result))
    }

    fn await_context(&mut self, trigger: TriggerKind, decision: PendingDecision) {
        self.phase = RoundPhase::AwaitingContext { trigger, decision };
    }

    /// Card for whoever currently holds the device during the reveal.
    #[must_use]
    pub fn reveal_card(&self) -> Option<(&Player, RoleCard)> {
        if self.phase != RoundPhase::Reveal {
            return None;
        }
        let (seat, card) =
            self.reveal
                .current_card(&self.players, &self.secret, self.settings.use_imposter_hint)?;
        Some((&self.players[seat], card))
    }

    /// Hide the current card and pass the device on. After the last player
    /// the opening speaker is drawn and play begins.
    ///
    /// # Errors
    ///
    /// Returns [`RoundError::WrongPhase`] outside the reveal.
    pub fn reveal_next(&mut self) -> Result<bool, RoundError> {
        if self.phase != RoundPhase::Reveal {
            return Err(self.reject("reveal_next"));
        }
        if !self.reveal.advance() {
            return Ok(false);
        }
        let first = pick_first_speaker(self.players.len(), self.rng.speaker());
        self.clock = Some(RoundClock::new(
            self.settings.total_time_secs,
            self.settings.turn_time_secs,
            self.players.len(),
            first,
        ));
        self.phase = RoundPhase::Playing;
        log::debug!("reveal complete | first speaker seat {first}");
        Ok(true)
    }

    /// Advance the clock by one second.
    ///
    /// A turn timeout resolves at once; running out of total time opens a
    /// skippable vote.
    ///
    /// # Errors
    ///
    /// Returns an error when the round is not in play.
    pub fn tick(&mut self) -> Result<Option<TriggerKind>, RoundError> {
        let expiry = self.playing_clock("tick")?.tick();
        match expiry {
            None => Ok(None),
            Some(TimerExpiry::TotalTime) => {
                self.await_context(
                    TriggerKind::TotalTimeUp,
                    PendingDecision::Vote { skippable: true },
                );
                Ok(Some(TriggerKind::TotalTimeUp))
            }
            Some(TimerExpiry::TurnTime { speaker }) => {
                let speaker = self.players[speaker].id.clone();
                self.finish(EndTrigger::TurnTimeUp { speaker })?;
                Ok(Some(TriggerKind::TurnTimeUp))
            }
        }
    }

    /// Finish the current turn and hand over to the next seat.
    ///
    /// # Errors
    ///
    /// Returns an error when not in play or while paused.
    pub fn next_turn(&mut self) -> Result<&Player, RoundError> {
        self.ensure_unpaused("next_turn")?;
        let seat = self
            .playing_clock("next_turn")?
            .advance_turn()
            .ok_or(RoundError::Paused("next_turn"))?;
        Ok(&self.players[seat])
    }

    /// # Errors
    ///
    /// Returns an error when the round is not in play.
    pub fn pause(&mut self) -> Result<(), RoundError> {
        self.playing_clock("pause")?.pause();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error when the round is not in play.
    pub fn resume(&mut self) -> Result<(), RoundError> {
        self.playing_clock("resume")?.resume();
        Ok(())
    }

    /// Flip the pause flag, returning whether the round is now paused.
    ///
    /// # Errors
    ///
    /// Returns an error when the round is not in play.
    pub fn toggle_pause(&mut self) -> Result<bool, RoundError> {
        Ok(self.playing_clock("toggle_pause")?.toggle_pause())
    }

    /// The table calls an emergency vote.
    ///
    /// # Errors
    ///
    /// Returns an error when not in play, while paused, or after the round's
    /// trigger already fired.
    pub fn call_vote(&mut self) -> Result<(), RoundError> {
        self.ensure_unpaused("call_vote")?;
        self.await_context(
            TriggerKind::ManualVote,
            PendingDecision::Vote { skippable: false },
        );
        Ok(())
    }

    /// The imposter stops play to guess the secret word.
    ///
    /// # Errors
    ///
    /// Returns an error when not in play, while paused, or after the round's
    /// trigger already fired.
    pub fn imposter_guess(&mut self) -> Result<(), RoundError> {
        self.ensure_unpaused("imposter_guess")?;
        self.await_context(TriggerKind::ImposterGuess, PendingDecision::GuessJudgment);
        Ok(())
    }

    /// Record who the table voted out and resolve the round.
    ///
    /// # Errors
    ///
    /// Returns an error when no vote is pending or the id is not seated; the
    /// round stays open for another submission in the latter case.
    pub fn submit_vote(&mut self, voted: &PlayerId) -> Result<&RoundResult, RoundError> {
        let trigger = match self.phase {
            RoundPhase::AwaitingContext {
                trigger: TriggerKind::TotalTimeUp,
                ..
            } => EndTrigger::TotalTimeUp {
                vote: Some(voted.clone()),
            },
            RoundPhase::AwaitingContext {
                trigger: TriggerKind::ManualVote,
                ..
            } => EndTrigger::ManualVote {
                voted: voted.clone(),
            },
            _ => return Err(self.reject_context("submit_vote")),
        };
        self.finish(trigger)
    }

    /// End a timed-out round without holding a vote.
    ///
    /// # Errors
    ///
    /// Returns [`RoundError::VoteRequired`] for an emergency vote, or an
    /// error when no vote is pending.
    pub fn skip_vote(&mut self) -> Result<&RoundResult, RoundError> {
        match self.phase {
            RoundPhase::AwaitingContext {
                trigger: TriggerKind::TotalTimeUp,
                ..
            } => self.finish(EndTrigger::TotalTimeUp { vote: None }),
            RoundPhase::AwaitingContext {
                trigger: TriggerKind::ManualVote,
                ..
            } => Err(RoundError::VoteRequired),
            _ => Err(self.reject_context("skip_vote")),
        }
    }

    /// Record whether the imposter's guess was right and resolve the round.
    ///
    /// # Errors
    ///
    /// Returns an error when no guess is pending.
    pub fn submit_guess(&mut self, correct: bool) -> Result<&RoundResult, RoundError> {
        match self.phase {
            RoundPhase::AwaitingContext {
                trigger: TriggerKind::ImposterGuess,
                ..
            } => self.finish(EndTrigger::ImposterGuess { correct }),
            _ => Err(self.reject_context("submit_guess")),
        }
    }

    fn reject_context(&self, operation: &'static str) -> RoundError {
        let err = RoundError::WrongPhase {
            operation,
            phase: self.phase.label(),
        };
        log::warn!("rejected {operation}: {err}");
        err
    }

    #[must_use]
    pub const fn phase(&self) -> &RoundPhase {
        &self.phase
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub const fn secret(&self) -> &SecretData {
        &self.secret
    }

    /// How far the word filters had to be relaxed.
    #[must_use]
    pub const fn word_stage(&self) -> CascadeStage {
        self.word_stage
    }

    #[must_use]
    pub const fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub const fn clock(&self) -> Option<&RoundClock> {
        self.clock.as_ref()
    }

    /// Player whose turn it is, once play has started.
    #[must_use]
    pub fn current_speaker(&self) -> Option<&Player> {
        self.clock
            .as_ref()
            .and_then(|clock| self.players.get(clock.speaker()))
    }

    #[must_use]
    pub const fn trigger(&self) -> Option<&EndTrigger> {
        self.trigger.as_ref()
    }

    #[must_use]
    pub const fn result(&self) -> Option<&RoundResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.rng.seed()
    }
}
