//! End-of-round resolution
//!
//! A round ends on exactly one trigger. The trigger carries whatever human
//! judgment it needs (who was voted out, whether the imposter's guess was
//! right), so resolution is a pure table lookup over the seated players.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{HEADLINE_CIVILIANS, HEADLINE_IMPOSTER, HEADLINE_NO_CONTEST};
use crate::roles::{Player, PlayerId, find_player, imposters};
use crate::selector::SecretData;
use crate::settings::TurnTimeoutPolicy;

/// The team that takes the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Civilians,
    Imposter,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Civilians => write!(f, "civilians"),
            Side::Imposter => write!(f, "imposter"),
        }
    }
}

/// The event that ended active play, with its required context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "trigger", rename_all = "snake_case")]
pub enum EndTrigger {
    /// Total time ran out. A vote may have been held afterwards.
    TotalTimeUp { vote: Option<PlayerId> },
    /// The current speaker's turn timer ran out.
    TurnTimeUp { speaker: PlayerId },
    /// The imposter stopped play to guess the word.
    ImposterGuess { correct: bool },
    /// The table called an emergency vote.
    ManualVote { voted: PlayerId },
}

impl EndTrigger {
    #[must_use]
    pub const fn kind(&self) -> TriggerKind {
        match self {
            Self::TotalTimeUp { .. } => TriggerKind::TotalTimeUp,
            Self::TurnTimeUp { .. } => TriggerKind::TurnTimeUp,
            Self::ImposterGuess { .. } => TriggerKind::ImposterGuess,
            Self::ManualVote { .. } => TriggerKind::ManualVote,
        }
    }
}

/// Payload-free trigger tag, used while a round waits for context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    TotalTimeUp,
    TurnTimeUp,
    ImposterGuess,
    ManualVote,
}

/// Why the round ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    TimeExpired,
    TurnTimeout,
    CivilianTimeout,
    ImposterTimeout,
    GuessCorrect,
    GuessWrong,
    VoteCorrect,
    VoteWrong,
}

impl ReasonCode {
    /// Winner implied by the reason; `None` is a no-contest.
    #[must_use]
    pub const fn winning_side(self) -> Option<Side> {
        match self {
            Self::TimeExpired | Self::TurnTimeout => None,
            Self::ImposterTimeout | Self::GuessWrong | Self::VoteCorrect => Some(Side::Civilians),
            Self::CivilianTimeout | Self::GuessCorrect | Self::VoteWrong => Some(Side::Imposter),
        }
    }

    const fn summary(self) -> &'static str {
        match self {
            Self::TimeExpired | Self::TurnTimeout => "Game over",
            Self::CivilianTimeout => "Civilian timed out",
            Self::ImposterTimeout => "Imposter went silent",
            Self::GuessCorrect => "Secret word found",
            Self::GuessWrong => "Wrong guess",
            Self::VoteCorrect => "Imposter caught",
            Self::VoteWrong => "Wrong person voted out",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::TimeExpired => "time_expired",
            Self::TurnTimeout => "turn_timeout",
            Self::CivilianTimeout => "civilian_timeout",
            Self::ImposterTimeout => "imposter_timeout",
            Self::GuessCorrect => "guess_correct",
            Self::GuessWrong => "guess_wrong",
            Self::VoteCorrect => "vote_correct",
            Self::VoteWrong => "vote_wrong",
        };
        f.write_str(label)
    }
}

/// Everything the result screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub winning_side: Option<Side>,
    pub reason: ReasonCode,
    /// Stable key for the headline, e.g. `result.headline.civilians`.
    pub headline_key: String,
    pub title: String,
    pub summary: String,
    pub narrative: String,
    pub secret_word: Option<String>,
    pub secret_category: Option<String>,
    pub imposter_names: Vec<String>,
    /// Every seated player with their true role, in seating order.
    pub revealed_roles: Vec<Player>,
}

impl RoundResult {
    #[must_use]
    pub fn is_no_contest(&self) -> bool {
        self.winning_side.is_none()
    }
}

/// Inputs beyond the trigger that shape the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolutionContext<'a> {
    pub turn_timeout: TurnTimeoutPolicy,
    pub secret: Option<&'a SecretData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no seated player has id '{id}'")]
    UnknownPlayer { id: PlayerId },
}

fn seated<'a>(players: &'a [Player], id: &PlayerId) -> Result<&'a Player, ResolveError> {
    find_player(players, id).ok_or_else(|| ResolveError::UnknownPlayer { id: id.clone() })
}

fn vote_outcome(
    players: &[Player],
    voted: &PlayerId,
) -> Result<(ReasonCode, String), ResolveError> {
    let target = seated(players, voted)?;
    // One caught imposter is enough, even with several at the table.
    if target.is_imposter() {
        Ok((
            ReasonCode::VoteCorrect,
            format!("{} really was an imposter.", target.name),
        ))
    } else {
        Ok((
            ReasonCode::VoteWrong,
            format!("{} was innocent.", target.name),
        ))
    }
}

fn turn_timeout_outcome(
    players: &[Player],
    speaker: &PlayerId,
    policy: TurnTimeoutPolicy,
) -> Result<(ReasonCode, String), ResolveError> {
    let player = seated(players, speaker)?;
    let outcome = match (policy, player.is_imposter()) {
        (TurnTimeoutPolicy::Neutral, _) => (
            ReasonCode::TurnTimeout,
            format!(
                "{} ran out of time; the round ends without a winner.",
                player.name
            ),
        ),
        (TurnTimeoutPolicy::AttributeToSpeaker, false) => (
            ReasonCode::CivilianTimeout,
            format!(
                "{} could not say a word in time and was eliminated.",
                player.name
            ),
        ),
        (TurnTimeoutPolicy::AttributeToSpeaker, true) => (
            ReasonCode::ImposterTimeout,
            format!("{} could not come up with a word in time.", player.name),
        ),
    };
    Ok(outcome)
}

fn headline(side: Option<Side>) -> (&'static str, &'static str) {
    match side {
        Some(Side::Civilians) => (HEADLINE_CIVILIANS, "CIVILIANS WIN!"),
        Some(Side::Imposter) => (HEADLINE_IMPOSTER, "IMPOSTER WINS!"),
        None => (HEADLINE_NO_CONTEST, "TIME'S UP!"),
    }
}

/// Turn the round's trigger into its final result.
///
/// # Errors
///
/// Returns [`ResolveError::UnknownPlayer`] when the trigger names a player
/// who is not seated at the table.
pub fn resolve(
    trigger: &EndTrigger,
    players: &[Player],
    ctx: ResolutionContext<'_>,
) -> Result<RoundResult, ResolveError> {
    let (reason, narrative) = match trigger {
        EndTrigger::TotalTimeUp { vote: None } => (
            ReasonCode::TimeExpired,
            "Time ran out before anyone was voted out.".to_string(),
        ),
        EndTrigger::TotalTimeUp { vote: Some(voted) } | EndTrigger::ManualVote { voted } => {
            vote_outcome(players, voted)?
        }
        EndTrigger::TurnTimeUp { speaker } => {
            turn_timeout_outcome(players, speaker, ctx.turn_timeout)?
        }
        EndTrigger::ImposterGuess { correct: true } => (
            ReasonCode::GuessCorrect,
            "The imposter named the secret word.".to_string(),
        ),
        EndTrigger::ImposterGuess { correct: false } => (
            ReasonCode::GuessWrong,
            "The imposter guessed wrong.".to_string(),
        ),
    };

    let winning_side = reason.winning_side();
    let (headline_key, title) = headline(winning_side);

    log::debug!(
        "round resolved | trigger:{:?} reason:{reason} winner:{winning_side:?}",
        trigger.kind()
    );

    Ok(RoundResult {
        winning_side,
        reason,
        headline_key: headline_key.to_string(),
        title: title.to_string(),
        summary: reason.summary().to_string(),
        narrative,
        secret_word: ctx.secret.map(|secret| secret.word.clone()),
        secret_category: ctx.secret.map(|secret| secret.category.clone()),
        imposter_names: imposters(players).map(|p| p.name.clone()).collect(),
        revealed_roles: players.to_vec(),
    })
}
