use std::fmt;

use imposter_game::{Player, PlayerId, Round};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// What the table does during one second of play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAction {
    Wait,
    NextTurn,
    TogglePause,
    CallVote,
    ImposterGuess,
}

/// Ballot cast once a vote is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteChoice {
    Player(PlayerId),
    Skip,
}

/// Policy interface for scripted tables.
pub trait TablePolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Decide what happens during the next second of play.
    fn act(&mut self, round: &Round, elapsed_secs: u32) -> TableAction;

    /// Pick who is voted out. `Skip` is only honoured after total time.
    fn vote(&mut self, round: &Round, skippable: bool) -> VoteChoice;

    /// Rule on the imposter's spoken guess.
    fn judge_guess(&mut self, round: &Round) -> bool;
}

/// Built-in table behaviours for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TableStrategy {
    /// Everyone speaks promptly and the table only votes when time runs out.
    Steady,
    /// Calls an emergency vote after two rotations and usually spots the imposter.
    Sleuth,
    /// The imposter stops play after one rotation to guess the word.
    BoldImposter,
    /// Nobody ever passes the turn.
    Silent,
    /// Random mix of every action, including pausing.
    Chaos,
}

impl TableStrategy {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TableStrategy::Steady => "Steady",
            TableStrategy::Sleuth => "Sleuth",
            TableStrategy::BoldImposter => "Bold Imposter",
            TableStrategy::Silent => "Silent",
            TableStrategy::Chaos => "Chaos",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn TablePolicy + Send> {
        let rng = ChaCha20Rng::seed_from_u64(seed);
        match self {
            TableStrategy::Steady => Box::new(SteadyTable { rng }),
            TableStrategy::Sleuth => Box::new(SleuthTable { rng }),
            TableStrategy::BoldImposter => Box::new(BoldImposterTable { rng }),
            TableStrategy::Silent => Box::new(SilentTable { rng }),
            TableStrategy::Chaos => Box::new(ChaosTable { rng }),
        }
    }
}

impl fmt::Display for TableStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Seconds each scripted speaker talks before passing the turn.
const SPEAK_SECS: u32 = 3;
const SLEUTH_ACCURACY: f64 = 0.7;
const IMPOSTER_GUESS_ACCURACY: f64 = 0.5;

struct SteadyTable {
    rng: ChaCha20Rng,
}

struct SleuthTable {
    rng: ChaCha20Rng,
}

struct BoldImposterTable {
    rng: ChaCha20Rng,
}

struct SilentTable {
    rng: ChaCha20Rng,
}

struct ChaosTable {
    rng: ChaCha20Rng,
}

fn turn_elapsed(round: &Round) -> u32 {
    round.clock().map_or(0, |clock| {
        round
            .settings()
            .turn_time_secs
            .saturating_sub(clock.turn_remaining())
    })
}

fn rotation_secs(round: &Round) -> u32 {
    u32::try_from(round.players().len())
        .unwrap_or(u32::MAX)
        .saturating_mul(SPEAK_SECS)
}

fn speak_then_pass(round: &Round) -> TableAction {
    if turn_elapsed(round) >= SPEAK_SECS {
        TableAction::NextTurn
    } else {
        TableAction::Wait
    }
}

fn random_player(round: &Round, rng: &mut ChaCha20Rng) -> PlayerId {
    let players = round.players();
    players[rng.gen_range(0..players.len())].id.clone()
}

fn first_with<F>(players: &[Player], pred: F) -> Option<PlayerId>
where
    F: Fn(&Player) -> bool,
{
    players.iter().find(|p| pred(p)).map(|p| p.id.clone())
}

impl TablePolicy for SteadyTable {
    fn name(&self) -> &'static str {
        "Steady"
    }

    fn act(&mut self, round: &Round, _elapsed_secs: u32) -> TableAction {
        speak_then_pass(round)
    }

    fn vote(&mut self, round: &Round, skippable: bool) -> VoteChoice {
        if skippable && self.rng.gen_bool(0.25) {
            VoteChoice::Skip
        } else {
            VoteChoice::Player(random_player(round, &mut self.rng))
        }
    }

    fn judge_guess(&mut self, _round: &Round) -> bool {
        self.rng.r#gen()
    }
}

impl TablePolicy for SleuthTable {
    fn name(&self) -> &'static str {
        "Sleuth"
    }

    fn act(&mut self, round: &Round, elapsed_secs: u32) -> TableAction {
        if elapsed_secs >= rotation_secs(round).saturating_mul(2) {
            TableAction::CallVote
        } else {
            speak_then_pass(round)
        }
    }

    fn vote(&mut self, round: &Round, _skippable: bool) -> VoteChoice {
        let spotted = self.rng.gen_bool(SLEUTH_ACCURACY);
        let target = first_with(round.players(), |p| p.is_imposter() == spotted)
            .unwrap_or_else(|| random_player(round, &mut self.rng));
        VoteChoice::Player(target)
    }

    fn judge_guess(&mut self, _round: &Round) -> bool {
        false
    }
}

impl TablePolicy for BoldImposterTable {
    fn name(&self) -> &'static str {
        "Bold Imposter"
    }

    fn act(&mut self, round: &Round, elapsed_secs: u32) -> TableAction {
        if elapsed_secs >= rotation_secs(round) {
            TableAction::ImposterGuess
        } else {
            speak_then_pass(round)
        }
    }

    fn vote(&mut self, round: &Round, _skippable: bool) -> VoteChoice {
        VoteChoice::Player(random_player(round, &mut self.rng))
    }

    fn judge_guess(&mut self, _round: &Round) -> bool {
        self.rng.gen_bool(IMPOSTER_GUESS_ACCURACY)
    }
}

impl TablePolicy for SilentTable {
    fn name(&self) -> &'static str {
        "Silent"
    }

    fn act(&mut self, _round: &Round, _elapsed_secs: u32) -> TableAction {
        TableAction::Wait
    }

    fn vote(&mut self, round: &Round, _skippable: bool) -> VoteChoice {
        VoteChoice::Player(random_player(round, &mut self.rng))
    }

    fn judge_guess(&mut self, _round: &Round) -> bool {
        self.rng.r#gen()
    }
}

impl TablePolicy for ChaosTable {
    fn name(&self) -> &'static str {
        "Chaos"
    }

    fn act(&mut self, round: &Round, _elapsed_secs: u32) -> TableAction {
        let paused = round.clock().is_some_and(|clock| clock.is_paused());
        let roll: f64 = self.rng.r#gen();
        if paused {
            return if roll < 0.3 {
                TableAction::TogglePause
            } else {
                TableAction::Wait
            };
        }
        match roll {
            r if r < 0.01 => TableAction::CallVote,
            r if r < 0.02 => TableAction::ImposterGuess,
            r if r < 0.12 => TableAction::TogglePause,
            r if r < 0.40 => TableAction::NextTurn,
            _ => TableAction::Wait,
        }
    }

    fn vote(&mut self, round: &Round, skippable: bool) -> VoteChoice {
        if skippable && self.rng.r#gen() {
            VoteChoice::Skip
        } else {
            VoteChoice::Player(random_player(round, &mut self.rng))
        }
    }

    fn judge_guess(&mut self, _round: &Round) -> bool {
        self.rng.r#gen()
    }
}
