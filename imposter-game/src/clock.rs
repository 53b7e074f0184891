//! Round countdowns
use serde::{Deserialize, Serialize};

/// Which countdown ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerExpiry {
    TotalTime,
    TurnTime { speaker: usize },
}

/// Total and per-turn countdowns sharing one pause flag.
///
/// The clock is advanced externally one second at a time. Once either
/// countdown expires the clock is spent: later ticks report nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundClock {
    total_remaining: u32,
    turn_remaining: u32,
    turn_length: u32,
    paused: bool,
    speaker: usize,
    player_count: usize,
    expired: Option<TimerExpiry>,
}

impl RoundClock {
    #[must_use]
    pub fn new(total_secs: u32, turn_secs: u32, player_count: usize, first_speaker: usize) -> Self {
        Self {
            total_remaining: total_secs,
            turn_remaining: turn_secs,
            turn_length: turn_secs,
            paused: false,
            speaker: first_speaker.min(player_count.saturating_sub(1)),
            player_count,
            expired: None,
        }
    }

    /// Advance both countdowns by one second.
    ///
    /// Total time wins when both reach zero on the same tick.
    pub fn tick(&mut self) -> Option<TimerExpiry> {
        if self.paused || self.expired.is_some() {
            return None;
        }
        self.total_remaining = self.total_remaining.saturating_sub(1);
        self.turn_remaining = self.turn_remaining.saturating_sub(1);

        let expiry = if self.total_remaining == 0 {
            Some(TimerExpiry::TotalTime)
        } else if self.turn_remaining == 0 {
            Some(TimerExpiry::TurnTime {
                speaker: self.speaker,
            })
        } else {
            None
        };
        self.expired = expiry;
        expiry
    }

    pub const fn pause(&mut self) {
        self.paused = true;
    }

    pub const fn resume(&mut self) {
        self.paused = false;
    }

    pub const fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Refill the turn countdown without touching total time.
    pub const fn reset_turn(&mut self) {
        self.turn_remaining = self.turn_length;
    }

    /// Hand the turn to the next seat. Ignored while paused or spent.
    pub fn advance_turn(&mut self) -> Option<usize> {
        if self.paused || self.expired.is_some() || self.player_count == 0 {
            return None;
        }
        self.speaker = (self.speaker + 1) % self.player_count;
        self.reset_turn();
        Some(self.speaker)
    }

    #[must_use]
    pub const fn total_remaining(&self) -> u32 {
        self.total_remaining
    }

    #[must_use]
    pub const fn turn_remaining(&self) -> u32 {
        self.turn_remaining
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub const fn speaker(&self) -> usize {
        self.speaker
    }

    #[must_use]
    pub const fn expired(&self) -> Option<TimerExpiry> {
        self.expired
    }
}
