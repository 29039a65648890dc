use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClockSide {
    Player,
    Opponent,
}

/// Elapsed thinking time per side. Advisory only; nothing in the rules reads it.
#[derive(Debug, Clone, Default)]
pub struct Clocks {
    player: Duration,
    opponent: Duration,
    active: Option<ClockSide>,
    last_move_time: Option<Instant>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSnapshot {
    pub player_ms: u64,
    pub opponent_ms: u64,
    pub active: Option<ClockSide>,
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

impl Clocks {
    pub fn new() -> Self {
        Clocks::default()
    }

    /// Zero both clocks and start `side`.
    pub fn restart(&mut self, side: ClockSide) {
        *self = Clocks::default();
        self.active = Some(side);
        self.last_move_time = Some(Instant::now());
    }

    /// Stop the running clock and start `side`. Idempotent.
    pub fn switch_to(&mut self, side: ClockSide) {
        self.settle();
        self.active = Some(side);
        self.last_move_time = Some(Instant::now());
    }

    /// Stop both clocks, keeping what they show.
    pub fn halt(&mut self) {
        self.settle();
        self.active = None;
        self.last_move_time = None;
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn elapsed(&self, side: ClockSide) -> Duration {
        let base = match side {
            ClockSide::Player => self.player,
            ClockSide::Opponent => self.opponent,
        };
        match (self.active, self.last_move_time) {
            (Some(active), Some(since)) if active == side => base + since.elapsed(),
            _ => base,
        }
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            player_ms: millis(self.elapsed(ClockSide::Player)),
            opponent_ms: millis(self.elapsed(ClockSide::Opponent)),
            active: self.active,
        }
    }

    fn settle(&mut self) {
        if let (Some(active), Some(since)) = (self.active, self.last_move_time) {
            let spent = since.elapsed();
            match active {
                ClockSide::Player => self.player += spent,
                ClockSide::Opponent => self.opponent += spent,
            }
        }
        self.last_move_time = None;
    }
}
