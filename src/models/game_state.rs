use serde::Serialize;

use crate::game::{ClockSide, Clocks, Color, Position, TurnController, TurnState};

/// One row of the move history: white's move and black's reply.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryRow {
    pub white: Option<String>,
    pub black: Option<String>,
}

/// Everything one side knows about the game in progress.
#[derive(Debug, Clone, Default)]
pub struct GameState {
    pub position: Position,
    pub turn: TurnController,
    pub clocks: Clocks,
    pub history: Vec<HistoryRow>,
    pub winner: Option<Color>,
}

impl GameState {
    pub fn new() -> Self {
        GameState::default()
    }

    /// Reset the board and history for a freshly announced game.
    pub fn begin(&mut self) {
        self.position.reset();
        self.history.clear();
        self.winner = None;
        self.turn.start();
        let side = if self.turn.state() == TurnState::MyTurn {
            ClockSide::Player
        } else {
            ClockSide::Opponent
        };
        self.clocks.restart(side);
    }

    /// Append a history token in the column of `color`.
    pub fn record(&mut self, color: Color, text: String) {
        let needs_row = match self.history.last() {
            None => true,
            Some(row) => row.white.is_some() && row.black.is_some(),
        };
        if needs_row {
            self.history.push(HistoryRow::default());
        }
        if let Some(row) = self.history.last_mut() {
            match color {
                Color::White => row.white = Some(text),
                Color::Black => row.black = Some(text),
            }
        }
    }

    pub fn finish(&mut self, winner: Option<Color>) {
        self.winner = winner;
        self.turn.finish();
        self.clocks.halt();
    }

    pub fn is_game_over(&self) -> bool {
        self.turn.is_game_over()
    }

    /// Connection gone: idle turn, clocks stopped, board kept for display.
    pub fn go_idle(&mut self) {
        self.turn.clear();
        self.clocks.halt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_fills_two_columns() {
        let mut state = GameState::new();
        state.record(Color::White, "e4".to_string());
        state.record(Color::Black, "e5".to_string());
        state.record(Color::White, "Nf3".to_string());
        assert_eq!(state.history.len(), 2);
        assert_eq!(state.history[0].black.as_deref(), Some("e5"));
        assert_eq!(state.history[1].white.as_deref(), Some("Nf3"));
        assert_eq!(state.history[1].black, None);
    }

    #[test]
    fn begin_starts_the_right_clock() {
        let mut state = GameState::new();
        state.turn.assign_first(false);
        state.record(Color::White, "e4".to_string());
        state.begin();
        assert!(state.history.is_empty());
        assert_eq!(state.turn.state(), TurnState::TheirTurn);
        assert_eq!(state.clocks.snapshot().active, Some(ClockSide::Opponent));
    }

    #[test]
    fn going_idle_halts_clocks() {
        let mut state = GameState::new();
        state.turn.assign_first(true);
        state.begin();
        state.go_idle();
        assert!(!state.clocks.is_running());
        assert_eq!(state.turn.state(), TurnState::WaitingForStart);
    }
}
