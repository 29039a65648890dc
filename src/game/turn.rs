use serde::Serialize;

use crate::error::TurnError;
use crate::game::piece::Color;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    WaitingForStart,
    MyTurn,
    TheirTurn,
    GameOver,
}

/// Who may move right now, and who is first player for this connection.
#[derive(Debug, Clone)]
pub struct TurnController {
    state: TurnState,
    first: Option<bool>,
}

impl Default for TurnController {
    fn default() -> Self {
        TurnController::new()
    }
}

impl TurnController {
    pub fn new() -> Self {
        TurnController {
            state: TurnState::WaitingForStart,
            first: None,
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Fixed once per connection; the listening side is first.
    pub fn assign_first(&mut self, first: bool) {
        self.first = Some(first);
        self.state = TurnState::WaitingForStart;
    }

    pub fn first(&self) -> Option<bool> {
        self.first
    }

    pub fn is_first(&self) -> bool {
        self.first == Some(true)
    }

    /// The first player plays white.
    pub fn my_color(&self) -> Option<Color> {
        self.first
            .map(|first| if first { Color::White } else { Color::Black })
    }

    pub fn ensure_can_start(&self) -> Result<(), TurnError> {
        match self.first {
            None => Err(TurnError::NoGame),
            Some(false) => Err(TurnError::NotFirstPlayer),
            Some(true) => Ok(()),
        }
    }

    pub fn ensure_my_turn(&self) -> Result<(), TurnError> {
        match self.state {
            TurnState::MyTurn => Ok(()),
            TurnState::TheirTurn => Err(TurnError::NotMyTurn),
            TurnState::GameOver => Err(TurnError::GameOver),
            TurnState::WaitingForStart => Err(TurnError::NoGame),
        }
    }

    /// New game announced: white (the first player) opens.
    pub fn start(&mut self) {
        self.state = if self.is_first() {
            TurnState::MyTurn
        } else {
            TurnState::TheirTurn
        };
    }

    pub fn local_move_sent(&mut self) {
        if self.state == TurnState::MyTurn {
            self.state = TurnState::TheirTurn;
        }
    }

    pub fn remote_move_applied(&mut self) {
        if self.state == TurnState::TheirTurn {
            self.state = TurnState::MyTurn;
        }
    }

    pub fn finish(&mut self) {
        self.state = TurnState::GameOver;
    }

    pub fn is_game_over(&self) -> bool {
        self.state == TurnState::GameOver
    }

    /// Connection gone: back to idle with no first player.
    pub fn clear(&mut self) {
        self.state = TurnState::WaitingForStart;
        self.first = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_first_player_starts() {
        let mut turn = TurnController::new();
        assert_eq!(turn.ensure_can_start(), Err(TurnError::NoGame));

        turn.assign_first(false);
        assert_eq!(turn.ensure_can_start(), Err(TurnError::NotFirstPlayer));
        assert_eq!(turn.my_color(), Some(Color::Black));

        turn.assign_first(true);
        assert!(turn.ensure_can_start().is_ok());
        assert_eq!(turn.my_color(), Some(Color::White));
    }

    #[test]
    fn turns_alternate() {
        let mut turn = TurnController::new();
        turn.assign_first(true);
        assert_eq!(turn.ensure_my_turn(), Err(TurnError::NoGame));

        turn.start();
        assert!(turn.ensure_my_turn().is_ok());
        turn.local_move_sent();
        assert_eq!(turn.ensure_my_turn(), Err(TurnError::NotMyTurn));
        turn.remote_move_applied();
        assert_eq!(turn.state(), TurnState::MyTurn);

        turn.finish();
        assert_eq!(turn.ensure_my_turn(), Err(TurnError::GameOver));
    }

    #[test]
    fn second_player_waits_for_opening_move() {
        let mut turn = TurnController::new();
        turn.assign_first(false);
        turn.start();
        assert_eq!(turn.state(), TurnState::TheirTurn);
        turn.local_move_sent();
        assert_eq!(turn.state(), TurnState::TheirTurn);
    }

    #[test]
    fn clearing_returns_to_idle() {
        let mut turn = TurnController::new();
        turn.assign_first(true);
        turn.start();
        turn.clear();
        assert_eq!(turn.state(), TurnState::WaitingForStart);
        assert_eq!(turn.first(), None);
    }
}
