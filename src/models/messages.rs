use actix::{Message, MessageResponse};
use serde::Serialize;
use std::net::SocketAddr;

use crate::error::SessionError;
use crate::game::{Board, ClockSnapshot, Color, Move, PieceKind, Square, TurnState};
use crate::models::game_state::HistoryRow;
use crate::network::Role;

/// Start accepting a peer on `addr` (e.g. `0.0.0.0:4710`).
#[derive(Message, Debug, Clone)]
#[rtype(result = "Result<SocketAddr, SessionError>")]
pub struct Listen {
    pub addr: String,
}

/// Connect out to a listening peer.
#[derive(Message, Debug, Clone)]
#[rtype(result = "Result<SocketAddr, SessionError>")]
pub struct Connect {
    pub host: String,
    pub port: u16,
}

/// Announce a new game. First player only.
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "Result<(), SessionError>")]
pub struct StartNewGame;

#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "Result<Move, SessionError>")]
pub struct AttemptMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

/// Where the piece on `from` may go, for the side to move.
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "Result<Vec<Square>, SessionError>")]
pub struct LegalMoves {
    pub from: Square,
}

#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "()")]
pub struct Disconnect;

#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "()")]
pub struct Quit;

#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "SessionSnapshot")]
pub struct GetSnapshot;

/// Read-only view of a session for the presentation layer.
#[derive(MessageResponse, Serialize, Debug, Clone)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub board: Board,
    pub side_to_move: Color,
    pub turn: TurnState,
    pub first: Option<bool>,
    pub role: Option<Role>,
    pub peer: Option<String>,
    pub connected: bool,
    pub ready: bool,
    pub game_over: bool,
    pub winner: Option<Color>,
    pub history: Vec<HistoryRow>,
    pub clocks: ClockSnapshot,
}
