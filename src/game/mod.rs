pub mod board;
pub mod clock;
pub mod moves;
pub mod notation;
pub mod piece;
pub mod turn;
pub mod validate;

// Re-export important types
pub use board::{Board, CastlingRights, Position, Square};
pub use clock::{ClockSide, ClockSnapshot, Clocks};
pub use moves::{Move, RookMove};
pub use notation::{format_move, notation};
pub use piece::{Color, Piece, PieceKind};
pub use turn::{TurnController, TurnState};
pub use validate::{in_check, is_attacked, MoveValidator, RuleSet, Status};
