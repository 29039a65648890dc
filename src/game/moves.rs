use serde::{Deserialize, Serialize};

use crate::game::board::{Board, Square};
use crate::game::piece::{Color, Piece, PieceKind};

/// Rook half of a castling move.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RookMove {
    pub from: Square,
    pub to: Square,
}

/// A fully self-describing move record. This is also the network message:
/// the receiver needs nothing beyond what is embedded here to apply it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    /// Piece that ends up on `to`; the promoted piece for promotions.
    pub piece: Option<Piece>,
    pub rook: Option<RookMove>,
    pub promoted: bool,
    pub pawn_double_step: bool,
    pub en_passant: bool,
    /// The opponent's king is attacked once this move is made.
    pub threatens_king: bool,
    pub departure: String,
    /// Board as it stood before the move.
    pub board: Board,
}

impl Move {
    /// The "new game, no move yet" announcement.
    pub fn new_game(board: Board) -> Self {
        Move {
            from: Square::NONE,
            to: Square::NONE,
            piece: None,
            rook: None,
            promoted: false,
            pawn_double_step: false,
            en_passant: false,
            threatens_king: false,
            departure: String::new(),
            board,
        }
    }

    pub fn is_new_game(&self) -> bool {
        self.from == Square::NONE && self.to == Square::NONE && self.piece.is_none()
    }

    pub fn color(&self) -> Option<Color> {
        self.piece.map(|p| p.color)
    }

    /// Kind of the piece that moved. A promoting move reports its pawn.
    pub fn moved_kind(&self) -> Option<PieceKind> {
        if self.promoted {
            return Some(PieceKind::Pawn);
        }
        self.piece.map(|p| p.kind)
    }

    pub fn promotion(&self) -> Option<PieceKind> {
        if self.promoted {
            self.piece.map(|p| p.kind)
        } else {
            None
        }
    }

    pub fn is_castling(&self) -> bool {
        self.rook.is_some()
    }

    /// Whether the move took a piece, judged from the pre-move snapshot.
    pub fn is_capture(&self) -> bool {
        self.en_passant || self.board.get(self.to).is_some()
    }
}
