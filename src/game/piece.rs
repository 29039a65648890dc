use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of the board. White is the first player and moves first.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank index the pieces of this color start on.
    pub fn home_rank(self) -> i8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    pub fn pawn_direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    pub fn pawn_rank(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    pub fn promotion_rank(self) -> i8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => f.write_str("white"),
            Color::Black => f.write_str("black"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    pub fn is_pawn(self) -> bool {
        self == PieceKind::Pawn
    }

    pub fn is_knight(self) -> bool {
        self == PieceKind::Knight
    }

    pub fn is_bishop(self) -> bool {
        self == PieceKind::Bishop
    }

    pub fn is_rook(self) -> bool {
        self == PieceKind::Rook
    }

    pub fn is_queen(self) -> bool {
        self == PieceKind::Queen
    }

    pub fn is_king(self) -> bool {
        self == PieceKind::King
    }

    pub fn can_promote_to(self) -> bool {
        Self::PROMOTIONS.contains(&self)
    }

    /// Upper-case letter used in move notation. Pawns have none.
    pub fn letter(self) -> Option<char> {
        match self {
            PieceKind::Pawn => None,
            PieceKind::Knight => Some('N'),
            PieceKind::Bishop => Some('B'),
            PieceKind::Rook => Some('R'),
            PieceKind::Queen => Some('Q'),
            PieceKind::King => Some('K'),
        }
    }

    /// Parse a promotion choice such as `q` or `N`.
    pub fn from_letter(c: char) -> Option<PieceKind> {
        match c.to_ascii_uppercase() {
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            'P' => Some(PieceKind::Pawn),
            _ => None,
        }
    }

    fn magnitude(self) -> i8 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight => 2,
            PieceKind::Bishop => 3,
            PieceKind::Rook => 4,
            PieceKind::Queen => 5,
            PieceKind::King => 6,
        }
    }
}

/// A colored piece. On the wire it travels as a signed code: positive for
/// white, negative for black, magnitude 1..=6 from pawn to king.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(into = "i8", try_from = "i8")]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Piece { color, kind }
    }

    pub fn code(self) -> i8 {
        match self.color {
            Color::White => self.kind.magnitude(),
            Color::Black => -self.kind.magnitude(),
        }
    }

    /// Decode a non-empty cell code.
    pub fn from_code(code: i8) -> Option<Piece> {
        let color = if code > 0 { Color::White } else { Color::Black };
        let kind = match code.unsigned_abs() {
            1 => PieceKind::Pawn,
            2 => PieceKind::Knight,
            3 => PieceKind::Bishop,
            4 => PieceKind::Rook,
            5 => PieceKind::Queen,
            6 => PieceKind::King,
            _ => return None,
        };
        Some(Piece::new(color, kind))
    }

    /// Diagram symbol: upper-case for white, lower-case for black.
    pub fn symbol(self) -> char {
        let c = self.kind.letter().unwrap_or('P');
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }
}

impl From<Piece> for i8 {
    fn from(piece: Piece) -> i8 {
        piece.code()
    }
}

impl TryFrom<i8> for Piece {
    type Error = String;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        Piece::from_code(code).ok_or_else(|| format!("invalid piece code {}", code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_signed_by_color() {
        assert_eq!(Piece::new(Color::White, PieceKind::King).code(), 6);
        assert_eq!(Piece::new(Color::Black, PieceKind::Pawn).code(), -1);
        assert_eq!(
            Piece::from_code(-4),
            Some(Piece::new(Color::Black, PieceKind::Rook))
        );
        assert_eq!(Piece::from_code(0), None);
        assert_eq!(Piece::from_code(7), None);
    }

    #[test]
    fn only_four_promotion_targets() {
        assert!(PieceKind::Queen.can_promote_to());
        assert!(PieceKind::Knight.can_promote_to());
        assert!(!PieceKind::King.can_promote_to());
        assert!(!PieceKind::Pawn.can_promote_to());
    }

    #[test]
    fn promotion_letters_parse_case_insensitively() {
        assert_eq!(PieceKind::from_letter('q'), Some(PieceKind::Queen));
        assert_eq!(PieceKind::from_letter('N'), Some(PieceKind::Knight));
        assert_eq!(PieceKind::from_letter('x'), None);
    }
}
