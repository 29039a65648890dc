use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::game::moves::Move;
use crate::game::piece::{Color, Piece, PieceKind};

pub const NSQUARES: i8 = 8;

/// A board coordinate. `x` is the rank index (0 is white's home rank) and
/// `y` the file index (0 is the a-file). Off-board values are representable
/// because the wire format uses `-1` for "no square".
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub x: i8,
    pub y: i8,
}

impl Square {
    pub const NONE: Square = Square { x: -1, y: -1 };

    pub const fn new(x: i8, y: i8) -> Self {
        Square { x, y }
    }

    pub fn is_on_board(self) -> bool {
        (0..NSQUARES).contains(&self.x) && (0..NSQUARES).contains(&self.y)
    }

    pub fn offset(self, dx: i8, dy: i8) -> Square {
        Square::new(self.x + dx, self.y + dy)
    }

    pub fn file_char(self) -> char {
        (b'a' + self.y as u8) as char
    }

    pub fn rank_char(self) -> char {
        (b'1' + self.x as u8) as char
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..NSQUARES).flat_map(|x| (0..NSQUARES).map(move |y| Square::new(x, y)))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_on_board() {
            write!(f, "{}{}", self.file_char(), self.rank_char())
        } else {
            f.write_str("--")
        }
    }
}

impl FromStr for Square {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(format!("invalid square: {}", s));
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(format!("invalid square: {}", s));
        }
        Ok(Square::new((rank - b'1') as i8, (file - b'a') as i8))
    }
}

type Grid = [[Option<Piece>; 8]; 8];
type CodeGrid = [[i8; 8]; 8];

/// The 8x8 grid. Serialized as a grid of signed piece codes, `0` for empty.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(into = "CodeGrid", try_from = "CodeGrid")]
pub struct Board {
    cells: Grid,
}

impl Default for Board {
    fn default() -> Self {
        Board::starting()
    }
}

impl Board {
    pub fn empty() -> Self {
        Board { cells: [[None; 8]; 8] }
    }

    /// Standard starting position.
    pub fn starting() -> Self {
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Board::empty();
        for color in [Color::White, Color::Black] {
            for (y, kind) in back.iter().enumerate() {
                board.cells[color.home_rank() as usize][y] = Some(Piece::new(color, *kind));
                board.cells[color.pawn_rank() as usize][y] =
                    Some(Piece::new(color, PieceKind::Pawn));
            }
        }
        board
    }

    pub fn get(&self, square: Square) -> Option<Piece> {
        if !square.is_on_board() {
            return None;
        }
        self.cells[square.x as usize][square.y as usize]
    }

    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        if square.is_on_board() {
            self.cells[square.x as usize][square.y as usize] = piece;
        }
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.get(square).is_none()
    }

    pub fn snapshot(&self) -> Board {
        *self
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        Square::all().find(|sq| self.get(*sq) == Some(Piece::new(color, PieceKind::King)))
    }

    /// Occupied squares with their pieces.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }
}

impl From<Board> for CodeGrid {
    fn from(board: Board) -> CodeGrid {
        let mut codes = [[0i8; 8]; 8];
        for (x, row) in board.cells.iter().enumerate() {
            for (y, cell) in row.iter().enumerate() {
                codes[x][y] = cell.map(Piece::code).unwrap_or(0);
            }
        }
        codes
    }
}

impl TryFrom<CodeGrid> for Board {
    type Error = String;

    fn try_from(codes: CodeGrid) -> Result<Self, Self::Error> {
        let mut board = Board::empty();
        for (x, row) in codes.iter().enumerate() {
            for (y, code) in row.iter().enumerate() {
                if *code != 0 {
                    board.cells[x][y] = Some(Piece::try_from(*code)?);
                }
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for x in (0..NSQUARES).rev() {
            write!(f, "{} ", x + 1)?;
            for y in 0..NSQUARES {
                let c = self.get(Square::new(x, y)).map(Piece::symbol).unwrap_or('.');
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "  abcdefgh")
    }
}

/// Castling bookkeeping for one color.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights {
    pub king_moved: bool,
    pub queen_rook_moved: bool,
    pub king_rook_moved: bool,
}

impl CastlingRights {
    fn touch(&mut self, color: Color, square: Square) {
        if square.x != color.home_rank() {
            return;
        }
        match square.y {
            0 => self.queen_rook_moved = true,
            4 => self.king_moved = true,
            7 => self.king_rook_moved = true,
            _ => {}
        }
    }
}

/// Board plus the state needed to judge the next move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub board: Board,
    pub side_to_move: Color,
    pub white_castling: CastlingRights,
    pub black_castling: CastlingRights,
    /// Square of the pawn that double-stepped on the previous move.
    pub en_passant: Option<Square>,
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

impl Position {
    pub fn new() -> Self {
        Position::from_board(Board::starting(), Color::White)
    }

    /// A position with fresh castling bookkeeping. Used for setups in tests
    /// and for re-seeding after a new game.
    pub fn from_board(board: Board, side_to_move: Color) -> Self {
        Position {
            board,
            side_to_move,
            white_castling: CastlingRights::default(),
            black_castling: CastlingRights::default(),
            en_passant: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Position::new();
    }

    pub fn snapshot(&self) -> Board {
        self.board.snapshot()
    }

    pub fn castling(&self, color: Color) -> &CastlingRights {
        match color {
            Color::White => &self.white_castling,
            Color::Black => &self.black_castling,
        }
    }

    fn castling_mut(&mut self, color: Color) -> &mut CastlingRights {
        match color {
            Color::White => &mut self.white_castling,
            Color::Black => &mut self.black_castling,
        }
    }

    /// Apply an already validated move. Trusts its caller and never fails.
    pub fn apply(&mut self, mv: &Move) {
        if mv.is_new_game() {
            return;
        }
        let piece = match mv.piece {
            Some(piece) => piece,
            None => return,
        };

        self.board.set(mv.from, None);
        self.board.set(mv.to, Some(piece));

        if mv.en_passant {
            self.board.set(Square::new(mv.from.x, mv.to.y), None);
        }

        if let Some(rook) = mv.rook {
            let rook_piece = self.board.get(rook.from);
            self.board.set(rook.from, None);
            self.board.set(rook.to, rook_piece);
        }

        for color in [Color::White, Color::Black] {
            let rights = self.castling_mut(color);
            rights.touch(color, mv.from);
            rights.touch(color, mv.to);
        }

        self.en_passant = if mv.pawn_double_step { Some(mv.to) } else { None };
        self.side_to_move = piece.color.opponent();
    }
}
