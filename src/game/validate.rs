//! Move legality.
//!
//! Pure functions over a [`Position`]: nothing here mutates shared state.
//! Movement rules dispatch on [`PieceKind`]; attack detection reuses the
//! same geometry from the attacker's point of view.

use crate::error::IllegalMove;
use crate::game::board::{Board, Position, Square};
use crate::game::moves::{Move, RookMove};
use crate::game::piece::{Color, Piece, PieceKind};

/// Rule switches that differ from standard chess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    /// A king that is not in check may step onto an attacked square.
    /// Castling is never covered by this.
    pub permissive_king: bool,
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet {
            permissive_king: true,
        }
    }
}

impl RuleSet {
    pub fn strict() -> Self {
        RuleSet {
            permissive_king: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
}

enum Special {
    Normal,
    DoubleStep,
    EnPassant,
    Castle(RookMove),
}

fn is_clear_between(board: &Board, from: Square, to: Square) -> bool {
    let step_x = (to.x - from.x).signum();
    let step_y = (to.y - from.y).signum();
    let mut sq = from.offset(step_x, step_y);
    while sq != to {
        if !board.is_empty(sq) {
            return false;
        }
        sq = sq.offset(step_x, step_y);
    }
    true
}

fn is_knight_jump(dx: i8, dy: i8) -> bool {
    matches!((dx.abs(), dy.abs()), (1, 2) | (2, 1))
}

/// Whether `piece` standing on `from` attacks `target`.
fn attacks(board: &Board, piece: Piece, from: Square, target: Square) -> bool {
    let dx = target.x - from.x;
    let dy = target.y - from.y;
    if dx == 0 && dy == 0 {
        return false;
    }
    match piece.kind {
        PieceKind::Pawn => dx == piece.color.pawn_direction() && dy.abs() == 1,
        PieceKind::Knight => is_knight_jump(dx, dy),
        PieceKind::Bishop => dx.abs() == dy.abs() && is_clear_between(board, from, target),
        PieceKind::Rook => (dx == 0 || dy == 0) && is_clear_between(board, from, target),
        PieceKind::Queen => {
            (dx.abs() == dy.abs() || dx == 0 || dy == 0) && is_clear_between(board, from, target)
        }
        PieceKind::King => dx.abs() <= 1 && dy.abs() <= 1,
    }
}

/// Whether any piece of color `by` attacks `square`.
pub fn is_attacked(board: &Board, square: Square, by: Color) -> bool {
    board
        .pieces()
        .any(|(from, piece)| piece.color == by && attacks(board, piece, from, square))
}

/// Whether the king of `color` is attacked. A board without that king is
/// never in check.
pub fn in_check(board: &Board, color: Color) -> bool {
    board
        .king_square(color)
        .map(|king| is_attacked(board, king, color.opponent()))
        .unwrap_or(false)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MoveValidator {
    rules: RuleSet,
}

impl MoveValidator {
    pub fn new(rules: RuleSet) -> Self {
        MoveValidator { rules }
    }

    pub fn rules(&self) -> RuleSet {
        self.rules
    }

    /// Validate a move for the side to move and build its full record.
    pub fn build(
        &self,
        position: &Position,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move, IllegalMove> {
        self.build_for(position, position.side_to_move, from, to, promotion, true)
    }

    /// Rebuild `mv` from its coordinates and promotion choice as `side` would
    /// have produced it against `position`.
    pub fn rebuild(&self, position: &Position, side: Color, mv: &Move) -> Result<Move, IllegalMove> {
        self.build_for(position, side, mv.from, mv.to, mv.promotion(), true)
    }

    /// A move is legal when rebuilding it yields the identical record,
    /// snapshot and derived flags included.
    pub fn is_legal(&self, position: &Position, side: Color, mv: &Move) -> bool {
        if mv.is_new_game() {
            return false;
        }
        match self.rebuild(position, side, mv) {
            Ok(expected) => expected == *mv,
            Err(_) => false,
        }
    }

    /// Every legal move for the side to move, promotions expanded.
    pub fn legal_moves(&self, position: &Position) -> Vec<Move> {
        let mut moves = Vec::new();
        self.visit_moves(position, |mv| {
            moves.push(mv);
            true
        });
        moves
    }

    /// Squares the piece on `from` may move to. The four promotion choices
    /// for one square count once.
    pub fn destinations(&self, position: &Position, from: Square) -> Vec<Square> {
        let mut targets: Vec<Square> = self
            .legal_moves(position)
            .into_iter()
            .filter(|mv| mv.from == from)
            .map(|mv| mv.to)
            .collect();
        targets.dedup();
        targets
    }

    pub fn has_legal_move(&self, position: &Position) -> bool {
        let mut found = false;
        self.visit_moves(position, |_| {
            found = true;
            false
        });
        found
    }

    pub fn status(&self, position: &Position) -> Status {
        let check = in_check(&position.board, position.side_to_move);
        match (check, self.has_legal_move(position)) {
            (true, false) => Status::Checkmate,
            (false, false) => Status::Stalemate,
            (true, true) => Status::Check,
            (false, true) => Status::Ongoing,
        }
    }

    /// Feed legal moves to `visit` until it returns `false`.
    fn visit_moves<F>(&self, position: &Position, mut visit: F)
    where
        F: FnMut(Move) -> bool,
    {
        let side = position.side_to_move;
        let own: Vec<(Square, Piece)> = position
            .board
            .pieces()
            .filter(|(_, piece)| piece.color == side)
            .collect();

        for (from, piece) in own {
            for to in Square::all() {
                let promotes = piece.kind.is_pawn() && to.x == side.promotion_rank();
                let choices: &[Option<PieceKind>] = if promotes {
                    &[
                        Some(PieceKind::Queen),
                        Some(PieceKind::Rook),
                        Some(PieceKind::Bishop),
                        Some(PieceKind::Knight),
                    ]
                } else {
                    &[None]
                };
                for promotion in choices {
                    if let Ok(mv) = self.build_for(position, side, from, to, *promotion, true) {
                        if !visit(mv) {
                            return;
                        }
                    }
                }
            }
        }
    }

    fn build_for(
        &self,
        position: &Position,
        side: Color,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
        with_departure: bool,
    ) -> Result<Move, IllegalMove> {
        if !from.is_on_board() || !to.is_on_board() {
            return Err(IllegalMove::OffBoard);
        }
        if from == to {
            return Err(IllegalMove::NullMove);
        }
        let board = &position.board;
        let piece = board.get(from).ok_or(IllegalMove::EmptySquare)?;
        if piece.color != side {
            return Err(IllegalMove::OpponentPiece);
        }
        if let Some(target) = board.get(to) {
            if target.color == side {
                return Err(IllegalMove::OwnPiece);
            }
            if target.kind.is_king() {
                return Err(IllegalMove::KingCapture);
            }
        }

        let special = self.geometry(position, piece, from, to)?;

        let promoted = piece.kind.is_pawn() && to.x == side.promotion_rank();
        let landed = if promoted {
            match promotion {
                None => return Err(IllegalMove::MissingPromotion),
                Some(kind) if !kind.can_promote_to() => return Err(IllegalMove::InvalidPromotion),
                Some(kind) => Piece::new(side, kind),
            }
        } else {
            piece
        };

        let mut mv = Move {
            from,
            to,
            piece: Some(landed),
            rook: match special {
                Special::Castle(rook) => Some(rook),
                _ => None,
            },
            promoted,
            pawn_double_step: matches!(special, Special::DoubleStep),
            en_passant: matches!(special, Special::EnPassant),
            threatens_king: false,
            departure: String::new(),
            board: position.snapshot(),
        };

        let mut after = position.clone();
        after.apply(&mv);
        if in_check(&after.board, side) {
            let permitted = self.rules.permissive_king
                && piece.kind.is_king()
                && !mv.is_castling()
                && !in_check(board, side);
            if !permitted {
                return Err(IllegalMove::IntoCheck);
            }
        }

        mv.threatens_king = in_check(&after.board, side.opponent());
        if with_departure {
            mv.departure = self.departure(position, side, piece, from, to);
        }
        Ok(mv)
    }

    fn geometry(
        &self,
        position: &Position,
        piece: Piece,
        from: Square,
        to: Square,
    ) -> Result<Special, IllegalMove> {
        let board = &position.board;
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let slide = |ok: bool, name: &'static str| {
            if !ok {
                Err(IllegalMove::Geometry(name))
            } else if is_clear_between(board, from, to) {
                Ok(Special::Normal)
            } else {
                Err(IllegalMove::Blocked)
            }
        };

        match piece.kind {
            PieceKind::Pawn => self.pawn_geometry(position, piece.color, from, to),
            PieceKind::Knight => {
                if is_knight_jump(dx, dy) {
                    Ok(Special::Normal)
                } else {
                    Err(IllegalMove::Geometry("knight"))
                }
            }
            PieceKind::Bishop => slide(dx.abs() == dy.abs(), "bishop"),
            PieceKind::Rook => slide(dx == 0 || dy == 0, "rook"),
            PieceKind::Queen => slide(dx.abs() == dy.abs() || dx == 0 || dy == 0, "queen"),
            PieceKind::King => {
                if dx.abs() <= 1 && dy.abs() <= 1 {
                    Ok(Special::Normal)
                } else if dx == 0 && dy.abs() == 2 {
                    self.castle_geometry(position, piece.color, from, to)
                } else {
                    Err(IllegalMove::Geometry("king"))
                }
            }
        }
    }

    fn pawn_geometry(
        &self,
        position: &Position,
        color: Color,
        from: Square,
        to: Square,
    ) -> Result<Special, IllegalMove> {
        let board = &position.board;
        let dir = color.pawn_direction();
        let dx = to.x - from.x;
        let dy = to.y - from.y;

        if dy == 0 {
            if dx != dir && !(dx == 2 * dir && from.x == color.pawn_rank()) {
                return Err(IllegalMove::Geometry("pawn"));
            }
            if !board.is_empty(to) {
                return Err(IllegalMove::Blocked);
            }
            if dx == dir {
                return Ok(Special::Normal);
            }
            if !board.is_empty(from.offset(dir, 0)) {
                return Err(IllegalMove::Blocked);
            }
            return Ok(Special::DoubleStep);
        }

        if dy.abs() == 1 && dx == dir {
            if board.get(to).is_some() {
                return Ok(Special::Normal);
            }
            let passed = Square::new(from.x, to.y);
            if position.en_passant == Some(passed)
                && board.get(passed) == Some(Piece::new(color.opponent(), PieceKind::Pawn))
            {
                return Ok(Special::EnPassant);
            }
        }
        Err(IllegalMove::Geometry("pawn"))
    }

    fn castle_geometry(
        &self,
        position: &Position,
        color: Color,
        from: Square,
        to: Square,
    ) -> Result<Special, IllegalMove> {
        let board = &position.board;
        let rank = color.home_rank();
        if from != Square::new(rank, 4) {
            return Err(IllegalMove::Geometry("king"));
        }

        let rights = position.castling(color);
        let king_side = to.y > from.y;
        let (rook_from, rook_to, rook_moved) = if king_side {
            (Square::new(rank, 7), Square::new(rank, 5), rights.king_rook_moved)
        } else {
            (Square::new(rank, 0), Square::new(rank, 3), rights.queen_rook_moved)
        };

        if rights.king_moved || rook_moved {
            return Err(IllegalMove::Castling("king or rook has already moved"));
        }
        if board.get(rook_from) != Some(Piece::new(color, PieceKind::Rook)) {
            return Err(IllegalMove::Castling("no rook on the corner"));
        }
        if !is_clear_between(board, from, rook_from) {
            return Err(IllegalMove::Castling("path is obstructed"));
        }

        let them = color.opponent();
        if is_attacked(board, from, them) {
            return Err(IllegalMove::Castling("king is in check"));
        }
        let crossed = from.offset(0, (to.y - from.y).signum());
        if is_attacked(board, crossed, them) || is_attacked(board, to, them) {
            return Err(IllegalMove::Castling("king would pass an attacked square"));
        }

        Ok(Special::Castle(RookMove {
            from: rook_from,
            to: rook_to,
        }))
    }

    /// Origin hint for pieces that share a destination with a twin.
    fn departure(&self, position: &Position, side: Color, piece: Piece, from: Square, to: Square) -> String {
        if piece.kind.is_pawn() || piece.kind.is_king() {
            return String::new();
        }
        let rivals: Vec<Square> = position
            .board
            .pieces()
            .filter(|(sq, other)| *sq != from && *other == piece)
            .filter(|(sq, _)| self.build_for(position, side, *sq, to, None, false).is_ok())
            .map(|(sq, _)| sq)
            .collect();

        if rivals.is_empty() {
            String::new()
        } else if rivals.iter().all(|r| r.y != from.y) {
            from.file_char().to_string()
        } else if rivals.iter().all(|r| r.x != from.x) {
            from.rank_char().to_string()
        } else {
            from.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    /// Entries like `"Ke1"` (white) or `"ke8"` (black).
    fn setup(pieces: &[&str], side: Color) -> Position {
        let mut board = Board::empty();
        for entry in pieces {
            let symbol = entry.chars().next().unwrap();
            let kind = PieceKind::from_letter(symbol).unwrap();
            let color = if symbol.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            board.set(sq(&entry[1..]), Some(Piece::new(color, kind)));
        }
        Position::from_board(board, side)
    }

    fn play(validator: &MoveValidator, position: &mut Position, from: &str, to: &str) -> Move {
        let mv = validator.build(position, sq(from), sq(to), None).unwrap();
        position.apply(&mv);
        mv
    }

    #[test]
    fn opening_position_has_twenty_moves() {
        let position = Position::new();
        assert_eq!(MoveValidator::default().legal_moves(&position).len(), 20);
        assert_eq!(MoveValidator::new(RuleSet::strict()).legal_moves(&position).len(), 20);
    }

    #[test]
    fn pawn_double_step_only_from_home_rank() {
        let v = MoveValidator::default();
        let mut position = Position::new();
        let mv = play(&v, &mut position, "e2", "e4");
        assert!(mv.pawn_double_step);
        assert_eq!(position.en_passant, Some(sq("e4")));

        play(&v, &mut position, "a7", "a6");
        assert_eq!(
            v.build(&position, sq("e4"), sq("e6"), None),
            Err(IllegalMove::Geometry("pawn"))
        );
    }

    #[test]
    fn moving_from_empty_or_enemy_square_is_illegal() {
        let v = MoveValidator::default();
        let position = Position::new();
        assert_eq!(v.build(&position, sq("e4"), sq("e5"), None), Err(IllegalMove::EmptySquare));
        assert_eq!(v.build(&position, sq("e7"), sq("e5"), None), Err(IllegalMove::OpponentPiece));
        assert_eq!(v.build(&position, sq("a1"), sq("a3"), None), Err(IllegalMove::Blocked));
        assert_eq!(
            v.build(&position, Square::new(0, 0), Square::new(8, 0), None),
            Err(IllegalMove::OffBoard)
        );
    }

    #[test]
    fn en_passant_only_right_after_double_step() {
        let v = MoveValidator::default();
        let start = setup(&["Ke1", "ke8", "Pe5", "pd7", "Ph2", "ph7"], Color::Black);

        let mut position = start.clone();
        play(&v, &mut position, "d7", "d5");
        let mv = v.build(&position, sq("e5"), sq("d6"), None).unwrap();
        assert!(mv.en_passant);
        assert!(mv.is_capture());
        position.apply(&mv);
        assert!(position.board.is_empty(sq("d5")));

        let mut position = start;
        play(&v, &mut position, "d7", "d5");
        play(&v, &mut position, "h2", "h3");
        play(&v, &mut position, "h7", "h6");
        assert_eq!(
            v.build(&position, sq("e5"), sq("d6"), None),
            Err(IllegalMove::Geometry("pawn"))
        );
    }

    #[test]
    fn castling_through_attacked_square_is_rejected() {
        let v = MoveValidator::default();
        let position = setup(&["Ke1", "Rh1", "ka8", "rf8"], Color::White);
        assert!(matches!(
            v.build(&position, sq("e1"), sq("g1"), None),
            Err(IllegalMove::Castling(_))
        ));
    }

    #[test]
    fn plain_king_step_onto_attacked_square_is_permitted() {
        let position = setup(&["Ke1", "Rh1", "ka8", "rf8"], Color::White);

        let mv = MoveValidator::default()
            .build(&position, sq("e1"), sq("f2"), None)
            .unwrap();
        assert!(!mv.is_castling());

        assert_eq!(
            MoveValidator::new(RuleSet::strict()).build(&position, sq("e1"), sq("f2"), None),
            Err(IllegalMove::IntoCheck)
        );
    }

    #[test]
    fn king_in_check_must_resolve_it() {
        let position = setup(&["Ke1", "ka8", "re8", "rh2"], Color::White);
        let v = MoveValidator::default();
        assert_eq!(v.build(&position, sq("e1"), sq("e2"), None), Err(IllegalMove::IntoCheck));
        assert!(v.build(&position, sq("e1"), sq("d1"), None).is_ok());
    }

    #[test]
    fn castling_moves_rook_and_revokes_rights() {
        let v = MoveValidator::default();
        let mut position = setup(&["Ke1", "Rh1", "Ra1", "ke8"], Color::White);
        let mv = play(&v, &mut position, "e1", "g1");
        assert_eq!(
            mv.rook,
            Some(RookMove {
                from: sq("h1"),
                to: sq("f1")
            })
        );
        assert_eq!(
            position.board.get(sq("f1")),
            Some(Piece::new(Color::White, PieceKind::Rook))
        );
        assert!(position.castling(Color::White).king_moved);

        let mut position = setup(&["Ke1", "Ra1", "ke8"], Color::White);
        play(&v, &mut position, "a1", "a2");
        play(&v, &mut position, "e8", "d8");
        play(&v, &mut position, "a2", "a1");
        play(&v, &mut position, "d8", "e8");
        assert!(matches!(
            v.build(&position, sq("e1"), sq("c1"), None),
            Err(IllegalMove::Castling(_))
        ));
    }

    #[test]
    fn pinned_piece_cannot_expose_king() {
        let v = MoveValidator::default();
        let position = setup(&["Ke1", "Be2", "re8", "ka8"], Color::White);
        assert_eq!(v.build(&position, sq("e2"), sq("d3"), None), Err(IllegalMove::IntoCheck));
    }

    #[test]
    fn king_cannot_be_captured() {
        let v = MoveValidator::default();
        let position = setup(&["Ke1", "Qe7", "ke8"], Color::White);
        assert_eq!(v.build(&position, sq("e7"), sq("e8"), None), Err(IllegalMove::KingCapture));
    }

    #[test]
    fn promotion_requires_a_choice() {
        let v = MoveValidator::default();
        let position = setup(&["Ke1", "Pb7", "ke5", "na8"], Color::White);
        assert_eq!(
            v.build(&position, sq("b7"), sq("b8"), None),
            Err(IllegalMove::MissingPromotion)
        );
        assert_eq!(
            v.build(&position, sq("b7"), sq("b8"), Some(PieceKind::King)),
            Err(IllegalMove::InvalidPromotion)
        );
        let mv = v
            .build(&position, sq("b7"), sq("a8"), Some(PieceKind::Queen))
            .unwrap();
        assert!(mv.promoted);
        assert!(mv.is_capture());
        assert_eq!(mv.piece, Some(Piece::new(Color::White, PieceKind::Queen)));
    }

    #[test]
    fn fools_mate_is_checkmate() {
        let v = MoveValidator::default();
        let mut position = Position::new();
        play(&v, &mut position, "f2", "f3");
        play(&v, &mut position, "e7", "e5");
        play(&v, &mut position, "g2", "g4");
        let mate = play(&v, &mut position, "d8", "h4");
        assert!(mate.threatens_king);
        assert_eq!(v.status(&position), Status::Checkmate);
    }

    #[test]
    fn stalemate_depends_on_king_rule() {
        let position = setup(&["Kc6", "Qb6", "ka8"], Color::Black);
        assert_eq!(
            MoveValidator::new(RuleSet::strict()).status(&position),
            Status::Stalemate
        );
        assert_eq!(MoveValidator::default().status(&position), Status::Ongoing);
    }

    #[test]
    fn twins_get_departure_hint() {
        let v = MoveValidator::default();
        let position = setup(&["Ke1", "Nb1", "Nf1", "ke8"], Color::White);
        let mv = v.build(&position, sq("b1"), sq("d2"), None).unwrap();
        assert_eq!(mv.departure, "b");

        let position = setup(&["Kh1", "Ra1", "Ra5", "ke8"], Color::White);
        let mv = v.build(&position, sq("a1"), sq("a3"), None).unwrap();
        assert_eq!(mv.departure, "1");

        let position = setup(&["Ke1", "Nb1", "ke8"], Color::White);
        let mv = v.build(&position, sq("b1"), sq("d2"), None).unwrap();
        assert_eq!(mv.departure, "");
    }

    #[test]
    fn is_legal_rejects_tampered_records() {
        let v = MoveValidator::default();
        let position = Position::new();
        let mv = v.build(&position, sq("g1"), sq("f3"), None).unwrap();
        assert!(v.is_legal(&position, Color::White, &mv));
        assert!(!v.is_legal(&position, Color::Black, &mv));

        let mut forged = mv.clone();
        forged.threatens_king = true;
        assert!(!v.is_legal(&position, Color::White, &forged));

        let mut forged = mv;
        forged.to = sq("f4");
        assert!(!v.is_legal(&position, Color::White, &forged));
        assert!(!v.is_legal(&position, Color::White, &Move::new_game(Board::starting())));
    }

    #[test]
    fn accepted_moves_never_leave_mover_in_check() {
        let v = MoveValidator::new(RuleSet::strict());
        let mut position = Position::new();
        for ply in 0..40 {
            let moves = v.legal_moves(&position);
            if moves.is_empty() {
                break;
            }
            for mv in &moves {
                let mut after = position.clone();
                after.apply(mv);
                assert!(!in_check(&after.board, position.side_to_move));
            }
            let pick = &moves[(ply * 7) % moves.len()];
            position.apply(pick);
        }
    }

    #[test]
    fn destinations_group_promotion_choices() {
        let v = MoveValidator::default();
        let position = Position::new();
        assert_eq!(v.destinations(&position, sq("g1")), vec![sq("f3"), sq("h3")]);
        assert_eq!(v.destinations(&position, sq("e2")), vec![sq("e3"), sq("e4")]);
        assert!(v.destinations(&position, sq("e7")).is_empty());
        assert!(v.destinations(&position, sq("e4")).is_empty());

        let position = setup(&["Ke1", "Pb7", "ke5", "na8"], Color::White);
        assert_eq!(v.destinations(&position, sq("b7")), vec![sq("a8"), sq("b8")]);
    }

    #[test]
    fn castling_record_survives_revalidation() {
        let v = MoveValidator::default();
        let position = setup(&["Ke1", "Rh1", "Ra1", "ke8"], Color::White);
        let mv = v.build(&position, sq("e1"), sq("g1"), None).unwrap();
        assert!(v.is_legal(&position, Color::White, &mv));

        let mut forged = mv.clone();
        forged.rook = None;
        assert!(!v.is_legal(&position, Color::White, &forged));

        let mut forged = mv;
        forged.rook = Some(RookMove {
            from: sq("a1"),
            to: sq("d1"),
        });
        assert!(!v.is_legal(&position, Color::White, &forged));
    }

    #[test]
    fn promotion_capture_record_survives_revalidation() {
        let v = MoveValidator::default();
        let position = setup(&["Ke1", "Pb7", "ke5", "na8"], Color::White);
        let mv = v
            .build(&position, sq("b7"), sq("a8"), Some(PieceKind::Knight))
            .unwrap();
        assert!(v.is_legal(&position, Color::White, &mv));

        let mut forged = mv.clone();
        forged.promoted = false;
        assert!(!v.is_legal(&position, Color::White, &forged));

        let mut forged = mv;
        forged.piece = Some(Piece::new(Color::White, PieceKind::Pawn));
        assert!(!v.is_legal(&position, Color::White, &forged));
    }

    #[test]
    fn en_passant_record_survives_revalidation() {
        let v = MoveValidator::default();
        let mut position = setup(&["Ke1", "ke8", "Pe5", "pd7"], Color::Black);
        play(&v, &mut position, "d7", "d5");
        let mv = v.build(&position, sq("e5"), sq("d6"), None).unwrap();
        assert!(v.is_legal(&position, Color::White, &mv));

        let mut forged = mv.clone();
        forged.en_passant = false;
        assert!(!v.is_legal(&position, Color::White, &forged));

        // Same capture once the chance has passed.
        let mut later = position.clone();
        later.en_passant = None;
        assert!(!v.is_legal(&later, Color::White, &mv));
    }

    #[test]
    fn departure_hint_is_part_of_the_record() {
        let v = MoveValidator::default();
        let position = setup(&["Ke1", "Nb1", "Nf1", "ke8"], Color::White);
        let mv = v.build(&position, sq("b1"), sq("d2"), None).unwrap();
        assert!(v.is_legal(&position, Color::White, &mv));

        let mut forged = mv;
        forged.departure.clear();
        assert!(!v.is_legal(&position, Color::White, &forged));
    }

    #[test]
    fn king_left_in_attack_marks_every_reply_as_check() {
        let v = MoveValidator::default();
        let mut position = setup(&["Ke1", "kh8", "rf8", "pa7"], Color::White);
        play(&v, &mut position, "e1", "f2");
        let reply = play(&v, &mut position, "a7", "a6");
        assert!(reply.threatens_king);
        assert_eq!(crate::game::notation::notation(&reply), "a6+");
    }
}
