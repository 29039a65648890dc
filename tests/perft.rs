//! Move generation counts checked against the `chess` crate.

use chess::{Board as OracleBoard, MoveGen};
use std::str::FromStr;

use p2p_chess::game::{
    Board, CastlingRights, Color, MoveValidator, Piece, PieceKind, Position, RuleSet, Square,
};

fn oracle_perft(board: &OracleBoard, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    MoveGen::new_legal(board)
        .map(|m| oracle_perft(&board.make_move_new(m), depth - 1))
        .sum()
}

fn perft(validator: &MoveValidator, position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    validator
        .legal_moves(position)
        .iter()
        .map(|mv| {
            let mut next = position.clone();
            next.apply(mv);
            perft(validator, &next, depth - 1)
        })
        .sum()
}

/// Piece placement, side and castling fields of a FEN; en passant must be `-`.
fn from_fen(fen: &str) -> Position {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let mut board = Board::empty();
    for (row, rank) in fields[0].split('/').enumerate() {
        let x = 7 - row as i8;
        let mut y = 0i8;
        for c in rank.chars() {
            if let Some(skip) = c.to_digit(10) {
                y += skip as i8;
                continue;
            }
            let color = if c.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            let kind = PieceKind::from_letter(c).unwrap();
            board.set(Square::new(x, y), Some(Piece::new(color, kind)));
            y += 1;
        }
    }
    let side = if fields[1] == "w" {
        Color::White
    } else {
        Color::Black
    };

    let mut position = Position::from_board(board, side);
    let rights = fields[2];
    position.white_castling = CastlingRights {
        king_moved: !rights.contains('K') && !rights.contains('Q'),
        king_rook_moved: !rights.contains('K'),
        queen_rook_moved: !rights.contains('Q'),
    };
    position.black_castling = CastlingRights {
        king_moved: !rights.contains('k') && !rights.contains('q'),
        king_rook_moved: !rights.contains('k'),
        queen_rook_moved: !rights.contains('q'),
    };
    position
}

fn assert_matches_oracle(fen: &str, depth: u32) {
    let validator = MoveValidator::new(RuleSet::strict());
    let position = from_fen(fen);
    let oracle = OracleBoard::from_str(fen).unwrap();
    for d in 1..=depth {
        assert_eq!(
            perft(&validator, &position, d),
            oracle_perft(&oracle, d),
            "depth {} of {}",
            d,
            fen
        );
    }
}

#[test]
fn starting_position_matches_oracle() {
    let validator = MoveValidator::new(RuleSet::strict());
    let position = Position::new();
    let oracle = OracleBoard::default();
    for depth in 1..=3 {
        assert_eq!(
            perft(&validator, &position, depth),
            oracle_perft(&oracle, depth)
        );
    }
    assert_eq!(perft(&validator, &position, 3), 8902);
}

#[test]
fn castling_heavy_position_matches_oracle() {
    assert_matches_oracle(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        2,
    );
}

#[test]
fn en_passant_and_pins_match_oracle() {
    assert_matches_oracle("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 3);
}

#[test]
fn promotions_match_oracle() {
    assert_matches_oracle("n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1", 2);
}
