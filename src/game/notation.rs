//! Short algebraic-style text for the move history.

use crate::game::moves::Move;
use crate::game::piece::PieceKind;

/// History token for `mv`, with the capture judged from its snapshot.
pub fn notation(mv: &Move) -> String {
    format_move(mv, mv.is_capture())
}

/// History token for `mv`. Pure: the same input always yields the same text.
pub fn format_move(mv: &Move, captured: bool) -> String {
    let piece = match mv.piece {
        Some(piece) => piece,
        None => return String::new(),
    };
    let dest = mv.to.to_string();
    let pawn_prefix = if captured {
        format!("{}x", mv.from.file_char())
    } else {
        String::new()
    };
    let prefix = if captured { "x" } else { "" };

    let mut text = if mv.promoted {
        let letter = piece.kind.letter().unwrap_or('Q');
        format!("{}{}{}", pawn_prefix, dest, letter)
    } else {
        match piece.kind {
            PieceKind::King if mv.is_castling() => {
                let castle = if mv.to.y == 6 { "0-0" } else { "0-0-0" };
                format!("K{}{} {}", prefix, dest, castle)
            }
            PieceKind::King => format!("K{}{}", prefix, dest),
            PieceKind::Pawn => {
                let ep = if mv.en_passant { " e.p." } else { "" };
                format!("{}{}{}", pawn_prefix, dest, ep)
            }
            kind => format!(
                "{}{}{}{}",
                kind.letter().unwrap_or('?'),
                mv.departure,
                prefix,
                dest
            ),
        }
    };

    if mv.threatens_king {
        text.push('+');
    }
    text
}
