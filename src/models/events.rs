use serde::Serialize;

use crate::game::{Color, Move};

/// Everything the core tells the presentation layer.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Connected {
        address: String,
        first: bool,
    },
    GameStarted {
        color: Color,
    },
    MoveApplied {
        #[serde(rename = "move")]
        mv: Move,
        notation: String,
        color: Color,
        local: bool,
    },
    /// `winner` is `None` for a draw.
    GameOver {
        winner: Option<Color>,
    },
    PeerDisconnected {
        show_message: bool,
    },
    Error {
        message: String,
    },
}

/// Port implemented by whatever renders the game.
pub trait Presentation {
    fn notify(&mut self, event: SessionEvent);
}

impl<F> Presentation for F
where
    F: FnMut(SessionEvent),
{
    fn notify(&mut self, event: SessionEvent) {
        self(event)
    }
}
