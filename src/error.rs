use std::io;
use thiserror::Error;

/// Why the validator refused a move. Returned, never raised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IllegalMove {
    #[error("square is off the board")]
    OffBoard,
    #[error("piece must move to a different square")]
    NullMove,
    #[error("no piece on the origin square")]
    EmptySquare,
    #[error("that piece belongs to the opponent")]
    OpponentPiece,
    #[error("destination holds one of your own pieces")]
    OwnPiece,
    #[error("the king cannot be captured")]
    KingCapture,
    #[error("a {0} cannot move that way")]
    Geometry(&'static str),
    #[error("the path is blocked")]
    Blocked,
    #[error("castling is not allowed: {0}")]
    Castling(&'static str),
    #[error("move would leave your king in check")]
    IntoCheck,
    #[error("a promotion piece must be chosen")]
    MissingPromotion,
    #[error("cannot promote to that piece")]
    InvalidPromotion,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    #[error("Please start a game first.")]
    NoGame,
    #[error("Only the first player may initiate a new game.")]
    NotFirstPlayer,
    #[error("It is not your turn.")]
    NotMyTurn,
    #[error("The game is over.")]
    GameOver,
}

/// Problems with what the peer sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("received move has coordinates outside the board")]
    OutOfRange,
    #[error("received move carries no piece")]
    MissingPiece,
    #[error("received a move while it was not the peer's turn")]
    OutOfTurn,
    #[error("received a move for the wrong side")]
    WrongSide,
    #[error("received an illegal move: {0}")]
    Illegal(String),
    #[error("peer board snapshot does not match the local board")]
    Desync,
    #[error("only the first player may start a new game")]
    UnexpectedNewGame,
    #[error("frame of {0} bytes exceeds the limit")]
    FrameTooLarge(usize),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Illegal(#[from] IllegalMove),
    #[error(transparent)]
    Turn(#[from] TurnError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("invalid connection target: {0}")]
    InvalidTarget(String),
    #[error("not connected to a peer")]
    NotConnected,
    #[error("already connected to a peer")]
    AlreadyConnected,
    #[error("already listening for a peer")]
    AlreadyListening,
    #[error("network error: {0}")]
    Io(#[from] io::Error),
}
