//! Two-player chess over a direct TCP link.
//!
//! Each process runs a full rules engine ([`game`]) and a [`session::GameSession`]
//! actor that keeps its board in step with the peer by exchanging
//! self-describing move records ([`network`]).

pub mod config;
pub mod error;
pub mod game;
pub mod models;
pub mod network;
pub mod session;

pub use config::{SessionConfig, Settings};
pub use error::{IllegalMove, ProtocolError, SessionError, TurnError};
pub use session::GameSession;
