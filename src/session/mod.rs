//! The game session actor.
//!
//! One actor per process owns the position, turn controller and peer link.
//! Local commands and received moves are both actor messages, so the mailbox
//! serializes every mutation of the board.

mod game_handlers;
mod handler;

use actix::io::FramedWrite;
use actix::{AsyncContext, Context, SpawnHandle};
use log::{info, warn};
use std::net::SocketAddr;
use tokio::net::TcpStream;
use tokio_util::codec::FramedRead;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::{ProtocolError, SessionError};
use crate::game::{notation, ClockSide, Color, Move, MoveValidator, Status, TurnState};
use crate::models::{GameState, Presentation, SessionEvent, SessionSnapshot};
use crate::network::{check_received, Link, MoveCodec, NetworkSync, Role};

pub struct GameSession {
    pub id: Uuid,
    config: SessionConfig,
    validator: MoveValidator,
    state: GameState,
    sync: NetworkSync,
    listener: Option<SpawnHandle>,
    presenter: Box<dyn Presentation>,
}

impl GameSession {
    pub fn new(config: SessionConfig, presenter: Box<dyn Presentation>) -> Self {
        GameSession {
            id: Uuid::new_v4(),
            config,
            validator: MoveValidator::new(config.rules),
            state: GameState::new(),
            sync: NetworkSync::new(),
            listener: None,
            presenter,
        }
    }

    fn emit(&mut self, event: SessionEvent) {
        self.presenter.notify(event);
    }

    /// Surface an error to the presentation and hand it back to the caller.
    fn report(&mut self, err: SessionError) -> SessionError {
        warn!("Session {}: {}", self.id, err);
        self.emit(SessionEvent::Error {
            message: err.to_string(),
        });
        err
    }

    fn my_color(&self) -> Option<Color> {
        self.state.turn.my_color()
    }

    fn attach(&mut self, stream: TcpStream, peer: SocketAddr, role: Role, ctx: &mut Context<Self>) {
        let (read_half, write_half) = stream.into_split();
        let reader = ctx.add_stream(FramedRead::new(read_half, MoveCodec));
        let writer = FramedWrite::new(write_half, MoveCodec, ctx);
        self.sync.attach(Link {
            role,
            peer,
            writer,
            reader,
        });
        self.state.turn.assign_first(role.is_first());
        self.state.clocks.halt();
        info!(
            "Session {} connected to {} (first player: {})",
            self.id,
            peer,
            role.is_first()
        );
        self.emit(SessionEvent::Connected {
            address: peer.to_string(),
            first: role.is_first(),
        });
    }

    /// Tear the link down and go idle. `show_message` is set when the peer
    /// went away on its own.
    fn drop_link(&mut self, show_message: bool, ctx: &mut Context<Self>) {
        let link = match self.sync.detach() {
            Some(link) => link,
            None => return,
        };
        ctx.cancel_future(link.reader);
        let mut writer = link.writer;
        writer.close();
        self.state.go_idle();
        info!("Session {} disconnected from {}", self.id, link.peer);
        self.emit(SessionEvent::PeerDisconnected { show_message });
    }

    /// Apply a move that already passed every check, log it and look for mate.
    fn apply_and_announce(&mut self, mv: Move, color: Color, local: bool) {
        self.state.position.apply(&mv);
        let text = notation(&mv);
        info!("Session {}: {} played {}", self.id, color, text);
        self.state.record(color, text.clone());
        self.emit(SessionEvent::MoveApplied {
            mv,
            notation: text,
            color,
            local,
        });

        match self.validator.status(&self.state.position) {
            Status::Checkmate => {
                info!("Session {}: checkmate, {} wins", self.id, color);
                self.state.finish(Some(color));
                self.emit(SessionEvent::GameOver {
                    winner: Some(color),
                });
            }
            Status::Stalemate => {
                info!("Session {}: stalemate, play continues", self.id);
            }
            Status::Check | Status::Ongoing => {}
        }
    }

    fn receive_move(&mut self, mv: Move) -> Result<(), SessionError> {
        check_received(&mv)?;

        if mv.is_new_game() {
            if self.state.turn.is_first() {
                return Err(ProtocolError::UnexpectedNewGame.into());
            }
            self.sync.mark_started();
            self.state.begin();
            info!("Session {}: peer started a new game", self.id);
            self.emit(SessionEvent::GameStarted {
                color: Color::Black,
            });
            return Ok(());
        }

        if !self.sync.is_ready() || self.state.turn.state() != TurnState::TheirTurn {
            return Err(ProtocolError::OutOfTurn.into());
        }
        let peer_color = match self.my_color() {
            Some(mine) => mine.opponent(),
            None => return Err(ProtocolError::OutOfTurn.into()),
        };
        if mv.color() != Some(peer_color) {
            return Err(ProtocolError::WrongSide.into());
        }

        if !self.config.trust_peer {
            if mv.board != self.state.position.board {
                return Err(ProtocolError::Desync.into());
            }
            let expected = self
                .validator
                .rebuild(&self.state.position, peer_color, &mv)
                .map_err(|e| ProtocolError::Illegal(e.to_string()))?;
            if expected != mv {
                return Err(ProtocolError::Illegal(
                    "move record does not match the position".to_string(),
                )
                .into());
            }
        }

        self.state.turn.remote_move_applied();
        self.state.clocks.switch_to(ClockSide::Player);
        self.apply_and_announce(mv, peer_color, false);
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id.to_string(),
            board: self.state.position.board,
            side_to_move: self.state.position.side_to_move,
            turn: self.state.turn.state(),
            first: self.state.turn.first(),
            role: self.sync.role(),
            peer: self.sync.peer().map(|peer| peer.to_string()),
            connected: self.sync.is_set(),
            ready: self.sync.is_ready(),
            game_over: self.state.is_game_over(),
            winner: self.state.winner,
            history: self.state.history.clone(),
            clocks: self.state.clocks.snapshot(),
        }
    }
}
