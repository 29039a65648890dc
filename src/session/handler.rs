use actix::io::WriteHandler;
use actix::{Actor, Context, Running, StreamHandler};
use log::{debug, info, warn};
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpStream;

use crate::error::SessionError;
use crate::game::Move;
use crate::network::Role;
use crate::session::GameSession;

impl Actor for GameSession {
    type Context = Context<Self>;

    fn started(&mut self, _: &mut Self::Context) {
        info!("Game session started: {}", self.id);
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        // Close the peer link quietly; the process is going away.
        if let Some(link) = self.sync.detach() {
            let mut writer = link.writer;
            writer.close();
            info!("Closed link to {} on shutdown", link.peer);
        }
        self.state.go_idle();
        info!("Game session stopped: {}", self.id);

        Running::Stop
    }
}

// Frames from the peer
impl StreamHandler<Result<Move, io::Error>> for GameSession {
    fn handle(&mut self, item: Result<Move, io::Error>, _: &mut Self::Context) {
        match item {
            Ok(mv) => {
                debug!("Received move from peer: {:?} -> {:?}", mv.from, mv.to);
                if let Err(e) = self.receive_move(mv) {
                    self.report(e);
                }
            }
            Err(e) => {
                warn!("Error reading from peer: {}", e);
                self.report(SessionError::Io(e));
            }
        }
    }

    fn finished(&mut self, ctx: &mut Self::Context) {
        info!("Peer stream ended for session {}", self.id);
        self.drop_link(true, ctx);
    }
}

// Incoming connections on the listening socket
impl StreamHandler<io::Result<(TcpStream, SocketAddr)>> for GameSession {
    fn handle(&mut self, item: io::Result<(TcpStream, SocketAddr)>, ctx: &mut Self::Context) {
        match item {
            Ok((stream, peer)) => {
                if self.sync.is_set() {
                    warn!("Refusing {}: already connected", peer);
                    return;
                }
                if let Err(e) = stream.set_nodelay(true) {
                    warn!("Could not set TCP_NODELAY for {}: {}", peer, e);
                }
                self.attach(stream, peer, Role::Listener, ctx);
            }
            Err(e) => {
                warn!("Accept error: {}", e);
            }
        }
    }

    fn finished(&mut self, _: &mut Self::Context) {
        info!("Listener closed for session {}", self.id);
        self.listener = None;
    }
}

impl WriteHandler<io::Error> for GameSession {
    fn error(&mut self, err: io::Error, ctx: &mut Self::Context) -> Running {
        warn!("Error writing to peer: {}", err);
        self.report(SessionError::Io(err));
        self.drop_link(true, ctx);
        Running::Continue
    }

    fn finished(&mut self, _: &mut Self::Context) {
        debug!("Peer writer closed for session {}", self.id);
    }
}
