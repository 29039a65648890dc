use actix::io::FramedWrite;
use actix::SpawnHandle;
use futures::stream::{self, Stream};
use log::{info, warn};
use serde::Serialize;
use std::io;
use std::net::SocketAddr;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};

use crate::error::{ProtocolError, SessionError};
use crate::game::Move;
use crate::network::codec::MoveCodec;

pub type PeerWriter = FramedWrite<Move, OwnedWriteHalf, MoveCodec>;

/// How this side got its connection. The listening side is first player.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Listener,
    Connector,
}

impl Role {
    pub fn is_first(self) -> bool {
        self == Role::Listener
    }
}

/// One live peer connection.
pub struct Link {
    pub role: Role,
    pub peer: SocketAddr,
    pub writer: PeerWriter,
    pub reader: SpawnHandle,
}

/// Connection bookkeeping: at most one peer, plus whether a game has been
/// announced on it.
#[derive(Default)]
pub struct NetworkSync {
    link: Option<Link>,
    game_started: bool,
}

impl NetworkSync {
    pub fn new() -> Self {
        NetworkSync::default()
    }

    /// Connected to a peer.
    pub fn is_set(&self) -> bool {
        self.link.is_some()
    }

    /// Connected and a game has started.
    pub fn is_ready(&self) -> bool {
        self.is_set() && self.game_started
    }

    pub fn role(&self) -> Option<Role> {
        self.link.as_ref().map(|link| link.role)
    }

    pub fn peer(&self) -> Option<SocketAddr> {
        self.link.as_ref().map(|link| link.peer)
    }

    pub fn attach(&mut self, link: Link) {
        info!("Peer {} attached as {:?}", link.peer, link.role);
        self.link = Some(link);
        self.game_started = false;
    }

    /// Drop the link and hand it back so the caller can cancel its reader.
    pub fn detach(&mut self) -> Option<Link> {
        self.game_started = false;
        self.link.take()
    }

    pub fn mark_started(&mut self) {
        self.game_started = true;
    }

    pub fn send(&mut self, mv: Move) -> Result<(), SessionError> {
        match self.link.as_mut() {
            Some(link) => {
                link.writer.write(mv);
                Ok(())
            }
            None => Err(SessionError::NotConnected),
        }
    }
}

/// Check a connect target before any connection attempt.
pub fn validate_target(host: &str, port: u16) -> Result<String, SessionError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(SessionError::InvalidTarget("remote host is empty".to_string()));
    }
    if port == 0 {
        return Err(SessionError::InvalidTarget("remote port is empty".to_string()));
    }
    Ok(host.to_string())
}

/// Structural sanity of a received move, independent of local state.
pub fn check_received(mv: &Move) -> Result<(), ProtocolError> {
    if mv.is_new_game() {
        return Ok(());
    }
    if !mv.from.is_on_board() || !mv.to.is_on_board() {
        return Err(ProtocolError::OutOfRange);
    }
    if let Some(rook) = mv.rook {
        if !rook.from.is_on_board() || !rook.to.is_on_board() {
            return Err(ProtocolError::OutOfRange);
        }
    }
    if mv.piece.is_none() {
        return Err(ProtocolError::MissingPiece);
    }
    Ok(())
}

/// Bind a listening socket inside the running actix system.
pub fn bind(addr: &str) -> io::Result<TcpListener> {
    let std_listener = std::net::TcpListener::bind(addr)?;
    std_listener.set_nonblocking(true)?;
    TcpListener::from_std(std_listener)
}

/// Endless stream of accepted connections.
pub fn incoming(listener: TcpListener) -> impl Stream<Item = io::Result<(TcpStream, SocketAddr)>> {
    stream::unfold(listener, |listener| async move {
        let accepted = listener.accept().await;
        if let Err(e) = &accepted {
            warn!("Accept failed: {}", e);
        }
        Some((accepted, listener))
    })
}

pub async fn connect(host: String, port: u16) -> io::Result<(TcpStream, SocketAddr)> {
    info!("Connecting to {}:{}", host, port);
    let stream = TcpStream::connect((host.as_str(), port)).await?;
    stream.set_nodelay(true)?;
    let peer = stream.peer_addr()?;
    Ok((stream, peer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, RookMove, Square};

    #[test]
    fn connect_target_needs_host_and_port() {
        assert!(matches!(
            validate_target("  ", 4710),
            Err(SessionError::InvalidTarget(_))
        ));
        assert!(matches!(
            validate_target("peer.local", 0),
            Err(SessionError::InvalidTarget(_))
        ));
        assert_eq!(validate_target(" peer.local ", 4710).unwrap(), "peer.local");
    }

    #[test]
    fn out_of_range_moves_are_rejected() {
        let sentinel = Move::new_game(Board::starting());
        assert_eq!(check_received(&sentinel), Ok(()));

        let mut mv = sentinel.clone();
        mv.from = Square::new(1, 4);
        mv.to = Square::new(9, 4);
        assert_eq!(check_received(&mv), Err(ProtocolError::OutOfRange));

        mv.to = Square::new(3, 4);
        assert_eq!(check_received(&mv), Err(ProtocolError::MissingPiece));

        mv.piece = Board::starting().get(Square::new(1, 4));
        assert_eq!(check_received(&mv), Ok(()));

        mv.rook = Some(RookMove {
            from: Square::new(0, 8),
            to: Square::new(0, 5),
        });
        assert_eq!(check_received(&mv), Err(ProtocolError::OutOfRange));
    }

    #[test]
    fn fresh_sync_is_neither_set_nor_ready() {
        let sync = NetworkSync::new();
        assert!(!sync.is_set());
        assert!(!sync.is_ready());
        assert_eq!(sync.role(), None);
    }
}
