use clap::Parser;

use crate::game::RuleSet;

/// Command-line and environment settings for the console binary.
#[derive(Parser, Debug, Clone)]
#[command(name = "p2p-chess", version, about = "Two-player chess over a direct TCP link")]
pub struct Settings {
    /// Accept a peer on this address, e.g. 0.0.0.0:4710
    #[arg(long, env = "P2P_CHESS_LISTEN")]
    pub listen: Option<String>,

    /// Connect to a listening peer at HOST:PORT
    #[arg(long, env = "P2P_CHESS_CONNECT")]
    pub connect: Option<String>,

    /// Apply peer moves after structural checks only
    #[arg(long, env = "P2P_CHESS_TRUST_PEER")]
    pub trust_peer: bool,

    /// Forbid king steps onto attacked squares
    #[arg(long, env = "P2P_CHESS_STRICT_KING")]
    pub strict_king: bool,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Settings {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            rules: RuleSet {
                permissive_king: !self.strict_king,
            },
            trust_peer: self.trust_peer,
        }
    }

    /// Split `--connect` into host and port.
    pub fn connect_target(&self) -> Option<Result<(String, u16), String>> {
        self.connect.as_deref().map(parse_host_port)
    }
}

pub fn parse_host_port(target: &str) -> Result<(String, u16), String> {
    let (host, port) = target
        .rsplit_once(':')
        .ok_or_else(|| format!("expected HOST:PORT, got {}", target))?;
    let port = port
        .trim()
        .parse::<u16>()
        .map_err(|e| format!("invalid port {}: {}", port, e))?;
    Ok((host.trim().to_string(), port))
}

/// What a [`crate::session::GameSession`] needs to know at construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionConfig {
    pub rules: RuleSet,
    /// Skip full re-validation of received moves.
    pub trust_peer: bool,
}
