use actix::{Actor, Addr};
use clap::Parser;
use futures::channel::mpsc;
use futures::StreamExt;
use log::{info, warn};
use std::io::BufRead;
use std::thread;

use p2p_chess::game::{PieceKind, Square};
use p2p_chess::models::{
    AttemptMove, Connect, Disconnect, GetSnapshot, LegalMoves, Listen, Presentation, Quit,
    SessionEvent, StartNewGame,
};
use p2p_chess::{GameSession, Settings};

const HELP: &str = "commands:
  listen ADDR            accept a peer, e.g. listen 0.0.0.0:4710
  connect HOST PORT      connect to a listening peer
  new                    start a new game (first player only)
  move FROM TO [q|r|b|n] move a piece, e.g. move e2 e4
  moves SQUARE           list where the piece on SQUARE can go
  board                  show the board
  history                show the move list
  clock                  show elapsed time
  disconnect             drop the peer
  quit                   leave";

/// Prints session events on stdout.
struct ConsolePresenter;

impl Presentation for ConsolePresenter {
    fn notify(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Connected { address, first } => {
                println!("Status: Host {} Connected", address);
                if first {
                    println!("You are the first player (white). Type `new` to start.");
                } else {
                    println!("Waiting for the first player to start a game.");
                }
            }
            SessionEvent::GameStarted { color } => println!("New game. You play {}.", color),
            SessionEvent::MoveApplied {
                notation, color, ..
            } => println!("{}: {}", color, notation),
            SessionEvent::GameOver { winner } => match winner {
                Some(color) => println!("Game Over. {} wins. Please enjoy another game.", color),
                None => println!("Game Over. Draw. Please enjoy another game."),
            },
            SessionEvent::PeerDisconnected { show_message } => {
                if show_message {
                    println!("Peer has disconnected.");
                } else {
                    println!("Disconnected.");
                }
            }
            SessionEvent::Error { message } => println!("Error: {}", message),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Listen(String),
    Connect(String, u16),
    NewGame,
    Move(Square, Square, Option<PieceKind>),
    Moves(Square),
    Board,
    History,
    Clock,
    Disconnect,
    Quit,
    Help,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["listen", addr] => Ok(Command::Listen(addr.to_string())),
        ["connect", host, port] => {
            let port = port
                .parse::<u16>()
                .map_err(|e| format!("invalid port {}: {}", port, e))?;
            Ok(Command::Connect(host.to_string(), port))
        }
        ["new"] => Ok(Command::NewGame),
        ["move", from, to] => Ok(Command::Move(from.parse()?, to.parse()?, None)),
        ["move", from, to, piece] => {
            let promotion = piece
                .chars()
                .next()
                .and_then(PieceKind::from_letter)
                .filter(|kind| kind.can_promote_to())
                .ok_or_else(|| format!("invalid promotion piece: {}", piece))?;
            Ok(Command::Move(from.parse()?, to.parse()?, Some(promotion)))
        }
        ["moves", from] => Ok(Command::Moves(from.parse()?)),
        ["board"] => Ok(Command::Board),
        ["history"] => Ok(Command::History),
        ["clock"] => Ok(Command::Clock),
        ["disconnect"] => Ok(Command::Disconnect),
        ["quit"] | ["exit"] => Ok(Command::Quit),
        ["help"] | [] => Ok(Command::Help),
        _ => Err(format!("unknown command: {}", line.trim())),
    }
}

async fn run(session: &Addr<GameSession>, command: Command) -> Result<(), actix::MailboxError> {
    // Failures are reported through the presenter; only mailbox errors surface here.
    match command {
        Command::Listen(addr) => {
            if let Ok(local) = session.send(Listen { addr }).await? {
                println!("Listening on {}", local);
            }
        }
        Command::Connect(host, port) => {
            let _ = session.send(Connect { host, port }).await?;
        }
        Command::NewGame => {
            let _ = session.send(StartNewGame).await?;
        }
        Command::Move(from, to, promotion) => {
            let _ = session.send(AttemptMove { from, to, promotion }).await?;
        }
        Command::Moves(from) => match session.send(LegalMoves { from }).await? {
            Ok(targets) if targets.is_empty() => println!("{}: no legal moves", from),
            Ok(targets) => {
                let targets: Vec<String> = targets.iter().map(Square::to_string).collect();
                println!("{}: {}", from, targets.join(" "));
            }
            Err(_) => {}
        },
        Command::Board => {
            let snapshot = session.send(GetSnapshot).await?;
            println!("{}", snapshot.board);
            println!("{} to move ({:?})", snapshot.side_to_move, snapshot.turn);
        }
        Command::History => {
            let snapshot = session.send(GetSnapshot).await?;
            for (i, row) in snapshot.history.iter().enumerate() {
                println!(
                    "{:>3}. {:<12} {}",
                    i + 1,
                    row.white.as_deref().unwrap_or(""),
                    row.black.as_deref().unwrap_or("")
                );
            }
        }
        Command::Clock => {
            let clocks = session.send(GetSnapshot).await?.clocks;
            println!(
                "you {}s, opponent {}s",
                clocks.player_ms / 1000,
                clocks.opponent_ms / 1000
            );
        }
        Command::Disconnect => session.send(Disconnect).await?,
        Command::Quit => session.send(Quit).await?,
        Command::Help => println!("{}", HELP),
    }
    Ok(())
}

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    let settings = Settings::parse();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(settings.log_level.as_str()));

    let session = GameSession::new(settings.session_config(), Box::new(ConsolePresenter)).start();
    info!("Starting p2p-chess");

    if let Some(addr) = settings.listen.clone() {
        if let Err(e) = run(&session, Command::Listen(addr)).await {
            warn!("Session unavailable: {}", e);
        }
    }
    match settings.connect_target() {
        Some(Ok((host, port))) => {
            if let Err(e) = run(&session, Command::Connect(host, port)).await {
                warn!("Session unavailable: {}", e);
            }
        }
        Some(Err(e)) => println!("Error: {}", e),
        None => {}
    }

    // Stdin blocks, so it gets its own thread feeding the actor system.
    let (tx, mut rx) = mpsc::unbounded::<String>();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.unbounded_send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });

    println!("{}", HELP);
    while let Some(line) = rx.next().await {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("Error: {}", e);
                continue;
            }
        };
        let quitting = command == Command::Quit;
        if let Err(e) = run(&session, command).await {
            warn!("Session unavailable: {}", e);
            break;
        }
        if quitting {
            break;
        }
    }

    info!("Shutting down");
    Ok(())
}
