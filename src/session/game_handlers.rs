use actix::fut::{self, ActorFutureExt, WrapFuture};
use actix::{ActorContext, AsyncContext, Context, Handler, ResponseActFuture};
use log::info;
use std::net::SocketAddr;

use crate::error::{IllegalMove, SessionError, TurnError};
use crate::game::{Board, ClockSide, Color, Move, Square};
use crate::models::{
    AttemptMove, Connect, Disconnect, GetSnapshot, LegalMoves, Listen, Quit, SessionEvent,
    SessionSnapshot, StartNewGame,
};
use crate::network::{sync, validate_target, Role};
use crate::session::GameSession;

impl Handler<Listen> for GameSession {
    type Result = Result<SocketAddr, SessionError>;

    fn handle(&mut self, msg: Listen, ctx: &mut Context<Self>) -> Self::Result {
        if self.listener.is_some() {
            return Err(self.report(SessionError::AlreadyListening));
        }
        let listener = sync::bind(&msg.addr).map_err(|e| self.report(e.into()))?;
        let local = listener.local_addr().map_err(|e| self.report(e.into()))?;
        self.listener = Some(ctx.add_stream(sync::incoming(listener)));
        info!("Session {} listening on {}", self.id, local);
        Ok(local)
    }
}

impl Handler<Connect> for GameSession {
    type Result = ResponseActFuture<Self, Result<SocketAddr, SessionError>>;

    fn handle(&mut self, msg: Connect, _: &mut Context<Self>) -> Self::Result {
        let host = match validate_target(&msg.host, msg.port) {
            Ok(_) if self.sync.is_set() => Err(SessionError::AlreadyConnected),
            other => other,
        };
        let host = match host {
            Ok(host) => host,
            Err(e) => {
                let e = self.report(e);
                return Box::pin(fut::ready(Err(e)));
            }
        };

        Box::pin(
            sync::connect(host, msg.port)
                .into_actor(self)
                .map(|result, act, ctx| match result {
                    Ok((stream, peer)) => {
                        if act.sync.is_set() {
                            return Err(act.report(SessionError::AlreadyConnected));
                        }
                        act.attach(stream, peer, Role::Connector, ctx);
                        Ok(peer)
                    }
                    Err(e) => Err(act.report(e.into())),
                }),
        )
    }
}

impl Handler<StartNewGame> for GameSession {
    type Result = Result<(), SessionError>;

    fn handle(&mut self, _: StartNewGame, _: &mut Context<Self>) -> Self::Result {
        if let Err(e) = self.state.turn.ensure_can_start() {
            return Err(self.report(e.into()));
        }

        let sentinel = Move::new_game(Board::starting());
        self.sync.send(sentinel).map_err(|e| self.report(e))?;
        self.sync.mark_started();

        // The turn becomes ours only once the announcement is out.
        self.state.begin();
        info!("Session {} started a new game", self.id);
        self.emit(SessionEvent::GameStarted {
            color: Color::White,
        });
        Ok(())
    }
}

impl Handler<AttemptMove> for GameSession {
    type Result = Result<Move, SessionError>;

    fn handle(&mut self, msg: AttemptMove, _: &mut Context<Self>) -> Self::Result {
        self.play_local(msg).map_err(|e| self.report(e))
    }
}

impl GameSession {
    fn play_local(&mut self, msg: AttemptMove) -> Result<Move, SessionError> {
        if !self.sync.is_set() {
            return Err(SessionError::NotConnected);
        }
        if !self.sync.is_ready() {
            return Err(TurnError::NoGame.into());
        }
        self.state.turn.ensure_my_turn()?;
        let color = self.my_color().ok_or(TurnError::NoGame)?;
        if self.state.position.side_to_move != color {
            return Err(TurnError::NotMyTurn.into());
        }

        let mv = self
            .validator
            .build(&self.state.position, msg.from, msg.to, msg.promotion)?;

        self.state.turn.local_move_sent();
        self.state.clocks.switch_to(ClockSide::Opponent);
        self.apply_and_announce(mv.clone(), color, true);
        self.sync.send(mv.clone())?;
        Ok(mv)
    }
}

impl Handler<LegalMoves> for GameSession {
    type Result = Result<Vec<Square>, SessionError>;

    fn handle(&mut self, msg: LegalMoves, _: &mut Context<Self>) -> Self::Result {
        let position = &self.state.position;
        let owner = match position.board.get(msg.from) {
            None => Err(IllegalMove::EmptySquare),
            Some(piece) if piece.color != position.side_to_move => Err(IllegalMove::OpponentPiece),
            Some(_) => Ok(()),
        };
        if let Err(e) = owner {
            return Err(self.report(e.into()));
        }
        Ok(self.validator.destinations(&self.state.position, msg.from))
    }
}

impl Handler<Disconnect> for GameSession {
    type Result = ();

    fn handle(&mut self, _: Disconnect, ctx: &mut Context<Self>) {
        if self.sync.is_set() {
            self.drop_link(false, ctx);
        } else {
            info!("Session {}: disconnect requested while not connected", self.id);
        }
    }
}

impl Handler<Quit> for GameSession {
    type Result = ();

    fn handle(&mut self, _: Quit, ctx: &mut Context<Self>) {
        info!("Session {} quitting", self.id);
        if let Some(listener) = self.listener.take() {
            ctx.cancel_future(listener);
        }
        ctx.stop();
    }
}

impl Handler<GetSnapshot> for GameSession {
    type Result = SessionSnapshot;

    fn handle(&mut self, _: GetSnapshot, _: &mut Context<Self>) -> Self::Result {
        self.snapshot()
    }
}
