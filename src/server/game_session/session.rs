//! WebSocket connection actor.
//!
//! One actor per socket. It parses client frames, applies flood protection and the
//! heartbeat, and forwards everything to the `SessionServer`, which owns the game.
//! Whatever the server addresses to this connection comes back as `Outgoing`.

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{debug, info, warn};
use std::time::{Duration, Instant};
use uuid::Uuid;

use super::lobby::ConnectionId;
use super::messages::{ClientFrame, Connect, Disconnect, Outgoing};
use super::server::SessionServer;
use crate::config::server::{CLIENT_TIMEOUT_SECS, HEARTBEAT_INTERVAL_SECS};
use crate::protocol::{ClientMessage, ServerMessage};
use crate::server::anti_spam::AntiSpamState;
use crate::server::state::AppState;
use crate::server::ws_actor_utils::WsActorUtils;

pub struct WsConnection {
    pub id: ConnectionId,
    pub server: Addr<SessionServer>,
    anti_spam: AntiSpamState,
    last_heartbeat: Instant,
}

impl WsConnection {
    pub fn new(server: Addr<SessionServer>) -> Self {
        Self {
            id: Uuid::new_v4(),
            server,
            anti_spam: AntiSpamState::new(),
            last_heartbeat: Instant::now(),
        }
    }

    /// Pings the client and drops it once it stays silent past the timeout.
    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS), |act, ctx| {
            if Instant::now().duration_since(act.last_heartbeat) > Duration::from_secs(CLIENT_TIMEOUT_SECS) {
                warn!("[WS] Heartbeat timeout for {}, disconnecting", act.id);
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }

    fn handle_text(&mut self, text: &str, ctx: &mut ws::WebsocketContext<Self>) {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(msg) => self.server.do_send(ClientFrame { id: self.id, msg }),
            Err(e) => {
                debug!("[WS] Malformed frame from {}: {}", self.id, e);
                self.send_rejection_or_ban(ctx, &ServerMessage::error("Malformed message."));
            }
        }
    }
}

impl WsActorUtils for WsConnection {
    fn anti_spam(&mut self) -> &mut AntiSpamState {
        &mut self.anti_spam
    }

    fn connection_label(&self) -> String {
        self.id.to_string()
    }
}

impl Actor for WsConnection {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!("[WS] Connection {} opened", self.id);
        self.start_heartbeat(ctx);
        self.server.do_send(Connect {
            id: self.id,
            addr: ctx.address().recipient(),
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!("[WS] Connection {} closed", self.id);
        self.server.do_send(Disconnect { id: self.id });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsConnection {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                warn!("[WS] Protocol error on {}: {}", self.id, e);
                ctx.stop();
                return;
            }
        };
        match msg {
            ws::Message::Text(text) => {
                self.last_heartbeat = Instant::now();
                let label = self.connection_label();
                if self.anti_spam.record_request(&label) {
                    self.send_ban_and_close(ctx);
                    return;
                }
                self.handle_text(&text, ctx);
            }
            ws::Message::Ping(payload) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            ws::Message::Pong(_) => self.last_heartbeat = Instant::now(),
            ws::Message::Binary(_) => {
                self.send_rejection_or_ban(ctx, &ServerMessage::error("Binary frames are not supported."));
            }
            ws::Message::Close(reason) => {
                ctx.close(reason);
                ctx.stop();
            }
            ws::Message::Continuation(_) | ws::Message::Nop => (),
        }
    }
}

impl Handler<Outgoing> for WsConnection {
    type Result = ();

    fn handle(&mut self, msg: Outgoing, ctx: &mut Self::Context) {
        match msg {
            Outgoing::Deliver(msg @ ServerMessage::Error(_)) => self.send_rejection_or_ban(ctx, &msg),
            Outgoing::Deliver(msg) => self.send_message(ctx, &msg),
            Outgoing::Close(reason) => {
                ctx.close(Some(ws::CloseReason {
                    code: ws::CloseCode::Policy,
                    description: Some(reason),
                }));
                ctx.stop();
            }
        }
    }
}

/// WebSocket endpoint. Every socket gets a fresh connection id and no role
/// until it sends `JOIN`.
pub async fn ws_game(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    ws::start(WsConnection::new(data.session_addr.clone()), &req, stream)
}
