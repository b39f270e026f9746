use actix::ActorContext;
use actix_web_actors::ws;
use log::error;

use crate::protocol::ServerMessage;
use crate::server::anti_spam::AntiSpamState;

/// Shared helpers for WebSocket connection actors.
pub trait WsActorUtils {
    fn anti_spam(&mut self) -> &mut AntiSpamState;
    fn connection_label(&self) -> String;

    /// Send a ban notice, close the socket and stop the actor.
    fn send_ban_and_close<A>(&mut self, ctx: &mut ws::WebsocketContext<A>)
    where
        A: actix::Actor<Context = ws::WebsocketContext<A>>,
    {
        let secs = self.anti_spam().ban_remaining_secs();
        let notice = ServerMessage::error(format!(
            "You have been banned for spamming. Try again in {} seconds.",
            secs
        ));
        self.send_message(ctx, &notice);
        ctx.close(Some(ws::CloseReason {
            code: ws::CloseCode::Policy,
            description: Some("Banned for spam".into()),
        }));
        ctx.stop();
    }

    /// Serialize and write one envelope to the socket.
    fn send_message<A>(&self, ctx: &mut ws::WebsocketContext<A>, msg: &ServerMessage)
    where
        A: actix::Actor<Context = ws::WebsocketContext<A>>,
    {
        match serde_json::to_string(msg) {
            Ok(text) => ctx.text(text),
            Err(e) => error!("[WS] Failed to serialize message for {}: {}", self.connection_label(), e),
        }
    }

    /// Send an `ERROR` envelope, counting it towards the rejection limit.
    fn send_rejection_or_ban<A>(&mut self, ctx: &mut ws::WebsocketContext<A>, msg: &ServerMessage)
    where
        A: actix::Actor<Context = ws::WebsocketContext<A>>,
    {
        let label = self.connection_label();
        if self.anti_spam().record_rejection(&label) {
            self.send_ban_and_close(ctx);
            return;
        }
        self.send_message(ctx, msg);
    }
}
