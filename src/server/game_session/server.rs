use actix::prelude::*;
use std::collections::HashMap;
use log::{debug, info, warn};

use super::lobby::{ConnectionId, Delivery, Lobby, Outbox};
use super::messages::{ClientFrame, Connect, Disconnect, GetPhase, Outgoing};

/// Owner of the lobby and the running match.
///
/// Every state change arrives as an actor message, so joins, actions, broadcasts
/// and disconnects are processed one at a time against a single consistent state.
pub struct SessionServer {
    lobby: Lobby,
    sessions: HashMap<ConnectionId, Recipient<Outgoing>>,
}

impl SessionServer {
    pub fn new(lobby: Lobby) -> Self {
        Self {
            lobby,
            sessions: HashMap::new(),
        }
    }

    /// Hand every delivery to the connection actor it is addressed to.
    fn dispatch(&self, outbox: Outbox) {
        for delivery in outbox {
            let (to, outgoing) = match delivery {
                Delivery::Send(to, msg) => (to, Outgoing::Deliver(msg)),
                Delivery::Close(to, reason) => (to, Outgoing::Close(reason)),
            };
            match self.sessions.get(&to) {
                Some(addr) => addr.do_send(outgoing),
                None => debug!("[Session] Dropping delivery for closed connection {}", to),
            }
        }
    }
}

impl Actor for SessionServer {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!("[Session] Session server started");
    }
}

impl Handler<Connect> for SessionServer {
    type Result = ();

    fn handle(&mut self, msg: Connect, _: &mut Context<Self>) -> Self::Result {
        self.sessions.insert(msg.id, msg.addr);
        let outbox = self.lobby.connect(msg.id);
        self.dispatch(outbox);
    }
}

impl Handler<ClientFrame> for SessionServer {
    type Result = ();

    fn handle(&mut self, msg: ClientFrame, _: &mut Context<Self>) -> Self::Result {
        if !self.sessions.contains_key(&msg.id) {
            warn!("[Session] Frame from unknown connection {}", msg.id);
            return;
        }
        let outbox = self.lobby.handle(msg.id, msg.msg);
        self.dispatch(outbox);
    }
}

impl Handler<Disconnect> for SessionServer {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, _: &mut Context<Self>) -> Self::Result {
        self.sessions.remove(&msg.id);
        let outbox = self.lobby.disconnect(msg.id);
        self.dispatch(outbox);
    }
}

impl Handler<GetPhase> for SessionServer {
    type Result = MessageResult<GetPhase>;

    fn handle(&mut self, _: GetPhase, _: &mut Context<Self>) -> Self::Result {
        MessageResult(self.lobby.phase())
    }
}
