use actix::prelude::*;

use super::lobby::{ConnectionId, LobbyPhase};
use crate::protocol::{ClientMessage, ServerMessage};

/// A socket opened; `addr` receives everything the session sends to it.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    pub id: ConnectionId,
    pub addr: Recipient<Outgoing>,
}

/// The transport of a socket is gone (close frame, stream end or heartbeat timeout).
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub id: ConnectionId,
}

/// A parsed client frame.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ClientFrame {
    pub id: ConnectionId,
    pub msg: ClientMessage,
}

#[derive(Message)]
#[rtype(result = "LobbyPhase")]
pub struct GetPhase;

/// Session server -> connection actor.
#[derive(Message, Clone, Debug, PartialEq)]
#[rtype(result = "()")]
pub enum Outgoing {
    Deliver(ServerMessage),
    /// Close the socket with this reason.
    Close(String),
}
