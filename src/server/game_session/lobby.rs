//! Lobby and match state of the authoritative server.
//!
//! Owns the connection -> role mapping, the player names and the single `Game`.
//! Every operation returns an `Outbox` of deliveries instead of touching sockets,
//! so the whole protocol state machine runs synchronously under whoever owns the
//! lobby (the `SessionServer` actor in production, plain tests otherwise).

use std::collections::HashMap;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use uuid::Uuid;

use crate::config::server::{DEFAULT_PLAYER_NAME, MAX_NAME_LEN};
use crate::game::{Game, Outcome, Position, Role};
use crate::protocol::{ActionKind, ActionRequest, ClientMessage, ServerMessage};
use crate::server::game_session::snapshot::snapshot_for;
use crate::server::ws_error::{SessionError, ws_error_message};

pub type ConnectionId = Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Send(ConnectionId, ServerMessage),
    /// Close the socket, with the reason carried in the close frame.
    Close(ConnectionId, String),
}

/// Ordered deliveries produced by one lobby operation.
#[derive(Debug, Default)]
pub struct Outbox {
    deliveries: Vec<Delivery>,
}

impl Outbox {
    pub fn send(&mut self, to: ConnectionId, msg: ServerMessage) {
        self.deliveries.push(Delivery::Send(to, msg));
    }

    pub fn close(&mut self, to: ConnectionId, reason: impl Into<String>) {
        self.deliveries.push(Delivery::Close(to, reason.into()));
    }

    pub fn extend(&mut self, other: Outbox) {
        self.deliveries.extend(other.deliveries);
    }

    #[cfg(test)]
    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    /// Messages addressed to `conn`, in order.
    #[cfg(test)]
    pub fn messages_for(&self, conn: ConnectionId) -> Vec<&ServerMessage> {
        self.deliveries
            .iter()
            .filter_map(|d| match d {
                Delivery::Send(to, msg) if *to == conn => Some(msg),
                _ => None,
            })
            .collect()
    }
}

impl IntoIterator for Outbox {
    type Item = Delivery;
    type IntoIter = std::vec::IntoIter<Delivery>;

    fn into_iter(self) -> Self::IntoIter {
        self.deliveries.into_iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobbyPhase {
    Empty,
    AwaitingSecond,
    Active,
}

pub struct Lobby {
    width: i32,
    height: i32,
    rng: StdRng,
    /// Every open connection, with its role once it has joined.
    connections: HashMap<ConnectionId, Option<Role>>,
    names: [Option<String>; 2],
    game: Option<Game>,
}

impl Lobby {
    /// `seed` makes the sequence of generated maps reproducible.
    pub fn new(width: i32, height: i32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            width,
            height,
            rng,
            connections: HashMap::new(),
            names: [None, None],
            game: None,
        }
    }

    pub fn phase(&self) -> LobbyPhase {
        match (&self.game, self.names.iter().flatten().count()) {
            (Some(_), _) => LobbyPhase::Active,
            (None, 0) => LobbyPhase::Empty,
            (None, _) => LobbyPhase::AwaitingSecond,
        }
    }

    #[cfg(test)]
    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn role_of(&self, conn: ConnectionId) -> Option<Role> {
        self.connections.get(&conn).copied().flatten()
    }

    #[cfg(test)]
    pub(crate) fn replace_game(&mut self, game: Game) {
        self.game = Some(game);
    }

    fn seated(&self) -> impl Iterator<Item = (ConnectionId, Role)> + '_ {
        self.connections
            .iter()
            .filter_map(|(&conn, role)| role.map(|r| (conn, r)))
    }

    fn send_all(&self, outbox: &mut Outbox, msg: ServerMessage) {
        for &conn in self.connections.keys() {
            outbox.send(conn, msg.clone());
        }
    }

    fn send_seated(&self, outbox: &mut Outbox, msg: ServerMessage) {
        for (conn, _) in self.seated() {
            outbox.send(conn, msg.clone());
        }
    }

    /// Registers a freshly opened connection. It holds no role until it joins.
    pub fn connect(&mut self, conn: ConnectionId) -> Outbox {
        self.connections.insert(conn, None);
        debug!("[Lobby] Connection opened: {} ({} open)", conn, self.connections.len());
        let mut outbox = Outbox::default();
        outbox.send(conn, ServerMessage::info("Connected. Send JOIN with your player name."));
        outbox
    }

    /// Dispatches one client frame. Rejections become an `ERROR` for the sender only;
    /// a full lobby also closes the sender's connection.
    pub fn handle(&mut self, conn: ConnectionId, msg: ClientMessage) -> Outbox {
        let result = match msg {
            ClientMessage::Join(join) => self.join(conn, join.player_name.as_deref()),
            ClientMessage::Action(action) => self.action(conn, action),
        };
        result.unwrap_or_else(|err| {
            warn!("[Lobby] Rejected request from {}: {} ({})", conn, err.code(), err);
            let mut outbox = Outbox::default();
            outbox.send(conn, ws_error_message(&err));
            if err == SessionError::LobbyFull {
                outbox.close(conn, err.to_string());
            }
            outbox
        })
    }

    pub fn join(&mut self, conn: ConnectionId, requested_name: Option<&str>) -> Result<Outbox, SessionError> {
        if self.role_of(conn).is_some() {
            return Err(SessionError::AlreadyJoined);
        }
        let role = Role::ALL
            .into_iter()
            .find(|r| self.names[r.index()].is_none())
            .ok_or(SessionError::LobbyFull)?;
        let name = sanitize_name(requested_name);

        // Build the match before committing anything so a failure leaves the lobby as it was.
        let game = match (role, &self.names) {
            (Role::Second, [Some(first), None]) => {
                Some(Game::new(self.width, self.height, first.clone(), name.clone(), &mut self.rng)?)
            }
            _ => None,
        };

        self.names[role.index()] = Some(name.clone());
        self.connections.insert(conn, Some(role));
        info!("[Lobby] {} joined as {} ({})", conn, role, name);

        let mut outbox = Outbox::default();
        outbox.send(conn, ServerMessage::role(role.number()));
        let greeting = match role {
            Role::First => format!("You joined as {}. Waiting for the second player...", role),
            Role::Second => format!("You joined as {}. Starting the game...", role),
        };
        outbox.send(conn, ServerMessage::info(greeting));
        self.send_all(&mut outbox, ServerMessage::info(format!("{}: {}", role, name)));

        if let Some(game) = game {
            let starter = game.player(game.current_player()).name().to_string();
            self.game = Some(game);
            info!("[Lobby] Match started: {} vs {}", self.names[0].as_deref().unwrap_or_default(), name);
            self.send_seated(&mut outbox, ServerMessage::info(format!("The game has started! Turn: {}", starter)));
            outbox.extend(self.broadcast_state());
        }
        Ok(outbox)
    }

    /// Validates a Move/Attack request, applies it, ends the turn and broadcasts.
    pub fn action(&mut self, conn: ConnectionId, request: ActionRequest) -> Result<Outbox, SessionError> {
        let role = self.role_of(conn).ok_or(SessionError::NotJoined)?;
        let game = self.game.as_mut().ok_or(SessionError::GameNotStarted)?;
        if game.is_game_over() {
            return Err(SessionError::GameOver);
        }
        if game.current_player() != role {
            return Err(SessionError::NotYourTurn);
        }

        let from = Position::new(request.from_x, request.from_y);
        let to = Position::new(request.to_x, request.to_y);
        if !game.grid().is_inside(from) {
            return Err(SessionError::InvalidCoordinate);
        }
        let unit = game.unit_at(from).ok_or(SessionError::NoUnitAtSource)?;
        if unit.owner() != role {
            return Err(SessionError::WrongOwner);
        }
        let unit = unit.id();

        match request.kind {
            ActionKind::Move => {
                let outcome = game.move_unit(unit, to)?;
                debug!("[Lobby] {} moved {} -> {}: {:?}", role, outcome.from, outcome.to, outcome.effects);
            }
            ActionKind::Attack => {
                if !game.grid().is_inside(to) {
                    return Err(SessionError::InvalidCoordinate);
                }
                let target = game
                    .unit_at(to)
                    .map(|u| u.id())
                    .ok_or(SessionError::CellOccupiedOrEmptyMismatch)?;
                let outcome = game.attack(unit, target)?;
                debug!("[Lobby] {} attacked {}: {:?}", role, to, outcome);
            }
        }
        game.end_turn();
        debug!("[Lobby] Turn {} handed to {}", game.turn(), game.current_player());

        let mut outbox = self.broadcast_state();
        if let Some(game) = &self.game {
            if let Some(outcome) = game.outcome() {
                let text = match outcome {
                    Outcome::Winner(winner) => {
                        format!("Game over! {} ({}) wins.", winner, game.player(winner).name())
                    }
                    Outcome::Draw => "Game over! Draw.".to_string(),
                };
                info!("[Lobby] {}", text);
                self.send_seated(&mut outbox, ServerMessage::info(text));
            }
        }
        Ok(outbox)
    }

    /// One redacted `STATE` per seated connection. Nothing is sent before a match exists.
    pub fn broadcast_state(&self) -> Outbox {
        let mut outbox = Outbox::default();
        if let Some(game) = &self.game {
            for (conn, role) in self.seated() {
                outbox.send(conn, ServerMessage::state(snapshot_for(game, role)));
            }
        }
        outbox
    }

    /// Handles transport loss. Losing a seated player voids any running match and
    /// resets the lobby; the remaining connections must JOIN again.
    pub fn disconnect(&mut self, conn: ConnectionId) -> Outbox {
        let mut outbox = Outbox::default();
        let Some(role) = self.connections.remove(&conn).flatten() else {
            debug!("[Lobby] Connection closed: {}", conn);
            return outbox;
        };

        if self.game.is_some() {
            self.game = None;
            self.names = [None, None];
            for seat in self.connections.values_mut() {
                *seat = None;
            }
            info!("[Lobby] {} ({}) disconnected, match aborted", role, conn);
            self.send_all(
                &mut outbox,
                ServerMessage::info("A player disconnected. The match was stopped. Send JOIN to start a new one."),
            );
        } else {
            self.names[role.index()] = None;
            info!("[Lobby] {} ({}) left the lobby", role, conn);
            self.send_all(&mut outbox, ServerMessage::info(format!("{} left the lobby.", role)));
        }
        outbox
    }
}

fn sanitize_name(requested: Option<&str>) -> String {
    match requested.map(str::trim) {
        Some(name) if !name.is_empty() => name.chars().take(MAX_NAME_LEN).collect(),
        _ => DEFAULT_PLAYER_NAME.to_string(),
    }
}
