use actix::prelude::*;
use std::time::Duration;
use uuid::Uuid;

use super::lobby::{ConnectionId, Delivery, Lobby, LobbyPhase, Outbox};
use super::messages::{ClientFrame, Connect, Disconnect, GetPhase, Outgoing};
use super::server::SessionServer;
use super::snapshot::snapshot_for;
use crate::game::entities::UnitKind;
use crate::game::grid::TerrainGrid;
use crate::game::{Game, GameError, Position, Role, TerrainKind};
use crate::protocol::{
    ActionKind, ActionRequest, ClientMessage, GameStateDto, JoinRequest, ServerMessage, TerrainView,
};
use crate::server::ws_error::{SessionError, ws_error_message};

const SEED: u64 = 42;

fn join_msg(name: &str) -> ClientMessage {
    ClientMessage::Join(JoinRequest { player_name: Some(name.to_string()) })
}

fn action(kind: ActionKind, from: (i32, i32), to: (i32, i32)) -> ClientMessage {
    ClientMessage::Action(ActionRequest { kind, from_x: from.0, from_y: from.1, to_x: to.0, to_y: to.1 })
}

fn move_msg(from: (i32, i32), to: (i32, i32)) -> ClientMessage {
    action(ActionKind::Move, from, to)
}

fn states_in(outbox: &Outbox, conn: ConnectionId) -> Vec<GameStateDto> {
    outbox
        .messages_for(conn)
        .into_iter()
        .filter_map(|m| match m {
            ServerMessage::State(state) => Some(state.clone()),
            _ => None,
        })
        .collect()
}

fn infos_in(outbox: &Outbox, conn: ConnectionId) -> Vec<String> {
    outbox
        .messages_for(conn)
        .into_iter()
        .filter_map(|m| match m {
            ServerMessage::Info(text) => Some(text.message.clone()),
            _ => None,
        })
        .collect()
}

/// A 12x12 lobby with two connected and seated players, Alice first.
fn active_lobby() -> (Lobby, ConnectionId, ConnectionId) {
    let mut lobby = Lobby::new(12, 12, Some(SEED));
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
    lobby.connect(alice);
    lobby.connect(bob);
    lobby.handle(alice, join_msg("Alice"));
    lobby.handle(bob, join_msg("Bob"));
    assert_eq!(lobby.phase(), LobbyPhase::Active);
    (lobby, alice, bob)
}

fn expect_only_error(outbox: &Outbox, conn: ConnectionId, err: SessionError) {
    assert_eq!(outbox.deliveries(), &[Delivery::Send(conn, ws_error_message(&err))]);
}

#[test]
fn test_connect_greets_without_a_role() {
    let mut lobby = Lobby::new(12, 12, Some(SEED));
    let conn = Uuid::new_v4();
    let outbox = lobby.connect(conn);
    assert!(matches!(outbox.messages_for(conn).as_slice(), [ServerMessage::Info(_)]));
    assert_eq!(lobby.role_of(conn), None);
    assert_eq!(lobby.phase(), LobbyPhase::Empty);
}

#[test]
fn test_join_assigns_roles_and_starts_match() {
    let mut lobby = Lobby::new(12, 12, Some(SEED));
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
    lobby.connect(alice);
    lobby.connect(bob);

    let first = lobby.handle(alice, join_msg("Alice"));
    assert_eq!(first.messages_for(alice)[0], &ServerMessage::role(1));
    assert!(states_in(&first, alice).is_empty());
    assert!(infos_in(&first, bob).contains(&"Player 1: Alice".to_string()));
    assert_eq!(lobby.phase(), LobbyPhase::AwaitingSecond);

    let second = lobby.handle(bob, join_msg("Bob"));
    assert_eq!(second.messages_for(bob)[0], &ServerMessage::role(2));
    assert_eq!(lobby.phase(), LobbyPhase::Active);
    assert!(infos_in(&second, alice).contains(&"The game has started! Turn: Alice".to_string()));

    for conn in [alice, bob] {
        let states = states_in(&second, conn);
        assert_eq!(states.len(), 1);
        let state = &states[0];
        assert_eq!((state.width, state.height), (12, 12));
        assert_eq!(state.current_player, 1);
        assert_eq!((state.player1_name.as_str(), state.player2_name.as_str()), ("Alice", "Bob"));
        assert!(!state.game_over);
        assert_eq!(state.winner, 0);
    }
}

#[test]
fn test_join_twice_and_full_lobby_are_rejected() {
    let (mut lobby, alice, _) = active_lobby();

    let again = lobby.handle(alice, join_msg("Alice"));
    expect_only_error(&again, alice, SessionError::AlreadyJoined);

    let carol = Uuid::new_v4();
    lobby.connect(carol);
    let full = lobby.handle(carol, join_msg("Carol"));
    assert_eq!(
        full.deliveries(),
        &[
            Delivery::Send(carol, ws_error_message(&SessionError::LobbyFull)),
            Delivery::Close(carol, SessionError::LobbyFull.to_string()),
        ]
    );
    assert_eq!(lobby.role_of(carol), None);
}

#[test]
fn test_player_names_are_defaulted_and_truncated() {
    let mut lobby = Lobby::new(12, 12, Some(SEED));
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    lobby.connect(a);
    lobby.connect(b);
    lobby.handle(a, ClientMessage::Join(JoinRequest { player_name: Some("   ".into()) }));
    lobby.handle(b, join_msg(&"x".repeat(80)));

    let game = lobby.game().unwrap();
    assert_eq!(game.player(Role::First).name(), "Player");
    assert_eq!(game.player(Role::Second).name().chars().count(), 32);
}

#[test]
fn test_action_rejections_in_check_order() {
    let mut lobby = Lobby::new(12, 12, Some(SEED));
    let (alice, bob, eve) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    for conn in [alice, bob, eve] {
        lobby.connect(conn);
    }

    let out = lobby.handle(eve, move_msg((0, 0), (1, 0)));
    expect_only_error(&out, eve, SessionError::NotJoined);

    lobby.handle(alice, join_msg("Alice"));
    let out = lobby.handle(alice, move_msg((0, 0), (2, 0)));
    expect_only_error(&out, alice, SessionError::GameNotStarted);

    lobby.handle(bob, join_msg("Bob"));
    let out = lobby.handle(bob, move_msg((10, 10), (9, 9)));
    expect_only_error(&out, bob, SessionError::NotYourTurn);

    let out = lobby.handle(alice, move_msg((-1, 0), (0, 0)));
    expect_only_error(&out, alice, SessionError::InvalidCoordinate);

    let out = lobby.handle(alice, move_msg((5, 5), (5, 6)));
    expect_only_error(&out, alice, SessionError::NoUnitAtSource);

    let out = lobby.handle(alice, move_msg((10, 10), (9, 10)));
    expect_only_error(&out, alice, SessionError::WrongOwner);

    let out = lobby.handle(alice, action(ActionKind::Attack, (1, 1), (12, 3)));
    expect_only_error(&out, alice, SessionError::InvalidCoordinate);

    let out = lobby.handle(alice, action(ActionKind::Attack, (1, 1), (3, 3)));
    expect_only_error(&out, alice, SessionError::CellOccupiedOrEmptyMismatch);

    let out = lobby.handle(alice, move_msg((0, 0), (6, 6)));
    expect_only_error(&out, alice, SessionError::Rule(GameError::IllegalMove));
}

#[test]
fn test_rejected_action_leaves_state_unchanged() {
    let (mut lobby, alice, _) = active_lobby();
    let before = snapshot_for(lobby.game().unwrap(), Role::First);

    lobby.handle(alice, action(ActionKind::Attack, (0, 0), (1, 0)));
    lobby.handle(alice, move_msg((0, 0), (1, 0)));

    let game = lobby.game().unwrap();
    assert_eq!(snapshot_for(game, Role::First), before);
    assert_eq!(game.current_player(), Role::First);
    assert!(!game.is_action_performed_this_turn());
}

#[test]
fn test_valid_move_passes_turn_and_broadcasts() {
    let (mut lobby, alice, bob) = active_lobby();

    let out = lobby.handle(alice, move_msg((0, 0), (2, 0)));

    let game = lobby.game().unwrap();
    assert_eq!(game.current_player(), Role::Second);
    assert_eq!(game.unit_at(Position::new(2, 0)).map(|u| u.kind()), Some(UnitKind::Infantry));
    assert!(game.unit_at(Position::new(0, 0)).is_none());

    for conn in [alice, bob] {
        let states = states_in(&out, conn);
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].current_player, 2);
    }
    let moved = states_in(&out, alice)[0].units.iter().any(|u| (u.x, u.y) == (2, 0) && u.owner == 1);
    assert!(moved);
}

#[test]
fn test_state_is_redacted_per_viewer() {
    let (lobby, _, _) = active_lobby();
    let game = lobby.game().unwrap();

    let view = snapshot_for(game, Role::First);
    assert!(view.traps.iter().flatten().all(|&t| !t));
    assert_eq!(view.terrain[0][0], TerrainView::Plain);
    assert_eq!(view.terrain[11][11], TerrainView::Unknown);
    assert_eq!(view.units.len(), 4);
    assert!(view.units.iter().all(|u| u.owner == 1));

    let view = snapshot_for(game, Role::Second);
    assert_eq!(view.terrain[0][0], TerrainView::Unknown);
    assert!(view.units.iter().all(|u| u.owner == 2));
}

#[test]
fn test_enemy_and_terrain_revealed_exactly_at_vision_range() {
    let mut grid = TerrainGrid::filled(8, 8, TerrainKind::Plain);
    grid.set_terrain(Position::new(0, 3), TerrainKind::Forest).unwrap();
    grid.set_terrain(Position::new(1, 2), TerrainKind::Hill).unwrap();
    grid.set_terrain(Position::new(0, 4), TerrainKind::Hill).unwrap();
    let mut game = Game::with_grid(grid, "Alice", "Bob");
    game.spawn_unit(UnitKind::Infantry, Role::First, Position::new(0, 0)).unwrap();
    game.spawn_unit(UnitKind::Infantry, Role::Second, Position::new(3, 0)).unwrap();
    game.spawn_unit(UnitKind::Cavalry, Role::Second, Position::new(4, 0)).unwrap();

    let view = snapshot_for(&game, Role::First);
    let enemies: Vec<(i32, i32)> = view.units.iter().filter(|u| u.owner == 2).map(|u| (u.x, u.y)).collect();
    assert_eq!(enemies, vec![(3, 0)]);
    assert_eq!(view.terrain[0][3], TerrainView::Plain);
    assert_eq!(view.terrain[0][4], TerrainView::Unknown);
    assert_eq!(view.terrain[3][0], TerrainView::Forest);
    assert_eq!(view.terrain[2][1], TerrainView::Hill);
    assert_eq!(view.terrain[4][0], TerrainView::Unknown);

    // Cavalry sees four cells out, far enough to spot the infantry in the corner.
    let view = snapshot_for(&game, Role::Second);
    assert!(view.units.iter().any(|u| u.owner == 1 && (u.x, u.y) == (0, 0)));
    assert_eq!(view.terrain[3][0], TerrainView::Unknown);
}

#[test]
fn test_disconnect_during_match_resets_lobby() {
    let (mut lobby, alice, bob) = active_lobby();

    let out = lobby.disconnect(bob);
    assert_eq!(infos_in(&out, alice).len(), 1);
    assert!(out.messages_for(bob).is_empty());
    assert_eq!(lobby.phase(), LobbyPhase::Empty);
    assert!(lobby.game().is_none());
    assert_eq!(lobby.role_of(alice), None);

    let rejoin = lobby.handle(alice, join_msg("Alice"));
    assert_eq!(rejoin.messages_for(alice)[0], &ServerMessage::role(1));
}

#[test]
fn test_disconnect_while_waiting_frees_the_seat() {
    let mut lobby = Lobby::new(12, 12, Some(SEED));
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
    lobby.connect(alice);
    lobby.connect(bob);
    lobby.handle(alice, join_msg("Alice"));

    let out = lobby.disconnect(alice);
    assert_eq!(infos_in(&out, bob), vec!["Player 1 left the lobby.".to_string()]);
    assert_eq!(lobby.phase(), LobbyPhase::Empty);

    let out = lobby.handle(bob, join_msg("Bob"));
    assert_eq!(out.messages_for(bob)[0], &ServerMessage::role(1));
}

#[test]
fn test_unseated_disconnect_is_silent() {
    let (mut lobby, _, _) = active_lobby();
    let watcher = Uuid::new_v4();
    lobby.connect(watcher);
    let out = lobby.disconnect(watcher);
    assert!(out.deliveries().is_empty());
    assert_eq!(lobby.phase(), LobbyPhase::Active);
}

#[test]
fn test_killing_last_unit_ends_match() {
    let (mut lobby, alice, bob) = active_lobby();
    let mut game = Game::with_grid(TerrainGrid::filled(8, 8, TerrainKind::Plain), "Alice", "Bob");
    game.spawn_unit(UnitKind::Artillery, Role::First, Position::new(0, 0)).unwrap();
    game.spawn_unit(UnitKind::Artillery, Role::Second, Position::new(2, 0)).unwrap();
    lobby.replace_game(game);

    let out = lobby.handle(alice, action(ActionKind::Attack, (0, 0), (2, 0)));
    for conn in [alice, bob] {
        let states = states_in(&out, conn);
        assert_eq!(states.len(), 1);
        assert!(states[0].game_over);
        assert_eq!(states[0].winner, 1);
        assert!(infos_in(&out, conn).contains(&"Game over! Player 1 (Alice) wins.".to_string()));
    }

    let late = lobby.handle(bob, move_msg((0, 0), (0, 1)));
    expect_only_error(&late, bob, SessionError::GameOver);
}

/// Records every `Outgoing` it receives.
#[derive(Default)]
struct Collector {
    received: Vec<Outgoing>,
}

impl Actor for Collector {
    type Context = Context<Self>;
}

impl Handler<Outgoing> for Collector {
    type Result = ();

    fn handle(&mut self, msg: Outgoing, _: &mut Context<Self>) {
        self.received.push(msg);
    }
}

#[derive(Message)]
#[rtype(result = "Vec<Outgoing>")]
struct Drain;

impl Handler<Drain> for Collector {
    type Result = MessageResult<Drain>;

    fn handle(&mut self, _: Drain, _: &mut Context<Self>) -> Self::Result {
        MessageResult(std::mem::take(&mut self.received))
    }
}

#[actix::test]
async fn test_session_server_routes_deliveries() {
    let server = SessionServer::new(Lobby::new(12, 12, Some(SEED))).start();
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
    let alice_inbox = Collector::default().start();
    let bob_inbox = Collector::default().start();

    server.do_send(Connect { id: alice, addr: alice_inbox.clone().recipient() });
    server.do_send(Connect { id: bob, addr: bob_inbox.clone().recipient() });
    server.do_send(ClientFrame { id: alice, msg: join_msg("Alice") });
    server.do_send(ClientFrame { id: bob, msg: join_msg("Bob") });

    let phase = tokio::time::timeout(Duration::from_secs(5), server.send(GetPhase))
        .await
        .expect("session server timed out")
        .unwrap();
    assert_eq!(phase, LobbyPhase::Active);

    let received = alice_inbox.send(Drain).await.unwrap();
    assert!(received.contains(&Outgoing::Deliver(ServerMessage::role(1))));
    assert!(matches!(received.last(), Some(Outgoing::Deliver(ServerMessage::State(_)))));

    let carol = Uuid::new_v4();
    let carol_inbox = Collector::default().start();
    server.do_send(Connect { id: carol, addr: carol_inbox.clone().recipient() });
    server.do_send(ClientFrame { id: carol, msg: join_msg("Carol") });
    assert_eq!(server.send(GetPhase).await.unwrap(), LobbyPhase::Active);
    let received = carol_inbox.send(Drain).await.unwrap();
    assert_eq!(received.last(), Some(&Outgoing::Close(SessionError::LobbyFull.to_string())));

    server.do_send(Disconnect { id: alice });
    assert_eq!(server.send(GetPhase).await.unwrap(), LobbyPhase::Empty);
    let received = bob_inbox.send(Drain).await.unwrap();
    assert!(matches!(received.last(), Some(Outgoing::Deliver(ServerMessage::Info(_)))));
}
