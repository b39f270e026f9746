/// Server configuration constants.
///
/// Network defaults, lobby naming rules and connection liveness parameters.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default TCP port of the WebSocket endpoint.
pub const DEFAULT_PORT: u16 = 8080;

/// Name given to a player who joins with a blank name.
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Player names are truncated to this many characters.
pub const MAX_NAME_LEN: usize = 32;

/// Interval (in seconds) between heartbeat pings sent to each client.
pub const HEARTBEAT_INTERVAL_SECS: u64 = 5;

/// Time (in seconds) without any frame before a client is considered disconnected.
pub const CLIENT_TIMEOUT_SECS: u64 = 60;
