use serde::{Deserialize, Serialize};

use crate::game::MatchId;
use crate::view::GameState;

/// Protocol version exchanged in the handshake. Bump on any wire change.
pub const PROTOCOL_VERSION: u32 = 1;

/// Messages exchanged between the match server and its clients.
///
/// Client-to-server and server-to-client variants share one enum; a peer
/// that receives a variant meant for the other direction ignores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// Client handshake.
    Hello { version: u32 },
    /// Handshake accepted; carries the id the server assigned.
    Welcome { version: u32, connection: u64 },
    /// Handshake rejected. The server closes the connection afterwards.
    Error { reason: String },

    /// Fire at the opponent's board.
    Shot { x: i32, y: i32 },
    /// Chat line for the opponent.
    Chat(String),
    /// Leave the current match (forfeiting if unfinished) and queue again.
    Leave,

    /// Paired into a new match.
    Join {
        game_id: MatchId,
        self_name: String,
        opponent_name: String,
    },
    /// Fresh projection of one of the player's two grids.
    Update(GameState),
    /// Relayed chat, already HTML-escaped.
    ChatMessage { name: String, message: String },
    /// Informational notice, e.g. the opponent leaving.
    Notification { message: String },
    /// Terminal signal for this player.
    GameOver { won: bool },
    /// Leave acknowledged; the client is back in the waiting room.
    Left,
}

impl Message {
    /// Short variant name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Hello { .. } => "hello",
            Message::Welcome { .. } => "welcome",
            Message::Error { .. } => "error",
            Message::Shot { .. } => "shot",
            Message::Chat(_) => "chat",
            Message::Leave => "leave",
            Message::Join { .. } => "join",
            Message::Update(_) => "update",
            Message::ChatMessage { .. } => "chat-message",
            Message::Notification { .. } => "notification",
            Message::GameOver { .. } => "game-over",
            Message::Left => "left",
        }
    }
}
