use crate::common::types::{ChatRoom, HistoryCursor, RoomType};

/// Commands the UI sends down to the chat task.
#[derive(Debug, Clone)]
pub enum ChatCommand {
    /// Open the STOMP connection with the session's bearer token.
    Connect { token: String },
    /// Join a room: REST join, drop the previous subscription, load the
    /// newest history page, then subscribe to the room topic.
    JoinRoom { room: ChatRoom },
    /// Backward pagination from the given cursor.
    LoadOlder {
        room_id: String,
        cursor: HistoryCursor,
    },
    /// Publish to the active room. No local echo; the message shows up when
    /// the broker pushes it back.
    SendMessage { content: String, room_type: RoomType },
    LeaveRoom { user_id: String },
}
