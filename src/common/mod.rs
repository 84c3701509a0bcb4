pub mod commands;
pub mod events;
pub mod timestamp;
pub mod types;

pub use commands::ChatCommand;
pub use events::{ApiEvent, ChatEvent};
pub use timestamp::WireTimestamp;
pub use types::{ChatMessage, ChatRoom, HistoryCursor, RoomType};
