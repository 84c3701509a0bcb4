pub mod client;
pub mod session;
pub mod stomp;

pub use client::ChatClient;
pub use session::{HISTORY_PAGE_SIZE, RoomSession};
