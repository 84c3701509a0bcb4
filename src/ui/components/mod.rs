pub mod input_bar;
pub mod message_list;
pub mod room_list;
