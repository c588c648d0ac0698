pub mod names;
pub mod room_code;
