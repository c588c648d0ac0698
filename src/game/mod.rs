pub mod constants;
pub mod food;
pub mod room;
pub mod snake;
pub mod types;
