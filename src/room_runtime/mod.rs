//! Background work that runs beside the request handlers: the per-room
//! countdown sequence, the tick scheduler and the cosmetic heckler.

pub mod countdown;
pub mod heckler;
pub mod scheduler;
