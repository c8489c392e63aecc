//! Core types and utilities

pub mod error;
pub mod events;
pub mod logging;
pub mod time;

pub use error::Error;
pub use events::{EventSender, ViewerEvent};
pub use time::FrameClock;
