pub mod action;
pub mod config;
pub mod interactive;
pub mod placeholder;
pub mod serdable;
pub mod style;
pub mod testing;
pub mod watch;

pub use crate::config::Config;
