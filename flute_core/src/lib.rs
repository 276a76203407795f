pub mod chart;
pub mod config;
pub mod driver;
pub mod error;
pub mod gameplay;
pub mod input;
pub mod presentation;
pub mod session;
pub mod time;

pub use song_schema;
