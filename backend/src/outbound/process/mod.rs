//! Subprocess adapters.

mod ping_runner;

pub use ping_runner::ProcessPingRunner;
