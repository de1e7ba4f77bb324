//! # chatrelay_core
//!
//! Core domain logic for chatrelay: the conversation model, the wire payloads
//! exchanged with the relay, the upstream completion provider, and the
//! client-side session state machine.

pub mod client;
pub mod completion;
pub mod session;
pub mod turn;
pub mod wire;

pub use turn::{Role, Transcript, Turn};
pub use wire::{ChatRequest, ChatResponse};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
