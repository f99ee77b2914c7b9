//! User-facing messages.
//!
//! [`Message`] enumerates everything the CLI tells the user, `display.rs`
//! holds the wording and `macros.rs` decides whether a message is printed or
//! routed into `tracing`.

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;
