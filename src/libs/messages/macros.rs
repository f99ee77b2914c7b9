//! Output macros for [`Message`](super::Message) values.
//!
//! Each macro prints with a fixed prefix in normal use. When `LOGBOOK_DEBUG`
//! or `RUST_LOG` is set the same text goes through `tracing` instead, so it
//! interleaves with the store and scheduler diagnostics.
//!
//! - `msg_print!`, `msg_success!`, `msg_info!`: stdout
//! - `msg_error!`: stderr
//! - `msg_error_anyhow!`, `msg_bail_anyhow!`: build or return an
//!   `anyhow::Error` carrying the message
//!
//! Passing `true` as a second argument surrounds the message with blank
//! lines.
//!
//! ```rust
//! use logbook::{msg_success, msg_error_anyhow};
//! use logbook::libs::messages::Message;
//!
//! msg_success!(Message::AircraftAdded("C-FXCD".to_string()));
//! let error = msg_error_anyhow!(Message::AircraftNotFound("C-GABC".to_string()));
//! assert!(error.to_string().contains("C-GABC"));
//! ```

use std::sync::OnceLock;

static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

/// Whether messages should be routed into `tracing`. Read once per process.
#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.get_or_init(|| std::env::var("LOGBOOK_DEBUG").is_ok() || std::env::var("RUST_LOG").is_ok())
}

/// Prints `msg` with `prefix`, either through `tracing` at `level` or with
/// `print` (`println` / `eprintln`). `pad` is placed before and after.
#[doc(hidden)]
#[macro_export]
macro_rules! __msg_emit {
    ($level:ident, $print:ident, $prefix:expr, $pad:expr, $msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::$level!("{}{}{}{}", $pad, $prefix, $msg, $pad);
        } else {
            $print!("{}{}{}{}", $pad, $prefix, $msg, $pad);
        }
    };
}

#[macro_export]
macro_rules! msg_print {
    ($msg:expr) => {
        $crate::__msg_emit!(info, println, "", "", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(info, println, "", "\n", $msg)
    };
}

#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        $crate::__msg_emit!(info, println, "✅ ", "", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(info, println, "✅ ", "\n", $msg)
    };
}

#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        $crate::__msg_emit!(error, eprintln, "❌ ", "", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(error, eprintln, "❌ ", "\n", $msg)
    };
}

#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        $crate::__msg_emit!(info, println, "ℹ️ ", "", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(info, println, "ℹ️ ", "\n", $msg)
    };
}

/// Builds an `anyhow::Error` whose text is the message.
#[macro_export]
macro_rules! msg_error_anyhow {
    ($msg:expr) => {
        anyhow::anyhow!("{}", $msg)
    };
}

/// Returns early with the error built by `msg_error_anyhow!`.
#[macro_export]
macro_rules! msg_bail_anyhow {
    ($msg:expr) => {
        return Err($crate::msg_error_anyhow!($msg))
    };
}
