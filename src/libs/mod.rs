//! Domain types and application infrastructure.
//!
//! - Domain: [`airframe`], [`aircraft`], [`flight`], [`formatter`]
//! - Background work: [`scheduler`], [`dispatch`]
//! - Session and settings: [`logbook`], [`config`], [`data_storage`]
//! - Front-end support: [`input`], [`messages`], [`view`], [`export`]

pub mod aircraft;
pub mod airframe;
pub mod config;
pub mod data_storage;
pub mod dispatch;
pub mod export;
pub mod flight;
pub mod formatter;
pub mod input;
pub mod logbook;
pub mod messages;
pub mod scheduler;
pub mod view;
