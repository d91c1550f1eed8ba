//! Core types for bdaycal.
//!
//! This crate holds everything that is not terminal output:
//! - `contact` and `birthday` for reading vCards and their BDAY values
//! - `event` and `ics` for turning birthdays into calendar entries
//! - `dav` for talking to the address book and calendar collections
//! - `sync` for the harvest → wipe → publish pipeline

pub mod birthday;
pub mod config;
pub mod contact;
pub mod dav;
pub mod error;
pub mod event;
pub mod ics;
pub mod sync;

pub use birthday::{Birthday, SENTINEL_YEAR};
pub use config::{ConfigError, RawConfig, SyncConfig};
pub use contact::Contact;
pub use error::{BdayError, BdayResult};
pub use event::BirthdayEvent;
pub use sync::{BirthdaySync, Phase, Reporter, SyncEvent, SyncSummary};
