//! ICS generation.
//!
//! Each birthday event is written as its own single-event calendar object
//! according to RFC 5545.

mod generate;

pub use generate::{generate_ics, PRODID};
