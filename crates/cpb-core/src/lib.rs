//! Core domain + application logic for the cybersecurity-polito invitation bot.
//!
//! This crate is framework-agnostic. Telegram and GitHub live behind ports
//! (traits) implemented in adapter crates.

pub mod config;
pub mod domain;
pub mod email;
pub mod errors;
pub mod event;
pub mod invite;
pub mod logging;
pub mod messaging;
pub mod router;
pub mod texts;

pub use errors::{Error, Result};
