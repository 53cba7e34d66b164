//! FreshTrack Core - Shared types library.
//!
//! This crate provides common types used across all FreshTrack components:
//! - `server` - HTTP API for inventory, scanning, and notifications
//! - `integration-tests` - End-to-end tests against a running server
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, validated emails, category vocabulary, item
//!   status, and the expiry classifier

#![cfg_attr(not(test), forbid(unsafe_code))]
#![feature(int_roundings)]

pub mod types;

pub use types::*;
