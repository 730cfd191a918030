//! Nexus Core - Shared domain types.
//!
//! This crate provides the types shared by the Nexus components:
//! - `server` - HTTP API, sessions, and the connectivity socket
//! - `cli` - Command-line tools for migrations and account management
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and phone numbers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
