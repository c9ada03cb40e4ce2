//! Terry Store Core - Shared types library.
//!
//! This crate provides common types used across all Terry Store components:
//! - `site` - Public storefront and admin dashboard
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, enums, and validated form drafts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
