//! Folio Core - Shared content types.
//!
//! This crate provides the content types used across all Folio components:
//! - `backoffice` - Data-access services, credential and session stores
//! - `cli` - Command-line BackOffice for editing site content
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no knowledge
//! of how the remote store names its fields. Field mapping lives next to the
//! transport in `folio-backoffice`.
//!
//! # Modules
//!
//! - [`types`] - Record ids, the five content entities and their closed enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
