//! Common infrastructure for the Sprig scraping parser.
//!
//! This crate provides shared plumbing used by the parsing crates and the CLI:
//! - **Warning System** - deduplicated, colored diagnostics for recoverable
//!   parse anomalies
//! - **HTTP Fetch** - a small blocking GET helper for pulling pages before
//!   they are handed to the parser

pub mod net;
pub mod warning;
