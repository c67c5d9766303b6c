//! # Workflows Module
//!
//! Top-level entry points that tie [`crate::core`] and [`crate::engine`] together.
//!
//! - **Unit search** ([`search`]) reads one polymer unit, searches its grid and writes
//!   each accepted crystal to `{out_dir}/{unit_id}/`.
//! - **Batch build** ([`build`]) runs the unit search for many units in parallel,
//!   isolates per-unit failures and produces the summary table.

pub mod build;
pub mod search;
