//! # Engine Module
//!
//! This module implements the crystal search engine: the sampling grid, the clash
//! test, the assembly of accepted two-chain crystals, and the driver that ties them
//! together for one polymer unit.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Sample counts, radius policy, thresholds and padding
//! - **Sampling Grid** ([`grid`]) - Translation × rotation × placement-angle enumeration
//! - **Clash Detection** ([`clash`]) - All-pairs distance test with periodic images along z
//! - **Crystal Assembly** ([`crystal`]) - Species-interleaved packing and lattice derivation
//! - **Search Driver** ([`search`]) - Exhaustive evaluation of the grid for one unit
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! The search is deterministic: for a fixed unit and configuration the accepted set is
//! always the same. Grid points are independent and are evaluated in parallel when the
//! `parallel` feature is enabled.

pub mod clash;
pub mod config;
pub mod crystal;
pub mod error;
pub mod grid;
pub mod progress;
pub mod search;
