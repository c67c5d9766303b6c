//! # chaincryst Core Library
//!
//! Builds candidate two-chain crystal packings of a polymer repeat unit by exhaustive
//! grid search over translation and in-plane rotations, rejecting packings with steric
//! clashes against the periodic images along the chain axis.
//!
//! ## Layers
//!
//! - **[`core`]: The Foundation.** The [`core::models::structure::AtomicStructure`]
//!   data model, POSCAR reading and writing, and pure geometry helpers.
//!
//! - **[`engine`]: The Search.** Sampling grid, clash detection, crystal assembly and
//!   the grid search itself, plus configuration, errors and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Per-unit and batch procedures that read units
//!   from disk, run the search and write every accepted crystal.

pub mod core;
pub mod engine;
pub mod workflows;
