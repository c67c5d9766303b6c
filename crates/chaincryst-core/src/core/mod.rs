//! # Core Module
//!
//! This module provides the stateless foundation of chaincryst: the structure data
//! model, pure geometric transforms, and structure file I/O.
//!
//! ## Architecture
//!
//! - **Structure Representation** ([`models`]) - Periodic atomic structures with species blocks
//! - **File I/O** ([`io`]) - Reading and writing POSCAR-style structure files
//! - **Geometry** ([`utils`]) - Rigid-body transforms on coordinate sets
//!
//! Nothing in this layer holds state between calls; the search logic that combines
//! these pieces lives in [`crate::engine`].

pub mod io;
pub mod models;
pub mod utils;
