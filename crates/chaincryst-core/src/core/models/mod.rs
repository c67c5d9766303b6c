//! # Core Models Module
//!
//! This module contains the data structures used to represent periodic atomic
//! structures in chaincryst: the polymer units read from disk and the crystals
//! assembled from them.
//!
//! ## Key Components
//!
//! - [`structure`] - [`structure::AtomicStructure`], a header, lattice, species table and
//!   Cartesian coordinates grouped by species.
//!
//! Structures are immutable once built; every geometric operation produces a new
//! coordinate set, and species grouping is preserved through every transform.

pub mod structure;
