//! Provides input/output functionality for periodic structure files.
//!
//! The [`traits::StructureFile`] trait gives a uniform reader/writer interface;
//! [`poscar`] implements it for the VASP POSCAR layout used for both polymer units
//! and generated crystals.

pub mod poscar;
pub mod traits;
