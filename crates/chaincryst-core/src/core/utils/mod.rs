//! Pure geometric and numeric helpers shared by the search engine.

pub mod geometry;
pub mod numeric;
