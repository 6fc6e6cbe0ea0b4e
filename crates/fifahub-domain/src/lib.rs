//! Domain types shared across FifaHub services.
//!
//! Pure types with no framework dependencies.

pub mod dataset;
