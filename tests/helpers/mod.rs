//! Shared test helpers.

pub mod library_fixtures;
pub mod sketch_helpers;
