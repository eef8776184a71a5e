//! HIR tests
//!
//! Tests for:
//! - Diagnostics landing in the tab that caused them
//! - Declaration lookup across tabs and superclasses
//! - Library imports resolved against jars on disk

pub mod tests_diagnostics;
pub mod tests_libraries;
pub mod tests_resolution;
