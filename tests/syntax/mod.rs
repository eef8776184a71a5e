//! Translation and position mapping tests
//!
//! Tests for:
//! - Bare-mode and active-mode scaffolding
//! - Import hoisting and blanking
//! - Line and column mapping across tabs

pub mod tests_mapping;
pub mod tests_translation;
