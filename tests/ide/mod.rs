//! IDE tests
//!
//! Tests for:
//! - Member and scope completion at a caret
//! - Queries against one published snapshot

pub mod tests_completion;
pub mod tests_queries;
