//! Scheduler tests
//!
//! Tests for:
//! - Ticking, coalescing and pausing of the background worker
//! - Classpath reuse across cycles
//! - Service lifecycle

pub mod tests_service;
