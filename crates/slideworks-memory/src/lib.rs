//! # slideworks-memory
//!
//! HashMap-backed [`Adapter`](slideworks_core::db::Adapter) implementation.
//! Used by the test suites and for local development; data is lost when the
//! adapter is dropped.

mod adapter;

pub use adapter::MemoryAdapter;
