//! Integration Tests Module
//!
//! End-to-end tests for Heatwave over an in-memory or file-backed SQLite
//! database and snapshot sources. Tests cover the contact/wave store, the
//! delete-wave cascade, last-contact refresh, ranking and selection.

// Shared fixtures
mod common;

// Contact and wave lifecycle tests
mod store_test;

// Call history refresh tests
mod refresh_test;

// Ranking and selection tests
mod ranking_test;
