/// Shared helpers for integration tests
#[allow(dead_code)]
pub mod metadata_service;
#[allow(dead_code)]
pub mod mocks;
