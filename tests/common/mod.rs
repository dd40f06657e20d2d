//! Shared test utilities for rewards integration tests

#![allow(dead_code)]

use tempfile::TempDir;

use ecycle::config::{StoreBackend, StoreSettings};
use ecycle::rewards::{RewardsEngine, Rules};
use ecycle::service::RewardsService;
use ecycle::store::open_store;

/// Creates a service over a fresh store in a temporary directory.
/// Keep the returned TempDir alive for the duration of the test.
pub fn create_test_service(backend: StoreBackend) -> (TempDir, RewardsService) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let settings = StoreSettings {
        backend,
        data_dir: Some(temp_dir.path().to_path_buf()),
    };
    let store = open_store(&settings).expect("Failed to open store");
    let engine = RewardsEngine::new(Rules::default()).expect("Default rules are valid");
    (temp_dir, RewardsService::new(store, engine))
}

/// Reopens the store in an existing directory, as a new process would
pub fn reopen_service(dir: &TempDir, backend: StoreBackend) -> RewardsService {
    let settings = StoreSettings {
        backend,
        data_dir: Some(dir.path().to_path_buf()),
    };
    let store = open_store(&settings).expect("Failed to reopen store");
    RewardsService::new(store, RewardsEngine::default())
}
