#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use bank_core::{
    core::BankContext,
    ledger::{AccountKind, Client, Profile},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Reserves a unique directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Opens a file-backed context in an isolated app directory.
pub fn setup_test_env() -> (BankContext, PathBuf) {
    let base = temp_base();
    let context = BankContext::open_in(base.clone()).expect("open bank context");
    (context, base)
}

pub fn register(context: &BankContext, username: &str, kind: AccountKind) -> Client {
    context
        .store
        .register(
            Profile::new(username, "secret", "Test", "Client", "12345678"),
            kind,
        )
        .expect("register client")
}
