use std::{path::PathBuf, sync::Mutex};

use chrono::{TimeZone, Utc};
use expense_core::TrackerManager;
use once_cell::sync::Lazy;
use tally_core::FixedClock;
use tally_storage_json::JsonStateStorage;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh, isolated application home.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Manager over JSON documents in `data_dir`, with the clock pinned to 2024-07-18 15:00 UTC.
#[allow(dead_code)]
pub fn manager_at(data_dir: PathBuf) -> TrackerManager {
    let storage = JsonStateStorage::new(data_dir).expect("create json storage backend");
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 7, 18, 15, 0, 0).unwrap());
    let mut manager = TrackerManager::new(Box::new(storage), Box::new(clock));
    manager.load().expect("load state");
    manager
}
