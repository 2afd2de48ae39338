//! Shared helpers for CLI integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use serde_json::Value;
use tempfile::TempDir;

/// Creates a temp PARLEY_HOME directory for test isolation.
pub fn temp_parley_home() -> TempDir {
    TempDir::new().expect("create temp parley home")
}

pub fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Reads `state.json` from a PARLEY_HOME, or `{}` when absent.
pub fn read_state(home: &Path) -> Value {
    let path = home.join("state.json");
    if !path.exists() {
        return Value::Object(serde_json::Map::new());
    }
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

pub fn write_state(home: &Path, state: &Value) {
    fs::write(
        home.join("state.json"),
        serde_json::to_string(state).unwrap(),
    )
    .unwrap();
}
