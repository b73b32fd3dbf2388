//! JSON test vector loader shared by envelope tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TestVector {
    pub description: String,
    pub frame: serde_json::Value,
    #[serde(default)]
    pub expect: Option<serde_json::Value>,
    #[serde(default)]
    pub expect_error: Option<ExpectError>,
    #[serde(default)]
    pub expect_reinterpret_error: Option<ExpectError>,
}

#[derive(Debug, Deserialize)]
pub struct ExpectError {
    pub code: String,
}

impl TestVector {
    /// Wire text of the frame. A JSON string is taken verbatim (so vectors
    /// can carry broken JSON); anything else is serialized.
    pub fn frame_text(&self) -> String {
        match &self.frame {
            serde_json::Value::String(raw) => raw.clone(),
            other => other.to_string(),
        }
    }
}

pub fn load(name: &str) -> TestVector {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap()
}
