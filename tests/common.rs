// Common functionality for integration tests
#![allow(dead_code)]
use camino::Utf8PathBuf;
use tempfile::TempDir;

pub const FIXTURE_MAPPING: &str = "tests/fixtures/fish_mapping.csv";
pub const FIXTURE_INFO: &str = "tests/fixtures/fish_info.csv";

/// A fresh directory for store files, removed when dropped.
pub struct TestDir {
    dir: TempDir,
}
impl TestDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.dir.path().join(name)).unwrap()
    }

    pub fn credentials(&self) -> Utf8PathBuf {
        self.path("user_credentials.csv")
    }

    pub fn scores(&self) -> Utf8PathBuf {
        self.path("high_scores.csv")
    }
}
