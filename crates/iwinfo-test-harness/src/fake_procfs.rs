//! Temporary proc-fs tree for classifier and country tests.
//!
//! [`FakeProcFs`] lays out the madwifi side channels below a temporary
//! directory that is removed on drop. Point a backend's proc root at
//! [`root`](FakeProcFs::root).
//!
//! The fixture is for tests only: filesystem errors panic.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// A throwaway proc-fs root.
#[derive(Debug)]
pub struct FakeProcFs {
    dir: TempDir,
}

impl Default for FakeProcFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeProcFs {
    /// Create an empty tree with `sys/dev` and `sys/net` in place.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temporary proc root");
        let proc = FakeProcFs { dir };
        proc.mkdir("sys/dev");
        proc.mkdir("sys/net");
        proc
    }

    /// Root path to hand to the code under test.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    fn mkdir(&self, rel: &str) {
        fs::create_dir_all(self.root().join(rel)).expect("create fake proc directory");
    }

    /// Write `contents` to `rel`, creating parent directories.
    pub fn write_raw(&self, rel: &str, contents: &[u8]) {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fake proc directory");
        }
        fs::write(path, contents).expect("write fake proc file");
    }

    /// Register a physical radio (`sys/dev/<name>/diversity`).
    pub fn add_radio(&self, name: &str) {
        self.write_raw(&format!("sys/dev/{name}/diversity"), b"1\n");
    }

    /// Register a radio whose `diversity` node is a directory, not a file.
    pub fn add_radio_with_diversity_dir(&self, name: &str) {
        self.mkdir(&format!("sys/dev/{name}/diversity"));
    }

    /// Register a virtual interface bound to `parent`.
    pub fn add_vif(&self, name: &str, parent: &str) {
        self.write_raw(&format!("sys/net/{name}/%parent"), format!("{parent}\n").as_bytes());
    }

    /// Add an unrelated `sys/net` entry without parent linkage.
    pub fn add_net_dir(&self, name: &str) {
        self.mkdir(&format!("sys/net/{name}"));
    }

    /// Set the regulatory code text reported by `radio`.
    pub fn set_country(&self, radio: &str, text: &str) {
        self.write_raw(&format!("sys/dev/{radio}/countrycode"), text.as_bytes());
    }
}
