//! Radio vs. virtual interface classification.
//!
//! madwifi exposes physical radios as `wifiN` and the virtual interfaces
//! bound to them as `athN` (or any name given at creation). The driver
//! publishes both through proc-fs side channels:
//!
//! - `<proc>/sys/dev/<radio>/diversity` exists (as a regular file) only for
//!   physical radios
//! - `<proc>/sys/net/<vif>/%parent` holds the name of the radio backing a
//!   virtual interface, newline-terminated
//!
//! The name-length bounds below are part of the classification, not an
//! optimization: a name longer than the bound is never classified, even if a
//! matching proc node exists.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use iwinfo_core::{Error, IFNAMSIZ, InterfaceName, Result};
use tracing::trace;

/// Longest name accepted as a physical radio.
pub const RADIO_NAME_MAX: usize = 7;

/// Longest name whose parent linkage is consulted.
pub const VIF_NAME_MAX: usize = 9;

/// Minimum bytes a parent-linkage read must return to be trusted.
const PARENT_MIN_READ: usize = 4;

/// What an interface name refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceKind {
    /// A physical radio (`wifiN`).
    Radio,
    /// A virtual interface bound to `parent`.
    Virtual { parent: InterfaceName },
}

/// Proc-fs based device classifier.
#[derive(Debug, Clone)]
pub struct DeviceClassifier {
    proc_root: PathBuf,
}

impl Default for DeviceClassifier {
    fn default() -> Self {
        DeviceClassifier::new("/proc")
    }
}

impl DeviceClassifier {
    /// Create a classifier reading below `proc_root` (normally `/proc`).
    pub fn new(proc_root: impl Into<PathBuf>) -> Self {
        DeviceClassifier {
            proc_root: proc_root.into(),
        }
    }

    /// The proc-fs root in use.
    pub fn proc_root(&self) -> &Path {
        &self.proc_root
    }

    /// `<proc>/sys/dev/<radio>`.
    pub fn radio_dir(&self, radio: &InterfaceName) -> PathBuf {
        self.proc_root.join("sys/dev").join(radio.as_str())
    }

    /// `<proc>/sys/net`.
    pub fn net_dir(&self) -> PathBuf {
        self.proc_root.join("sys/net")
    }

    /// Whether `name` is a physical madwifi radio.
    pub fn is_physical_radio(&self, name: &InterfaceName) -> bool {
        if name.len() > RADIO_NAME_MAX {
            return false;
        }
        fs::metadata(self.radio_dir(name).join("diversity"))
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    /// Resolve the radio backing virtual interface `name`.
    ///
    /// With `expected_parent`, exactly `len(expected_parent)` bytes of the
    /// linkage file are compared and the parent is returned only on a match.
    /// Without it, the linkage file is read (at most `IFNAMSIZ` bytes, at
    /// least 4) and returned with its trailing newline removed.
    pub fn resolve_virtual(
        &self,
        name: &InterfaceName,
        expected_parent: Option<&InterfaceName>,
    ) -> Result<InterfaceName> {
        if name.len() > VIF_NAME_MAX {
            return Err(Error::NotFound(format!(
                "{name} is too long to be a madwifi virtual interface"
            )));
        }

        let path = self.net_dir().join(name.as_str()).join("%parent");
        let file = File::open(&path)
            .map_err(|_| Error::NotFound(format!("{name} has no parent linkage")))?;

        match expected_parent {
            Some(expected) => {
                let mut head = Vec::with_capacity(expected.len());
                file.take(expected.len() as u64).read_to_end(&mut head)?;
                if head == expected.as_bytes() {
                    Ok(expected.clone())
                } else {
                    Err(Error::NotFound(format!("{name} is not bound to {expected}")))
                }
            }
            None => {
                let mut raw = Vec::with_capacity(IFNAMSIZ);
                file.take(IFNAMSIZ as u64).read_to_end(&mut raw)?;
                if raw.len() < PARENT_MIN_READ {
                    return Err(Error::NotFound(format!(
                        "parent linkage of {name} is truncated"
                    )));
                }
                raw.pop();
                let parent = String::from_utf8(raw).map_err(|_| {
                    Error::NotFound(format!("parent linkage of {name} is not text"))
                })?;
                InterfaceName::new(parent)
            }
        }
    }

    /// Whether this backend owns `name`.
    pub fn probe(&self, name: &InterfaceName) -> bool {
        self.resolve_virtual(name, None).is_ok() || self.is_physical_radio(name)
    }

    /// Classify `name`; radios win over virtual interfaces.
    pub fn classify(&self, name: &InterfaceName) -> Result<DeviceKind> {
        if self.is_physical_radio(name) {
            return Ok(DeviceKind::Radio);
        }
        let parent = self.resolve_virtual(name, None)?;
        Ok(DeviceKind::Virtual { parent })
    }

    /// Virtual interfaces currently bound to `radio`, in name order.
    pub fn virtual_interfaces_on(&self, radio: &InterfaceName) -> Result<Vec<InterfaceName>> {
        let mut found = Vec::new();
        for entry in fs::read_dir(self.net_dir())? {
            let entry = entry?;
            let Some(name) = entry
                .file_name()
                .to_str()
                .and_then(|s| InterfaceName::new(s).ok())
            else {
                continue;
            };
            if self.resolve_virtual(&name, Some(radio)).is_ok() {
                trace!(vif = %name, radio = %radio, "found bound virtual interface");
                found.push(name);
            }
        }
        found.sort();
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iwinfo_test_harness::FakeProcFs;

    fn name(s: &str) -> InterfaceName {
        InterfaceName::new(s).unwrap()
    }

    #[test]
    fn radio_with_diversity_file() {
        let proc = FakeProcFs::new();
        proc.add_radio("wifi0");
        let c = DeviceClassifier::new(proc.root());
        assert!(c.is_physical_radio(&name("wifi0")));
        assert!(!c.is_physical_radio(&name("wifi1")));
    }

    #[test]
    fn radio_name_length_bound_is_enforced() {
        let proc = FakeProcFs::new();
        proc.add_radio("wifi0123");
        let c = DeviceClassifier::new(proc.root());
        // 8 bytes: the diversity file exists but the name is over the bound.
        assert!(!c.is_physical_radio(&name("wifi0123")));
        assert!(!c.probe(&name("wifi0123")));
    }

    #[test]
    fn diversity_directory_is_not_a_radio() {
        let proc = FakeProcFs::new();
        proc.add_radio_with_diversity_dir("wifi0");
        let c = DeviceClassifier::new(proc.root());
        assert!(!c.is_physical_radio(&name("wifi0")));
    }

    #[test]
    fn resolve_parent_strips_newline() {
        let proc = FakeProcFs::new();
        proc.add_radio("wifi0");
        proc.add_vif("ath0", "wifi0");
        let c = DeviceClassifier::new(proc.root());
        assert_eq!(c.resolve_virtual(&name("ath0"), None).unwrap(), name("wifi0"));
        assert_eq!(
            c.classify(&name("ath0")).unwrap(),
            DeviceKind::Virtual {
                parent: name("wifi0")
            }
        );
        assert_eq!(c.classify(&name("wifi0")).unwrap(), DeviceKind::Radio);
    }

    #[test]
    fn resolve_with_expected_parent() {
        let proc = FakeProcFs::new();
        proc.add_vif("ath0", "wifi0");
        let c = DeviceClassifier::new(proc.root());
        assert_eq!(
            c.resolve_virtual(&name("ath0"), Some(&name("wifi0"))).unwrap(),
            name("wifi0")
        );
        assert!(matches!(
            c.resolve_virtual(&name("ath0"), Some(&name("wifi1"))),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn short_parent_read_is_rejected() {
        let proc = FakeProcFs::new();
        proc.write_raw("sys/net/ath0/%parent", b"wi\n");
        let c = DeviceClassifier::new(proc.root());
        assert!(c.resolve_virtual(&name("ath0"), None).is_err());
    }

    #[test]
    fn vif_name_length_bound_is_enforced() {
        let proc = FakeProcFs::new();
        proc.add_vif("ath-longer", "wifi0");
        let c = DeviceClassifier::new(proc.root());
        assert!(c.resolve_virtual(&name("ath-longer"), None).is_err());
    }

    #[test]
    fn probe_accepts_radios_and_vifs_only() {
        let proc = FakeProcFs::new();
        proc.add_radio("wifi0");
        proc.add_vif("ath0", "wifi0");
        let c = DeviceClassifier::new(proc.root());
        assert!(c.probe(&name("wifi0")));
        assert!(c.probe(&name("ath0")));
        assert!(!c.probe(&name("eth0")));
        assert!(matches!(c.classify(&name("eth0")), Err(Error::NotFound(_))));
    }

    #[test]
    fn lists_vifs_bound_to_radio() {
        let proc = FakeProcFs::new();
        proc.add_radio("wifi0");
        proc.add_radio("wifi1");
        proc.add_vif("ath1", "wifi0");
        proc.add_vif("ath0", "wifi0");
        proc.add_vif("ath2", "wifi1");
        proc.add_net_dir("ipv4");
        let c = DeviceClassifier::new(proc.root());
        assert_eq!(
            c.virtual_interfaces_on(&name("wifi0")).unwrap(),
            vec![name("ath0"), name("ath1")]
        );
        assert_eq!(c.virtual_interfaces_on(&name("wifi1")).unwrap(), vec![name("ath2")]);
    }
}
