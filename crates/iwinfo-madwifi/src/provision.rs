//! Temporary virtual interface provisioning.
//!
//! Some data (transmit power levels, the channel table, scan results) is
//! only exposed per virtual interface, but callers may ask about a physical
//! radio. [`Provisioner`] routes such queries: a virtual interface is queried
//! directly, a radio is served through an existing bound interface or a
//! throwaway one created for the duration of the query.
//!
//! Once a temporary interface has been created it is always destroyed,
//! whatever the query returned. Teardown failures are logged and never
//! replace the query result.

use iwinfo_core::{Error, InterfaceLifecycleProvider, InterfaceName, Result, VifMode};
use tracing::{debug, warn};

use crate::classify::{DeviceClassifier, DeviceKind};

/// Default name of the interface used to list transmit power levels.
pub const DEFAULT_TXPOWER_INTERFACE: &str = "ath-txpwr";
/// Default name of the interface used to read the channel table.
pub const DEFAULT_CHANNELS_INTERFACE: &str = "ath-channels";
/// Default name of the interface used to scan.
pub const DEFAULT_SCAN_INTERFACE: &str = "ath-scan";

/// Fixed temporary interface names, one per purpose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporaryInterfaces {
    pub txpower: InterfaceName,
    pub channels: InterfaceName,
    pub scan: InterfaceName,
}

impl TemporaryInterfaces {
    /// Validate and collect the three names.
    pub fn from_names(txpower: &str, channels: &str, scan: &str) -> Result<Self> {
        Ok(TemporaryInterfaces {
            txpower: InterfaceName::new(txpower)?,
            channels: InterfaceName::new(channels)?,
            scan: InterfaceName::new(scan)?,
        })
    }

    /// `ath-txpwr`, `ath-channels` and `ath-scan`.
    pub fn defaults() -> Result<Self> {
        TemporaryInterfaces::from_names(
            DEFAULT_TXPOWER_INTERFACE,
            DEFAULT_CHANNELS_INTERFACE,
            DEFAULT_SCAN_INTERFACE,
        )
    }
}

fn provisioning(step: &str, name: &InterfaceName, err: Error) -> Error {
    match err {
        Error::Provisioning(_) => err,
        other => Error::Provisioning(format!("{step} {name}: {other}")),
    }
}

/// Routes per-interface queries for radios and virtual interfaces alike.
pub struct Provisioner<'a> {
    classifier: &'a DeviceClassifier,
    lifecycle: &'a dyn InterfaceLifecycleProvider,
}

impl<'a> Provisioner<'a> {
    pub fn new(
        classifier: &'a DeviceClassifier,
        lifecycle: &'a dyn InterfaceLifecycleProvider,
    ) -> Self {
        Provisioner {
            classifier,
            lifecycle,
        }
    }

    /// Run `query` against `name`, or against a temporary access point
    /// `temp` when `name` is a physical radio.
    ///
    /// A failed create is reported as [`Error::Provisioning`] and `query` is
    /// not run.
    pub fn with_access_point<T>(
        &self,
        name: &InterfaceName,
        temp: &InterfaceName,
        query: impl FnOnce(&InterfaceName) -> Result<T>,
    ) -> Result<T> {
        match self.classifier.classify(name)? {
            DeviceKind::Virtual { .. } => query(name),
            DeviceKind::Radio => {
                debug!(radio = %name, vif = %temp, "creating temporary access point");
                self.lifecycle
                    .create(temp, name, VifMode::AccessPoint)
                    .map_err(|e| provisioning("creating", temp, e))?;
                let result = query(temp);
                self.destroy(temp);
                result
            }
        }
    }

    /// Run `query` against an interface able to scan on behalf of `name`.
    ///
    /// For a radio, the first bound virtual interface that can be brought
    /// up is used and left in place. If none comes up, or its query fails, a
    /// station-mode interface `temp` is created, brought up, queried, brought
    /// down and destroyed.
    pub fn with_scan_interface<T>(
        &self,
        name: &InterfaceName,
        temp: &InterfaceName,
        mut query: impl FnMut(&InterfaceName) -> Result<T>,
    ) -> Result<T> {
        if let DeviceKind::Virtual { .. } = self.classifier.classify(name)? {
            return query(name);
        }

        match self.classifier.virtual_interfaces_on(name) {
            Ok(vifs) => {
                for vif in vifs {
                    if let Err(e) = self.lifecycle.set_up(&vif) {
                        debug!(vif = %vif, error = %e, "bound interface did not come up");
                        continue;
                    }
                    debug!(radio = %name, vif = %vif, "scanning on existing interface");
                    match query(&vif) {
                        Ok(found) => return Ok(found),
                        Err(e) => {
                            debug!(vif = %vif, error = %e, "scan on existing interface failed");
                            break;
                        }
                    }
                }
            }
            Err(e) => debug!(radio = %name, error = %e, "cannot list bound interfaces"),
        }

        debug!(radio = %name, vif = %temp, "creating temporary station");
        self.lifecycle
            .create(temp, name, VifMode::Station)
            .map_err(|e| provisioning("creating", temp, e))?;

        let result = match self.lifecycle.set_up(temp) {
            Ok(()) => {
                let result = query(temp);
                if let Err(e) = self.lifecycle.set_down(temp) {
                    warn!(vif = %temp, error = %e, "failed to bring temporary interface down");
                }
                result
            }
            Err(e) => Err(provisioning("bringing up", temp, e)),
        };
        self.destroy(temp);
        result
    }

    fn destroy(&self, temp: &InterfaceName) {
        debug!(vif = %temp, "destroying temporary interface");
        if let Err(e) = self.lifecycle.destroy(temp) {
            warn!(vif = %temp, error = %e, "failed to destroy temporary interface");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iwinfo_test_harness::{FakeProcFs, LifecycleCall, LifecycleStep, MockLifecycle};

    fn name(s: &str) -> InterfaceName {
        InterfaceName::new(s).unwrap()
    }

    fn setup() -> (FakeProcFs, MockLifecycle) {
        let proc = FakeProcFs::new();
        proc.add_radio("wifi0");
        (proc, MockLifecycle::new())
    }

    fn create(name: &str, mode: VifMode) -> LifecycleCall {
        LifecycleCall::Create {
            name: name.into(),
            radio: "wifi0".into(),
            mode,
        }
    }

    #[test]
    fn default_names() {
        let temp = TemporaryInterfaces::defaults().unwrap();
        assert_eq!(temp.txpower.as_str(), "ath-txpwr");
        assert_eq!(temp.channels.as_str(), "ath-channels");
        assert_eq!(temp.scan.as_str(), "ath-scan");
        assert!(TemporaryInterfaces::from_names("", "a", "b").is_err());
    }

    #[test]
    fn access_point_path_queries_vif_directly() {
        let (proc, lifecycle) = setup();
        proc.add_vif("ath0", "wifi0");
        let classifier = DeviceClassifier::new(proc.root());
        let p = Provisioner::new(&classifier, &lifecycle);

        let got = p
            .with_access_point(&name("ath0"), &name("ath-txpwr"), |n| Ok(n.to_string()))
            .unwrap();
        assert_eq!(got, "ath0");
        assert!(lifecycle.calls().is_empty());
    }

    #[test]
    fn access_point_path_creates_and_destroys_on_radio() {
        let (proc, lifecycle) = setup();
        let classifier = DeviceClassifier::new(proc.root());
        let p = Provisioner::new(&classifier, &lifecycle);

        let got = p
            .with_access_point(&name("wifi0"), &name("ath-txpwr"), |n| Ok(n.to_string()))
            .unwrap();
        assert_eq!(got, "ath-txpwr");
        assert_eq!(
            lifecycle.calls(),
            vec![
                create("ath-txpwr", VifMode::AccessPoint),
                LifecycleCall::Destroy("ath-txpwr".into()),
            ]
        );
    }

    #[test]
    fn access_point_destroyed_even_when_query_fails() {
        let (proc, lifecycle) = setup();
        let classifier = DeviceClassifier::new(proc.root());
        let p = Provisioner::new(&classifier, &lifecycle);

        let result: Result<()> = p.with_access_point(&name("wifi0"), &name("ath-channels"), |_| {
            Err(Error::Transport("ioctl failed".into()))
        });
        assert!(matches!(result, Err(Error::Transport(_))));
        assert_eq!(
            lifecycle.calls().last(),
            Some(&LifecycleCall::Destroy("ath-channels".into()))
        );
    }

    #[test]
    fn failed_create_skips_query() {
        let (proc, lifecycle) = setup();
        lifecycle.fail_on(LifecycleStep::Create, "ath-txpwr");
        let classifier = DeviceClassifier::new(proc.root());
        let p = Provisioner::new(&classifier, &lifecycle);

        let mut queried = false;
        let result = p.with_access_point(&name("wifi0"), &name("ath-txpwr"), |_| {
            queried = true;
            Ok(())
        });
        assert!(matches!(result, Err(Error::Provisioning(_))));
        assert!(!queried);
        assert_eq!(lifecycle.calls().len(), 1);
    }

    #[test]
    fn teardown_failure_does_not_override_result() {
        let (proc, lifecycle) = setup();
        lifecycle.fail_on(LifecycleStep::Destroy, "ath-txpwr");
        let classifier = DeviceClassifier::new(proc.root());
        let p = Provisioner::new(&classifier, &lifecycle);

        let got = p.with_access_point(&name("wifi0"), &name("ath-txpwr"), |_| Ok(7));
        assert_eq!(got.unwrap(), 7);
    }

    #[test]
    fn unknown_interface_is_not_found() {
        let (proc, lifecycle) = setup();
        let classifier = DeviceClassifier::new(proc.root());
        let p = Provisioner::new(&classifier, &lifecycle);

        let result = p.with_access_point(&name("eth0"), &name("ath-txpwr"), |_| Ok(()));
        assert!(matches!(result, Err(Error::NotFound(_))));
        let result = p.with_scan_interface(&name("eth0"), &name("ath-scan"), |_| Ok(()));
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert!(lifecycle.calls().is_empty());
    }

    #[test]
    fn scan_reuses_bound_interface_without_destroying_it() {
        let (proc, lifecycle) = setup();
        proc.add_vif("ath0", "wifi0");
        let classifier = DeviceClassifier::new(proc.root());
        let p = Provisioner::new(&classifier, &lifecycle);

        let got = p
            .with_scan_interface(&name("wifi0"), &name("ath-scan"), |n| Ok(n.to_string()))
            .unwrap();
        assert_eq!(got, "ath0");
        assert_eq!(lifecycle.calls(), vec![LifecycleCall::Up("ath0".into())]);
    }

    #[test]
    fn scan_skips_interfaces_that_do_not_come_up() {
        let (proc, lifecycle) = setup();
        proc.add_vif("ath0", "wifi0");
        proc.add_vif("ath1", "wifi0");
        lifecycle.fail_on(LifecycleStep::Up, "ath0");
        let classifier = DeviceClassifier::new(proc.root());
        let p = Provisioner::new(&classifier, &lifecycle);

        let got = p
            .with_scan_interface(&name("wifi0"), &name("ath-scan"), |n| Ok(n.to_string()))
            .unwrap();
        assert_eq!(got, "ath1");
    }

    #[test]
    fn scan_falls_back_to_temporary_station() {
        let (proc, lifecycle) = setup();
        proc.add_vif("ath5", "wifi1");
        let classifier = DeviceClassifier::new(proc.root());
        let p = Provisioner::new(&classifier, &lifecycle);

        let got = p
            .with_scan_interface(&name("wifi0"), &name("ath-scan"), |n| Ok(n.to_string()))
            .unwrap();
        assert_eq!(got, "ath-scan");
        assert_eq!(
            lifecycle.calls(),
            vec![
                create("ath-scan", VifMode::Station),
                LifecycleCall::Up("ath-scan".into()),
                LifecycleCall::Down("ath-scan".into()),
                LifecycleCall::Destroy("ath-scan".into()),
            ]
        );
    }

    #[test]
    fn failed_scan_on_bound_interface_falls_through() {
        let (proc, lifecycle) = setup();
        proc.add_vif("ath0", "wifi0");
        let classifier = DeviceClassifier::new(proc.root());
        let p = Provisioner::new(&classifier, &lifecycle);

        let got = p
            .with_scan_interface(&name("wifi0"), &name("ath-scan"), |n| {
                if n.as_str() == "ath0" {
                    Err(Error::Transport("scan busy".into()))
                } else {
                    Ok(n.to_string())
                }
            })
            .unwrap();
        assert_eq!(got, "ath-scan");
        let calls = lifecycle.calls();
        assert_eq!(calls[0], LifecycleCall::Up("ath0".into()));
        assert!(!calls.contains(&LifecycleCall::Destroy("ath0".into())));
        assert_eq!(calls.last(), Some(&LifecycleCall::Destroy("ath-scan".into())));
    }

    #[test]
    fn temporary_station_destroyed_when_scan_fails() {
        let (proc, lifecycle) = setup();
        let classifier = DeviceClassifier::new(proc.root());
        let p = Provisioner::new(&classifier, &lifecycle);

        let result: Result<()> = p.with_scan_interface(&name("wifi0"), &name("ath-scan"), |_| {
            Err(Error::Transport("scan failed".into()))
        });
        assert!(matches!(result, Err(Error::Transport(_))));
        assert_eq!(
            lifecycle.calls().last(),
            Some(&LifecycleCall::Destroy("ath-scan".into()))
        );
    }

    #[test]
    fn temporary_station_that_does_not_come_up() {
        let (proc, lifecycle) = setup();
        lifecycle.fail_on(LifecycleStep::Up, "ath-scan");
        let classifier = DeviceClassifier::new(proc.root());
        let p = Provisioner::new(&classifier, &lifecycle);

        let mut queried = false;
        let result = p.with_scan_interface(&name("wifi0"), &name("ath-scan"), |_| {
            queried = true;
            Ok(())
        });
        assert!(matches!(result, Err(Error::Provisioning(_))));
        assert!(!queried);
        assert_eq!(
            lifecycle.calls(),
            vec![
                create("ath-scan", VifMode::Station),
                LifecycleCall::Up("ath-scan".into()),
                LifecycleCall::Destroy("ath-scan".into()),
            ]
        );
    }

    #[test]
    fn scan_on_vif_is_direct() {
        let (proc, lifecycle) = setup();
        proc.add_vif("ath0", "wifi0");
        let classifier = DeviceClassifier::new(proc.root());
        let p = Provisioner::new(&classifier, &lifecycle);

        let got = p
            .with_scan_interface(&name("ath0"), &name("ath-scan"), |n| Ok(n.to_string()))
            .unwrap();
        assert_eq!(got, "ath0");
        assert!(lifecycle.calls().is_empty());
    }
}
