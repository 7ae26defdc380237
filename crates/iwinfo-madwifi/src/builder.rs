//! MadwifiBuilder -- fluent builder for constructing [`MadwifiBackend`] instances.
//!
//! Separates configuration from construction so that callers can point the
//! backend at a different proc-fs root, swap the control channel or the
//! lifecycle provider, and rename the temporary interfaces before any driver
//! access happens.
//!
//! # Example
//!
//! ```no_run
//! use iwinfo_madwifi::builder::MadwifiBuilder;
//! # fn example(wext: Box<dyn iwinfo_core::Backend>) -> iwinfo_core::Result<()> {
//! let backend = MadwifiBuilder::new()
//!     .fallback(wext)
//!     .scan_interface("ath-probe")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use iwinfo_core::{Backend, ControlChannel, Error, InterfaceLifecycleProvider, Result};
use iwinfo_transport::IoctlChannel;

use crate::backend::MadwifiBackend;
use crate::classify::DeviceClassifier;
use crate::lifecycle::WlanconfigLifecycle;
use crate::provision::{
    DEFAULT_CHANNELS_INTERFACE, DEFAULT_SCAN_INTERFACE, DEFAULT_TXPOWER_INTERFACE,
    TemporaryInterfaces,
};

/// Fluent builder for [`MadwifiBackend`].
///
/// Everything except the generic fallback has a default, so the simplest
/// usage is:
///
/// ```ignore
/// let backend = MadwifiBuilder::new().fallback(wext).build()?;
/// ```
pub struct MadwifiBuilder {
    proc_root: PathBuf,
    channel: Option<Box<dyn ControlChannel>>,
    fallback: Option<Box<dyn Backend>>,
    lifecycle: Option<Box<dyn InterfaceLifecycleProvider>>,
    txpower_interface: String,
    channels_interface: String,
    scan_interface: String,
}

impl Default for MadwifiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MadwifiBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        MadwifiBuilder {
            proc_root: PathBuf::from("/proc"),
            channel: None,
            fallback: None,
            lifecycle: None,
            txpower_interface: DEFAULT_TXPOWER_INTERFACE.to_string(),
            channels_interface: DEFAULT_CHANNELS_INTERFACE.to_string(),
            scan_interface: DEFAULT_SCAN_INTERFACE.to_string(),
        }
    }

    /// Set the proc-fs root (default: `/proc`).
    pub fn proc_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.proc_root = root.into();
        self
    }

    /// Use a caller-provided control channel instead of an [`IoctlChannel`].
    ///
    /// This is the primary entry point for testing (pass a `MockChannel`
    /// from `iwinfo-test-harness`).
    pub fn control_channel(mut self, channel: Box<dyn ControlChannel>) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Set the generic backend that answers standard wireless-extensions
    /// queries. Required.
    pub fn fallback(mut self, fallback: Box<dyn Backend>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Use a caller-provided lifecycle provider instead of
    /// [`WlanconfigLifecycle`].
    pub fn lifecycle(mut self, lifecycle: Box<dyn InterfaceLifecycleProvider>) -> Self {
        self.lifecycle = Some(lifecycle);
        self
    }

    /// Name of the temporary interface used for tx-power lists (default: `ath-txpwr`).
    pub fn txpower_interface(mut self, name: &str) -> Self {
        self.txpower_interface = name.to_string();
        self
    }

    /// Name of the temporary interface used for frequency lists (default: `ath-channels`).
    pub fn channels_interface(mut self, name: &str) -> Self {
        self.channels_interface = name.to_string();
        self
    }

    /// Name of the temporary interface used for scans (default: `ath-scan`).
    pub fn scan_interface(mut self, name: &str) -> Self {
        self.scan_interface = name.to_string();
        self
    }

    /// Build a [`MadwifiBackend`].
    ///
    /// Fails with [`Error::InvalidParameter`] when no fallback was given or a
    /// temporary interface name is not a valid interface name. No driver
    /// access happens here; the default control channel opens lazily.
    pub fn build(self) -> Result<MadwifiBackend> {
        let fallback = self
            .fallback
            .ok_or_else(|| Error::InvalidParameter("fallback is required for build()".into()))?;
        let temp = TemporaryInterfaces::from_names(
            &self.txpower_interface,
            &self.channels_interface,
            &self.scan_interface,
        )?;
        let channel = self
            .channel
            .unwrap_or_else(|| Box::new(IoctlChannel::new()));
        let lifecycle = self
            .lifecycle
            .unwrap_or_else(|| Box::new(WlanconfigLifecycle::new()));

        Ok(MadwifiBackend::new(
            channel,
            fallback,
            lifecycle,
            DeviceClassifier::new(self.proc_root),
            temp,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iwinfo_core::InterfaceName;
    use iwinfo_test_harness::{FakeProcFs, MockBackend, MockChannel, MockLifecycle};
    use std::path::Path;

    #[test]
    fn builder_defaults() {
        let backend = MadwifiBuilder::new()
            .fallback(Box::new(MockBackend::new()))
            .build()
            .unwrap();

        assert_eq!(backend.name(), "madwifi");
        assert_eq!(backend.classifier().proc_root(), Path::new("/proc"));
        let temp = backend.temporary_interfaces();
        assert_eq!(temp.txpower.as_str(), "ath-txpwr");
        assert_eq!(temp.channels.as_str(), "ath-channels");
        assert_eq!(temp.scan.as_str(), "ath-scan");
    }

    #[test]
    fn builder_fallback_required() {
        let result = MadwifiBuilder::new().build();
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn builder_rejects_invalid_temporary_name() {
        let result = MadwifiBuilder::new()
            .fallback(Box::new(MockBackend::new()))
            .scan_interface("a-name-that-is-too-long")
            .build();
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn builder_fluent_chain() {
        let proc = FakeProcFs::new();
        proc.add_radio("wifi0");
        let backend = MadwifiBuilder::new()
            .proc_root(proc.root())
            .control_channel(Box::new(MockChannel::new()))
            .fallback(Box::new(MockBackend::new()))
            .lifecycle(Box::new(MockLifecycle::new()))
            .txpower_interface("tmp-txpwr")
            .channels_interface("tmp-chan")
            .scan_interface("tmp-scan")
            .build()
            .unwrap();

        assert!(backend.probe(&InterfaceName::new("wifi0").unwrap()));
        assert_eq!(backend.temporary_interfaces().scan.as_str(), "tmp-scan");
    }
}
