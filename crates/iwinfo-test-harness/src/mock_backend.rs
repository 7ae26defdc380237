//! Canned [`Backend`] for testing code that delegates to a generic fallback.
//!
//! Every getter answers from a value set up front. Interfaces registered with
//! [`fail_for`](MockBackend::fail_for) fail every query, which is how tests
//! simulate a fallback that cannot reach the driver. Each call is logged so
//! tests can assert which interface a query was routed to.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use iwinfo_core::{
    AssocEntry, Backend, Error, InterfaceName, MacAddr, OpMode, Result, ScanEntry, TxPowerEntry,
};

#[derive(Debug, Default)]
struct State {
    mode: OpMode,
    ssid: String,
    bssid: MacAddr,
    channel: u8,
    frequency: u16,
    txpower: i32,
    bitrate: i32,
    signal: i32,
    noise: i32,
    quality: i32,
    quality_max: i32,
    assoclist: Vec<AssocEntry>,
    txpwrlist: Vec<TxPowerEntry>,
    scanlist: Vec<ScanEntry>,
    failing: HashSet<String>,
    queries: Vec<(&'static str, String)>,
}

/// A generic backend answering from canned values.
///
/// Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<State>>,
}

macro_rules! setter {
    ($name:ident, $field:ident, $ty:ty) => {
        #[doc = concat!("Set the value returned by `get_", stringify!($field), "`.")]
        pub fn $name(&self, value: $ty) -> &Self {
            self.lock().$field = value;
            self
        }
    };
}

impl MockBackend {
    /// Create a backend answering zero values everywhere.
    pub fn new() -> Self {
        MockBackend::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    setter!(set_mode, mode, OpMode);
    setter!(set_ssid, ssid, String);
    setter!(set_bssid, bssid, MacAddr);
    setter!(set_channel, channel, u8);
    setter!(set_frequency, frequency, u16);
    setter!(set_txpower, txpower, i32);
    setter!(set_bitrate, bitrate, i32);
    setter!(set_signal, signal, i32);
    setter!(set_noise, noise, i32);
    setter!(set_quality, quality, i32);
    setter!(set_quality_max, quality_max, i32);
    setter!(set_assoclist, assoclist, Vec<AssocEntry>);
    setter!(set_txpwrlist, txpwrlist, Vec<TxPowerEntry>);
    setter!(set_scanlist, scanlist, Vec<ScanEntry>);

    /// Fail every query against `ifname`.
    pub fn fail_for(&self, ifname: &str) -> &Self {
        self.lock().failing.insert(ifname.to_string());
        self
    }

    /// Every `(operation, interface)` pair queried so far, in order.
    pub fn queries(&self) -> Vec<(&'static str, String)> {
        self.lock().queries.clone()
    }

    /// Log the query and answer with `pick` unless `ifname` is failing.
    fn answer<T>(
        &self,
        op: &'static str,
        ifname: &InterfaceName,
        pick: impl FnOnce(&State) -> T,
    ) -> Result<T> {
        let mut state = self.lock();
        state.queries.push((op, ifname.to_string()));
        if state.failing.contains(ifname.as_str()) {
            return Err(Error::Transport(format!("{op} on {ifname} failed")));
        }
        Ok(pick(&state))
    }
}

impl Backend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn probe(&self, ifname: &InterfaceName) -> bool {
        !self.lock().failing.contains(ifname.as_str())
    }

    fn get_mode(&self, ifname: &InterfaceName) -> Result<OpMode> {
        self.answer("mode", ifname, |s| s.mode)
    }

    fn get_ssid(&self, ifname: &InterfaceName) -> Result<String> {
        self.answer("ssid", ifname, |s| s.ssid.clone())
    }

    fn get_bssid(&self, ifname: &InterfaceName) -> Result<MacAddr> {
        self.answer("bssid", ifname, |s| s.bssid)
    }

    fn get_channel(&self, ifname: &InterfaceName) -> Result<u8> {
        self.answer("channel", ifname, |s| s.channel)
    }

    fn get_frequency(&self, ifname: &InterfaceName) -> Result<u16> {
        self.answer("frequency", ifname, |s| s.frequency)
    }

    fn get_txpower(&self, ifname: &InterfaceName) -> Result<i32> {
        self.answer("txpower", ifname, |s| s.txpower)
    }

    fn get_bitrate(&self, ifname: &InterfaceName) -> Result<i32> {
        self.answer("bitrate", ifname, |s| s.bitrate)
    }

    fn get_signal(&self, ifname: &InterfaceName) -> Result<i32> {
        self.answer("signal", ifname, |s| s.signal)
    }

    fn get_noise(&self, ifname: &InterfaceName) -> Result<i32> {
        self.answer("noise", ifname, |s| s.noise)
    }

    fn get_quality(&self, ifname: &InterfaceName) -> Result<i32> {
        self.answer("quality", ifname, |s| s.quality)
    }

    fn get_quality_max(&self, ifname: &InterfaceName) -> Result<i32> {
        self.answer("quality_max", ifname, |s| s.quality_max)
    }

    fn get_assoclist(&self, ifname: &InterfaceName) -> Result<Vec<AssocEntry>> {
        self.answer("assoclist", ifname, |s| s.assoclist.clone())
    }

    fn get_txpwrlist(&self, ifname: &InterfaceName) -> Result<Vec<TxPowerEntry>> {
        self.answer("txpwrlist", ifname, |s| s.txpwrlist.clone())
    }

    fn get_scanlist(&self, ifname: &InterfaceName) -> Result<Vec<ScanEntry>> {
        self.answer("scanlist", ifname, |s| s.scanlist.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_canned_values_and_logs() {
        let mock = MockBackend::new();
        mock.set_bitrate(54_000).set_ssid("OpenWrt".into());
        let ath0 = InterfaceName::new("ath0").unwrap();

        assert_eq!(mock.get_bitrate(&ath0).unwrap(), 54_000);
        assert_eq!(mock.get_ssid(&ath0).unwrap(), "OpenWrt");
        assert_eq!(
            mock.queries(),
            vec![("bitrate", "ath0".to_string()), ("ssid", "ath0".to_string())]
        );
    }

    #[test]
    fn failing_interface() {
        let mock = MockBackend::new();
        mock.fail_for("ath1");
        let ath1 = InterfaceName::new("ath1").unwrap();
        assert!(mock.get_noise(&ath1).is_err());
        assert!(!mock.probe(&ath1));
        assert_eq!(mock.queries().len(), 1);
    }

    #[test]
    fn optional_queries_are_unsupported() {
        let mock = MockBackend::new();
        let ath0 = InterfaceName::new("ath0").unwrap();
        assert!(matches!(mock.get_freqlist(&ath0), Err(Error::Unsupported(_))));
    }
}
