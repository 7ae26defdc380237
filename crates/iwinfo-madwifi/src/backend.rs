//! MadwifiBackend -- the [`Backend`] trait implementation for madwifi.
//!
//! This module ties the driver request builders ([`commands`]), the packed
//! table decoders ([`station`], [`chaninfo`]) and the provisioning policy
//! ([`provision`]) to a [`ControlChannel`] to produce a working backend.
//!
//! Queries the standard wireless-extensions protocol already answers (SSID,
//! BSSID, transmit power, noise, ...) are delegated to a generic fallback
//! backend. madwifi-specific data (the station table, the channel table,
//! security parameters, the regulatory domain) is read from the driver's
//! private ioctls and proc-fs nodes directly.
//!
//! [`station`]: crate::station
//! [`chaninfo`]: crate::chaninfo

use iwinfo_core::{
    AssocEntry, Backend, ControlChannel, CountryCode, CountryEntry, EncryptionProfile, Error,
    FrequencyEntry, InterfaceLifecycleProvider, InterfaceName, MacAddr, OpMode, Response, Result,
    ScanEntry, TxPowerEntry,
};
use tracing::debug;

use crate::chaninfo::{self, Channel};
use crate::classify::DeviceClassifier;
use crate::commands::{self, Command};
use crate::country;
use crate::encryption;
use crate::provision::{Provisioner, TemporaryInterfaces};
use crate::station::{self, StationRecord};
use crate::stats;

/// A madwifi driver backend.
///
/// Constructed via [`MadwifiBuilder`](crate::builder::MadwifiBuilder). All
/// driver requests go through the [`ControlChannel`] provided at build time.
pub struct MadwifiBackend {
    channel: Box<dyn ControlChannel>,
    fallback: Box<dyn Backend>,
    lifecycle: Box<dyn InterfaceLifecycleProvider>,
    classifier: DeviceClassifier,
    temp: TemporaryInterfaces,
}

impl MadwifiBackend {
    /// Create a new `MadwifiBackend` from its constituent parts.
    ///
    /// This is called by [`MadwifiBuilder`](crate::builder::MadwifiBuilder);
    /// callers should use the builder API instead.
    pub(crate) fn new(
        channel: Box<dyn ControlChannel>,
        fallback: Box<dyn Backend>,
        lifecycle: Box<dyn InterfaceLifecycleProvider>,
        classifier: DeviceClassifier,
        temp: TemporaryInterfaces,
    ) -> Self {
        MadwifiBackend {
            channel,
            fallback,
            lifecycle,
            classifier,
            temp,
        }
    }

    /// The device classifier in use.
    pub fn classifier(&self) -> &DeviceClassifier {
        &self.classifier
    }

    /// The temporary interface names in use.
    pub fn temporary_interfaces(&self) -> &TemporaryInterfaces {
        &self.temp
    }

    fn provisioner(&self) -> Provisioner<'_> {
        Provisioner::new(&self.classifier, self.lifecycle.as_ref())
    }

    fn send(&self, ifname: &InterfaceName, cmd: Command) -> Result<Response> {
        self.channel
            .request(ifname, cmd.opcode, cmd.payload.as_deref())
    }

    /// Whether station statistics are aggregated locally (ad-hoc mode).
    fn aggregates_locally(&self, ifname: &InterfaceName) -> Result<bool> {
        let mode = self.send(ifname, commands::cmd_read_mode())?.value_u32();
        Ok(mode == commands::IW_MODE_ADHOC)
    }

    fn read_stations(&self, ifname: &InterfaceName) -> Result<Vec<StationRecord>> {
        let reply = self.send(ifname, commands::cmd_read_station_info())?;
        station::decode_stations(reply.data())
    }

    fn read_channels(&self, ifname: &InterfaceName) -> Result<Vec<Channel>> {
        let reply = self.send(ifname, commands::cmd_read_chaninfo())?;
        chaninfo::decode_chaninfo(reply.data())
    }

    fn read_frequency(&self, ifname: &InterfaceName) -> Result<u16> {
        let reply = self.send(ifname, commands::cmd_read_frequency())?;
        Ok(commands::frequency_mhz_from_mantissa(reply.value_i32()))
    }
}

impl Backend for MadwifiBackend {
    fn name(&self) -> &'static str {
        "madwifi"
    }

    fn probe(&self, ifname: &InterfaceName) -> bool {
        let claimed = self.classifier.probe(ifname);
        debug!(ifname = %ifname, claimed, "probing");
        claimed
    }

    fn get_mode(&self, ifname: &InterfaceName) -> Result<OpMode> {
        debug!(ifname = %ifname, "reading mode");
        self.fallback.get_mode(ifname)
    }

    fn get_ssid(&self, ifname: &InterfaceName) -> Result<String> {
        debug!(ifname = %ifname, "reading SSID");
        self.fallback.get_ssid(ifname)
    }

    fn get_bssid(&self, ifname: &InterfaceName) -> Result<MacAddr> {
        debug!(ifname = %ifname, "reading BSSID");
        self.fallback.get_bssid(ifname)
    }

    fn get_channel(&self, ifname: &InterfaceName) -> Result<u8> {
        let mhz = self.read_frequency(ifname)?;
        debug!(ifname = %ifname, mhz, "reading channel");
        let channels = self.read_channels(ifname)?;
        chaninfo::channel_for_frequency(&channels, mhz).ok_or_else(|| {
            Error::NotFound(format!("{mhz} MHz is not in the channel table of {ifname}"))
        })
    }

    fn get_frequency(&self, ifname: &InterfaceName) -> Result<u16> {
        debug!(ifname = %ifname, "reading frequency");
        self.read_frequency(ifname)
    }

    fn get_txpower(&self, ifname: &InterfaceName) -> Result<i32> {
        debug!(ifname = %ifname, "reading tx power");
        self.fallback.get_txpower(ifname)
    }

    fn get_bitrate(&self, ifname: &InterfaceName) -> Result<i32> {
        if !self.aggregates_locally(ifname)? {
            return self.fallback.get_bitrate(ifname);
        }
        let records = self.read_stations(ifname)?;
        debug!(ifname = %ifname, stations = records.len(), "averaging bitrate");
        Ok(stats::average_bitrate(&records))
    }

    fn get_signal(&self, ifname: &InterfaceName) -> Result<i32> {
        if !self.aggregates_locally(ifname)? {
            return self.fallback.get_signal(ifname);
        }
        let records = self.read_stations(ifname)?;
        debug!(ifname = %ifname, stations = records.len(), "averaging signal");
        Ok(stats::average_signal(&records))
    }

    fn get_noise(&self, ifname: &InterfaceName) -> Result<i32> {
        debug!(ifname = %ifname, "reading noise");
        self.fallback.get_noise(ifname)
    }

    fn get_quality(&self, ifname: &InterfaceName) -> Result<i32> {
        if !self.aggregates_locally(ifname)? {
            return self.fallback.get_quality(ifname);
        }
        let records = self.read_stations(ifname)?;
        debug!(ifname = %ifname, stations = records.len(), "averaging quality");
        Ok(stats::average_quality(&records))
    }

    fn get_quality_max(&self, ifname: &InterfaceName) -> Result<i32> {
        debug!(ifname = %ifname, "reading quality maximum");
        self.fallback.get_quality_max(ifname)
    }

    fn get_encryption(&self, ifname: &InterfaceName) -> Result<EncryptionProfile> {
        debug!(ifname = %ifname, "reading encryption");
        Ok(encryption::introspect(self.channel.as_ref(), ifname))
    }

    fn get_assoclist(&self, ifname: &InterfaceName) -> Result<Vec<AssocEntry>> {
        debug!(ifname = %ifname, "reading association list");
        let reply = self.send(ifname, commands::cmd_read_station_info())?;
        if reply.data().is_empty() {
            return Err(Error::NotFound(format!("{ifname} returned no station table")));
        }
        let records = station::decode_stations(reply.data())?;
        let noise = self.get_noise(ifname).unwrap_or_else(|e| {
            debug!(ifname = %ifname, error = %e, "noise unavailable, reporting 0");
            0
        });
        Ok(stats::association_list(&records, noise))
    }

    fn get_txpwrlist(&self, ifname: &InterfaceName) -> Result<Vec<TxPowerEntry>> {
        debug!(ifname = %ifname, "reading tx power list");
        self.provisioner()
            .with_access_point(ifname, &self.temp.txpower, |vif| {
                self.fallback.get_txpwrlist(vif)
            })
    }

    fn get_scanlist(&self, ifname: &InterfaceName) -> Result<Vec<ScanEntry>> {
        debug!(ifname = %ifname, "scanning");
        self.provisioner()
            .with_scan_interface(ifname, &self.temp.scan, |vif| {
                self.fallback.get_scanlist(vif)
            })
    }

    fn get_freqlist(&self, ifname: &InterfaceName) -> Result<Vec<FrequencyEntry>> {
        debug!(ifname = %ifname, "reading frequency list");
        let channels = self
            .provisioner()
            .with_access_point(ifname, &self.temp.channels, |vif| self.read_channels(vif))?;
        Ok(channels.into_iter().map(FrequencyEntry::from).collect())
    }

    fn get_country(&self, ifname: &InterfaceName) -> Result<CountryCode> {
        debug!(ifname = %ifname, "reading country");
        country::get_country(&self.classifier, ifname)
    }

    fn get_countrylist(&self, ifname: &InterfaceName) -> Result<Vec<CountryEntry>> {
        debug!(ifname = %ifname, "listing countries");
        Ok(country::country_list())
    }

    fn get_mbssid_support(&self, ifname: &InterfaceName) -> Result<bool> {
        debug!(ifname = %ifname, "reading multi-BSSID support");
        Ok(true)
    }
}
