//! The `Backend` trait -- unified query surface for all driver backends.
//!
//! The aggregation library and its CLI program against `dyn Backend` without
//! knowing which driver family is in use. A dispatcher asks each backend to
//! [`probe`](Backend::probe) an interface and hands the name to the first one
//! that claims it.
//!
//! Backends may also consume another `Backend`: the madwifi backend
//! delegates everything the standard wireless-extensions protocol already
//! answers to a generic fallback implementing this same trait.

use crate::crypto::EncryptionProfile;
use crate::error::{Error, Result};
use crate::types::*;

/// Synchronous query interface for one driver family.
///
/// All methods block on driver I/O. Scalar getters return one value; list
/// getters return owned vectors whose packed form is defined in
/// [`wire`](crate::wire).
pub trait Backend: Send + Sync {
    /// Short backend name (e.g. `"madwifi"`, `"wext"`).
    fn name(&self) -> &'static str;

    /// Whether this backend claims ownership of `ifname`.
    fn probe(&self, ifname: &InterfaceName) -> bool;

    /// Current operating mode.
    fn get_mode(&self, ifname: &InterfaceName) -> Result<OpMode>;

    /// Current SSID.
    fn get_ssid(&self, ifname: &InterfaceName) -> Result<String>;

    /// Current BSSID.
    fn get_bssid(&self, ifname: &InterfaceName) -> Result<MacAddr>;

    /// Current IEEE channel number.
    fn get_channel(&self, ifname: &InterfaceName) -> Result<u8>;

    /// Current frequency in MHz.
    fn get_frequency(&self, ifname: &InterfaceName) -> Result<u16>;

    /// Current transmit power in dBm.
    fn get_txpower(&self, ifname: &InterfaceName) -> Result<i32>;

    /// Current bitrate in kbit/s.
    fn get_bitrate(&self, ifname: &InterfaceName) -> Result<i32>;

    /// Current signal in dBm.
    fn get_signal(&self, ifname: &InterfaceName) -> Result<i32>;

    /// Current noise floor in dBm.
    fn get_noise(&self, ifname: &InterfaceName) -> Result<i32>;

    /// Current link quality.
    fn get_quality(&self, ifname: &InterfaceName) -> Result<i32>;

    /// Upper bound of [`get_quality`](Backend::get_quality).
    fn get_quality_max(&self, ifname: &InterfaceName) -> Result<i32>;

    /// Security profile of the interface.
    fn get_encryption(&self, _ifname: &InterfaceName) -> Result<EncryptionProfile> {
        Err(Error::Unsupported("encryption introspection".into()))
    }

    /// Stations associated with the interface.
    fn get_assoclist(&self, ifname: &InterfaceName) -> Result<Vec<AssocEntry>>;

    /// Selectable transmit power levels.
    fn get_txpwrlist(&self, ifname: &InterfaceName) -> Result<Vec<TxPowerEntry>>;

    /// BSSs visible from the interface.
    fn get_scanlist(&self, ifname: &InterfaceName) -> Result<Vec<ScanEntry>>;

    /// Channels the radio can operate on.
    fn get_freqlist(&self, _ifname: &InterfaceName) -> Result<Vec<FrequencyEntry>> {
        Err(Error::Unsupported("frequency list".into()))
    }

    /// Regulatory domain currently applied to the backing radio.
    fn get_country(&self, _ifname: &InterfaceName) -> Result<CountryCode> {
        Err(Error::Unsupported("country query".into()))
    }

    /// Regulatory domains the backend knows about.
    fn get_countrylist(&self, _ifname: &InterfaceName) -> Result<Vec<CountryEntry>> {
        Err(Error::Unsupported("country list".into()))
    }

    /// Whether the radio can host multiple BSSIDs.
    fn get_mbssid_support(&self, _ifname: &InterfaceName) -> Result<bool> {
        Err(Error::Unsupported("multi-BSSID query".into()))
    }
}
