//! Core types used throughout iwinfo.
//!
//! These types form the vendor-neutral schema every backend produces,
//! regardless of which driver family (madwifi, wireless extensions, ...)
//! the data was queried from.

use std::fmt;
use std::str::FromStr;

use crate::crypto::EncryptionProfile;
use crate::error::{Error, Result};

/// A network interface name, e.g. `wifi0` or `ath0`.
///
/// Bounded by the kernel's `IFNAMSIZ` (16 bytes including the terminating
/// NUL), so at most 15 bytes of name. Names are used to build proc-fs paths,
/// so `/` and NUL are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterfaceName(String);

impl InterfaceName {
    /// Maximum name length in bytes (`IFNAMSIZ - 1`).
    pub const MAX_LEN: usize = 15;

    /// Validate and wrap an interface name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidParameter("empty interface name".into()));
        }
        if name.len() > Self::MAX_LEN {
            return Err(Error::InvalidParameter(format!(
                "interface name {name:?} exceeds {} bytes",
                Self::MAX_LEN
            )));
        }
        if name.bytes().any(|b| b == b'/' || b == 0) {
            return Err(Error::InvalidParameter(format!(
                "interface name {name:?} contains '/' or NUL"
            )));
        }
        Ok(InterfaceName(name))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name as raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Length of the name in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; empty names are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for InterfaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for InterfaceName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        InterfaceName::new(s)
    }
}

impl TryFrom<&str> for InterfaceName {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        InterfaceName::new(s)
    }
}

impl AsRef<str> for InterfaceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A 48-bit IEEE 802 MAC address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    /// The broadcast address `ff:ff:ff:ff:ff:ff`.
    pub const BROADCAST: MacAddr = MacAddr([0xFF; 6]);

    /// The raw octets.
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// Operating mode of a wireless interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OpMode {
    /// Mode could not be determined.
    #[default]
    Unknown,
    /// Access point.
    Master,
    /// IBSS / ad-hoc.
    AdHoc,
    /// Managed station.
    Client,
    /// Monitor (passive capture).
    Monitor,
}

impl OpMode {
    /// Numeric code used in the packed scan-list layout.
    pub fn code(&self) -> u8 {
        match self {
            OpMode::Unknown => 0,
            OpMode::Master => 1,
            OpMode::AdHoc => 2,
            OpMode::Client => 3,
            OpMode::Monitor => 4,
        }
    }
}

impl fmt::Display for OpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OpMode::Unknown => "Unknown",
            OpMode::Master => "Master",
            OpMode::AdHoc => "Ad-Hoc",
            OpMode::Client => "Client",
            OpMode::Monitor => "Monitor",
        };
        write!(f, "{s}")
    }
}

/// A two-character regulatory identifier, e.g. `DE` or `US`.
///
/// The consumer packs the pair into a `u16` with the first character in the
/// high byte; [`from_packed`](CountryCode::from_packed) and
/// [`packed`](CountryCode::packed) are the only places that encoding lives.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    /// Build a code from two ASCII bytes without validation.
    ///
    /// Intended for static tables; use [`FromStr`] for untrusted input.
    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        CountryCode(bytes)
    }

    /// Decode from the packed `u16` form (first character in the high byte).
    pub const fn from_packed(packed: u16) -> Self {
        CountryCode([(packed >> 8) as u8, (packed & 0xFF) as u8])
    }

    /// Encode into the packed `u16` form.
    pub const fn packed(self) -> u16 {
        ((self.0[0] as u16) << 8) | self.0[1] as u16
    }

    /// The two raw bytes.
    pub const fn bytes(self) -> [u8; 2] {
        self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0[0] as char, self.0[1] as char)
    }
}

impl fmt::Debug for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CountryCode({self})")
    }
}

impl FromStr for CountryCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.as_bytes() {
            [a, b] if a.is_ascii_alphanumeric() && b.is_ascii_alphanumeric() => Ok(CountryCode(
                [a.to_ascii_uppercase(), b.to_ascii_uppercase()],
            )),
            _ => Err(Error::InvalidParameter(format!(
                "country code {s:?} is not two alphanumeric characters"
            ))),
        }
    }
}

/// One associated station as seen by the local radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssocEntry {
    /// Station MAC address.
    pub mac: MacAddr,
    /// Signal in dBm.
    pub signal: i32,
    /// Noise floor in dBm.
    pub noise: i32,
}

/// One selectable transmit power level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxPowerEntry {
    /// Power in dBm.
    pub dbm: u8,
    /// Power in milliwatts.
    pub mw: u16,
}

/// One channel the radio can operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyEntry {
    /// IEEE channel number.
    pub channel: u8,
    /// Center frequency in MHz.
    pub mhz: u32,
}

/// One regulatory domain the backend knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryEntry {
    /// Two-character identifier.
    pub iso: CountryCode,
    /// Numeric regulatory code.
    pub regulatory_code: u16,
}

/// One BSS found by a scan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanEntry {
    /// BSSID.
    pub mac: MacAddr,
    /// Network name (at most 32 bytes).
    pub ssid: String,
    /// Mode advertised by the BSS.
    pub mode: OpMode,
    /// Channel number.
    pub channel: u8,
    /// Signal in dBm.
    pub signal: i32,
    /// Link quality.
    pub quality: u8,
    /// Maximum link quality.
    pub quality_max: u8,
    /// Advertised security profile.
    pub crypto: EncryptionProfile,
}
