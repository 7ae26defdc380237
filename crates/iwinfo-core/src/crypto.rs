//! Vendor-neutral security profile of a wireless interface.
//!
//! Bit values match the consumer's packed `crypto` record, so
//! [`bits()`](CipherSet::bits) can be written to the wire directly.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Set of ciphers in use (pairwise or group).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CipherSet(u8);

impl CipherSet {
    /// No encryption.
    pub const NONE: CipherSet = CipherSet(1 << 0);
    /// WEP with a 40-bit key.
    pub const WEP40: CipherSet = CipherSet(1 << 1);
    /// TKIP.
    pub const TKIP: CipherSet = CipherSet(1 << 2);
    /// WRAP.
    pub const WRAP: CipherSet = CipherSet(1 << 3);
    /// AES-CCMP.
    pub const CCMP: CipherSet = CipherSet(1 << 4);
    /// WEP with a 104-bit key.
    pub const WEP104: CipherSet = CipherSet(1 << 5);
    /// AES-OCB.
    pub const AESOCB: CipherSet = CipherSet(1 << 6);
    /// Cisco CKIP.
    pub const CKIP: CipherSet = CipherSet(1 << 7);

    const NAMES: [(CipherSet, &'static str); 8] = [
        (CipherSet::NONE, "NONE"),
        (CipherSet::WEP40, "WEP-40"),
        (CipherSet::TKIP, "TKIP"),
        (CipherSet::WRAP, "WRAP"),
        (CipherSet::CCMP, "CCMP"),
        (CipherSet::WEP104, "WEP-104"),
        (CipherSet::AESOCB, "AES-OCB"),
        (CipherSet::CKIP, "CKIP"),
    ];

    /// The empty set.
    pub const fn empty() -> Self {
        CipherSet(0)
    }

    /// Construct from raw bits.
    pub const fn from_bits(bits: u8) -> Self {
        CipherSet(bits)
    }

    /// Raw bits.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// `true` if no cipher is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `true` if every bit of `other` is set in `self`.
    pub const fn contains(self, other: CipherSet) -> bool {
        self.0 & other.0 == other.0
    }

    /// Add every bit of `other`.
    pub fn insert(&mut self, other: CipherSet) {
        self.0 |= other.0;
    }
}

impl BitOr for CipherSet {
    type Output = CipherSet;

    fn bitor(self, rhs: CipherSet) -> CipherSet {
        CipherSet(self.0 | rhs.0)
    }
}

impl BitOrAssign for CipherSet {
    fn bitor_assign(&mut self, rhs: CipherSet) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for CipherSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = CipherSet::NAMES
            .iter()
            .filter(|(c, _)| self.contains(*c))
            .map(|(_, n)| *n)
            .collect();
        if names.is_empty() {
            write!(f, "-")
        } else {
            write!(f, "{}", names.join(", "))
        }
    }
}

/// 802.11 authentication algorithms accepted by the interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AuthAlgorithms(u8);

impl AuthAlgorithms {
    /// Open system authentication.
    pub const OPEN: AuthAlgorithms = AuthAlgorithms(1 << 0);
    /// Shared key authentication.
    pub const SHARED: AuthAlgorithms = AuthAlgorithms(1 << 1);

    /// The empty set.
    pub const fn empty() -> Self {
        AuthAlgorithms(0)
    }

    /// Raw bits.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// `true` if no algorithm is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `true` if every bit of `other` is set in `self`.
    pub const fn contains(self, other: AuthAlgorithms) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for AuthAlgorithms {
    type Output = AuthAlgorithms;

    fn bitor(self, rhs: AuthAlgorithms) -> AuthAlgorithms {
        AuthAlgorithms(self.0 | rhs.0)
    }
}

impl BitOrAssign for AuthAlgorithms {
    fn bitor_assign(&mut self, rhs: AuthAlgorithms) {
        self.0 |= rhs.0;
    }
}

/// Key management suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthSuite {
    /// No key management.
    None,
    /// IEEE 802.1X (EAP).
    Ieee8021x,
    /// Pre-shared key.
    Psk,
}

impl AuthSuite {
    /// Bit value in the consumer's `auth_suites` field.
    pub const fn bits(self) -> u8 {
        match self {
            AuthSuite::None => 1 << 0,
            AuthSuite::Ieee8021x => 1 << 1,
            AuthSuite::Psk => 1 << 2,
        }
    }
}

impl fmt::Display for AuthSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuthSuite::None => "NONE",
            AuthSuite::Ieee8021x => "802.1X",
            AuthSuite::Psk => "PSK",
        };
        write!(f, "{s}")
    }
}

/// Security profile of an interface.
///
/// Every field defaults to its zero value. Backends that build the profile
/// from several independent driver queries leave a field at zero when its
/// query fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EncryptionProfile {
    /// `true` when any WPA version or authentication algorithm is active.
    pub enabled: bool,
    /// WPA version bitmask as reported by the driver (1 = WPA, 2 = WPA2).
    pub wpa_version: u32,
    /// Authentication algorithms.
    pub auth_algorithms: AuthAlgorithms,
    /// Key management suite, `None` when it could not be queried.
    pub auth_suite: Option<AuthSuite>,
    /// Pairwise (unicast) ciphers.
    pub pairwise_ciphers: CipherSet,
    /// Group (multicast) ciphers.
    pub group_ciphers: CipherSet,
}

impl EncryptionProfile {
    /// Recompute [`enabled`](Self::enabled) from the version and algorithm fields.
    pub fn refresh_enabled(&mut self) {
        self.enabled = self.wpa_version != 0 || !self.auth_algorithms.is_empty();
    }
}

impl fmt::Display for EncryptionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.enabled {
            return write!(f, "none");
        }
        if self.wpa_version != 0 {
            let version = match self.wpa_version {
                1 => "WPA",
                2 => "WPA2",
                3 => "mixed WPA/WPA2",
                _ => "WPA?",
            };
            let suite = self
                .auth_suite
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".into());
            write!(f, "{version} {suite} ({})", self.pairwise_ciphers)
        } else {
            write!(f, "WEP ({})", self.group_ciphers | self.pairwise_ciphers)
        }
    }
}
