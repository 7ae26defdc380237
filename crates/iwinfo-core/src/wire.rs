//! Packed record layouts expected by the aggregation library.
//!
//! List operations hand their results to the consumer as a byte buffer of
//! fixed-size records. Each record type implements [`WireRecord`]; field order
//! and sizes follow the consumer's C structs with natural alignment, in native
//! byte order.
//!
//! # Layouts
//!
//! ```text
//! AssocEntry         mac[6] signal:i8 noise:i8                          8 bytes
//! TxPowerEntry       dbm:u8 pad mw:u16                                  4 bytes
//! FrequencyEntry     channel:u8 pad[3] mhz:u32                          8 bytes
//! CountryEntry       iso3166:u16 ccode[4]                               6 bytes
//! EncryptionProfile  enabled wpa group pair suites algs (u8 each)       6 bytes
//! ScanEntry          mac[6] ssid[33] mode chan signal qual qmax crypto 50 bytes
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use crate::crypto::EncryptionProfile;
use crate::types::{AssocEntry, CountryEntry, FrequencyEntry, ScanEntry, TxPowerEntry};

/// Maximum SSID length in bytes.
pub const ESSID_MAX_SIZE: usize = 32;

/// A record with a fixed packed layout.
pub trait WireRecord {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Append exactly [`SIZE`](Self::SIZE) bytes to `buf`.
    fn encode(&self, buf: &mut BytesMut);
}

/// Encode a list of records back to back.
pub fn encode_list<T: WireRecord>(records: &[T]) -> Bytes {
    let mut buf = BytesMut::with_capacity(records.len() * T::SIZE);
    for record in records {
        record.encode(&mut buf);
    }
    buf.freeze()
}

fn clamp_i8(v: i32) -> i8 {
    v.clamp(i8::MIN as i32, i8::MAX as i32) as i8
}

impl WireRecord for AssocEntry {
    const SIZE: usize = 8;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(&self.mac.octets());
        buf.put_i8(clamp_i8(self.signal));
        buf.put_i8(clamp_i8(self.noise));
    }
}

impl WireRecord for TxPowerEntry {
    const SIZE: usize = 4;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.dbm);
        buf.put_u8(0);
        buf.put_u16_ne(self.mw);
    }
}

impl WireRecord for FrequencyEntry {
    const SIZE: usize = 8;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.channel);
        buf.put_bytes(0, 3);
        buf.put_u32_ne(self.mhz);
    }
}

impl WireRecord for CountryEntry {
    const SIZE: usize = 6;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u16_ne(self.iso.packed());
        // Decimal text, NUL-terminated in a 4-byte field.
        let text = self.regulatory_code.to_string();
        let digits = &text.as_bytes()[..text.len().min(3)];
        buf.put_slice(digits);
        buf.put_bytes(0, 4 - digits.len());
    }
}

impl WireRecord for EncryptionProfile {
    const SIZE: usize = 6;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.enabled as u8);
        buf.put_u8(self.wpa_version as u8);
        buf.put_u8(self.group_ciphers.bits());
        buf.put_u8(self.pairwise_ciphers.bits());
        buf.put_u8(self.auth_suite.map(|s| s.bits()).unwrap_or(0));
        buf.put_u8(self.auth_algorithms.bits());
    }
}

impl WireRecord for ScanEntry {
    const SIZE: usize = 6 + ESSID_MAX_SIZE + 1 + 5 + EncryptionProfile::SIZE;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(&self.mac.octets());
        let ssid = self.ssid.as_bytes();
        let ssid = &ssid[..ssid.len().min(ESSID_MAX_SIZE)];
        buf.put_slice(ssid);
        buf.put_bytes(0, ESSID_MAX_SIZE + 1 - ssid.len());
        buf.put_u8(self.mode.code());
        buf.put_u8(self.channel);
        buf.put_u8(clamp_i8(self.signal) as u8);
        buf.put_u8(self.quality);
        buf.put_u8(self.quality_max);
        self.crypto.encode(buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{AuthAlgorithms, AuthSuite, CipherSet};
    use crate::types::{CountryCode, MacAddr, OpMode};

    #[test]
    fn assoc_entry_layout() {
        let entry = AssocEntry {
            mac: MacAddr([1, 2, 3, 4, 5, 6]),
            signal: -60,
            noise: -95,
        };
        let bytes = encode_list(&[entry]);
        assert_eq!(bytes.len(), AssocEntry::SIZE);
        assert_eq!(&bytes[..6], &[1, 2, 3, 4, 5, 6]);
        assert_eq!(bytes[6] as i8, -60);
        assert_eq!(bytes[7] as i8, -95);
    }

    #[test]
    fn assoc_entry_clamps_out_of_range_signal() {
        let entry = AssocEntry {
            mac: MacAddr::default(),
            signal: 160,
            noise: -200,
        };
        let bytes = encode_list(&[entry]);
        assert_eq!(bytes[6] as i8, i8::MAX);
        assert_eq!(bytes[7] as i8, i8::MIN);
    }

    #[test]
    fn frequency_entry_layout() {
        let bytes = encode_list(&[FrequencyEntry {
            channel: 6,
            mhz: 2437,
        }]);
        assert_eq!(bytes.len(), 8);
        assert_eq!(bytes[0], 6);
        assert_eq!(&bytes[1..4], &[0, 0, 0]);
        assert_eq!(u32::from_ne_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 2437);
    }

    #[test]
    fn country_entry_layout() {
        let bytes = encode_list(&[CountryEntry {
            iso: CountryCode::from_bytes(*b"DE"),
            regulatory_code: 276,
        }]);
        assert_eq!(bytes.len(), 6);
        assert_eq!(u16::from_ne_bytes([bytes[0], bytes[1]]), 0x4445);
        assert_eq!(&bytes[2..], b"276\0");
    }

    #[test]
    fn country_entry_short_code_is_nul_padded() {
        let bytes = encode_list(&[CountryEntry {
            iso: CountryCode::from_bytes(*b"00"),
            regulatory_code: 0,
        }]);
        assert_eq!(&bytes[2..], b"0\0\0\0");
    }

    #[test]
    fn encryption_profile_layout() {
        let profile = EncryptionProfile {
            enabled: true,
            wpa_version: 2,
            auth_algorithms: AuthAlgorithms::OPEN,
            auth_suite: Some(AuthSuite::Psk),
            pairwise_ciphers: CipherSet::CCMP | CipherSet::TKIP,
            group_ciphers: CipherSet::TKIP,
        };
        let bytes = encode_list(&[profile]);
        assert_eq!(&bytes[..], &[1, 2, 0x04, 0x14, 0x04, 0x01]);
    }

    #[test]
    fn scan_entry_layout() {
        let entry = ScanEntry {
            mac: MacAddr([0xAA; 6]),
            ssid: "OpenWrt".into(),
            mode: OpMode::Master,
            channel: 11,
            signal: -70,
            quality: 40,
            quality_max: 70,
            crypto: EncryptionProfile::default(),
        };
        let bytes = encode_list(&[entry.clone(), entry]);
        assert_eq!(ScanEntry::SIZE, 50);
        assert_eq!(bytes.len(), 100);
        assert_eq!(&bytes[6..13], b"OpenWrt");
        assert_eq!(bytes[6 + 7], 0);
        assert_eq!(bytes[39], OpMode::Master.code());
        assert_eq!(bytes[40], 11);
        assert_eq!(bytes[41] as i8, -70);
    }

    #[test]
    fn txpower_entry_layout() {
        let bytes = encode_list(&[TxPowerEntry { dbm: 20, mw: 100 }]);
        assert_eq!(bytes.len(), 4);
        assert_eq!(bytes[0], 20);
        assert_eq!(u16::from_ne_bytes([bytes[2], bytes[3]]), 100);
    }
}
