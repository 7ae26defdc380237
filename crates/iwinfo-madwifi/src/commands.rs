//! madwifi control-channel command builders and vendor constants.
//!
//! This module provides functions to construct the requests the madwifi
//! backend issues (wireless-extensions getters and the driver's private
//! `ieee80211` ioctls) and the vendor constants carried in their replies.
//!
//! All functions are pure -- they produce [`Command`] values or map raw
//! integers without performing any I/O. The backend sends commands over a
//! [`ControlChannel`](iwinfo_core::ControlChannel).
//!
//! # Opcode reference
//!
//! Private ioctls are numbered from `SIOCIWFIRSTPRIV` (wireless-extensions
//! private range) or `SIOCDEVPRIVATE` (device private range), as defined by
//! madwifi-ng's `ieee80211_ioctl.h`.

use bytes::{BufMut, BytesMut};
use iwinfo_core::MacAddr;

/// Get frequency (`struct iw_freq` in the request union).
pub const SIOCGIWFREQ: u32 = 0x8B05;
/// Get operating mode (`u.mode`).
pub const SIOCGIWMODE: u32 = 0x8B07;

const SIOCIWFIRSTPRIV: u32 = 0x8BE0;
const SIOCDEVPRIVATE: u32 = 0x89F0;

/// Read one driver parameter; the parameter id is sent inline in `u.mode`.
pub const IEEE80211_IOCTL_GETPARAM: u32 = SIOCIWFIRSTPRIV + 1;
/// Read the channel table (`struct ieee80211req_chaninfo`).
pub const IEEE80211_IOCTL_GETCHANINFO: u32 = SIOCIWFIRSTPRIV + 13;
/// Read a key slot (`struct ieee80211req_key`).
pub const IEEE80211_IOCTL_GETKEY: u32 = SIOCDEVPRIVATE + 3;
/// Read the packed station table (`struct ieee80211req_sta_info[]`).
pub const IEEE80211_IOCTL_STA_INFO: u32 = SIOCDEVPRIVATE + 6;

/// `IW_MODE_ADHOC`: the only mode in which station statistics are
/// aggregated locally.
pub const IW_MODE_ADHOC: u32 = 1;

/// Size of the station-table reply buffer.
pub const STA_INFO_BUFFER_SIZE: usize = 24 * 1024;

/// Size of `struct ieee80211req_key`.
pub const KEY_REQUEST_SIZE: usize = 64;

/// Offset of `ik_type` in `struct ieee80211req_key`.
const KEY_TYPE_OFFSET: usize = 0;

/// Driver parameters read via [`IEEE80211_IOCTL_GETPARAM`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    /// `IEEE80211_PARAM_AUTHMODE`.
    AuthMode,
    /// `IEEE80211_PARAM_MCASTCIPHER`.
    McastCipher,
    /// `IEEE80211_PARAM_MCASTKEYLEN`.
    McastKeyLen,
    /// `IEEE80211_PARAM_UCASTCIPHERS`.
    UcastCiphers,
    /// `IEEE80211_PARAM_WPA`.
    Wpa,
}

impl Param {
    /// Numeric parameter id.
    pub fn id(&self) -> u32 {
        match self {
            Param::AuthMode => 3,
            Param::McastCipher => 5,
            Param::McastKeyLen => 6,
            Param::UcastCiphers => 7,
            Param::Wpa => 10,
        }
    }
}

/// Authentication mode reported by `IEEE80211_PARAM_AUTHMODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorAuthMode {
    None,
    Open,
    Shared,
    Ieee8021x,
    Auto,
    /// WPA with pre-shared key or 802.1X negotiated by the supplicant.
    Wpa,
    /// Value not known to this backend.
    Unrecognized(u32),
}

impl VendorAuthMode {
    /// Map a raw driver value.
    pub fn from_raw(value: u32) -> Self {
        match value {
            0 => VendorAuthMode::None,
            1 => VendorAuthMode::Open,
            2 => VendorAuthMode::Shared,
            3 => VendorAuthMode::Ieee8021x,
            4 => VendorAuthMode::Auto,
            5 => VendorAuthMode::Wpa,
            other => VendorAuthMode::Unrecognized(other),
        }
    }
}

/// Cipher identifiers (`IEEE80211_CIPHER_*`).
///
/// The pairwise-cipher parameter is a bitmask with bit `1 << id` per cipher;
/// the group-cipher parameter is a single id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorCipher {
    Wep,
    Tkip,
    AesOcb,
    AesCcm,
    TkipMic,
    Ckip,
    None,
    /// Value not known to this backend.
    Unrecognized(u32),
}

impl VendorCipher {
    /// Every known cipher, in id order.
    pub const KNOWN: [VendorCipher; 7] = [
        VendorCipher::Wep,
        VendorCipher::Tkip,
        VendorCipher::AesOcb,
        VendorCipher::AesCcm,
        VendorCipher::TkipMic,
        VendorCipher::Ckip,
        VendorCipher::None,
    ];

    /// Map a raw driver value.
    pub fn from_raw(value: u32) -> Self {
        match value {
            0 => VendorCipher::Wep,
            1 => VendorCipher::Tkip,
            2 => VendorCipher::AesOcb,
            3 => VendorCipher::AesCcm,
            4 => VendorCipher::TkipMic,
            5 => VendorCipher::Ckip,
            6 => VendorCipher::None,
            other => VendorCipher::Unrecognized(other),
        }
    }

    /// Numeric id.
    pub fn id(&self) -> u32 {
        match self {
            VendorCipher::Wep => 0,
            VendorCipher::Tkip => 1,
            VendorCipher::AesOcb => 2,
            VendorCipher::AesCcm => 3,
            VendorCipher::TkipMic => 4,
            VendorCipher::Ckip => 5,
            VendorCipher::None => 6,
            VendorCipher::Unrecognized(v) => *v,
        }
    }
}

/// One control-channel request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// ioctl request number.
    pub opcode: u32,
    /// Inline value or by-reference buffer.
    pub payload: Option<Vec<u8>>,
}

impl Command {
    fn bare(opcode: u32) -> Self {
        Command {
            opcode,
            payload: None,
        }
    }
}

/// Build a "read operating mode" request.
pub fn cmd_read_mode() -> Command {
    Command::bare(SIOCGIWMODE)
}

/// Build a "read frequency" request.
pub fn cmd_read_frequency() -> Command {
    Command::bare(SIOCGIWFREQ)
}

/// Build a "read driver parameter" request.
///
/// The 4-byte parameter id is shorter than `IFNAMSIZ`, so it travels inline
/// in the request union and the driver overwrites it with the value.
pub fn cmd_get_param(param: Param) -> Command {
    Command {
        opcode: IEEE80211_IOCTL_GETPARAM,
        payload: Some(param.id().to_ne_bytes().to_vec()),
    }
}

/// Build a "read station table" request with an empty reply buffer.
pub fn cmd_read_station_info() -> Command {
    Command {
        opcode: IEEE80211_IOCTL_STA_INFO,
        payload: Some(vec![0u8; STA_INFO_BUFFER_SIZE]),
    }
}

/// Build a "read channel table" request with an empty reply buffer.
pub fn cmd_read_chaninfo() -> Command {
    Command {
        opcode: IEEE80211_IOCTL_GETCHANINFO,
        payload: Some(vec![0u8; crate::chaninfo::CHANINFO_SIZE]),
    }
}

/// Build a "read broadcast key slot" request.
///
/// Layout of `struct ieee80211req_key`: `ik_type`, pad, `ik_keyix` (u16),
/// `ik_keylen`, `ik_flags`, `ik_macaddr[6]`, then sequence counters and key
/// data. Only the MAC address is set (to broadcast) to select the group key.
pub fn cmd_read_group_key() -> Command {
    let mut buf = BytesMut::with_capacity(KEY_REQUEST_SIZE);
    buf.put_u8(0); // ik_type
    buf.put_u8(0); // ik_pad
    buf.put_u16_ne(0); // ik_keyix
    buf.put_u8(0); // ik_keylen
    buf.put_u8(0); // ik_flags
    buf.put_slice(&MacAddr::BROADCAST.octets());
    buf.put_bytes(0, KEY_REQUEST_SIZE - buf.len());
    Command {
        opcode: IEEE80211_IOCTL_GETKEY,
        payload: Some(buf.to_vec()),
    }
}

/// Extract `ik_type` from a key-slot reply.
pub fn parse_key_type(data: &[u8]) -> Option<u8> {
    data.get(KEY_TYPE_OFFSET).copied()
}

/// Convert an `iw_freq` mantissa to MHz.
///
/// madwifi reports the frequency in units of 10 Hz with a zero exponent.
pub fn frequency_mhz_from_mantissa(m: i32) -> u16 {
    (m / 100_000) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_opcodes() {
        assert_eq!(IEEE80211_IOCTL_GETPARAM, 0x8BE1);
        assert_eq!(IEEE80211_IOCTL_GETCHANINFO, 0x8BED);
        assert_eq!(IEEE80211_IOCTL_GETKEY, 0x89F3);
        assert_eq!(IEEE80211_IOCTL_STA_INFO, 0x89F6);
    }

    #[test]
    fn get_param_sends_id_inline() {
        let cmd = cmd_get_param(Param::Wpa);
        assert_eq!(cmd.opcode, IEEE80211_IOCTL_GETPARAM);
        assert_eq!(cmd.payload.unwrap(), 10u32.to_ne_bytes().to_vec());
    }

    #[test]
    fn param_ids() {
        assert_eq!(Param::AuthMode.id(), 3);
        assert_eq!(Param::McastCipher.id(), 5);
        assert_eq!(Param::McastKeyLen.id(), 6);
        assert_eq!(Param::UcastCiphers.id(), 7);
        assert_eq!(Param::Wpa.id(), 10);
    }

    #[test]
    fn group_key_request_targets_broadcast() {
        let cmd = cmd_read_group_key();
        let payload = cmd.payload.unwrap();
        assert_eq!(payload.len(), KEY_REQUEST_SIZE);
        assert_eq!(&payload[6..12], &[0xFF; 6]);
        assert!(payload[..6].iter().all(|&b| b == 0));
        assert!(payload[12..].iter().all(|&b| b == 0));
    }

    #[test]
    fn station_info_buffer_is_by_reference() {
        let cmd = cmd_read_station_info();
        assert_eq!(cmd.payload.unwrap().len(), STA_INFO_BUFFER_SIZE);
    }

    #[test]
    fn vendor_cipher_round_trip_ids() {
        for cipher in VendorCipher::KNOWN {
            assert_eq!(VendorCipher::from_raw(cipher.id()), cipher);
        }
        assert_eq!(VendorCipher::from_raw(42), VendorCipher::Unrecognized(42));
    }

    #[test]
    fn vendor_auth_mode_unrecognized() {
        assert_eq!(VendorAuthMode::from_raw(3), VendorAuthMode::Ieee8021x);
        assert_eq!(VendorAuthMode::from_raw(5), VendorAuthMode::Wpa);
        assert_eq!(VendorAuthMode::from_raw(77), VendorAuthMode::Unrecognized(77));
    }

    #[test]
    fn frequency_conversion() {
        assert_eq!(frequency_mhz_from_mantissa(243_700_000), 2437);
        assert_eq!(frequency_mhz_from_mantissa(518_000_000), 5180);
    }

    #[test]
    fn key_type_parse() {
        assert_eq!(parse_key_type(&[0, 1, 2]), Some(0));
        assert_eq!(parse_key_type(&[]), None);
    }
}
