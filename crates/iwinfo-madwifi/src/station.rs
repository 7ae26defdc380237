//! Station table decoder.
//!
//! `IEEE80211_IOCTL_STA_INFO` returns a packed array of
//! `struct ieee80211req_sta_info` records. Records are self-describing: each
//! starts with its own byte length (`isi_len`, a multiple of 4) and may be
//! followed by variable-length IE data, so the decoder advances by the
//! declared length rather than a fixed stride.
//!
//! # Record layout (native endian)
//!
//! ```text
//! offset  size  field
//!      0     2  isi_len
//!      2     2  isi_freq
//!      4     2  isi_flags
//!      6     2  isi_state
//!      8     1  isi_authmode
//!      9     1  isi_rssi
//!     10     1  isi_noise
//!     12     2  isi_capinfo
//!     14     1  isi_athflags
//!     15     1  isi_erp
//!     16     6  isi_macaddr
//!     22     1  isi_nrates
//!     23    15  isi_rates
//!     38     1  isi_txrate
//!     40    80  associd, txpower, vlan, tx/rx sequence numbers, ...
//!    120        (end of fixed part)
//! ```

use iwinfo_core::{Error, MacAddr, Result};
use tracing::trace;

/// Size of the fixed part of a station record.
pub const MIN_RECORD_SIZE: usize = 120;

/// Capacity of the per-station rate table (`IEEE80211_RATE_MAXSIZE`).
pub const RATE_MAXSIZE: usize = 15;

/// Mask selecting the rate value from a rate-table entry (`IEEE80211_RATE_VAL`).
pub const RATE_VAL: u8 = 0x7F;

const LEN_OFFSET: usize = 0;
const RSSI_OFFSET: usize = 9;
const MAC_OFFSET: usize = 16;
const NRATES_OFFSET: usize = 22;
const RATES_OFFSET: usize = 23;
const TXRATE_OFFSET: usize = 38;

/// One associated station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationRecord {
    /// Station MAC address.
    pub mac: MacAddr,
    /// Raw RSSI relative to the driver's noise floor.
    pub rssi: i32,
    /// Index of the active transmit rate in [`rates`](Self::rates).
    pub tx_rate_index: u8,
    /// Number of valid entries in [`rates`](Self::rates).
    pub nrates: u8,
    /// Negotiated rate table, half-Mbit/s units plus flag bits.
    pub rates: [u8; RATE_MAXSIZE],
    /// Declared length of this record in bytes.
    pub record_len: usize,
}

impl StationRecord {
    /// Whether this station contributes to aggregate statistics.
    pub fn is_qualifying(&self) -> bool {
        self.rssi > 0
    }

    /// Active transmit rate in half-Mbit/s with flag bits masked off.
    ///
    /// An index outside the rate table yields 0.
    pub fn active_rate(&self) -> u8 {
        self.rates
            .get(self.tx_rate_index as usize)
            .copied()
            .unwrap_or(0)
            & RATE_VAL
    }
}

fn read_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_ne_bytes([buf[offset], buf[offset + 1]])
}

/// Parse the fixed part of one record. `record` must be at least
/// [`MIN_RECORD_SIZE`] bytes.
fn parse_record(record: &[u8]) -> StationRecord {
    let mut mac = [0u8; 6];
    mac.copy_from_slice(&record[MAC_OFFSET..MAC_OFFSET + 6]);
    let mut rates = [0u8; RATE_MAXSIZE];
    rates.copy_from_slice(&record[RATES_OFFSET..RATES_OFFSET + RATE_MAXSIZE]);

    StationRecord {
        mac: MacAddr(mac),
        rssi: record[RSSI_OFFSET] as i32,
        tx_rate_index: record[TXRATE_OFFSET],
        nrates: record[NRATES_OFFSET],
        rates,
        record_len: record.len(),
    }
}

/// Decode a station table.
///
/// Walks records while at least [`MIN_RECORD_SIZE`] bytes remain. A tail
/// shorter than one record ends the walk. A record whose declared length is
/// below the minimum or runs past the end of `frame` fails the whole decode;
/// no partial sequence is returned.
pub fn decode_stations(frame: &[u8]) -> Result<Vec<StationRecord>> {
    let mut records = Vec::new();
    let mut offset = 0;

    while frame.len() - offset >= MIN_RECORD_SIZE {
        let rest = &frame[offset..];
        let declared = read_u16(rest, LEN_OFFSET) as usize;

        if declared < MIN_RECORD_SIZE {
            return Err(Error::Decode(format!(
                "station record at offset {offset} declares {declared} bytes, minimum is {MIN_RECORD_SIZE}"
            )));
        }
        if declared > rest.len() {
            return Err(Error::Decode(format!(
                "station record at offset {offset} declares {declared} bytes, only {} remain",
                rest.len()
            )));
        }

        records.push(parse_record(&rest[..declared]));
        offset += declared;
    }

    if offset < frame.len() {
        trace!(
            tail = frame.len() - offset,
            "ignoring station table tail shorter than one record"
        );
    }

    Ok(records)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build one station record of `len` bytes.
    pub(crate) fn record(len: u16, mac_last: u8, rssi: u8, rates: &[u8], txrate: u8) -> Vec<u8> {
        let mut buf = vec![0u8; len as usize];
        buf[LEN_OFFSET..LEN_OFFSET + 2].copy_from_slice(&len.to_ne_bytes());
        buf[RSSI_OFFSET] = rssi;
        buf[MAC_OFFSET..MAC_OFFSET + 6].copy_from_slice(&[0x00, 0x15, 0x6D, 0x00, 0x00, mac_last]);
        buf[NRATES_OFFSET] = rates.len() as u8;
        buf[RATES_OFFSET..RATES_OFFSET + rates.len()].copy_from_slice(rates);
        buf[TXRATE_OFFSET] = txrate;
        buf
    }

    #[test]
    fn empty_frame_decodes_to_no_stations() {
        assert!(decode_stations(&[]).unwrap().is_empty());
    }

    #[test]
    fn single_record() {
        let frame = record(120, 1, 40, &[0x82, 0x84, 0x8B, 0x96], 3);
        let records = decode_stations(&frame).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.mac, MacAddr([0x00, 0x15, 0x6D, 0x00, 0x00, 1]));
        assert_eq!(r.rssi, 40);
        assert_eq!(r.nrates, 4);
        assert_eq!(r.active_rate(), 0x16);
        assert_eq!(r.record_len, 120);
    }

    #[test]
    fn advances_by_declared_length() {
        // First record carries 16 bytes of trailing IE data.
        let mut frame = record(136, 1, 10, &[0x0C], 0);
        frame.extend(record(120, 2, 20, &[0x18], 0));
        let records = decode_stations(&frame).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].record_len, 136);
        assert_eq!(records[1].mac.octets()[5], 2);
        assert_eq!(records[1].rssi, 20);
    }

    #[test]
    fn final_record_overrunning_buffer_fails() {
        let mut frame = record(120, 1, 10, &[0x0C], 0);
        let mut second = record(120, 2, 20, &[0x18], 0);
        // Claim more bytes than the frame holds.
        second[..2].copy_from_slice(&200u16.to_ne_bytes());
        frame.extend(second);
        let err = decode_stations(&frame).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn declared_length_below_minimum_fails() {
        let mut frame = record(120, 1, 10, &[0x0C], 0);
        frame[..2].copy_from_slice(&0u16.to_ne_bytes());
        assert!(matches!(decode_stations(&frame), Err(Error::Decode(_))));
    }

    #[test]
    fn short_tail_is_ignored() {
        let mut frame = record(120, 1, 10, &[0x0C], 0);
        frame.extend([0xAAu8; 40]);
        let records = decode_stations(&frame).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn frame_shorter_than_one_record_yields_nothing() {
        assert!(decode_stations(&[0x78, 0x00, 0x01]).unwrap().is_empty());
    }

    #[test]
    fn active_rate_out_of_table_is_zero() {
        let frame = record(120, 1, 10, &[0x0C], 200);
        let records = decode_stations(&frame).unwrap();
        assert_eq!(records[0].active_rate(), 0);
    }

    #[test]
    fn qualifying_requires_positive_rssi() {
        let frame = record(120, 1, 0, &[], 0);
        let records = decode_stations(&frame).unwrap();
        assert!(!records[0].is_qualifying());
    }
}
