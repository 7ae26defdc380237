//! Aggregate link statistics over the station table.
//!
//! Only stations with a positive RSSI contribute to the averages. The
//! association list, by contrast, reports every decoded station.

use iwinfo_core::AssocEntry;

use crate::station::StationRecord;

/// The driver reports RSSI relative to this noise floor (dBm below zero).
pub const NOISE_FLOOR_OFFSET: i32 = 95;

/// Signal returned when no station qualifies.
pub const SIGNAL_UNKNOWN: i32 = 1;

fn qualifying(records: &[StationRecord]) -> impl Iterator<Item = &StationRecord> {
    records.iter().filter(|r| r.is_qualifying())
}

/// Average transmit rate in kbit/s, or 0 with no qualifying station.
pub fn average_bitrate(records: &[StationRecord]) -> i32 {
    let (sum, count) = qualifying(records).fold((0i64, 0i64), |(sum, count), r| {
        (sum + (r.active_rate() / 2) as i64, count + 1)
    });
    if count == 0 {
        0
    } else {
        (sum * 1000 / count) as i32
    }
}

/// Average signal in dBm, or [`SIGNAL_UNKNOWN`] with no qualifying station.
pub fn average_signal(records: &[StationRecord]) -> i32 {
    let (sum, count) = qualifying(records).fold((0i64, 0i64), |(sum, count), r| {
        (sum + (r.rssi - NOISE_FLOOR_OFFSET) as i64, count + 1)
    });
    if count == 0 {
        SIGNAL_UNKNOWN
    } else {
        -(sum / count) as i32
    }
}

/// Average raw RSSI, or 0 with no qualifying station.
pub fn average_quality(records: &[StationRecord]) -> i32 {
    let (sum, count) = qualifying(records)
        .fold((0i64, 0i64), |(sum, count), r| (sum + r.rssi as i64, count + 1));
    if count == 0 { 0 } else { (sum / count) as i32 }
}

/// One association entry per decoded station, qualifying or not.
pub fn association_list(records: &[StationRecord], noise: i32) -> Vec<AssocEntry> {
    records
        .iter()
        .map(|r| AssocEntry {
            mac: r.mac,
            signal: r.rssi - NOISE_FLOOR_OFFSET,
            noise,
        })
        .collect()
}
