//! Channel table decoder.
//!
//! `IEEE80211_IOCTL_GETCHANINFO` fills a `struct ieee80211req_chaninfo`: a
//! `u32` channel count followed by a fixed array of 255 channel records.
//!
//! ```text
//! ieee80211_channel (16 bytes)
//!   0  u16  ic_freq (MHz)
//!   4  u32  ic_flags
//!   8  u8   ic_ieee
//!   9  i8   ic_maxregpower
//!  10  i8   ic_maxpower
//!  11  i8   ic_minpower
//!  12  u8   ic_scanflags
//!  13  u8   ic_idletime
//! ```

use bytes::Buf;
use iwinfo_core::{Error, FrequencyEntry, Result};

/// `IEEE80211_CHAN_MAX`.
pub const CHAN_MAX: usize = 255;

/// Size of one `struct ieee80211_channel`.
pub const CHANNEL_RECORD_SIZE: usize = 16;

/// Size of `struct ieee80211req_chaninfo`.
pub const CHANINFO_SIZE: usize = 4 + CHAN_MAX * CHANNEL_RECORD_SIZE;

/// One entry of the driver's channel table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    /// Center frequency in MHz.
    pub freq: u16,
    /// Driver channel flags.
    pub flags: u32,
    /// IEEE channel number.
    pub ieee: u8,
}

impl From<Channel> for FrequencyEntry {
    fn from(c: Channel) -> Self {
        FrequencyEntry {
            channel: c.ieee,
            mhz: c.freq as u32,
        }
    }
}

/// Decode a channel table reply.
pub fn decode_chaninfo(data: &[u8]) -> Result<Vec<Channel>> {
    let mut buf = data;
    if buf.remaining() < 4 {
        return Err(Error::Decode(format!(
            "channel table reply too short: {} bytes",
            data.len()
        )));
    }
    let count = buf.get_u32_ne() as usize;
    if count > CHAN_MAX {
        return Err(Error::Decode(format!(
            "channel table claims {count} channels, maximum is {CHAN_MAX}"
        )));
    }
    if buf.remaining() < count * CHANNEL_RECORD_SIZE {
        return Err(Error::Decode(format!(
            "channel table claims {count} channels but reply holds {} bytes",
            data.len()
        )));
    }

    let mut channels = Vec::with_capacity(count);
    for _ in 0..count {
        let mut record = &buf[..CHANNEL_RECORD_SIZE];
        let freq = record.get_u16_ne();
        record.advance(2);
        let flags = record.get_u32_ne();
        let ieee = record.get_u8();
        channels.push(Channel { freq, flags, ieee });
        buf.advance(CHANNEL_RECORD_SIZE);
    }
    Ok(channels)
}

/// IEEE channel number for `mhz`, if the table has it.
pub fn channel_for_frequency(channels: &[Channel], mhz: u16) -> Option<u8> {
    channels.iter().find(|c| c.freq == mhz).map(|c| c.ieee)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use bytes::{BufMut, BytesMut};

    /// Encode a full-size channel table holding `(freq, ieee)` pairs.
    pub(crate) fn chaninfo(channels: &[(u16, u8)]) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(CHANINFO_SIZE);
        buf.put_u32_ne(channels.len() as u32);
        for &(freq, ieee) in channels {
            buf.put_u16_ne(freq);
            buf.put_u16(0);
            buf.put_u32_ne(0x00A0);
            buf.put_u8(ieee);
            buf.put_bytes(0, 7);
        }
        buf.put_bytes(0, CHANINFO_SIZE - buf.len());
        buf.to_vec()
    }

    #[test]
    fn sizes() {
        assert_eq!(CHANINFO_SIZE, 4084);
    }

    #[test]
    fn decodes_channels() {
        let data = chaninfo(&[(2412, 1), (2437, 6), (5180, 36)]);
        let chans = decode_chaninfo(&data).unwrap();
        assert_eq!(chans.len(), 3);
        assert_eq!(chans[1].freq, 2437);
        assert_eq!(chans[1].ieee, 6);
        assert_eq!(chans[1].flags, 0x00A0);
        assert_eq!(FrequencyEntry::from(chans[2]), FrequencyEntry { channel: 36, mhz: 5180 });
    }

    #[test]
    fn empty_table() {
        assert!(decode_chaninfo(&chaninfo(&[])).unwrap().is_empty());
    }

    #[test]
    fn count_beyond_maximum_fails() {
        let mut data = chaninfo(&[]);
        data[..4].copy_from_slice(&256u32.to_ne_bytes());
        assert!(matches!(decode_chaninfo(&data), Err(Error::Decode(_))));
    }

    #[test]
    fn count_beyond_reply_fails() {
        let mut data = vec![0u8; 4 + CHANNEL_RECORD_SIZE];
        data[..4].copy_from_slice(&2u32.to_ne_bytes());
        assert!(matches!(decode_chaninfo(&data), Err(Error::Decode(_))));
    }

    #[test]
    fn truncated_header_fails() {
        assert!(matches!(decode_chaninfo(&[1, 0]), Err(Error::Decode(_))));
    }

    #[test]
    fn lookup_by_frequency() {
        let chans = decode_chaninfo(&chaninfo(&[(2412, 1), (2437, 6)])).unwrap();
        assert_eq!(channel_for_frequency(&chans, 2437), Some(6));
        assert_eq!(channel_for_frequency(&chans, 2462), None);
    }
}
