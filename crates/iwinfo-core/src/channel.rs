//! Control channel trait for driver queries.
//!
//! The [`ControlChannel`] trait abstracts the privileged request/response
//! interface a wireless driver exposes (`ioctl(2)` on Linux). Backends encode
//! requests as an opcode plus an optional payload and decode the returned
//! [`Response`]; they never touch the socket themselves, so the same backend
//! code runs against the real driver (`iwinfo-transport`) or a
//! `MockChannel` from the `iwinfo-test-harness` crate.
//!
//! # Request shape
//!
//! A request mirrors the kernel's `struct iwreq`: a 16-byte interface name
//! followed by a 16-byte union. Payloads shorter than [`IFNAMSIZ`] are copied
//! inline into the union; longer payloads are passed by reference with an
//! explicit length and the driver fills them in place.

use bytes::Bytes;

use crate::error::Result;
use crate::types::InterfaceName;

/// Width of the interface-name field, and the inline payload threshold.
pub const IFNAMSIZ: usize = 16;

/// Size of the request union returned in [`Response::header`].
pub const UNION_SIZE: usize = 16;

/// Synchronous request/response transport to a wireless driver.
///
/// One attempt per call: implementations must not retry and must report a
/// failed request immediately as [`Error::Transport`](crate::Error::Transport).
pub trait ControlChannel: Send + Sync {
    /// Issue `opcode` against `ifname`.
    ///
    /// `payload` is the request data. When it is at least [`IFNAMSIZ`] bytes
    /// long it doubles as the output buffer and the driver's reply is returned
    /// in [`Response::data`], truncated to the length the driver reported.
    fn request(
        &self,
        ifname: &InterfaceName,
        opcode: u32,
        payload: Option<&[u8]>,
    ) -> Result<Response>;
}

/// A driver reply: the request union as the driver left it, plus any
/// by-reference buffer contents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Response {
    header: [u8; UNION_SIZE],
    data: Bytes,
}

impl Response {
    /// Build a response from its raw parts.
    pub fn new(header: [u8; UNION_SIZE], data: impl Into<Bytes>) -> Self {
        Response {
            header,
            data: data.into(),
        }
    }

    /// A response carrying only a 32-bit value in the union (`u.mode`, `u.param`).
    pub fn from_value(value: u32) -> Self {
        let mut header = [0u8; UNION_SIZE];
        header[..4].copy_from_slice(&value.to_ne_bytes());
        Response::new(header, Bytes::new())
    }

    /// A response carrying only by-reference buffer data.
    pub fn from_data(data: impl Into<Bytes>) -> Self {
        Response::new([0u8; UNION_SIZE], data)
    }

    /// The request union after the call.
    pub fn header(&self) -> &[u8; UNION_SIZE] {
        &self.header
    }

    /// The by-reference buffer, truncated to the driver-reported length.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// The first 32 bits of the union as an unsigned value.
    pub fn value_u32(&self) -> u32 {
        u32::from_ne_bytes([self.header[0], self.header[1], self.header[2], self.header[3]])
    }

    /// The first 32 bits of the union as a signed value (`iw_freq.m`).
    pub fn value_i32(&self) -> i32 {
        self.value_u32() as i32
    }
}
