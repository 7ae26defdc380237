//! `ioctl(2)` control channel.
//!
//! [`IoctlChannel`] owns one `AF_INET`/`SOCK_DGRAM` socket used purely as an
//! ioctl handle. The socket is opened on the first request and kept until
//! [`close()`](IoctlChannel::close) or drop; it is created with
//! `SOCK_CLOEXEC` so programs launched later (interface provisioning tools)
//! do not inherit it. Access is serialized by a mutex.
//!
//! Each request builds a `struct iwreq`: the interface name, then a 16-byte
//! union. Payloads shorter than `IFNAMSIZ` are copied inline into the union;
//! longer ones are passed as an `iw_point` (pointer + length) and the driver
//! writes its reply into the same buffer.

use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::sync::{Mutex, MutexGuard};

use iwinfo_core::channel::UNION_SIZE;
use iwinfo_core::error::{Error, Result};
use iwinfo_core::{ControlChannel, IFNAMSIZ, InterfaceName, Response};
use tracing::{debug, trace};

/// `struct iw_point`.
#[repr(C)]
#[derive(Clone, Copy)]
struct IwPoint {
    pointer: *mut libc::c_void,
    length: u16,
    flags: u16,
}

/// `union iwreq_data`, reduced to the members this channel touches.
#[repr(C)]
union IwReqData {
    name: [u8; UNION_SIZE],
    data: IwPoint,
}

/// `struct iwreq`.
#[repr(C)]
struct IwReq {
    ifr_name: [u8; IFNAMSIZ],
    u: IwReqData,
}

const _: () = assert!(std::mem::size_of::<IwReqData>() == UNION_SIZE);

/// Control channel backed by a kernel socket.
#[derive(Debug, Default)]
pub struct IoctlChannel {
    socket: Mutex<Option<OwnedFd>>,
}

impl IoctlChannel {
    /// Create a channel; the socket is opened on first use.
    pub fn new() -> Self {
        IoctlChannel {
            socket: Mutex::new(None),
        }
    }

    /// Create a channel and open its socket immediately.
    pub fn open() -> Result<Self> {
        let channel = IoctlChannel::new();
        {
            let mut guard = channel.lock();
            *guard = Some(open_socket()?);
        }
        Ok(channel)
    }

    /// Whether the socket is currently open.
    pub fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    /// Close the socket. The next request reopens it.
    pub fn close(&self) {
        if self.lock().take().is_some() {
            debug!("ioctl socket closed");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<OwnedFd>> {
        // A panic while holding the lock cannot leave the fd half-written.
        self.socket.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn open_socket() -> Result<OwnedFd> {
    // SAFETY: plain socket(2) call; the returned fd is checked before use.
    let fd = unsafe { libc::socket(libc::AF_INET, libc::SOCK_DGRAM | libc::SOCK_CLOEXEC, 0) };
    if fd < 0 {
        return Err(Error::Transport(format!(
            "cannot open ioctl socket: {}",
            io::Error::last_os_error()
        )));
    }
    debug!(fd, "ioctl socket opened");
    // SAFETY: fd is a freshly created descriptor owned by nobody else.
    Ok(unsafe { OwnedFd::from_raw_fd(fd) })
}

/// Marshal `ifname` and `payload` into an `iwreq`.
///
/// The returned buffer is `Some` exactly when the payload travels by
/// reference; the request's `iw_point` targets its heap storage, so it must
/// stay alive until the ioctl returns.
fn build_iwreq(
    ifname: &InterfaceName,
    payload: Option<&[u8]>,
) -> Result<(IwReq, Option<Vec<u8>>)> {
    let mut req = IwReq {
        ifr_name: [0; IFNAMSIZ],
        u: IwReqData {
            name: [0; UNION_SIZE],
        },
    };
    req.ifr_name[..ifname.len()].copy_from_slice(ifname.as_bytes());

    let mut buffer: Option<Vec<u8>> = None;
    match payload {
        Some(data) if data.len() < IFNAMSIZ => {
            let mut inline = [0u8; UNION_SIZE];
            inline[..data.len()].copy_from_slice(data);
            req.u = IwReqData { name: inline };
        }
        Some(data) => {
            let length = u16::try_from(data.len()).map_err(|_| {
                Error::InvalidParameter(format!(
                    "ioctl payload of {} bytes exceeds u16 length field",
                    data.len()
                ))
            })?;
            let buf = buffer.insert(data.to_vec());
            req.u = IwReqData {
                data: IwPoint {
                    pointer: buf.as_mut_ptr().cast(),
                    length,
                    flags: 0,
                },
            };
        }
        None => {}
    }
    Ok((req, buffer))
}

impl ControlChannel for IoctlChannel {
    fn request(
        &self,
        ifname: &InterfaceName,
        opcode: u32,
        payload: Option<&[u8]>,
    ) -> Result<Response> {
        let (mut req, buffer) = build_iwreq(ifname, payload)?;

        let mut guard = self.lock();
        if guard.is_none() {
            *guard = Some(open_socket()?);
        }
        let fd = guard.as_ref().map_or(-1, |s| s.as_raw_fd());

        trace!(ifname = %ifname, opcode, "ioctl");
        // SAFETY: `req` is a valid iwreq; any by-reference pointer targets
        // `buffer`, which outlives the call and whose length is in `req`.
        let rc = unsafe { libc::ioctl(fd, opcode as _, &mut req as *mut IwReq) };
        drop(guard);

        if rc < 0 {
            return Err(Error::Transport(format!(
                "ioctl {opcode:#06x} on {ifname} failed: {}",
                io::Error::last_os_error()
            )));
        }

        // SAFETY: the union was fully initialized as `name` before the call
        // and every member is plain data.
        let header = unsafe { req.u.name };
        let data = match buffer {
            Some(mut buf) => {
                // SAFETY: `data` was the active member for by-reference payloads.
                let reported = unsafe { req.u.data.length } as usize;
                buf.truncate(reported.min(buf.len()));
                buf
            }
            None => Vec::new(),
        };
        Ok(Response::new(header, data))
    }
}
