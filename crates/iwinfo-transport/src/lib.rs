//! Control channel implementations for iwinfo.
//!
//! This crate provides the concrete [`ControlChannel`](iwinfo_core::ControlChannel)
//! used against real hardware:
//!
//! - [`IoctlChannel`]: wireless-extensions and driver-private `ioctl(2)`
//!   requests over a lazily opened `AF_INET` datagram socket
//!
//! # Example
//!
//! ```no_run
//! use iwinfo_core::{ControlChannel, InterfaceName};
//! use iwinfo_transport::IoctlChannel;
//!
//! # fn example() -> iwinfo_core::Result<()> {
//! const SIOCGIWMODE: u32 = 0x8B07;
//!
//! let channel = IoctlChannel::new();
//! let ath0 = InterfaceName::new("ath0")?;
//! let mode = channel.request(&ath0, SIOCGIWMODE, None)?.value_u32();
//! println!("mode {mode}");
//! # Ok(())
//! # }
//! ```

pub mod ioctl;

pub use ioctl::IoctlChannel;
