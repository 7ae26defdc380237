//! # iwinfo -- Vendor-neutral Wireless Information
//!
//! `iwinfo` reads wireless radio state (mode, channel, signal, associated
//! stations, security settings, regulatory domain, scan results) from
//! Linux wireless drivers and normalizes it into one schema, whatever driver
//! family sits underneath.
//!
//! ## Quick Start
//!
//! ```no_run
//! use iwinfo::{Backend, InterfaceName};
//! use iwinfo::madwifi::MadwifiBuilder;
//!
//! fn main() -> anyhow::Result<()> {
//! # let wext: Box<dyn Backend> = todo!();
//!     let backend = MadwifiBuilder::new().fallback(wext).build()?;
//!
//!     let ath0 = InterfaceName::new("ath0")?;
//!     println!("channel {}", backend.get_channel(&ath0)?);
//!     println!("signal {} dBm", backend.get_signal(&ath0)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized as a workspace of focused crates:
//!
//! | Crate                 | Purpose                                          |
//! |-----------------------|--------------------------------------------------|
//! | `iwinfo-core`         | Traits ([`Backend`], [`ControlChannel`]), types, wire layouts, errors |
//! | `iwinfo-transport`    | `ioctl(2)` control channel                       |
//! | `iwinfo-madwifi`      | madwifi driver backend                           |
//! | **`iwinfo`**          | This facade crate -- re-exports everything       |
//!
//! All driver backends implement the [`Backend`] trait, so application code
//! can work with `dyn Backend` and pick one per interface with
//! [`find_backend`].
//!
//! ## Feature Flags
//!
//! | Feature   | Enables                          | Default |
//! |-----------|----------------------------------|---------|
//! | `madwifi` | [`madwifi`] module               | yes     |
//! | `full`    | All driver backends              | no      |

pub use iwinfo_core::*;

/// Control channel implementations.
pub mod transport {
    pub use iwinfo_transport::*;
}

/// madwifi driver backend.
///
/// Provides [`MadwifiBackend`](madwifi::MadwifiBackend) and
/// [`MadwifiBuilder`](madwifi::MadwifiBuilder) for Atheros radios driven by
/// madwifi, including temporary interface provisioning for radio-level
/// queries.
#[cfg(feature = "madwifi")]
pub mod madwifi {
    pub use iwinfo_madwifi::*;
}

/// The first backend in `backends` that claims `ifname`.
///
/// Backends are probed in order, so list the most specific driver families
/// first and generic ones last.
///
/// # Example
///
/// ```
/// use iwinfo::{Backend, InterfaceName, find_backend};
///
/// let backends: Vec<Box<dyn Backend>> = Vec::new();
/// let eth0 = InterfaceName::new("eth0").unwrap();
/// assert!(find_backend(&backends, &eth0).is_none());
/// ```
pub fn find_backend<'a>(
    backends: &'a [Box<dyn Backend>],
    ifname: &InterfaceName,
) -> Option<&'a dyn Backend> {
    backends
        .iter()
        .find(|b| b.probe(ifname))
        .map(|b| b.as_ref())
}
