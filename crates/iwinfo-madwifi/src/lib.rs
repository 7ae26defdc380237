//! madwifi driver backend for iwinfo.
//!
//! This crate implements the [`Backend`](iwinfo_core::Backend) trait for the
//! madwifi driver family (Atheros chipsets, `wifiN` radios with `athN`
//! virtual interfaces). It provides:
//!
//! - **Command builders** ([`commands`]) -- construct wireless-extensions and
//!   driver-private requests and map vendor constants.
//! - **Table decoders** ([`station`], [`chaninfo`]) -- bounds-checked decoding
//!   of the packed station table and channel table replies.
//! - **Statistics** ([`stats`]) -- bitrate, signal and quality averages over
//!   associated stations, and the association list.
//! - **Encryption** ([`encryption`]) -- the security profile assembled from
//!   six independent driver queries.
//! - **Classification** ([`classify`]) -- radio vs. virtual interface via
//!   proc-fs side channels.
//! - **Countries** ([`country`]) -- the static regulatory-domain table.
//! - **Provisioning** ([`provision`], [`lifecycle`]) -- temporary virtual
//!   interfaces for radio-level queries.
//! - **Backend** ([`backend`]) and **Builder** ([`builder`]) -- the
//!   [`MadwifiBackend`] and its fluent constructor.
//!
//! # Example
//!
//! ```
//! use iwinfo_madwifi::commands::{cmd_get_param, Param, IEEE80211_IOCTL_GETPARAM};
//! use iwinfo_madwifi::country::lookup_by_regulatory_code;
//!
//! // Build a "read WPA version" request
//! let cmd = cmd_get_param(Param::Wpa);
//! assert_eq!(cmd.opcode, IEEE80211_IOCTL_GETPARAM);
//!
//! // Map a driver regulatory code to its country
//! assert_eq!(lookup_by_regulatory_code(276).unwrap().to_string(), "DE");
//! ```

pub mod backend;
pub mod builder;
pub mod chaninfo;
pub mod classify;
pub mod commands;
pub mod country;
pub mod encryption;
pub mod lifecycle;
pub mod provision;
pub mod station;
pub mod stats;

// Re-export the primary types for ergonomic `use iwinfo_madwifi::*`.
pub use backend::MadwifiBackend;
pub use builder::MadwifiBuilder;
pub use classify::{DeviceClassifier, DeviceKind};
pub use lifecycle::WlanconfigLifecycle;
pub use provision::TemporaryInterfaces;
