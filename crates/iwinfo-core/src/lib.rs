//! iwinfo-core: Core traits, types, and error definitions for iwinfo.
//!
//! This crate defines the vendor-neutral abstractions that all iwinfo
//! backends implement. The aggregation library and its tools depend on these
//! types without pulling in any specific driver backend.
//!
//! # Key types
//!
//! - [`Backend`] -- the unified query trait for any driver family
//! - [`ControlChannel`] -- request/response channel to a driver
//! - [`InterfaceLifecycleProvider`] -- create/up/down/destroy of virtual interfaces
//! - [`WireRecord`] -- packed record layouts handed to the consumer
//! - [`Error`] / [`Result`] -- error handling

pub mod backend;
pub mod channel;
pub mod crypto;
pub mod error;
pub mod lifecycle;
pub mod types;
pub mod wire;

// Re-export key types at crate root for ergonomic `use iwinfo_core::*`.
pub use backend::Backend;
pub use channel::{ControlChannel, IFNAMSIZ, Response};
pub use crypto::{AuthAlgorithms, AuthSuite, CipherSet, EncryptionProfile};
pub use error::{Error, Result};
pub use lifecycle::{InterfaceLifecycleProvider, VifMode};
pub use types::*;
pub use wire::{WireRecord, encode_list};
