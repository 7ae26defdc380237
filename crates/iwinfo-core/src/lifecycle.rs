//! Interface lifecycle capability.
//!
//! Some radio-level data is only exposed per virtual interface. Backends that
//! need one temporarily go through an [`InterfaceLifecycleProvider`] instead
//! of invoking system tools directly, which keeps provisioning policy
//! testable without privileges.

use std::fmt;

use crate::error::Result;
use crate::types::InterfaceName;

/// Role of a virtual interface created on a physical radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VifMode {
    /// Access point.
    AccessPoint,
    /// Managed station.
    Station,
}

impl VifMode {
    /// Short keyword used by driver tooling (`ap`, `sta`).
    pub fn keyword(&self) -> &'static str {
        match self {
            VifMode::AccessPoint => "ap",
            VifMode::Station => "sta",
        }
    }
}

impl fmt::Display for VifMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Privileged executor for virtual interface lifecycle steps.
///
/// Every step blocks until it completes. A failed step returns
/// [`Error::Provisioning`](crate::Error::Provisioning).
pub trait InterfaceLifecycleProvider: Send + Sync {
    /// Create virtual interface `name` on `radio` in `mode`.
    fn create(&self, name: &InterfaceName, radio: &InterfaceName, mode: VifMode) -> Result<()>;

    /// Bring `name` administratively up.
    fn set_up(&self, name: &InterfaceName) -> Result<()>;

    /// Bring `name` administratively down.
    fn set_down(&self, name: &InterfaceName) -> Result<()>;

    /// Destroy virtual interface `name`.
    fn destroy(&self, name: &InterfaceName) -> Result<()>;
}
