//! Error types for iwinfo.
//!
//! All fallible operations across the library return [`Result<T>`], which
//! uses [`Error`] as the error type. Control-channel failures, missing
//! devices, malformed driver buffers, and interface provisioning failures are
//! all captured here.

/// The error type for all iwinfo operations.
///
/// Partial data is deliberately absent from this list: backends that can
/// return a partially populated result (encryption introspection) do so
/// through `Ok` with zero-valued fields.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A control-channel request failed (socket creation or `ioctl(2)`).
    #[error("transport error: {0}")]
    Transport(String),

    /// No matching device, parent interface, country, or channel.
    #[error("not found: {0}")]
    NotFound(String),

    /// A driver buffer was malformed or truncated.
    #[error("decode error: {0}")]
    Decode(String),

    /// An interface lifecycle step (create, up, down, destroy) failed.
    ///
    /// The remaining steps of that provisioning attempt are skipped.
    #[error("provisioning error: {0}")]
    Provisioning(String),

    /// The requested operation is not supported by this backend.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// An invalid parameter was passed (e.g. an over-long interface name).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;
