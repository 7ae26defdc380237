//! iwinfo-test-harness: Test utilities, mock channels, and proc-fs fixtures
//! for iwinfo.
//!
//! This crate provides [`MockChannel`] for deterministic unit testing of
//! driver backends without real hardware, [`MockBackend`] as a canned
//! generic fallback, [`MockLifecycle`] for recording provisioning steps, and
//! [`FakeProcFs`] for building the proc-fs side channels a backend reads.

pub mod fake_procfs;
pub mod mock_backend;
pub mod mock_channel;
pub mod mock_lifecycle;

pub use fake_procfs::FakeProcFs;
pub use mock_backend::MockBackend;
pub use mock_channel::{MockChannel, SentRequest};
pub use mock_lifecycle::{LifecycleCall, LifecycleStep, MockLifecycle};
