//! Mock control channel for deterministic testing of driver backends.
//!
//! [`MockChannel`] implements the [`ControlChannel`] trait with pre-loaded
//! request/reply pairs. This lets you test request construction and reply
//! decoding without a wireless card or root privileges.
//!
//! # Example
//!
//! ```
//! use iwinfo_core::{ControlChannel, InterfaceName, Response};
//! use iwinfo_test_harness::MockChannel;
//!
//! let mock = MockChannel::new();
//! // When the backend asks ath0 for its mode (SIOCGIWMODE), report ad-hoc.
//! mock.expect("ath0", 0x8B07, Response::from_value(1));
//!
//! let ath0 = InterfaceName::new("ath0").unwrap();
//! let reply = mock.request(&ath0, 0x8B07, None).unwrap();
//! assert_eq!(reply.value_u32(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use iwinfo_core::{ControlChannel, Error, InterfaceName, Response, Result};

/// What the mock does when an expectation matches.
#[derive(Debug, Clone)]
enum Reply {
    Response(Response),
    Failure,
}

/// A pre-loaded request/reply pair.
#[derive(Debug, Clone)]
struct Expectation {
    /// Interface the request must target.
    ifname: String,
    /// Opcode the request must carry.
    opcode: u32,
    /// Exact payload, or `None` to accept any payload.
    payload: Option<Vec<u8>>,
    reply: Reply,
}

/// One request observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentRequest {
    /// Target interface.
    pub ifname: String,
    /// ioctl request number.
    pub opcode: u32,
    /// Payload as sent.
    pub payload: Option<Vec<u8>>,
}

#[derive(Debug, Default)]
struct State {
    expectations: VecDeque<Expectation>,
    sent_log: Vec<SentRequest>,
}

/// A mock [`ControlChannel`] for testing backends without hardware.
///
/// Expectations are consumed in order. Each request is recorded and matched
/// against the next expectation; a mismatch or an exhausted queue is
/// reported as [`Error::Transport`].
///
/// Clones share state, so a test can hand one clone to the backend and keep
/// another to inspect what was sent.
#[derive(Debug, Clone, Default)]
pub struct MockChannel {
    state: Arc<Mutex<State>>,
}

impl MockChannel {
    /// Create an empty mock channel.
    pub fn new() -> Self {
        MockChannel::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, ifname: &str, opcode: u32, payload: Option<Vec<u8>>, reply: Reply) {
        self.lock().expectations.push_back(Expectation {
            ifname: ifname.to_string(),
            opcode,
            payload,
            reply,
        });
    }

    /// Expect `opcode` on `ifname` with any payload and reply with `response`.
    pub fn expect(&self, ifname: &str, opcode: u32, response: Response) {
        self.push(ifname, opcode, None, Reply::Response(response));
    }

    /// Expect `opcode` on `ifname` carrying exactly `payload`.
    pub fn expect_with_payload(&self, ifname: &str, opcode: u32, payload: &[u8], response: Response) {
        self.push(
            ifname,
            opcode,
            Some(payload.to_vec()),
            Reply::Response(response),
        );
    }

    /// Expect `opcode` on `ifname` and fail it as the driver would.
    pub fn expect_failure(&self, ifname: &str, opcode: u32) {
        self.push(ifname, opcode, None, Reply::Failure);
    }

    /// Every request sent through this channel, in order.
    pub fn sent_requests(&self) -> Vec<SentRequest> {
        self.lock().sent_log.clone()
    }

    /// Number of expectations not yet consumed.
    pub fn remaining_expectations(&self) -> usize {
        self.lock().expectations.len()
    }
}

impl ControlChannel for MockChannel {
    fn request(
        &self,
        ifname: &InterfaceName,
        opcode: u32,
        payload: Option<&[u8]>,
    ) -> Result<Response> {
        let mut state = self.lock();
        state.sent_log.push(SentRequest {
            ifname: ifname.to_string(),
            opcode,
            payload: payload.map(<[u8]>::to_vec),
        });

        let Some(expectation) = state.expectations.pop_front() else {
            return Err(Error::Transport(format!(
                "no more expectations in mock channel (got {opcode:#06X} on {ifname})"
            )));
        };

        if expectation.ifname != ifname.as_str() || expectation.opcode != opcode {
            return Err(Error::Transport(format!(
                "unexpected request: expected {:#06X} on {}, got {opcode:#06X} on {ifname}",
                expectation.opcode, expectation.ifname
            )));
        }
        if let Some(expected) = &expectation.payload {
            if payload != Some(expected.as_slice()) {
                return Err(Error::Transport(format!(
                    "unexpected payload for {opcode:#06X}: expected {expected:02X?}, got {payload:02X?}"
                )));
            }
        }

        match expectation.reply {
            Reply::Response(response) => Ok(response),
            Reply::Failure => Err(Error::Transport(format!(
                "ioctl {opcode:#06X} on {ifname} failed"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ath0() -> InterfaceName {
        InterfaceName::new("ath0").unwrap()
    }

    #[test]
    fn expectations_are_consumed_in_order() {
        let mock = MockChannel::new();
        mock.expect("ath0", 1, Response::from_value(10));
        mock.expect("ath0", 2, Response::from_value(20));

        assert_eq!(mock.request(&ath0(), 1, None).unwrap().value_u32(), 10);
        assert_eq!(mock.request(&ath0(), 2, None).unwrap().value_u32(), 20);
        assert_eq!(mock.remaining_expectations(), 0);
    }

    #[test]
    fn mismatched_opcode_is_an_error() {
        let mock = MockChannel::new();
        mock.expect("ath0", 1, Response::default());
        assert!(matches!(
            mock.request(&ath0(), 2, None),
            Err(Error::Transport(_))
        ));
    }

    #[test]
    fn mismatched_interface_is_an_error() {
        let mock = MockChannel::new();
        mock.expect("ath1", 1, Response::default());
        assert!(mock.request(&ath0(), 1, None).is_err());
    }

    #[test]
    fn payload_is_checked_when_given() {
        let mock = MockChannel::new();
        mock.expect_with_payload("ath0", 1, &[1, 2], Response::default());
        mock.expect_with_payload("ath0", 1, &[1, 2], Response::default());
        assert!(mock.request(&ath0(), 1, Some(&[1, 2])).is_ok());
        assert!(mock.request(&ath0(), 1, Some(&[3])).is_err());
    }

    #[test]
    fn failure_expectation() {
        let mock = MockChannel::new();
        mock.expect_failure("ath0", 7);
        assert!(matches!(
            mock.request(&ath0(), 7, None),
            Err(Error::Transport(_))
        ));
    }

    #[test]
    fn exhausted_queue_is_an_error() {
        let mock = MockChannel::new();
        assert!(mock.request(&ath0(), 1, None).is_err());
    }

    #[test]
    fn clones_share_the_sent_log() {
        let mock = MockChannel::new();
        let probe = mock.clone();
        mock.expect("ath0", 1, Response::default());
        mock.request(&ath0(), 1, Some(&[9])).unwrap();
        assert_eq!(
            probe.sent_requests(),
            vec![SentRequest {
                ifname: "ath0".into(),
                opcode: 1,
                payload: Some(vec![9]),
            }]
        );
    }
}
