//! Recording [`InterfaceLifecycleProvider`] for provisioning tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use iwinfo_core::{Error, InterfaceLifecycleProvider, InterfaceName, Result, VifMode};

/// A lifecycle step, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleStep {
    Create,
    Up,
    Down,
    Destroy,
}

/// One recorded lifecycle call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleCall {
    Create {
        name: String,
        radio: String,
        mode: VifMode,
    },
    Up(String),
    Down(String),
    Destroy(String),
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<LifecycleCall>,
    failures: HashSet<(LifecycleStep, String)>,
}

/// A lifecycle provider that records every step and succeeds unless told
/// otherwise.
///
/// Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockLifecycle {
    state: Arc<Mutex<State>>,
}

impl MockLifecycle {
    /// Create a provider where every step succeeds.
    pub fn new() -> Self {
        MockLifecycle::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make `step` fail for interface `name`. The call is still recorded.
    pub fn fail_on(&self, step: LifecycleStep, name: &str) -> &Self {
        self.lock().failures.insert((step, name.to_string()));
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<LifecycleCall> {
        self.lock().calls.clone()
    }

    fn record(&self, step: LifecycleStep, name: &InterfaceName, call: LifecycleCall) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.failures.contains(&(step, name.to_string())) {
            return Err(Error::Provisioning(format!("{step:?} {name} failed")));
        }
        Ok(())
    }
}

impl InterfaceLifecycleProvider for MockLifecycle {
    fn create(&self, name: &InterfaceName, radio: &InterfaceName, mode: VifMode) -> Result<()> {
        self.record(
            LifecycleStep::Create,
            name,
            LifecycleCall::Create {
                name: name.to_string(),
                radio: radio.to_string(),
                mode,
            },
        )
    }

    fn set_up(&self, name: &InterfaceName) -> Result<()> {
        self.record(LifecycleStep::Up, name, LifecycleCall::Up(name.to_string()))
    }

    fn set_down(&self, name: &InterfaceName) -> Result<()> {
        self.record(LifecycleStep::Down, name, LifecycleCall::Down(name.to_string()))
    }

    fn destroy(&self, name: &InterfaceName) -> Result<()> {
        self.record(
            LifecycleStep::Destroy,
            name,
            LifecycleCall::Destroy(name.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_and_injects_failures() {
        let mock = MockLifecycle::new();
        mock.fail_on(LifecycleStep::Up, "ath-scan");
        let scan = InterfaceName::new("ath-scan").unwrap();
        let wifi0 = InterfaceName::new("wifi0").unwrap();

        mock.create(&scan, &wifi0, VifMode::Station).unwrap();
        assert!(matches!(mock.set_up(&scan), Err(Error::Provisioning(_))));
        mock.destroy(&scan).unwrap();

        assert_eq!(
            mock.calls(),
            vec![
                LifecycleCall::Create {
                    name: "ath-scan".into(),
                    radio: "wifi0".into(),
                    mode: VifMode::Station,
                },
                LifecycleCall::Up("ath-scan".into()),
                LifecycleCall::Destroy("ath-scan".into()),
            ]
        );
    }
}
