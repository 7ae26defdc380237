//! Lifecycle provider backed by `wlanconfig` and `ifconfig`.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use iwinfo_core::{Error, InterfaceLifecycleProvider, InterfaceName, Result, VifMode};
use tracing::debug;

/// Creates and destroys madwifi virtual interfaces with the driver's
/// `wlanconfig` tool and toggles link state with `ifconfig`.
///
/// Each step runs one child process and blocks until it exits.
#[derive(Debug, Clone)]
pub struct WlanconfigLifecycle {
    wlanconfig: PathBuf,
    ifconfig: PathBuf,
}

impl Default for WlanconfigLifecycle {
    fn default() -> Self {
        WlanconfigLifecycle::new()
    }
}

impl WlanconfigLifecycle {
    /// Use `wlanconfig` and `ifconfig` from `PATH`.
    pub fn new() -> Self {
        WlanconfigLifecycle::with_programs("wlanconfig", "ifconfig")
    }

    /// Use explicit program paths.
    pub fn with_programs(wlanconfig: impl Into<PathBuf>, ifconfig: impl Into<PathBuf>) -> Self {
        WlanconfigLifecycle {
            wlanconfig: wlanconfig.into(),
            ifconfig: ifconfig.into(),
        }
    }

    fn run<I, S>(&self, program: &Path, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null()).stdout(Stdio::null());
        debug!(command = ?cmd, "running lifecycle command");

        let output = cmd
            .output()
            .map_err(|e| Error::Provisioning(format!("{}: {e}", program.display())))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Provisioning(format!(
                "{} exited with {}: {}",
                program.display(),
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Arguments for `wlanconfig` to create `name` on `radio`.
pub fn create_args(name: &InterfaceName, radio: &InterfaceName, mode: VifMode) -> Vec<String> {
    vec![
        name.to_string(),
        "create".into(),
        "nounit".into(),
        "wlandev".into(),
        radio.to_string(),
        "wlanmode".into(),
        mode.keyword().into(),
    ]
}

impl InterfaceLifecycleProvider for WlanconfigLifecycle {
    fn create(&self, name: &InterfaceName, radio: &InterfaceName, mode: VifMode) -> Result<()> {
        self.run(&self.wlanconfig, create_args(name, radio, mode))
    }

    fn set_up(&self, name: &InterfaceName) -> Result<()> {
        self.run(&self.ifconfig, [name.as_str(), "up"])
    }

    fn set_down(&self, name: &InterfaceName) -> Result<()> {
        self.run(&self.ifconfig, [name.as_str(), "down"])
    }

    fn destroy(&self, name: &InterfaceName) -> Result<()> {
        self.run(&self.wlanconfig, [name.as_str(), "destroy"])
    }
}
