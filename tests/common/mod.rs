#![allow(dead_code)]

pub mod backend;

use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

pub use backend::FakeBackend;

/// Runs the ticketdesk binary with an isolated config directory
pub struct DeskTest {
    pub temp_dir: TempDir,
    api_base: Option<String>,
}

impl DeskTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        DeskTest {
            temp_dir,
            api_base: None,
        }
    }

    /// Point every command at `backend` through the environment
    pub fn with_backend(backend: &FakeBackend) -> Self {
        let mut test = Self::new();
        test.api_base = Some(backend.base_url());
        test
    }

    pub fn config_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn run(&self, args: &[&str]) -> Output {
        let mut command = Command::new(env!("CARGO_BIN_EXE_ticketdesk"));
        command
            .args(args)
            .current_dir(self.temp_dir.path())
            .env("TICKETDESK_CONFIG_DIR", self.config_dir())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("TICKETDESK_API_BASE");
        if let Some(base) = &self.api_base {
            command.env("TICKETDESK_API_BASE", base);
        }
        command.output().expect("Failed to execute ticketdesk command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    /// Run a command with `--json` and parse its stdout
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let mut args = args.to_vec();
        args.push("--json");
        let stdout = self.run_success(&args);
        serde_json::from_str(&stdout).expect("Command did not print valid JSON")
    }

    pub fn write_config(&self, content: &str) {
        fs::write(self.config_dir().join("config.yaml"), content)
            .expect("Failed to write config file");
    }

    pub fn read_config(&self) -> Option<String> {
        fs::read_to_string(self.config_dir().join("config.yaml")).ok()
    }
}

/// RAII guard that sets an environment variable and restores it on drop.
///
/// Tests using this must be marked `#[serial]`.
pub struct EnvGuard {
    key: &'static str,
    original: Option<OsString>,
}

impl EnvGuard {
    pub fn set(key: &'static str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        let original = std::env::var_os(key);
        // SAFETY: callers are #[serial], so no other thread touches the environment
        unsafe { std::env::set_var(key, value) };
        Self { key, original }
    }

    pub fn remove(key: &'static str) -> Self {
        let original = std::env::var_os(key);
        // SAFETY: callers are #[serial], so no other thread touches the environment
        unsafe { std::env::remove_var(key) };
        Self { key, original }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: see EnvGuard::set
        match &self.original {
            Some(value) => unsafe { std::env::set_var(self.key, value) },
            None => unsafe { std::env::remove_var(self.key) },
        }
    }
}
