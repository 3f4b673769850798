//! Tool availability checks
//!
//! Packs may name external tools their components need. Only tools on
//! [`ALLOWED_TOOLS`] are ever probed; anything else is refused before a
//! process is spawned. A probe resolves the tool on `PATH` and runs
//! `<tool> --version`, giving up after [`PROBE_TIMEOUT`].

use std::collections::HashMap;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{ModepackError, Result};

/// How long a `--version` probe may run
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Tools that may be probed
pub const ALLOWED_TOOLS: &[&str] = &[
    "bun", "cargo", "composer", "deno", "docker", "dotnet", "gem", "gh", "git", "go", "gradle",
    "java", "kubectl", "make", "mvn", "node", "npm", "npx", "php", "pip", "pip3", "pnpm",
    "python", "python3", "ruby", "rustc", "terraform", "uv", "yarn",
];

pub fn is_allowed(tool: &str) -> bool {
    ALLOWED_TOOLS.contains(&tool)
}

/// Answers whether a tool can be run
pub trait ToolProbe: std::fmt::Debug {
    fn is_available(&self, tool: &str) -> bool;
}

/// Probe that runs the tool
#[derive(Debug, Clone, Copy)]
pub struct SystemProbe {
    timeout: Duration,
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self {
            timeout: PROBE_TIMEOUT,
        }
    }
}

impl ToolProbe for SystemProbe {
    fn is_available(&self, tool: &str) -> bool {
        let Ok(path) = which::which(tool) else {
            tracing::debug!("{} not found on PATH", tool);
            return false;
        };

        let mut child = match Command::new(&path)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                tracing::debug!("Cannot run {}: {}", path.display(), e);
                return false;
            }
        };

        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return status.success(),
                Ok(None) if Instant::now() >= deadline => {
                    tracing::warn!("{} --version timed out; treating as unavailable", tool);
                    let _ = child.kill();
                    let _ = child.wait();
                    return false;
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    tracing::debug!("Waiting for {} failed: {}", tool, e);
                    return false;
                }
            }
        }
    }
}

/// Allow-list enforcement plus a per-run cache of probe results
#[derive(Debug)]
pub struct ToolChecker {
    probe: Box<dyn ToolProbe>,
    cache: HashMap<String, bool>,
}

impl ToolChecker {
    pub fn new(probe: Box<dyn ToolProbe>) -> Self {
        Self {
            probe,
            cache: HashMap::new(),
        }
    }

    pub fn system() -> Self {
        Self::new(Box::new(SystemProbe::default()))
    }

    /// Refuse tools outside the allow-list without running anything
    pub fn ensure_allowed(tool: &str) -> Result<()> {
        if is_allowed(tool) {
            Ok(())
        } else {
            Err(ModepackError::CommandNotAllowed {
                command: tool.to_string(),
            })
        }
    }

    pub fn is_available(&mut self, tool: &str) -> Result<bool> {
        Self::ensure_allowed(tool)?;
        if let Some(available) = self.cache.get(tool) {
            return Ok(*available);
        }
        let available = self.probe.is_available(tool);
        self.cache.insert(tool.to_string(), available);
        Ok(available)
    }

    /// Tools from `tools` that are not available
    pub fn missing<'a>(&mut self, tools: &'a [String]) -> Result<Vec<&'a str>> {
        let mut missing = Vec::new();
        for tool in tools {
            if !self.is_available(tool)? {
                missing.push(tool.as_str());
            }
        }
        Ok(missing)
    }
}
