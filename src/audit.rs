// SPDX-License-Identifier: PMPL-1.0-or-later
//! External audit collaborator.
//!
//! A second opinion from an outside engine (axe-core, pa11y, ...) reported
//! next to the built-in rules. Its output is opaque JSON and is never merged
//! into the rule violations. Any failure, including a timeout, is captured in
//! [`AuditOutcome::Failed`] instead of propagating.

use crate::document::Document;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// An engine that audits a whole document
///
/// Documents borrow a non-thread-safe tree, so audit futures are not `Send`.
#[async_trait(?Send)]
pub trait AuditEngine {
    /// Engine name used in outcomes and logs
    fn name(&self) -> &str;

    /// Audit the document, returning the engine's findings as JSON
    async fn audit(&self, document: &Document) -> Result<serde_json::Value>;
}

/// Result of one audit run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AuditOutcome {
    Completed {
        engine: String,
        violations: serde_json::Value,
    },
    Failed {
        engine: String,
        error: String,
    },
}

impl AuditOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, AuditOutcome::Completed { .. })
    }

    pub fn engine(&self) -> &str {
        match self {
            AuditOutcome::Completed { engine, .. } | AuditOutcome::Failed { engine, .. } => engine,
        }
    }
}

/// Run an engine under a deadline
pub async fn run_audit(
    engine: &dyn AuditEngine,
    document: &Document,
    timeout: Duration,
) -> AuditOutcome {
    let name = engine.name().to_string();
    info!("Running audit engine {} (timeout: {}s)", name, timeout.as_secs());

    let result = match tokio::time::timeout(timeout, engine.audit(document)).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout {
            engine: name.clone(),
            secs: timeout.as_secs(),
        }),
    };

    match result {
        Ok(violations) => {
            debug!("Audit engine {} completed", name);
            AuditOutcome::Completed {
                engine: name,
                violations,
            }
        }
        Err(e) => {
            warn!("Audit engine {} failed: {}", name, e);
            AuditOutcome::Failed {
                engine: name,
                error: e.to_string(),
            }
        }
    }
}

/// Audit engine backed by an external command
///
/// The re-serialized document is written to the command's stdin and its
/// stdout is parsed as JSON. An object with a `violations` key is unwrapped
/// to that value. The child is killed if the audit is dropped, which is what
/// happens when [`run_audit`] times out.
#[derive(Debug, Clone)]
pub struct CommandAuditEngine {
    program: String,
    args: Vec<String>,
}

impl CommandAuditEngine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from a `[program, args...]` list such as `audit.command`
    pub fn from_command_line(command: &[String]) -> Result<Self> {
        match command.split_first() {
            Some((program, args)) => Ok(Self::new(program.clone(), args.to_vec())),
            None => Err(Error::Config("audit command is empty".to_string())),
        }
    }
}

#[async_trait(?Send)]
impl AuditEngine for CommandAuditEngine {
    fn name(&self) -> &str {
        &self.program
    }

    async fn audit(&self, document: &Document) -> Result<serde_json::Value> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Audit(format!("Failed to spawn {}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(document.to_html().as_bytes())
                .await
                .map_err(|e| {
                    Error::Audit(format!("Failed to write to {} stdin: {}", self.program, e))
                })?;
            stdin.shutdown().await.ok();
        }

        let output = child.wait_with_output().await?;
        debug!(
            "{} finished: exit={:?}, stdout={}B, stderr={}B",
            self.program,
            output.status.code(),
            output.stdout.len(),
            output.stderr.len()
        );

        if !output.status.success() {
            return Err(Error::Audit(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        Ok(unwrap_violations(value))
    }
}

fn unwrap_violations(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(mut map) if map.contains_key("violations") => {
            map.remove("violations").unwrap_or_default()
        }
        other => other,
    }
}
