//! Read-only access to the Open vSwitch configuration database.

use async_trait::async_trait;
use tracing::instrument;

use crate::error::CfgMgrResult;
use crate::shell::{self, OVS_VSCTL_CMD};

/// Default `--timeout` (seconds) passed to `ovs-vsctl`.
pub const DEFAULT_OVS_TIMEOUT_SECS: u32 = 15;

/// Request/response access to a single OVSDB column.
///
/// Failures are recoverable: a missing record or column is reported as an
/// error and callers decide what a safe default is.
#[async_trait]
pub trait OvsDb: Send + Sync {
    /// Returns the raw textual value of `table`/`record`/`column`.
    async fn get(&self, table: &str, record: &str, column: &str) -> CfgMgrResult<String>;
}

/// [`OvsDb`] backed by the `ovs-vsctl` command line client.
#[derive(Debug, Clone)]
pub struct OvsVsctl {
    program: String,
    timeout_secs: u32,
}

impl OvsVsctl {
    /// Creates a client using the default binary and timeout.
    pub fn new() -> Self {
        Self {
            program: OVS_VSCTL_CMD.to_string(),
            timeout_secs: DEFAULT_OVS_TIMEOUT_SECS,
        }
    }

    /// Overrides the `ovs-vsctl` binary path.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Overrides the database timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u32) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Builds the argument list for a `get` query.
    pub fn get_args(&self, table: &str, record: &str, column: &str) -> Vec<String> {
        vec![
            format!("--timeout={}", self.timeout_secs),
            "get".to_string(),
            table.to_string(),
            record.to_string(),
            column.to_string(),
        ]
    }
}

impl Default for OvsVsctl {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OvsDb for OvsVsctl {
    #[instrument(skip(self))]
    async fn get(&self, table: &str, record: &str, column: &str) -> CfgMgrResult<String> {
        let args = self.get_args(table, record, column);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        shell::run_or_fail(&self.program, &args).await
    }
}
