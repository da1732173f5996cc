//! Temporary host filesystem and a scripted OVS database

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use sriov_cfgmgr_common::{CfgMgrError, CfgMgrResult, OvsDb};
use switchdevmgrd::{ConfigPersister, PfSkipClassifier, SriovNetworkNodeState, SwitchdevMgr};
use tempfile::TempDir;

/// A throwaway `/host/etc` for one test
pub struct HostTestEnv {
    dir: TempDir,
}

impl HostTestEnv {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Path of the switchdev config inside the environment
    pub fn conf_path(&self) -> PathBuf {
        self.dir.path().join("sriov_config.json")
    }

    /// Path of the node state file inside the environment
    pub fn node_state_path(&self) -> PathBuf {
        self.dir.path().join("node-state.json")
    }

    /// Dump `state` as the daemon would find it on disk
    pub fn write_node_state(&self, state: &SriovNetworkNodeState) -> std::io::Result<PathBuf> {
        let path = self.node_state_path();
        let content = serde_json::to_vec_pretty(state)?;
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Overwrite the switchdev config behind the manager's back
    pub fn write_conf(&self, content: &[u8]) -> std::io::Result<()> {
        std::fs::write(self.conf_path(), content)
    }

    pub fn persister(&self) -> ConfigPersister {
        ConfigPersister::new(self.conf_path())
    }

    /// Manager writing into this environment
    pub fn manager<C>(&self, classifier: C, ovs: ScriptedOvs) -> SwitchdevMgr
    where
        C: PfSkipClassifier + 'static,
    {
        SwitchdevMgr::new(self.persister(), Box::new(classifier), Box::new(ovs))
    }
}

/// OVS database answering `get` with a fixed value, or failing
#[derive(Debug)]
pub struct ScriptedOvs {
    value: Option<String>,
    queries: AtomicUsize,
}

impl ScriptedOvs {
    /// `hw-offload` set to `value`
    pub fn with_value(value: &str) -> Self {
        Self {
            value: Some(value.to_string()),
            queries: AtomicUsize::new(0),
        }
    }

    /// Record not created yet, every query fails
    pub fn unconfigured() -> Self {
        Self {
            value: None,
            queries: AtomicUsize::new(0),
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OvsDb for ScriptedOvs {
    async fn get(&self, table: &str, record: &str, column: &str) -> CfgMgrResult<String> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.value.clone().ok_or_else(|| CfgMgrError::ShellCommandFailed {
            command: format!("ovs-vsctl get {} {} {}", table, record, column),
            exit_code: 1,
            output: format!("ovs-vsctl: no key \"hw-offload\" in {} record \"{}\"", table, record),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_ovs_answers() {
        let ovs = ScriptedOvs::with_value("\"true\"");
        assert_eq!(
            ovs.get("Open_vSwitch", ".", "other_config:hw-offload")
                .await
                .unwrap(),
            "\"true\""
        );
        assert_eq!(ovs.query_count(), 1);
    }

    #[tokio::test]
    async fn test_unconfigured_ovs_fails_every_query() {
        let ovs = ScriptedOvs::unconfigured();
        for _ in 0..2 {
            let err = ovs
                .get("Open_vSwitch", ".", "other_config:hw-offload")
                .await
                .unwrap_err();
            assert!(err.is_external_query());
        }
        assert_eq!(ovs.query_count(), 2);
    }
}
