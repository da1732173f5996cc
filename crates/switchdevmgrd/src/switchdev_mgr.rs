//! SwitchdevMgr - reconciles node state into the switchdev config file

use std::fs;
use std::path::Path;

use sriov_cfgmgr_common::{CfgMgrError, CfgMgrResult, OvsDb};
use tracing::{debug, error, info, instrument};

use crate::mode::{is_switchdev_mode_spec, switchdev_device_exists};
use crate::offload::ovs_hw_offload_enabled;
use crate::persister::ConfigPersister;
use crate::skip::PfSkipClassifier;
use crate::synthesizer::synthesize;
use crate::types::{SriovNetworkNodeState, SwitchdevConfig};

/// Summary of one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// The config file was rewritten.
    pub updated: bool,
    /// Number of PFs in the synthesized config.
    pub interfaces: usize,
    /// Some declared PF requests switchdev mode.
    pub switchdev_requested: bool,
    /// Some observed PF is in switchdev mode.
    pub switchdev_present: bool,
    /// OVS hardware offload is enabled.
    pub hw_offload_enabled: bool,
}

/// SwitchdevMgr decides which PFs this host must configure through systemd
/// and keeps the switchdev config file in sync with them.
///
/// Flow per pass:
/// 1. Node state → skip classifier → skip set
/// 2. Spec + status + skip set → synthesized config
/// 3. Config → persister (written only when bytes differ)
pub struct SwitchdevMgr {
    persister: ConfigPersister,
    classifier: Box<dyn PfSkipClassifier>,
    ovs: Box<dyn OvsDb>,
}

impl SwitchdevMgr {
    pub fn new(
        persister: ConfigPersister,
        classifier: Box<dyn PfSkipClassifier>,
        ovs: Box<dyn OvsDb>,
    ) -> Self {
        Self {
            persister,
            classifier,
            ovs,
        }
    }

    pub fn daemon_name(&self) -> &str {
        "switchdevmgrd"
    }

    pub fn persister(&self) -> &ConfigPersister {
        &self.persister
    }

    /// Classifies the PFs of `state` and synthesizes the config for them.
    ///
    /// Any classifier failure is reported as [`CfgMgrError::Classification`].
    pub fn synthesize_config(&self, state: &SriovNetworkNodeState) -> CfgMgrResult<SwitchdevConfig> {
        let skip = self.classifier.pfs_to_skip(state).map_err(|e| match e {
            e @ CfgMgrError::Classification { .. } => e,
            other => CfgMgrError::classification(other.to_string()),
        })?;
        let pfs: Vec<&str> = skip.iter().collect();
        debug!(?pfs, "PFs skipped by host configurator");

        Ok(synthesize(
            &state.spec.interfaces,
            &state.status.interfaces,
            &skip,
        ))
    }

    /// Writes the config for the PFs this daemon owns.
    ///
    /// Returns `Ok(true)` only when the file was rewritten. A classifier
    /// failure aborts the pass before anything is touched.
    #[instrument(skip(self, state), fields(path = %self.persister.path().display()))]
    pub fn write_switchdev_conf_file(&self, state: &SriovNetworkNodeState) -> CfgMgrResult<bool> {
        self.sync_conf_file(state).map(|(updated, _)| updated)
    }

    /// Synthesizes and persists the config. Returns whether the file was
    /// rewritten and how many PFs the config holds.
    fn sync_conf_file(&self, state: &SriovNetworkNodeState) -> CfgMgrResult<(bool, usize)> {
        let config = self.synthesize_config(state)?;
        let updated = self.persister.persist(&config)?;
        Ok((updated, config.len()))
    }

    /// Runs one full pass: writes the config, then gathers mode and offload facts.
    #[instrument(skip(self, state))]
    pub async fn reconcile(&self, state: &SriovNetworkNodeState) -> CfgMgrResult<ReconcileOutcome> {
        let (updated, interfaces) = self.sync_conf_file(state)?;

        let outcome = ReconcileOutcome {
            updated,
            interfaces,
            switchdev_requested: is_switchdev_mode_spec(&state.spec),
            switchdev_present: switchdev_device_exists(state),
            hw_offload_enabled: ovs_hw_offload_enabled(self.ovs.as_ref()).await,
        };

        if outcome.updated {
            info!(
                "Switchdev config updated with {} interface(s)",
                outcome.interfaces
            );
        }
        Ok(outcome)
    }
}

/// Loads a node state from a JSON file.
pub fn load_node_state(path: impl AsRef<Path>) -> CfgMgrResult<SriovNetworkNodeState> {
    let path = path.as_ref();
    let content = fs::read(path).map_err(|e| {
        error!("Failed to read node state {}: {}", path.display(), e);
        CfgMgrError::io("read", path, e)
    })?;
    Ok(serde_json::from_slice(&content)?)
}
