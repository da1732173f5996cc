//! Open vSwitch hardware offload check.

use sriov_cfgmgr_common::OvsDb;
use tracing::{debug, error, warn};

use crate::tables::{OVS_HW_OFFLOAD_COLUMN, OVS_RECORD, OVS_TABLE};

/// Returns true if `other_config:hw-offload` is enabled in OVS.
///
/// A failed query counts as disabled. The record does not exist until OVS
/// has been configured at least once, so the error is logged, not returned.
pub async fn ovs_hw_offload_enabled(ovs: &dyn OvsDb) -> bool {
    debug!("Querying OVS hw-offload mode");

    let current = match ovs.get(OVS_TABLE, OVS_RECORD, OVS_HW_OFFLOAD_COLUMN).await {
        Ok(value) => value,
        Err(e) if e.is_external_query() => {
            error!("Failed to get current Open_vSwitch hw-offload mode: {}", e);
            return false;
        }
        Err(e) => {
            warn!("Unexpected error querying Open_vSwitch hw-offload mode: {}", e);
            return false;
        }
    };

    current.contains("true")
}
