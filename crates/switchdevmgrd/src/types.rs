//! Node state and switchdev configuration types.
//!
//! JSON field names follow the `SriovNetworkNodeState` resource so a node
//! state dumped from the API server can be loaded unchanged.

use serde::{Deserialize, Serialize};

/// Embedded switch mode of a physical function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EswitchMode {
    /// Default mode; never written to the switchdev config.
    #[default]
    #[serde(alias = "")]
    Legacy,
    /// Forwarding decisions for VFs can be offloaded to hardware.
    Switchdev,
}

impl EswitchMode {
    /// Returns the mode name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            EswitchMode::Legacy => "legacy",
            EswitchMode::Switchdev => "switchdev",
        }
    }

    pub fn is_switchdev(&self) -> bool {
        matches!(self, EswitchMode::Switchdev)
    }
}

/// A group of VFs carved out of a PF by a network policy.
///
/// Carried through to the config untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VfGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vf_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_rdma: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vdpa_type: Option<String>,
}

/// A declared physical function (`spec.interfaces[]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interface {
    /// Host netdev name.
    #[serde(default)]
    pub name: String,
    /// PCI address, the identity of the PF.
    pub pci_address: String,
    /// Number of VFs to provision.
    #[serde(default)]
    pub num_vfs: u32,
    #[serde(default, alias = "eSwitchMode")]
    pub eswitch_mode: EswitchMode,
    #[serde(default)]
    pub vf_groups: Vec<VfGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
}

/// An observed physical function (`status.interfaces[]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceExt {
    #[serde(default)]
    pub name: String,
    pub pci_address: String,
    #[serde(default)]
    pub num_vfs: u32,
    #[serde(default, alias = "eSwitchMode")]
    pub eswitch_mode: EswitchMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, rename = "deviceID", skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(default, rename = "totalvfs", skip_serializing_if = "Option::is_none")]
    pub total_vfs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_speed: Option<String>,
}

/// Declared intent for the node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStateSpec {
    #[serde(default)]
    pub interfaces: Vec<Interface>,
}

/// Last observed hardware state of the node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStateStatus {
    #[serde(default)]
    pub interfaces: Vec<InterfaceExt>,
}

/// Desired and observed SR-IOV state of one node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SriovNetworkNodeState {
    #[serde(default)]
    pub spec: NodeStateSpec,
    #[serde(default)]
    pub status: NodeStateStatus,
}

/// A minimal PF record as written to the switchdev config.
///
/// Only `num_vfs` and `eswitch_mode` are acted on by the host configuration
/// service; the rest identifies the PF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInterface {
    pub name: String,
    pub pci_address: String,
    pub num_vfs: u32,
    pub vf_groups: Vec<VfGroup>,
    /// Only ever `Some(Switchdev)`; legacy is implied by absence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eswitch_mode: Option<EswitchMode>,
}

/// Content of the switchdev config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchdevConfig {
    pub interfaces: Vec<ConfigInterface>,
}

impl SwitchdevConfig {
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eswitch_mode_wire_names() {
        assert_eq!(
            serde_json::to_string(&EswitchMode::Switchdev).unwrap(),
            "\"switchdev\""
        );
        assert_eq!(
            serde_json::from_str::<EswitchMode>("\"legacy\"").unwrap(),
            EswitchMode::Legacy
        );
        assert_eq!(
            serde_json::from_str::<EswitchMode>("\"\"").unwrap(),
            EswitchMode::Legacy
        );
        assert!(serde_json::from_str::<EswitchMode>("\"offload\"").is_err());
    }

    #[test]
    fn test_node_state_from_resource_json() {
        let state: SriovNetworkNodeState = serde_json::from_str(
            r#"{
                "spec": {
                    "interfaces": [{
                        "pciAddress": "0000:3b:00.0",
                        "name": "ens1f0",
                        "numVfs": 8,
                        "eSwitchMode": "switchdev",
                        "mtu": 9000,
                        "vfGroups": [{"resourceName": "mlnx_sriov", "vfRange": "0-7", "policyName": "p1"}]
                    }]
                },
                "status": {
                    "interfaces": [{
                        "pciAddress": "0000:3b:00.0",
                        "name": "ens1f0",
                        "deviceID": "101d",
                        "vendor": "15b3",
                        "totalvfs": 16,
                        "eSwitchMode": "legacy"
                    }]
                }
            }"#,
        )
        .unwrap();

        let declared = &state.spec.interfaces[0];
        assert_eq!(declared.num_vfs, 8);
        assert_eq!(declared.eswitch_mode, EswitchMode::Switchdev);
        assert_eq!(declared.mtu, Some(9000));
        assert_eq!(declared.vf_groups[0].vf_range.as_deref(), Some("0-7"));

        let observed = &state.status.interfaces[0];
        assert_eq!(observed.device_id.as_deref(), Some("101d"));
        assert_eq!(observed.total_vfs, Some(16));
        assert_eq!(observed.num_vfs, 0);
        assert_eq!(observed.eswitch_mode, EswitchMode::Legacy);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let state: SriovNetworkNodeState = serde_json::from_str("{}").unwrap();
        assert!(state.spec.interfaces.is_empty());
        assert!(state.status.interfaces.is_empty());
    }

    #[test]
    fn test_config_interface_omits_legacy_mode() {
        let record = ConfigInterface {
            name: "ens1f0".to_string(),
            pci_address: "0000:3b:00.0".to_string(),
            num_vfs: 2,
            vf_groups: vec![],
            eswitch_mode: None,
        };
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"name":"ens1f0","pciAddress":"0000:3b:00.0","numVfs":2,"vfGroups":[]}"#
        );
    }
}
