//! Test fixtures for node state patterns
//!
//! Provides reusable PF layouts for configuration manager testing

use switchdevmgrd::{
    EswitchMode, Interface, InterfaceExt, SkipSet, SriovNetworkNodeState, VfGroup,
};

/// Builds a [`SriovNetworkNodeState`] one PF at a time
#[derive(Debug, Clone, Default)]
pub struct NodeStateBuilder {
    state: SriovNetworkNodeState,
}

impl NodeStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a PF in the spec only
    pub fn declare(mut self, iface: Interface) -> Self {
        self.state.spec.interfaces.push(iface);
        self
    }

    /// Report a PF in the status only
    pub fn observe(mut self, iface: InterfaceExt) -> Self {
        self.state.status.interfaces.push(iface);
        self
    }

    /// Declare a PF and report a matching legacy-mode status entry
    pub fn pf(self, iface: Interface) -> Self {
        let observed = observed_pf(&iface.name, &iface.pci_address, EswitchMode::Legacy);
        self.declare(iface).observe(observed)
    }

    pub fn build(self) -> SriovNetworkNodeState {
        self.state
    }
}

/// Declared PF with the given VF count and mode
pub fn declared_pf(name: &str, pci: &str, num_vfs: u32, mode: EswitchMode) -> Interface {
    Interface {
        name: name.to_string(),
        pci_address: pci.to_string(),
        num_vfs,
        eswitch_mode: mode,
        ..Default::default()
    }
}

/// Observed PF as reported by the config daemon
pub fn observed_pf(name: &str, pci: &str, mode: EswitchMode) -> InterfaceExt {
    InterfaceExt {
        name: name.to_string(),
        pci_address: pci.to_string(),
        eswitch_mode: mode,
        driver: Some("mlx5_core".to_string()),
        vendor: Some("15b3".to_string()),
        device_id: Some("101d".to_string()),
        total_vfs: Some(16),
        ..Default::default()
    }
}

/// VF group covering `range` for `resource`
pub fn vf_group(resource: &str, range: &str) -> VfGroup {
    VfGroup {
        resource_name: Some(resource.to_string()),
        device_type: Some("netdevice".to_string()),
        vf_range: Some(range.to_string()),
        policy_name: Some(format!("{}-policy", resource)),
        ..Default::default()
    }
}

/// Skip set from PCI addresses
pub fn skip_set(pcis: &[&str]) -> SkipSet {
    pcis.iter().copied().collect()
}

/// Common switchdev node layouts
pub mod switchdev_fixtures {
    use super::*;

    pub const PF0: &str = "0000:3b:00.0";
    pub const PF1: &str = "0000:3b:00.1";
    pub const PF2: &str = "0000:5e:00.0";

    /// One switchdev PF with 4 VFs, present in status
    pub fn single_switchdev_pf() -> SriovNetworkNodeState {
        NodeStateBuilder::new()
            .pf(declared_pf("ens1f0", PF0, 4, EswitchMode::Switchdev))
            .build()
    }

    /// Dual-port NIC: PF0 switchdev with a VF group, PF1 legacy
    pub fn dual_port_mixed() -> SriovNetworkNodeState {
        let mut pf0 = declared_pf("ens1f0", PF0, 8, EswitchMode::Switchdev);
        pf0.vf_groups = vec![vf_group("switchdev_vfs", "0-7")];

        NodeStateBuilder::new()
            .pf(pf0)
            .pf(declared_pf("ens1f1", PF1, 2, EswitchMode::Legacy))
            .build()
    }

    /// PF2 is declared but the config daemon has not discovered it yet
    pub fn undiscovered_pf() -> SriovNetworkNodeState {
        NodeStateBuilder::new()
            .pf(declared_pf("ens1f0", PF0, 4, EswitchMode::Switchdev))
            .declare(declared_pf("ens2f0", PF2, 4, EswitchMode::Switchdev))
            .build()
    }

    /// Pool config deleted: nothing declared, hardware still in switchdev
    pub fn policy_removed() -> SriovNetworkNodeState {
        NodeStateBuilder::new()
            .observe(observed_pf("ens1f0", PF0, EswitchMode::Switchdev))
            .build()
    }
}
