//! Switchdev mode predicates over declared intent and observed status.

use tracing::debug;

use crate::types::{Interface, InterfaceExt, NodeStateSpec, SriovNetworkNodeState};

/// Returns true if any declared PF requests switchdev mode.
pub fn is_switchdev_mode_spec(spec: &NodeStateSpec) -> bool {
    any_switchdev(&spec.interfaces)
}

/// Returns true if switchdev mode is requested in `interfaces`.
fn any_switchdev(interfaces: &[Interface]) -> bool {
    interfaces.iter().any(|iface| iface.eswitch_mode.is_switchdev())
}

/// Returns true if any observed PF is currently in switchdev mode.
///
/// Deliberately looks at status only: after a pool config is deleted the
/// spec no longer reflects the eswitch mode the hardware is actually in.
pub fn switchdev_device_exists(state: &SriovNetworkNodeState) -> bool {
    match find_switchdev_device(&state.status.interfaces) {
        Some(iface) => {
            debug!(
                pci = %iface.pci_address,
                name = %iface.name,
                "Detected switchdev interface"
            );
            true
        }
        None => false,
    }
}

fn find_switchdev_device(interfaces: &[InterfaceExt]) -> Option<&InterfaceExt> {
    interfaces
        .iter()
        .find(|iface| iface.eswitch_mode.is_switchdev())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EswitchMode, NodeStateStatus};

    fn declared(pci: &str, mode: EswitchMode) -> Interface {
        Interface {
            pci_address: pci.to_string(),
            eswitch_mode: mode,
            ..Default::default()
        }
    }

    fn observed(pci: &str, mode: EswitchMode) -> InterfaceExt {
        InterfaceExt {
            pci_address: pci.to_string(),
            eswitch_mode: mode,
            ..Default::default()
        }
    }

    #[test]
    fn test_is_switchdev_mode_spec() {
        let mut spec = NodeStateSpec::default();
        assert!(!is_switchdev_mode_spec(&spec));

        spec.interfaces.push(declared("0000:01:00.0", EswitchMode::Legacy));
        assert!(!is_switchdev_mode_spec(&spec));

        spec.interfaces.push(declared("0000:01:00.1", EswitchMode::Switchdev));
        assert!(is_switchdev_mode_spec(&spec));
    }

    #[test]
    fn test_switchdev_device_exists_uses_status_only() {
        let state = SriovNetworkNodeState {
            spec: NodeStateSpec {
                interfaces: vec![declared("0000:01:00.0", EswitchMode::Switchdev)],
            },
            status: NodeStateStatus {
                interfaces: vec![observed("0000:01:00.0", EswitchMode::Legacy)],
            },
        };
        assert!(!switchdev_device_exists(&state));
    }

    #[test]
    fn test_switchdev_device_exists_after_spec_removed() {
        let state = SriovNetworkNodeState {
            spec: NodeStateSpec::default(),
            status: NodeStateStatus {
                interfaces: vec![
                    observed("0000:01:00.0", EswitchMode::Legacy),
                    observed("0000:01:00.1", EswitchMode::Switchdev),
                ],
            },
        };
        assert!(switchdev_device_exists(&state));
    }
}
