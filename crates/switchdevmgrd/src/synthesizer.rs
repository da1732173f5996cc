//! Builds the switchdev config from node state and the skip set.

use tracing::trace;

use crate::skip::SkipSet;
use crate::types::{ConfigInterface, EswitchMode, Interface, InterfaceExt, SwitchdevConfig};

/// Selects the declared PFs this daemon must configure and projects them to
/// minimal records.
///
/// A declared PF is kept when it has an observed counterpart with the same
/// PCI address, is in `skip`, and requests at least one VF. Records keep the
/// order of `spec`, so identical input always serializes identically.
pub fn synthesize(spec: &[Interface], status: &[InterfaceExt], skip: &SkipSet) -> SwitchdevConfig {
    let interfaces = spec
        .iter()
        .filter(|iface| {
            let observed = status
                .iter()
                .any(|s| s.pci_address == iface.pci_address);
            if !observed {
                trace!(pci = %iface.pci_address, "No status for PF, skipping");
                return false;
            }
            if !skip.contains(&iface.pci_address) {
                trace!(pci = %iface.pci_address, "PF left to the default configurator");
                return false;
            }
            iface.num_vfs > 0
        })
        .map(to_config_interface)
        .collect();

    SwitchdevConfig { interfaces }
}

fn to_config_interface(iface: &Interface) -> ConfigInterface {
    ConfigInterface {
        name: iface.name.clone(),
        pci_address: iface.pci_address.clone(),
        num_vfs: iface.num_vfs,
        vf_groups: iface.vf_groups.clone(),
        eswitch_mode: (iface.eswitch_mode == EswitchMode::Switchdev)
            .then_some(EswitchMode::Switchdev),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VfGroup;
    use pretty_assertions::assert_eq;

    fn declared(pci: &str, num_vfs: u32, mode: EswitchMode) -> Interface {
        Interface {
            name: format!("pf-{}", &pci[5..7]),
            pci_address: pci.to_string(),
            num_vfs,
            eswitch_mode: mode,
            mtu: Some(1500),
            ..Default::default()
        }
    }

    fn observed(pci: &str) -> InterfaceExt {
        InterfaceExt {
            pci_address: pci.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_switchdev_pf_is_emitted() {
        let spec = vec![declared("0000:01:00.0", 4, EswitchMode::Switchdev)];
        let status = vec![observed("0000:01:00.0")];
        let skip = SkipSet::from_iter(["0000:01:00.0"]);

        let cfg = synthesize(&spec, &status, &skip);

        assert_eq!(
            cfg.interfaces,
            vec![ConfigInterface {
                name: "pf-01".to_string(),
                pci_address: "0000:01:00.0".to_string(),
                num_vfs: 4,
                vf_groups: vec![],
                eswitch_mode: Some(EswitchMode::Switchdev),
            }]
        );
    }

    #[test]
    fn test_zero_vfs_is_dropped() {
        let spec = vec![declared("0000:01:00.0", 0, EswitchMode::Switchdev)];
        let status = vec![observed("0000:01:00.0")];
        let skip = SkipSet::from_iter(["0000:01:00.0"]);

        assert!(synthesize(&spec, &status, &skip).is_empty());
    }

    #[test]
    fn test_filters() {
        let spec = vec![
            declared("0000:01:00.0", 2, EswitchMode::Legacy), // kept
            declared("0000:02:00.0", 2, EswitchMode::Switchdev), // no status
            declared("0000:03:00.0", 2, EswitchMode::Switchdev), // not in skip set
            declared("0000:04:00.0", 0, EswitchMode::Legacy), // no VFs
            declared("0000:05:00.0", 8, EswitchMode::Switchdev), // kept
        ];
        let status = vec![
            observed("0000:05:00.0"),
            observed("0000:01:00.0"),
            observed("0000:03:00.0"),
            observed("0000:04:00.0"),
        ];
        let skip = SkipSet::from_iter([
            "0000:01:00.0",
            "0000:02:00.0",
            "0000:04:00.0",
            "0000:05:00.0",
        ]);

        let cfg = synthesize(&spec, &status, &skip);

        let kept: Vec<_> = cfg
            .interfaces
            .iter()
            .map(|i| (i.pci_address.as_str(), i.eswitch_mode))
            .collect();
        assert_eq!(
            kept,
            vec![
                ("0000:01:00.0", None),
                ("0000:05:00.0", Some(EswitchMode::Switchdev)),
            ]
        );
    }

    #[test]
    fn test_empty_skip_set_yields_empty_config() {
        let spec = vec![declared("0000:01:00.0", 4, EswitchMode::Switchdev)];
        let status = vec![observed("0000:01:00.0")];

        assert!(synthesize(&spec, &status, &SkipSet::new()).is_empty());
    }

    #[test]
    fn test_vf_groups_are_carried_and_extra_fields_dropped() {
        let mut iface = declared("0000:01:00.0", 4, EswitchMode::Legacy);
        iface.link_type = Some("eth".to_string());
        iface.vf_groups = vec![VfGroup {
            resource_name: Some("intel_sriov".to_string()),
            vf_range: Some("0-3".to_string()),
            ..Default::default()
        }];
        let skip = SkipSet::from_iter(["0000:01:00.0"]);

        let cfg = synthesize(&[iface.clone()], &[observed("0000:01:00.0")], &skip);

        assert_eq!(cfg.interfaces[0].vf_groups, iface.vf_groups);
        assert_eq!(
            serde_json::to_string(&cfg).unwrap(),
            r#"{"interfaces":[{"name":"pf-01","pciAddress":"0000:01:00.0","numVfs":4,"vfGroups":[{"resourceName":"intel_sriov","vfRange":"0-3"}]}]}"#
        );
    }

    #[test]
    fn test_deterministic_output() {
        let spec = vec![
            declared("0000:02:00.0", 2, EswitchMode::Switchdev),
            declared("0000:01:00.0", 2, EswitchMode::Legacy),
        ];
        let status = vec![observed("0000:01:00.0"), observed("0000:02:00.0")];
        let skip = SkipSet::from_iter(["0000:01:00.0", "0000:02:00.0"]);

        let first = serde_json::to_vec(&synthesize(&spec, &status, &skip)).unwrap();
        let second = serde_json::to_vec(&synthesize(&spec, &status, &skip)).unwrap();
        assert_eq!(first, second);

        // Spec order, not PCI order.
        let cfg = synthesize(&spec, &status, &skip);
        assert_eq!(cfg.interfaces[0].pci_address, "0000:02:00.0");
    }
}
