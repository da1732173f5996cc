//! PF skip set and the classifier seam that produces it.
//!
//! A PF in the [`SkipSet`] is skipped by the default host configurator, so
//! its systemd-level config has to be synthesized by this daemon instead.

use std::collections::{BTreeSet, HashMap};

use sriov_cfgmgr_common::CfgMgrResult;

use crate::types::SriovNetworkNodeState;

/// Finite set of PF PCI addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipSet {
    pfs: BTreeSet<String>,
}

impl SkipSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from a PCI address → flag map; only `true` entries are members.
    pub fn from_flags(flags: &HashMap<String, bool>) -> Self {
        flags
            .iter()
            .filter(|(_, skip)| **skip)
            .map(|(pci, _)| pci.clone())
            .collect()
    }

    pub fn insert(&mut self, pci_address: impl Into<String>) -> bool {
        self.pfs.insert(pci_address.into())
    }

    pub fn contains(&self, pci_address: &str) -> bool {
        self.pfs.contains(pci_address)
    }

    pub fn is_empty(&self) -> bool {
        self.pfs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pfs.len()
    }

    /// Members in PCI address order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.pfs.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SkipSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            pfs: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Decides which PFs must be skipped by the default host configurator.
pub trait PfSkipClassifier: Send + Sync {
    fn pfs_to_skip(&self, state: &SriovNetworkNodeState) -> CfgMgrResult<SkipSet>;
}

impl<F> PfSkipClassifier for F
where
    F: Fn(&SriovNetworkNodeState) -> CfgMgrResult<SkipSet> + Send + Sync,
{
    fn pfs_to_skip(&self, state: &SriovNetworkNodeState) -> CfgMgrResult<SkipSet> {
        self(state)
    }
}

/// Fixed skip set, independent of node state.
#[derive(Debug, Clone, Default)]
pub struct StaticSkipList {
    pfs: SkipSet,
}

impl StaticSkipList {
    pub fn new(pfs: SkipSet) -> Self {
        Self { pfs }
    }
}

impl PfSkipClassifier for StaticSkipList {
    fn pfs_to_skip(&self, _state: &SriovNetworkNodeState) -> CfgMgrResult<SkipSet> {
        Ok(self.pfs.clone())
    }
}

/// Skips every PF declared in switchdev mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredSwitchdev;

impl PfSkipClassifier for DeclaredSwitchdev {
    fn pfs_to_skip(&self, state: &SriovNetworkNodeState) -> CfgMgrResult<SkipSet> {
        Ok(state
            .spec
            .interfaces
            .iter()
            .filter(|iface| iface.eswitch_mode.is_switchdev())
            .map(|iface| iface.pci_address.clone())
            .collect())
    }
}
