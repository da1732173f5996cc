//! Command line configuration for the switchdevmgrd daemon.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use sriov_cfgmgr_common::{CfgMgrError, CfgMgrResult, OvsVsctl};

use crate::persister::ConfigPersister;
use crate::skip::{DeclaredSwitchdev, PfSkipClassifier, SkipSet, StaticSkipList};
use crate::tables::{DEFAULT_RECONCILE_INTERVAL_SECS, SWITCHDEV_CONF_PATH};
use crate::SwitchdevMgr;

/// SR-IOV switchdev configuration manager
#[derive(Parser, Debug, Clone)]
#[command(name = "switchdevmgrd")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON file holding the SriovNetworkNodeState of this node
    #[arg(short = 'n', long)]
    pub node_state: PathBuf,

    /// Switchdev config file consumed by the host configuration service
    #[arg(short = 'c', long, default_value = SWITCHDEV_CONF_PATH)]
    pub conf_path: PathBuf,

    /// PCI address of a PF skipped by the host configurator (repeatable).
    /// Without any, PFs declared in switchdev mode are skipped.
    #[arg(long = "skip-pf", value_name = "PCI_ADDRESS")]
    pub skip_pfs: Vec<String>,

    /// Seconds between reconciliation passes
    #[arg(short = 'i', long, default_value_t = DEFAULT_RECONCILE_INTERVAL_SECS)]
    pub interval: u64,

    /// Run a single pass and exit
    #[arg(long)]
    pub once: bool,

    /// Path to the ovs-vsctl binary
    #[arg(long)]
    pub ovs_vsctl: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    pub log_level: String,
}

/// Validated daemon configuration.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub node_state: PathBuf,
    pub conf_path: PathBuf,
    /// `None` selects the declared-switchdev policy.
    pub skip_pfs: Option<SkipSet>,
    pub interval: Duration,
    pub once: bool,
    pub ovs_vsctl: Option<String>,
}

impl TryFrom<Args> for DaemonConfig {
    type Error = CfgMgrError;

    fn try_from(args: Args) -> CfgMgrResult<Self> {
        if args.interval == 0 {
            return Err(CfgMgrError::invalid_config(
                "interval",
                "must be greater than 0",
            ));
        }
        if let Some(bad) = args.skip_pfs.iter().find(|pci| pci.trim().is_empty()) {
            return Err(CfgMgrError::invalid_config(
                "skip-pf",
                format!("empty PCI address '{}'", bad),
            ));
        }

        let skip_pfs =
            (!args.skip_pfs.is_empty()).then(|| args.skip_pfs.into_iter().collect::<SkipSet>());

        Ok(Self {
            node_state: args.node_state,
            conf_path: args.conf_path,
            skip_pfs,
            interval: Duration::from_secs(args.interval),
            once: args.once,
            ovs_vsctl: args.ovs_vsctl,
        })
    }
}

impl DaemonConfig {
    /// Builds the manager described by this configuration.
    pub fn build_manager(&self) -> SwitchdevMgr {
        let classifier: Box<dyn PfSkipClassifier> = match &self.skip_pfs {
            Some(pfs) => Box::new(StaticSkipList::new(pfs.clone())),
            None => Box::new(DeclaredSwitchdev),
        };

        let mut ovs = OvsVsctl::new();
        if let Some(program) = &self.ovs_vsctl {
            ovs = ovs.with_program(program.clone());
        }

        SwitchdevMgr::new(
            ConfigPersister::new(self.conf_path.clone()),
            classifier,
            Box::new(ovs),
        )
    }
}
