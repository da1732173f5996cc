//! # switchdevmgrd - SR-IOV switchdev configuration manager
//!
//! Decides which physical functions (PFs) of this host must be configured by
//! the systemd-based host service and persists them to the switchdev config
//! file it reads at boot.
//!
//! ## Responsibilities
//! - Join declared PFs (`spec.interfaces`) with observed PFs
//!   (`status.interfaces`) by PCI address
//! - Keep only PFs in the skip set that request VFs
//! - Write the config file only when its content changes
//! - Report whether switchdev mode is requested or present, and whether OVS
//!   hardware offload is enabled
//!
//! ## Config file
//! `{"interfaces":[{"name":..,"pciAddress":..,"numVfs":..,"vfGroups":[..],"eswitchMode":"switchdev"}]}`.
//! `eswitchMode` is only present for switchdev PFs. A node with nothing to
//! configure has a zero-byte file, or no file at all.

pub mod config;
mod daemon;
mod mode;
mod offload;
mod persister;
mod skip;
mod switchdev_mgr;
mod synthesizer;
pub mod tables;
mod types;

pub use config::{Args, DaemonConfig};
pub use daemon::{run_event_loop, run_pass};
pub use mode::{is_switchdev_mode_spec, switchdev_device_exists};
pub use offload::ovs_hw_offload_enabled;
pub use persister::ConfigPersister;
pub use skip::{DeclaredSwitchdev, PfSkipClassifier, SkipSet, StaticSkipList};
pub use switchdev_mgr::{load_node_state, ReconcileOutcome, SwitchdevMgr};
pub use synthesizer::synthesize;
pub use types::*;
