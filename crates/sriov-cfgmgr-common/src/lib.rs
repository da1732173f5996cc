//! Common infrastructure for SR-IOV host configuration manager daemons.
//!
//! This crate provides shared functionality for the host-side cfgmgr
//! daemons (switchdevmgrd and friends):
//!
//! - [`shell`]: Safe shell command execution with proper quoting
//! - [`ovs`]: Read-only queries against the Open vSwitch database
//! - [`error`]: Error types for cfgmgr operations
//!
//! # Architecture
//!
//! Configuration managers follow this pattern:
//!
//! 1. Receive the node state (declared spec + observed status) for this host
//! 2. Decide which physical functions this daemon is responsible for
//! 3. Query host tools (`ovs-vsctl`, ...) for read-only facts
//! 4. Persist processed configuration for the host configuration service
//!
//! # Example
//!
//! ```ignore
//! use sriov_cfgmgr_common::{
//!     ovs::{OvsDb, OvsVsctl},
//!     error::CfgMgrResult,
//! };
//!
//! async fn hw_offload() -> CfgMgrResult<String> {
//!     OvsVsctl::new()
//!         .get("Open_vSwitch", ".", "other_config:hw-offload")
//!         .await
//! }
//! ```

pub mod error;
pub mod ovs;
pub mod shell;

// Re-export commonly used items at crate root
pub use error::{CfgMgrError, CfgMgrResult};
pub use ovs::{OvsDb, OvsVsctl};
