//! Integration test infrastructure for SR-IOV configuration managers
//!
//! Provides:
//! - Node state fixtures for common PF layouts
//! - A temporary host filesystem with a switchdev config path
//! - A scripted OVS database
//! - Switchdev config verification helpers

pub mod fixtures;
mod host_env;
mod verification;

pub use fixtures::*;
pub use host_env::{HostTestEnv, ScriptedOvs};
pub use verification::*;
