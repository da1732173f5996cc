//! Well-known paths and OVSDB names

/// Switchdev config consumed by the host configuration service.
pub const SWITCHDEV_CONF_PATH: &str = "/host/etc/sriov_config.json";

/// Permissions of the switchdev config file.
pub const SWITCHDEV_CONF_MODE: u32 = 0o644;

/// Seconds between reconciliation passes.
pub const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 30;

// OVSDB location of the hardware offload flag
pub const OVS_TABLE: &str = "Open_vSwitch";
pub const OVS_RECORD: &str = ".";
pub const OVS_HW_OFFLOAD_COLUMN: &str = "other_config:hw-offload";
