//! Application-wide constants and configuration values.
//!
//! This module defines the static values used throughout aci-netops,
//! including APIC endpoints, managed-object names, file paths, and CLI messages.

// === Application Metadata ===

/// Application name (from Cargo.toml).
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
/// Current application version (from Cargo.toml).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// === Path Configuration ===

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

// === APIC REST Endpoints ===

/// Session login endpoint.
pub const API_LOGIN: &str = "/api/aaaLogin.json";
/// Session logout endpoint.
pub const API_LOGOUT: &str = "/api/aaaLogout.json";
/// Policy universe; tenants are posted here.
pub const API_MO_UNI: &str = "/api/node/mo/uni.json";
/// Fabric access policies; VLAN pools are posted here.
pub const API_MO_INFRA: &str = "/api/node/mo/uni/infra.json";
/// Parent DN of interface policy groups.
pub const DN_FUNCPROF: &str = "uni/infra/funcprof";

/// Timeout for APIC requests in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

// === Policy Defaults ===

/// Name shared by the permit-all filter, filter entry, contract, and subject.
pub const PERMIT_ALL: &str = "Permit-All";
/// Subnet scope used for BD gateways.
pub const SUBNET_SCOPE_PRIVATE: &str = "private";
/// Allocation mode of generated VLAN pools.
pub const POOL_ALLOC_STATIC: &str = "static";
/// Lowest valid 802.1Q VLAN id.
pub const VLAN_MIN: u16 = 1;
/// Highest valid 802.1Q VLAN id.
pub const VLAN_MAX: u16 = 4094;

// === UI Labels & Titles ===

pub const TITLE_PICK_POLICY_GROUP: &str = "Select policy group to clone";
pub const PICKER_FOOTER: &str = " [Enter] Select  [Esc] Cancel ";

// === Messages: CLI Output ===

pub const CLI_MSG_LOGIN_FAILED: &str = "Could not login to APIC";
pub const CLI_MSG_PUSH_FAILED: &str = "Could not push configuration to APIC";
pub const CLI_MSG_MULTIPLE_MATCHES: &str = "Multiple matches found:";
pub const CLI_MSG_NO_MATCH: &str = "No matching policy group found";
pub const CLI_MSG_SELECTION_CANCELLED: &str = "Selection cancelled";
pub const CLI_MSG_INVALID_CHOICE: &str = "Invalid choice. Enter a number from the list, or q to cancel.";
pub const CLI_MSG_VLAN_ARGS_REQUIRED: &str =
    "Either a csv or specific vlan #, vlan name, and gateway IP is required";
pub const CLI_MSG_DRY_RUN: &str = "Dry run: nothing was sent to the APIC";
