//! # aci-netops
//!
//! Command-line tooling for Cisco APIC:
//!
//! - **`epg-vlan`** turns VLANs (from flags or a CSV file) into network-centric
//!   policy: one bridge domain per VLAN in a network tenant, one EPG per VLAN
//!   in an application tenant, a permit-all contract, and static VLAN pool
//!   encap blocks grouped into contiguous ranges.
//! - **`clone-policy-group`** copies an existing interface policy group under
//!   a new name.
//!
//! The [`apic`] module holds the REST session, [`model`] the managed-object
//! tree and policy builders, and [`vlan`] the VLAN input handling.

pub mod apic;
pub mod cli;
pub mod config;
pub mod constants;
pub mod model;
pub mod theme;
pub mod ui;
pub mod vlan;
