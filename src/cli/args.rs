//! Command-line argument definitions.

use std::path::PathBuf;

use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::{Args as ClapArgs, CommandFactory, Parser, Subcommand, ValueEnum};

use crate::constants;

/// aci-netops - network-centric provisioning and policy group cloning for Cisco APIC
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// APIC URL, e.g. https://10.0.0.1
    #[arg(long, short = 'u', env = "APIC_URL", global = true)]
    pub url: Option<String>,

    /// APIC login username
    #[arg(long, short = 'l', env = "APIC_LOGIN", global = true)]
    pub login: Option<String>,

    /// APIC login password (prompted for when missing)
    #[arg(long, short = 'p', env = "APIC_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Path to an alternate config file
    #[arg(long, env = "ACI_NETOPS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Enable verbose logging and print generated JSON
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Build and print payloads without contacting the APIC
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Args {
    /// Parse `std::env::args`, exiting with a usage error on invalid input.
    pub fn parse_checked() -> Self {
        Self::try_parse_checked_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Parse and apply the cross-argument checks clap cannot express.
    pub fn try_parse_checked_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = Self::try_parse_from(itr)?;
        args.check()?;
        Ok(args)
    }

    fn check(&self) -> Result<(), clap::Error> {
        if let Commands::EpgVlan(epg) = &self.command {
            if epg.csv.is_none() && epg.vlan_number.is_none() {
                return Err(Self::command().error(
                    ErrorKind::MissingRequiredArgument,
                    constants::CLI_MSG_VLAN_ARGS_REQUIRED,
                ));
            }
        }
        Ok(())
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create network-centric bridge domains, EPGs, and VLAN pool blocks
    EpgVlan(EpgVlanArgs),
    /// Clone an existing interface policy group under a new name
    ClonePolicyGroup(CloneArgs),
}

/// Flags for `epg-vlan`.
#[derive(ClapArgs, Debug)]
#[command(after_help = constants::CLI_MSG_VLAN_ARGS_REQUIRED)]
pub struct EpgVlanArgs {
    /// Application network profile for the EPGs
    #[arg(long)]
    pub anp: String,

    /// Tenant holding the EPGs
    #[arg(long)]
    pub app_tenant: String,

    /// Tenant holding the bridge domains and VRF
    #[arg(long)]
    pub net_tenant: String,

    /// Static VLAN pool name
    #[arg(long)]
    pub vlan_pool: String,

    /// VRF used by the bridge domains
    #[arg(long)]
    pub vrf: String,

    /// CSV file of vlan_number,vlan_name,description,gateway_cidr rows
    #[arg(long, conflicts_with_all = ["vlan_number", "vlan_name", "vlan_descr", "gateway"])]
    pub csv: Option<PathBuf>,

    /// VLAN number (single VLAN mode)
    #[arg(
        long,
        requires_all = ["vlan_name", "gateway"],
        value_parser = clap::value_parser!(u16).range(
            i64::from(constants::VLAN_MIN)..=i64::from(constants::VLAN_MAX)
        )
    )]
    pub vlan_number: Option<u16>,

    /// VLAN/EPG name (single VLAN mode)
    #[arg(long)]
    pub vlan_name: Option<String>,

    /// VLAN description, used on the bridge domain
    #[arg(long)]
    pub vlan_descr: Option<String>,

    /// Gateway IP in X.X.X.X/N form
    #[arg(long)]
    pub gateway: Option<String>,

    /// Flood unknown unicast and ARP within the bridge domain
    #[arg(long)]
    pub enable_flooding: bool,

    /// Enable unicast routing within the bridge domain
    #[arg(long)]
    pub enable_routing: bool,

    /// Apply the permit-all contract through vzAny on the VRF
    #[arg(long)]
    pub vzany: bool,
}

/// Interface policy group classes that can be cloned.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PolicyGroupKind {
    /// Port-channel / vPC bundle group (infraAccBndlGrp)
    #[default]
    Bundle,
    /// Leaf access port group (infraAccPortGrp)
    Access,
}

impl PolicyGroupKind {
    /// APIC class name.
    pub fn class(self) -> &'static str {
        match self {
            Self::Bundle => "infraAccBndlGrp",
            Self::Access => "infraAccPortGrp",
        }
    }

    /// Relative-name prefix under `uni/infra/funcprof`.
    pub fn rn_prefix(self) -> &'static str {
        match self {
            Self::Bundle => "accbundle-",
            Self::Access => "accportgrp-",
        }
    }
}

/// Flags for `clone-policy-group`.
#[derive(ClapArgs, Debug)]
pub struct CloneArgs {
    /// Filter the query by this name
    #[arg(long)]
    pub qname: Option<String>,

    /// Filter the query by this description (ignored with --qname)
    #[arg(long)]
    pub qdescr: Option<String>,

    /// Name of the cloned policy group
    #[arg(long)]
    pub pgname: String,

    /// Description for the cloned policy group
    #[arg(long, default_value = "")]
    pub descr: String,

    /// Policy group type
    #[arg(long = "type", value_enum, default_value_t = PolicyGroupKind::Bundle)]
    pub kind: PolicyGroupKind,

    /// Choose interactively when several policy groups match
    #[arg(long)]
    pub select: bool,
}
