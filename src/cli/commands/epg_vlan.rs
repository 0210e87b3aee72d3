//! `epg-vlan`: network-centric bridge domains, EPGs, and VLAN pool blocks.

use color_eyre::eyre::{bail, Result, WrapErr};
use tracing::info;

use super::{pretty, Context};
use crate::apic::Session;
use crate::cli::args::EpgVlanArgs;
use crate::config::expand_home;
use crate::constants;
use crate::model::policy::{NetworkCentricPolicy, PolicyOptions};
use crate::vlan::{self, VlanEntry};

pub fn run(ctx: &Context, args: &EpgVlanArgs) -> Result<()> {
    let vlans = collect_vlans(args)?;
    let policy = NetworkCentricPolicy::build(&options(args), &vlans)?;
    info!(
        vlans = vlans.len(),
        blocks = policy.vlan_pools.len(),
        "built network-centric policy"
    );

    if ctx.dry_run {
        println!("POST {}\n{}\n", constants::API_MO_UNI, pretty(&policy.network_tenant)?);
        println!("POST {}\n{}\n", constants::API_MO_UNI, pretty(&policy.app_tenant)?);
        for (_, pool) in &policy.vlan_pools {
            println!("POST {}\n{}\n", constants::API_MO_INFRA, pretty(pool)?);
        }
        println!("{}", constants::CLI_MSG_DRY_RUN);
        return Ok(());
    }

    let session = ctx.connect()?;
    let result = push_policy(&session, &policy, &args.vlan_pool, ctx.verbose);
    session.close();
    result
}

fn options(args: &EpgVlanArgs) -> PolicyOptions {
    PolicyOptions {
        net_tenant: args.net_tenant.clone(),
        app_tenant: args.app_tenant.clone(),
        anp: args.anp.clone(),
        vrf: args.vrf.clone(),
        vlan_pool: args.vlan_pool.clone(),
        routing: args.enable_routing,
        flooding: args.enable_flooding,
        vzany: args.vzany,
    }
}

fn collect_vlans(args: &EpgVlanArgs) -> Result<Vec<VlanEntry>> {
    if let Some(csv) = &args.csv {
        let path = expand_home(&csv.to_string_lossy());
        let entries = vlan::load_csv(&path)
            .wrap_err_with(|| format!("failed to import VLANs from {}", path.display()))?;
        if entries.is_empty() {
            bail!("no VLAN rows found in {}", path.display());
        }
        info!(count = entries.len(), path = %path.display(), "imported VLANs from csv");
        return Ok(entries);
    }

    match (&args.vlan_number, &args.vlan_name, &args.gateway) {
        (Some(number), Some(name), Some(gateway)) => {
            let descr = args.vlan_descr.as_deref().unwrap_or_default();
            Ok(vec![VlanEntry::new(*number, name, descr, gateway)?])
        }
        _ => bail!(constants::CLI_MSG_VLAN_ARGS_REQUIRED),
    }
}

fn push_policy(
    session: &Session,
    policy: &NetworkCentricPolicy,
    pool_name: &str,
    verbose: bool,
) -> Result<()> {
    if verbose {
        println!("{}", pretty(&policy.network_tenant)?);
    }

    for tenant in [&policy.network_tenant, &policy.app_tenant] {
        let name = tenant.attr("name").unwrap_or_default();
        session
            .push_mo(constants::API_MO_UNI, tenant)
            .wrap_err_with(|| format!("{}: tenant '{name}'", constants::CLI_MSG_PUSH_FAILED))?;
        println!("Pushed tenant '{name}'");
    }

    for (range, pool) in &policy.vlan_pools {
        session
            .push_mo(constants::API_MO_INFRA, pool)
            .wrap_err_with(|| {
                format!("{}: VLAN block {range} in pool '{pool_name}'", constants::CLI_MSG_PUSH_FAILED)
            })?;
        println!("Pushed VLAN block {range} to pool '{pool_name}'");
    }

    Ok(())
}
