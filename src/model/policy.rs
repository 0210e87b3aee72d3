//! Builders for the APIC policy objects used by network-centric provisioning.
//!
//! In the network-centric layout every VLAN becomes one bridge domain in a
//! network tenant and one EPG in an application tenant, tied together by a
//! permit-all contract.

use super::{ManagedObject, ModelError};
use crate::constants;
use crate::vlan::{group_ranges, Gateway, VlanEntry, VlanRange};

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

pub fn tenant(name: &str) -> ManagedObject {
    ManagedObject::named("fvTenant", name)
}

pub fn vrf(name: &str) -> ManagedObject {
    ManagedObject::named("fvCtx", name)
}

pub fn app_profile(name: &str) -> ManagedObject {
    ManagedObject::named("fvAp", name)
}

pub fn subnet(gateway: &Gateway) -> ManagedObject {
    ManagedObject::new("fvSubnet")
        .with_attr("ip", gateway.to_string())
        .with_attr("scope", constants::SUBNET_SCOPE_PRIVATE)
}

/// Bridge domain for one VLAN, bound to `vrf`.
///
/// With routing enabled the VLAN gateway becomes a private subnet on the BD;
/// with flooding enabled unknown unicast and ARP are flooded instead of
/// proxied.
pub fn bridge_domain(
    entry: &VlanEntry,
    vrf: &str,
    routing: bool,
    flooding: bool,
) -> Result<ManagedObject, ModelError> {
    let mut bd = ManagedObject::named("fvBD", &entry.name)
        .with_attr("descr", &entry.description)
        .with_attr("unicastRoute", yes_no(routing))
        .with_attr("arpFlood", yes_no(flooding))
        .with_attr("unkMacUcastAct", if flooding { "flood" } else { "proxy" })
        .with_child(ManagedObject::new("fvRsCtx").with_attr("tnFvCtxName", vrf));

    if routing {
        let gateway = entry
            .gateway
            .ok_or_else(|| ModelError::MissingGateway(entry.name.clone()))?;
        bd.push_child(subnet(&gateway));
    }

    Ok(bd)
}

pub fn epg(name: &str, bridge_domain: &str) -> ManagedObject {
    ManagedObject::named("fvAEPg", name)
        .with_child(ManagedObject::new("fvRsBd").with_attr("tnFvBDName", bridge_domain))
}

/// Make `epg` both consume and provide `contract`.
#[must_use]
pub fn consume_and_provide(epg: ManagedObject, contract: &str) -> ManagedObject {
    epg.with_child(ManagedObject::new("fvRsCons").with_attr("tnVzBrCPName", contract))
        .with_child(ManagedObject::new("fvRsProv").with_attr("tnVzBrCPName", contract))
}

/// Filter with a single entry matching every ethertype.
pub fn permit_all_filter() -> ManagedObject {
    ManagedObject::named("vzFilter", constants::PERMIT_ALL).with_child(
        ManagedObject::named("vzEntry", constants::PERMIT_ALL).with_attr("etherT", "unspecified"),
    )
}

/// Contract with one subject that references [`permit_all_filter`].
pub fn permit_all_contract() -> ManagedObject {
    ManagedObject::named("vzBrCP", constants::PERMIT_ALL)
        .with_attr("scope", "context")
        .with_child(
            ManagedObject::named("vzSubj", constants::PERMIT_ALL).with_child(
                ManagedObject::new("vzRsSubjFiltAtt")
                    .with_attr("tnVzFilterName", constants::PERMIT_ALL),
            ),
        )
}

/// vzAny collection of a VRF consuming and providing `contract`.
pub fn vz_any(contract: &str) -> ManagedObject {
    ManagedObject::new("vzAny")
        .with_child(ManagedObject::new("vzRsAnyToCons").with_attr("tnVzBrCPName", contract))
        .with_child(ManagedObject::new("vzRsAnyToProv").with_attr("tnVzBrCPName", contract))
}

/// Static VLAN pool with one encap block, wrapped in `infraInfra` so it can
/// be posted to `uni/infra`.
pub fn vlan_pool(name: &str, range: VlanRange) -> ManagedObject {
    let block = ManagedObject::new("fvnsEncapBlk")
        .with_attr("from", format!("vlan-{}", range.from))
        .with_attr("to", format!("vlan-{}", range.to));

    ManagedObject::new("infraInfra").with_child(
        ManagedObject::named("fvnsVlanInstP", name)
            .with_attr("allocMode", constants::POOL_ALLOC_STATIC)
            .with_child(block),
    )
}

/// Inputs that shape the network-centric policy.
#[derive(Debug, Clone, Default)]
pub struct PolicyOptions {
    pub net_tenant: String,
    pub app_tenant: String,
    pub anp: String,
    pub vrf: String,
    pub vlan_pool: String,
    pub routing: bool,
    pub flooding: bool,
    pub vzany: bool,
}

/// Everything pushed by one `epg-vlan` run.
#[derive(Debug, Clone)]
pub struct NetworkCentricPolicy {
    pub network_tenant: ManagedObject,
    pub app_tenant: ManagedObject,
    pub vlan_pools: Vec<(VlanRange, ManagedObject)>,
}

impl NetworkCentricPolicy {
    pub fn build(opts: &PolicyOptions, vlans: &[VlanEntry]) -> Result<Self, ModelError> {
        let mut network_tenant = tenant(&opts.net_tenant);
        let mut context = vrf(&opts.vrf);
        let mut app_tenant = tenant(&opts.app_tenant);
        let mut profile = app_profile(&opts.anp);

        for entry in vlans {
            network_tenant.push_child(bridge_domain(entry, &opts.vrf, opts.routing, opts.flooding)?);

            let group = epg(&entry.name, &entry.name);
            profile.push_child(if opts.vzany {
                group
            } else {
                consume_and_provide(group, constants::PERMIT_ALL)
            });
        }

        if opts.vzany {
            context.push_child(vz_any(constants::PERMIT_ALL));
            network_tenant.push_child(permit_all_filter());
            network_tenant.push_child(permit_all_contract());
        } else {
            app_tenant.push_child(permit_all_filter());
            app_tenant.push_child(permit_all_contract());
        }

        network_tenant.children_mut().insert(0, context);
        app_tenant.children_mut().insert(0, profile);

        let numbers: Vec<u16> = vlans.iter().map(|v| v.number).collect();
        let vlan_pools = group_ranges(&numbers)
            .into_iter()
            .map(|range| (range, vlan_pool(&opts.vlan_pool, range)))
            .collect();

        Ok(Self {
            network_tenant,
            app_tenant,
            vlan_pools,
        })
    }
}
