//! `clone-policy-group`: copy an interface policy group under a new name.

use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use tracing::{debug, info};

use super::{pretty, Context};
use crate::apic::{mo_path, ClassQuery, Session};
use crate::cli::args::{CloneArgs, PolicyGroupKind};
use crate::constants;
use crate::model::{dn, ManagedObject};
use crate::ui;

pub fn run(ctx: &Context, args: &CloneArgs) -> Result<()> {
    if args.pgname.trim().is_empty() || args.pgname.contains('/') {
        bail!("invalid policy group name '{}'", args.pgname);
    }

    let session = ctx.connect()?;
    let result = clone_with(ctx, &session, args);
    session.close();
    result
}

fn clone_with(ctx: &Context, session: &Session, args: &CloneArgs) -> Result<()> {
    let query = build_query(args);
    let path = query.path();
    debug!(%path, "querying policy groups");

    let data = session
        .get(&path)
        .wrap_err_with(|| format!("failed to query {}", args.kind.class()))?;
    let dns = data.dns();
    info!(
        matches = data.len(),
        total = data.total_count,
        "policy group query returned"
    );

    let index = select_match(&dns, args.select, |items| {
        ui::pick(constants::TITLE_PICK_POLICY_GROUP, items)
    })?;

    let original = ManagedObject::from_json(&data.imdata[index])?;
    let original_name = original.attr("name").unwrap_or_default().to_string();
    let clone = rewrite_clone(original, args.kind, &args.pgname, &args.descr)?;

    let target = target_path(args.kind, &args.pgname);

    if ctx.verbose || ctx.dry_run {
        println!("{}", pretty(&clone)?);
    }
    if ctx.dry_run {
        println!("POST {target}");
        println!("{}", constants::CLI_MSG_DRY_RUN);
        return Ok(());
    }

    session
        .push_mo(&target, &clone)
        .wrap_err(constants::CLI_MSG_PUSH_FAILED)?;

    println!("Success: {original_name} successfully cloned to {}", args.pgname);
    Ok(())
}

fn build_query(args: &CloneArgs) -> ClassQuery {
    let query = ClassQuery::new(args.kind.class());
    let query = if let Some(name) = &args.qname {
        query.filter_eq("name", name)
    } else if let Some(descr) = &args.qdescr {
        query.filter_eq("descr", descr)
    } else {
        query
    };
    query.subtree_full().config_only()
}

fn target_path(kind: PolicyGroupKind, pgname: &str) -> String {
    mo_path(&format!("{}/{}{pgname}", constants::DN_FUNCPROF, kind.rn_prefix()))
}

/// Pick exactly one of the matched DNs.
///
/// Several matches are an error unless `select` is set, in which case `pick`
/// decides.
fn select_match<F>(dns: &[String], select: bool, pick: F) -> Result<usize>
where
    F: FnOnce(&[String]) -> Result<Option<usize>>,
{
    match dns.len() {
        0 => bail!(constants::CLI_MSG_NO_MATCH),
        1 => Ok(0),
        n if select => {
            let index = pick(dns)?.ok_or_else(|| eyre!(constants::CLI_MSG_SELECTION_CANCELLED))?;
            debug!(index, of = n, "policy group selected");
            Ok(index)
        }
        n => {
            println!("{}", constants::CLI_MSG_MULTIPLE_MATCHES);
            for dn in dns {
                println!("  {dn}");
            }
            bail!("{n} policy groups match; narrow the query with --qname/--qdescr or pass --select")
        }
    }
}

/// Turn a queried policy group into a creatable copy named `pgname`.
fn rewrite_clone(
    mut mo: ManagedObject,
    kind: PolicyGroupKind,
    pgname: &str,
    descr: &str,
) -> Result<ManagedObject> {
    if mo.class() != kind.class() {
        bail!("expected {} but the APIC returned {}", kind.class(), mo.class());
    }

    let new_dn = match mo.attr("dn") {
        Some(current) => dn::rename_leaf(current, kind.rn_prefix(), pgname)
            .ok_or_else(|| eyre!("unexpected DN '{current}' for {}", kind.class()))?,
        None => format!("{}/{}{pgname}", constants::DN_FUNCPROF, kind.rn_prefix()),
    };

    mo.set_attr("dn", new_dn);
    mo.set_attr("name", pgname);
    mo.set_attr("rn", format!("{}{pgname}", kind.rn_prefix()));
    mo.set_attr("status", "created");
    mo.set_attr("descr", descr);
    Ok(mo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn clone_args() -> CloneArgs {
        CloneArgs {
            qname: None,
            qdescr: None,
            pgname: "vpc-esx02".to_string(),
            descr: "cloned".to_string(),
            kind: PolicyGroupKind::Bundle,
            select: false,
        }
    }

    fn bundle() -> ManagedObject {
        ManagedObject::from_json(&json!({
            "infraAccBndlGrp": {
                "attributes": {
                    "dn": "uni/infra/funcprof/accbundle-vpc-esx01",
                    "name": "vpc-esx01",
                    "descr": "esx01 uplinks",
                    "lagT": "node"
                },
                "children": [
                    {"infraRsLacpPol": {"attributes": {"tnLacpLagPolName": "lacp-active"}}}
                ]
            }
        }))
        .unwrap()
    }

    fn dns(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| format!("uni/infra/funcprof/accbundle-pg{i}"))
            .collect()
    }

    #[test]
    fn test_query_prefers_name_over_descr() {
        let path = build_query(&CloneArgs {
            qname: Some("vpc-esx01".to_string()),
            qdescr: Some("ignored".to_string()),
            ..clone_args()
        })
        .path();
        assert!(path.contains("infraAccBndlGrp.name"));
        assert!(!path.contains("ignored"));
        assert!(path.ends_with("rsp-subtree=full&rsp-prop-include=config-only"));
    }

    #[test]
    fn test_query_by_descr_for_access_groups() {
        let path = build_query(&CloneArgs {
            qdescr: Some("servers".to_string()),
            kind: PolicyGroupKind::Access,
            ..clone_args()
        })
        .path();
        assert!(path.starts_with("/api/node/class/infraAccPortGrp.json?query-target-filter="));
        assert!(path.contains("infraAccPortGrp.descr"));
    }

    #[test]
    fn test_query_without_filters() {
        assert_eq!(
            build_query(&clone_args()).path(),
            "/api/node/class/infraAccBndlGrp.json?rsp-subtree=full&rsp-prop-include=config-only"
        );
    }

    #[test]
    fn test_target_path() {
        assert_eq!(
            target_path(PolicyGroupKind::Bundle, "vpc-esx02"),
            "/api/node/mo/uni/infra/funcprof/accbundle-vpc-esx02.json"
        );
        assert_eq!(
            target_path(PolicyGroupKind::Access, "srv"),
            "/api/node/mo/uni/infra/funcprof/accportgrp-srv.json"
        );
    }

    #[test]
    fn test_rewrite_clone_attributes() {
        let clone = rewrite_clone(bundle(), PolicyGroupKind::Bundle, "vpc-esx02", "cloned").unwrap();
        assert_eq!(clone.attr("dn"), Some("uni/infra/funcprof/accbundle-vpc-esx02"));
        assert_eq!(clone.attr("name"), Some("vpc-esx02"));
        assert_eq!(clone.attr("rn"), Some("accbundle-vpc-esx02"));
        assert_eq!(clone.attr("status"), Some("created"));
        assert_eq!(clone.attr("descr"), Some("cloned"));
        assert_eq!(clone.attr("lagT"), Some("node"));
        assert_eq!(clone.children().len(), 1);
    }

    #[test]
    fn test_rewrite_clone_wrong_class() {
        let err = rewrite_clone(bundle(), PolicyGroupKind::Access, "x", "").unwrap_err();
        assert!(err.to_string().contains("expected infraAccPortGrp"));
    }

    #[test]
    fn test_select_match_none() {
        let err = select_match(&[], false, |_| Ok(None)).unwrap_err();
        assert_eq!(err.to_string(), constants::CLI_MSG_NO_MATCH);
    }

    #[test]
    fn test_select_match_single_skips_picker() {
        let index = select_match(&dns(1), true, |_| panic!("picker should not run")).unwrap();
        assert_eq!(index, 0);
    }

    #[test]
    fn test_select_match_multiple_without_select() {
        let err = select_match(&dns(3), false, |_| panic!("picker should not run")).unwrap_err();
        assert!(err.to_string().starts_with("3 policy groups match"));
    }

    #[test]
    fn test_select_match_picker_choice_and_cancel() {
        assert_eq!(select_match(&dns(3), true, |_| Ok(Some(2))).unwrap(), 2);
        let err = select_match(&dns(3), true, |_| Ok(None)).unwrap_err();
        assert_eq!(err.to_string(), constants::CLI_MSG_SELECTION_CANCELLED);
    }

    #[test]
    fn test_clone_with_pushes_renamed_group() {
        use crate::apic::SessionSettings;
        use crate::config::ControllerSettings;
        use mockito::Matcher;
        use std::time::Duration;

        let mut server = mockito::Server::new();
        server
            .mock("POST", "/api/aaaLogin.json")
            .with_status(200)
            .with_body(r#"{"totalCount":"1","imdata":[{"aaaLogin":{"attributes":{}}}]}"#)
            .create();
        server
            .mock("GET", "/api/node/class/infraAccBndlGrp.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({"totalCount": "1", "imdata": [bundle().to_json()]}).to_string(),
            )
            .create();
        let push = server
            .mock("POST", "/api/node/mo/uni/infra/funcprof/accbundle-vpc-esx02.json")
            .match_body(Matcher::PartialJson(json!({
                "infraAccBndlGrp": {"attributes": {
                    "dn": "uni/infra/funcprof/accbundle-vpc-esx02",
                    "name": "vpc-esx02",
                    "status": "created"
                }}
            })))
            .with_status(200)
            .with_body(r#"{"totalCount":"0","imdata":[]}"#)
            .create();

        let ctx = Context {
            verbose: false,
            dry_run: false,
            controller: ControllerSettings {
                url: Some(server.url()),
                login: Some("admin".to_string()),
                password: Some("pw".to_string()),
                verify_tls: false,
                timeout: Duration::from_secs(5),
            },
        };
        let mut session = Session::new(SessionSettings {
            url: server.url(),
            login: "admin".to_string(),
            password: "pw".to_string(),
            verify_tls: false,
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        session.login().unwrap();

        clone_with(&ctx, &session, &clone_args()).unwrap();
        push.assert();
    }
}
