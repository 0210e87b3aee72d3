//! Subcommand handlers.

mod clone;
mod epg_vlan;

use color_eyre::eyre::{Result, WrapErr};
use tracing::debug;

use super::args::{Args, Commands};
use super::prompt;
use crate::apic::Session;
use crate::config::{self, ControllerSettings, Overrides};
use crate::constants;
use crate::model::ManagedObject;

/// Settings shared by every subcommand.
pub struct Context {
    pub verbose: bool,
    pub dry_run: bool,
    controller: ControllerSettings,
}

impl Context {
    /// Prompt for anything missing, then open and authenticate a session.
    pub fn connect(&self) -> Result<Session> {
        let settings = prompt::complete(self.controller.clone())?;
        debug!(?settings, "connecting to APIC");

        let mut session = Session::new(settings)?;
        session.login().wrap_err(constants::CLI_MSG_LOGIN_FAILED)?;
        Ok(session)
    }
}

/// Pretty JSON for a managed-object tree (keys sorted).
pub fn pretty(mo: &ManagedObject) -> Result<String> {
    Ok(serde_json::to_string_pretty(&mo.to_json())?)
}

/// Resolve configuration and run the selected subcommand.
pub fn run(args: Args) -> Result<()> {
    let explicit = args
        .config
        .as_deref()
        .map(|p| config::expand_home(&p.to_string_lossy()));
    let file = config::load(explicit.as_deref())?;

    let ctx = Context {
        verbose: args.verbose,
        dry_run: args.dry_run,
        controller: file.merge(Overrides {
            url: args.url,
            login: args.login,
            password: args.password,
            insecure: args.insecure,
        }),
    };

    match args.command {
        Commands::EpgVlan(cmd) => epg_vlan::run(&ctx, &cmd),
        Commands::ClonePolicyGroup(cmd) => clone::run(&ctx, &cmd),
    }
}
