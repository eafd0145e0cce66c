//! Command dispatcher
//!
//! Resolves settings, builds the backend and routes each command to its
//! handler in [`crate::commands`].

mod normalization;
mod routing;

use crate::cli::args::{Cli, Command};
use crate::commands;
use crate::error::Result;
use crate::execution::Context;
use crate::packages::ManagerFactory;
use crate::ui as output;

pub use normalization::resolve_settings;

/// Dispatch the parsed CLI command. `ctx` is cancelled by the Ctrl-C handler.
pub fn dispatch(args: &Cli, ctx: &Context) -> Result<()> {
    let (settings, source) = resolve_settings(&args.global)?;
    if settings.verbose && !args.global.quiet {
        output::set_verbose(true);
    }
    let json = args.global.json;

    if let Command::Settings = args.command {
        return commands::settings::run(&settings, source.as_deref(), json);
    }

    let ctx = match settings.timeout() {
        Some(timeout) => ctx.with_timeout(timeout),
        None => ctx.clone(),
    };
    let factory = ManagerFactory::system(&settings)?;

    if let Command::Detect = args.command {
        let distro = factory.detect()?;
        return commands::detect::run(&distro, json);
    }

    let manager = factory.create(&ctx)?;
    output::debug(&format!("Using the {} backend", manager.name()));
    if !manager.is_available() {
        output::warning(&format!("'{}' was not found on PATH", manager.name()));
    }

    routing::route(manager.as_ref(), &ctx, &args.command, args.global.quiet, json)
}
