//! # distropkg
//!
//! One package-management contract over apt, dnf, yum, pacman and zypper.
//! See [`packages`] for the contract and the factory that selects a backend.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod execution;
pub mod packages;
pub mod ui;
pub mod utils;

use clap::Parser;
use execution::Context;
use std::process::exit;

/// Run distropkg CLI entrypoint.
pub fn run_cli() {
    // 0. Initialize color settings (must be first)
    ui::init_colors();

    // 1. Signal handling: cancelling the context kills the running child
    let ctx = Context::new();
    let handler_ctx = ctx.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!();
        handler_ctx.cancel();
        ui::warning("Operation cancelled by user.");
    }) {
        ui::warning(&format!("Could not install Ctrl-C handler: {}", e));
    }

    // 2. Parse & Run
    let args = cli::args::Cli::parse();
    ui::set_quiet(args.global.quiet);
    ui::set_verbose(args.global.verbose);

    if let Err(e) = cli::dispatcher::dispatch(&args, &ctx) {
        ui::error(&format!("{}", e));
        exit(1);
    }
}
