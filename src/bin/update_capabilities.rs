//! Injects the FAP warranty-tier capabilities into configurator capability
//! documents.
//!
//! Every model found in a document gets boolean `fap_standard`, `fap_gold`
//! and `fap_platinum` options plus a numeric `fap_warranty_years` option.
//! Targets come from the command line, or default to the capability files in
//! the configurator logic directory. Files are processed in order and the run
//! stops at the first failure.

use anyhow::Result;
use fap_patch::cli_support::{CliArgs, init_tracing};
use fap_patch::{CAPABILITY_FILES, PatchOptions, resolve_targets, update_capabilities};
use tracing::info;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse()?;
    if args.show_help {
        print!("{}", usage());
        return Ok(());
    }
    init_tracing(args.verbose);

    let targets = resolve_targets(args.targets, &CAPABILITY_FILES)?;
    let options = PatchOptions {
        dry_run: args.dry_run,
    };

    for target in &targets {
        let patched = update_capabilities(target, &options)?;
        info!(
            path = %target.display(),
            models = patched.report.models,
            added = patched.report.added,
            "capability document processed"
        );
        if options.dry_run {
            println!("{}", patched.rendered);
        }
    }

    if !options.dry_run {
        println!("Capabilities updated successfully with separate boolean tiers.");
    }
    Ok(())
}

fn usage() -> &'static str {
    "Usage: update-capabilities [--dry-run] [--verbose] [PATH...]\n\
Replaces the FAP warranty capabilities in each capability document (default: capabilities.json and blue_label_capabilities.json under $FAP_LOGIC_DIR or ./src/logic).\n"
}
