//! Injects the FAP tier exclusion rules into configurator rule documents.
//!
//! Removes every rule whose id starts with `fap_` and appends the six rules
//! that keep the standard, gold and platinum tiers mutually exclusive.

use anyhow::Result;
use fap_patch::cli_support::{CliArgs, init_tracing};
use fap_patch::{PatchOptions, RULE_FILES, resolve_targets, update_rules};
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

    let targets = resolve_targets(args.targets, &RULE_FILES)?;
    let options = PatchOptions {
        dry_run: args.dry_run,
    };

    for target in &targets {
        let patched = update_rules(target, &options)?;
        info!(
            path = %target.display(),
            removed = patched.report.removed,
            added = patched.report.added,
            "rule document processed"
        );
        if options.dry_run {
            println!("{}", patched.rendered);
        }
    }

    if !options.dry_run {
        println!("Rules updated successfully.");
    }
    Ok(())
}

fn usage() -> &'static str {
    "Usage: update-rules [--dry-run] [--verbose] [PATH...]\n\
Replaces the fap_ tier exclusion rules in each rule document (default: rules.json under $FAP_LOGIC_DIR or ./src/logic).\n"
}
