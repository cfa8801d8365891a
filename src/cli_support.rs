use anyhow::{Result, bail};
use std::env;
use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

// Argument handling shared by update-capabilities and update-rules. Both
// binaries take the same flags and differ only in which injector runs.

#[derive(Debug, Default, PartialEq)]
pub struct CliArgs {
    pub targets: Vec<PathBuf>,
    pub dry_run: bool,
    pub verbose: bool,
    pub show_help: bool,
}

impl CliArgs {
    pub fn parse() -> Result<Self> {
        Self::parse_from(env::args_os().skip(1))
    }

    pub fn parse_from(args: impl IntoIterator<Item = OsString>) -> Result<Self> {
        let mut parsed = CliArgs::default();
        let mut positional_only = false;

        for arg_os in args {
            if positional_only {
                parsed.targets.push(PathBuf::from(arg_os));
                continue;
            }
            match arg_os.to_str() {
                Some("--dry-run") => parsed.dry_run = true,
                Some("--verbose") | Some("-v") => parsed.verbose = true,
                Some("--help") | Some("-h") => parsed.show_help = true,
                Some("--") => positional_only = true,
                Some(flag) if flag.starts_with('-') && flag.len() > 1 => {
                    bail!("unknown flag: {flag}")
                }
                _ => parsed.targets.push(PathBuf::from(arg_os)),
            }
        }

        Ok(parsed)
    }
}

/// Install the stderr subscriber: warnings always, debug detail with `--verbose`.
pub fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_max_level(level)
        .with_target(false)
        .init();
}
