//! Target discovery for the patcher binaries.
//!
//! Operators normally pass target files explicitly. When they do not, the
//! default file names are resolved under the configurator's logic directory,
//! found via `FAP_LOGIC_DIR` or by walking up from the working directory.

use anyhow::{Context, Result, bail};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const LOGIC_DIR_ENV: &str = "FAP_LOGIC_DIR";

/// Location of the logic directory relative to a configurator checkout.
const LOGIC_DIR: &str = "src/logic";
const LOGIC_SENTINEL: &str = "capabilities.json";

/// Capability documents patched when no paths are given.
pub const CAPABILITY_FILES: [&str; 2] = ["capabilities.json", "blue_label_capabilities.json"];
/// Rule documents patched when no paths are given.
pub const RULE_FILES: [&str; 1] = ["rules.json"];

/// Use `explicit` when non-empty, otherwise `defaults` under the logic dir.
pub fn resolve_targets(explicit: Vec<PathBuf>, defaults: &[&str]) -> Result<Vec<PathBuf>> {
    if !explicit.is_empty() {
        return Ok(explicit);
    }
    let logic_dir = find_logic_dir()?;
    debug!(logic_dir = %logic_dir.display(), "using default targets");
    Ok(defaults.iter().map(|name| logic_dir.join(name)).collect())
}

/// Locate the configurator logic directory.
///
/// Honors `FAP_LOGIC_DIR` when it names an existing directory, then searches
/// upwards from the current directory for `src/logic/capabilities.json`.
pub fn find_logic_dir() -> Result<PathBuf> {
    let hint = env::var(LOGIC_DIR_ENV).ok();
    let cwd = env::current_dir().context("reading current directory")?;
    find_logic_dir_from(hint.as_deref(), &cwd)
}

/// Same as `find_logic_dir` with the environment passed in.
pub fn find_logic_dir_from(hint: Option<&str>, start: &Path) -> Result<PathBuf> {
    if let Some(hint) = hint {
        if let Some(dir) = logic_dir_from_hint(hint) {
            return Ok(dir);
        }
        warn!(hint, "{LOGIC_DIR_ENV} does not name a directory; searching upwards");
    }

    if let Some(dir) = search_upwards(start) {
        return Ok(dir);
    }

    bail!(
        "Unable to locate the configurator logic directory. Pass target files explicitly or set {LOGIC_DIR_ENV}."
    );
}

fn logic_dir_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !hint_path.is_dir() {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        let candidate = dir.join(LOGIC_DIR);
        if candidate.join(LOGIC_SENTINEL).is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn checkout() -> TempDir {
        let root = TempDir::new().unwrap();
        let logic = root.path().join(LOGIC_DIR);
        fs::create_dir_all(&logic).unwrap();
        fs::write(logic.join(LOGIC_SENTINEL), "{\"capabilities\": []}").unwrap();
        fs::create_dir_all(root.path().join("src/components/deep")).unwrap();
        root
    }

    #[test]
    fn finds_logic_dir_from_nested_directory() {
        let root = checkout();
        let start = root.path().join("src/components/deep");
        let found = find_logic_dir_from(None, &start).unwrap();
        assert_eq!(found, fs::canonicalize(root.path().join(LOGIC_DIR)).unwrap());
    }

    #[test]
    fn hint_takes_precedence() {
        let root = checkout();
        let other = TempDir::new().unwrap();
        let found =
            find_logic_dir_from(Some(other.path().to_str().unwrap()), root.path()).unwrap();
        assert_eq!(found, fs::canonicalize(other.path()).unwrap());
    }

    #[test]
    fn bogus_hint_falls_back_to_search() {
        let root = checkout();
        let found = find_logic_dir_from(Some("/definitely/not/here"), root.path()).unwrap();
        assert_eq!(found, fs::canonicalize(root.path().join(LOGIC_DIR)).unwrap());
    }

    #[test]
    fn explicit_targets_skip_discovery() {
        let explicit = vec![PathBuf::from("/tmp/a.json"), PathBuf::from("/tmp/b.json")];
        let targets = resolve_targets(explicit.clone(), &CAPABILITY_FILES).unwrap();
        assert_eq!(targets, explicit);
    }
}
