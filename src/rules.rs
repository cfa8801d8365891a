//! FAP tier exclusion rules.
//!
//! The standard, gold and platinum tiers are separate boolean options, so the
//! rules document carries one exclusion per ordered pair to keep at most one
//! of them selected. Rules in the `fap_` namespace are owned here and are
//! replaced wholesale on every run.

use crate::document::{PatchOptions, Patched, patch_file, put_array, string_field, take_array};
use crate::model::{FAP_RULE_PREFIX, FapTier, RuleRecord};
use crate::schema::DocumentKind;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Rule files are written with two-space indentation.
pub const RULE_INDENT: usize = 2;

// Output order of the generated rules, as (selected, excluded).
const EXCLUSION_PAIRS: [(FapTier, FapTier); 6] = [
    (FapTier::Gold, FapTier::Standard),
    (FapTier::Gold, FapTier::Platinum),
    (FapTier::Platinum, FapTier::Standard),
    (FapTier::Platinum, FapTier::Gold),
    (FapTier::Standard, FapTier::Gold),
    (FapTier::Standard, FapTier::Platinum),
];

/// Counts from one rule injection pass.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RuleReport {
    pub removed: usize,
    pub added: usize,
}

/// Patch the rule document at `path`.
pub fn update_rules(path: &Path, options: &PatchOptions) -> Result<Patched<RuleReport>> {
    let patched = patch_file(path, DocumentKind::Rules, RULE_INDENT, options, inject_rules)?;
    debug!(
        path = %path.display(),
        removed = patched.report.removed,
        added = patched.report.added,
        "rules patched"
    );
    Ok(patched)
}

/// Rewrite the `rules` array of an in-memory document.
pub fn inject_rules(doc: &mut Value) -> Result<RuleReport> {
    let key = DocumentKind::Rules.array_key();
    let existing = take_array(doc, key)?;
    let before = existing.len();

    let mut kept = Vec::with_capacity(before + EXCLUSION_PAIRS.len());
    for (idx, rule) in existing.into_iter().enumerate() {
        let rule_id = string_field(&rule, "rule_id").with_context(|| format!("{key}[{idx}]"))?;
        if !is_fap_rule(rule_id) {
            kept.push(rule);
        }
    }
    let removed = before - kept.len();

    let generated = fap_rules();
    let added = generated.len();
    for rule in generated {
        kept.push(serde_json::to_value(rule).context("serializing generated rule")?);
    }

    put_array(doc, key, kept)?;
    Ok(RuleReport { removed, added })
}

/// The six tier exclusion rules in output order.
pub fn fap_rules() -> Vec<RuleRecord> {
    EXCLUSION_PAIRS
        .into_iter()
        .map(|(selected, excluded)| RuleRecord::exclusion(selected, excluded))
        .collect()
}

pub fn is_fap_rule(rule_id: &str) -> bool {
    rule_id.starts_with(FAP_RULE_PREFIX)
}
