//! FAP capability injection.
//!
//! Strips every capability whose option id belongs to the FAP family, then
//! appends a fresh set of four records (standard, gold, platinum, years) for
//! each model still present. Because the previous output is removed before
//! regenerating, repeated runs converge on the same document.

use crate::document::{PatchOptions, Patched, patch_file, put_array, string_field, take_array};
use crate::model::{CapabilityRecord, FAP_OPTION_IDS, FapTier, ModelId};
use crate::schema::DocumentKind;
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Capability files are written with four-space indentation.
pub const CAPABILITY_INDENT: usize = 4;

/// Counts from one capability injection pass.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CapabilityReport {
    /// FAP entries dropped before regeneration.
    pub removed: usize,
    /// Distinct models found among the remaining entries.
    pub models: usize,
    pub added: usize,
}

/// Patch the capability document at `path`.
pub fn update_capabilities(
    path: &Path,
    options: &PatchOptions,
) -> Result<Patched<CapabilityReport>> {
    let patched = patch_file(
        path,
        DocumentKind::Capabilities,
        CAPABILITY_INDENT,
        options,
        inject_capabilities,
    )?;
    debug!(
        path = %path.display(),
        removed = patched.report.removed,
        models = patched.report.models,
        added = patched.report.added,
        "capabilities patched"
    );
    Ok(patched)
}

/// Rewrite the `capabilities` array of an in-memory document.
pub fn inject_capabilities(doc: &mut Value) -> Result<CapabilityReport> {
    let key = DocumentKind::Capabilities.array_key();
    let existing = take_array(doc, key)?;
    let before = existing.len();

    let mut kept = Vec::with_capacity(before);
    for (idx, capability) in existing.into_iter().enumerate() {
        let option_id =
            string_field(&capability, "option_id").with_context(|| format!("{key}[{idx}]"))?;
        if !FAP_OPTION_IDS.contains(&option_id) {
            kept.push(capability);
        }
    }
    let removed = before - kept.len();

    let models = distinct_models(&kept)?;
    let mut added = 0;
    for (model_id, model_label) in &models {
        for record in fap_capabilities(model_id, model_label) {
            kept.push(serde_json::to_value(record).context("serializing generated capability")?);
            added += 1;
        }
    }

    put_array(doc, key, kept)?;
    Ok(CapabilityReport {
        removed,
        models: models.len(),
        added,
    })
}

/// Distinct `(model_id, model_label)` pairs in first-seen order.
///
/// A model id that shows up again under a different label keeps its first
/// label; the mismatch is logged.
pub fn distinct_models(capabilities: &[Value]) -> Result<Vec<(ModelId, String)>> {
    let mut first_labels: BTreeMap<&str, &str> = BTreeMap::new();
    let mut models = Vec::new();
    for (idx, capability) in capabilities.iter().enumerate() {
        let model_id = string_field(capability, "model_id")
            .with_context(|| format!("capabilities[{idx}]"))?;
        let model_label = string_field(capability, "model_label")
            .with_context(|| format!("capabilities[{idx}]"))?;
        match first_labels.get(model_id) {
            Some(first) if *first != model_label => {
                warn!(
                    model_id,
                    kept = *first,
                    ignored = model_label,
                    "model id appears with conflicting labels; keeping the first"
                );
            }
            Some(_) => {}
            None => {
                first_labels.insert(model_id, model_label);
                models.push((ModelId(model_id.to_string()), model_label.to_string()));
            }
        }
    }
    Ok(models)
}

/// The four FAP capabilities for one model, in output order.
pub fn fap_capabilities(model_id: &ModelId, model_label: &str) -> Vec<CapabilityRecord> {
    FapTier::ALL
        .into_iter()
        .map(|tier| CapabilityRecord::tier(model_id, model_label, tier))
        .chain(std::iter::once(CapabilityRecord::warranty_years(
            model_id,
            model_label,
        )))
        .collect()
}
