//! Embedded JSON Schemas for the documents the patchers rewrite.
//!
//! The schemas under `schema/` only pin the fields the patchers read
//! (`capabilities[].model_id/model_label/option_id`, `rules[].rule_id`).
//! Validation runs before any mutation so a malformed document fails with
//! every violation listed instead of the first missing key.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;

const CAPABILITY_DOCUMENT_SCHEMA: &str = include_str!("../schema/capability_document.json");
const RULE_DOCUMENT_SCHEMA: &str = include_str!("../schema/rule_document.json");

/// Which configurator document a file holds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DocumentKind {
    Capabilities,
    Rules,
}

impl DocumentKind {
    /// Top-level key holding the patched array.
    pub fn array_key(self) -> &'static str {
        match self {
            DocumentKind::Capabilities => "capabilities",
            DocumentKind::Rules => "rules",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Capabilities => "capability document",
            DocumentKind::Rules => "rule document",
        }
    }

    fn schema_source(self) -> &'static str {
        match self {
            DocumentKind::Capabilities => CAPABILITY_DOCUMENT_SCHEMA,
            DocumentKind::Rules => RULE_DOCUMENT_SCHEMA,
        }
    }
}

/// Compile the embedded schema for `kind`.
pub fn compile_schema(kind: DocumentKind) -> Result<JSONSchema> {
    let schema: Value = serde_json::from_str(kind.schema_source())
        .with_context(|| format!("parsing embedded {} schema", kind.label()))?;
    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| anyhow!("compiling {} schema: {err}", kind.label()))?;
    Ok(compiled)
}

/// Check `doc` against the schema for `kind`, reporting all violations.
pub fn validate_document(kind: DocumentKind, doc: &Value) -> Result<()> {
    let compiled = compile_schema(kind)?;
    if let Err(errors) = compiled.validate(doc) {
        let details = errors
            .map(|err| {
                let location = err.instance_path.to_string();
                if location.is_empty() {
                    format!("(root): {err}")
                } else {
                    format!("{location}: {err}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        bail!("{} failed validation:\n{}", kind.label(), details);
    }
    Ok(())
}
