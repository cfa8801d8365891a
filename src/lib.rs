//! Shared library for the FAP configurator patchers.
//!
//! The crate exposes document I/O, the embedded document schemas, the typed
//! records for generated entries, and the two injectors used by the
//! `update-capabilities` and `update-rules` binaries. Each injector owns a
//! namespace inside its document (FAP option ids, `fap_`-prefixed rule ids),
//! deletes whatever it finds there and regenerates it, so running a binary
//! twice leaves the file exactly as the first run did.

pub mod capabilities;
pub mod cli_support;
pub mod config;
pub mod document;
pub mod model;
pub mod rules;
pub mod schema;

pub use capabilities::{
    CAPABILITY_INDENT, CapabilityReport, distinct_models, fap_capabilities, inject_capabilities,
    update_capabilities,
};
pub use config::{
    CAPABILITY_FILES, LOGIC_DIR_ENV, RULE_FILES, find_logic_dir, find_logic_dir_from,
    resolve_targets,
};
pub use document::{
    PatchOptions, Patched, load_document, patch_file, render_document, write_document,
};
pub use model::{
    CapabilityRecord, EffectKind, FAP_OPTION_IDS, FAP_RULE_PREFIX, FAP_WARRANTY_YEARS, FapTier,
    ModelId, OptionId, RuleCondition, RuleEffect, RuleRecord,
};
pub use rules::{RULE_INDENT, RuleReport, fap_rules, inject_rules, is_fap_rule, update_rules};
pub use schema::{DocumentKind, validate_document};
