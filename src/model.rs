//! Typed representation of the records this crate generates.
//!
//! Only generated entries are typed. Everything already present in a
//! configurator document travels as a raw `serde_json::Value` so unrelated
//! records keep their exact shape; the structs below exist to build the FAP
//! entries with a fixed field order (the order they are written to disk).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::RangeInclusive;

/// Option id of the superseded single-select tier option. Still removed so
/// documents patched by older tooling converge.
pub const FAP_SUPERSEDED_TIER: &str = "fap_warranty_tier";
pub const FAP_WARRANTY_YEARS: &str = "fap_warranty_years";

/// Every capability option id owned by the FAP patcher.
pub const FAP_OPTION_IDS: [&str; 5] = [
    FAP_SUPERSEDED_TIER,
    FAP_WARRANTY_YEARS,
    "fap_standard",
    "fap_gold",
    "fap_platinum",
];

/// Rule ids starting with this prefix belong to the FAP patcher.
pub const FAP_RULE_PREFIX: &str = "fap_";

pub const WARRANTY_YEARS: RangeInclusive<u64> = 1..=5;

const TIER_RULE_REASON: &str = "Only one FAP tier allowed.";

/// Product model identifier as stored in capability documents.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(pub String);

/// Configurable option identifier shared by capabilities and rules.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub String);

impl OptionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OptionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Warranty service tier. Each tier is its own boolean option; the rules
/// document makes them mutually exclusive.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum FapTier {
    Standard,
    Gold,
    Platinum,
}

impl FapTier {
    pub const ALL: [FapTier; 3] = [FapTier::Standard, FapTier::Gold, FapTier::Platinum];

    pub fn option_id(self) -> &'static str {
        match self {
            FapTier::Standard => "fap_standard",
            FapTier::Gold => "fap_gold",
            FapTier::Platinum => "fap_platinum",
        }
    }

    /// Short name used inside rule ids (`fap_<slug>_excludes_<slug>`).
    pub fn slug(self) -> &'static str {
        match self {
            FapTier::Standard => "standard",
            FapTier::Gold => "gold",
            FapTier::Platinum => "platinum",
        }
    }

    /// Standard coverage is selected unless the customer upgrades.
    pub fn default_on(self) -> bool {
        matches!(self, FapTier::Standard)
    }

    /// Allowed boolean values with the default first.
    fn value_order(self) -> [bool; 2] {
        if self.default_on() {
            [true, false]
        } else {
            [false, true]
        }
    }
}

/// One capability entry: model X supports option Y with these values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapabilityRecord {
    pub model_id: ModelId,
    pub model_label: String,
    pub option_id: OptionId,
    /// Human-readable rendering of `allowed_values`.
    pub raw: String,
    pub allowed_values: Vec<Value>,
}

impl CapabilityRecord {
    /// Boolean capability for a single tier.
    pub fn tier(model_id: &ModelId, model_label: &str, tier: FapTier) -> Self {
        let order = tier.value_order();
        let raw = order
            .iter()
            .map(|enabled| if *enabled { "yes" } else { "no" })
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            model_id: model_id.clone(),
            model_label: model_label.to_string(),
            option_id: OptionId::from(tier.option_id()),
            raw,
            allowed_values: order.into_iter().map(Value::Bool).collect(),
        }
    }

    /// Numeric warranty duration capability.
    pub fn warranty_years(model_id: &ModelId, model_label: &str) -> Self {
        let raw = WARRANTY_YEARS
            .map(|years| years.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            model_id: model_id.clone(),
            model_label: model_label.to_string(),
            option_id: OptionId::from(FAP_WARRANTY_YEARS),
            raw,
            allowed_values: WARRANTY_YEARS.map(Value::from).collect(),
        }
    }
}

/// Conditional constraint: when `when` holds, apply `effect`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleRecord {
    pub rule_id: String,
    pub when: RuleCondition,
    pub effect: RuleEffect,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleCondition {
    pub option_id: OptionId,
    pub value: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleEffect {
    #[serde(rename = "type")]
    pub kind: EffectKind,
    pub option_id: OptionId,
    pub value: Value,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Exclude,
}

impl RuleRecord {
    /// Selecting `selected` excludes `excluded`.
    pub fn exclusion(selected: FapTier, excluded: FapTier) -> Self {
        Self {
            rule_id: format!(
                "{FAP_RULE_PREFIX}{}_excludes_{}",
                selected.slug(),
                excluded.slug()
            ),
            when: RuleCondition {
                option_id: OptionId::from(selected.option_id()),
                value: Value::Bool(true),
            },
            effect: RuleEffect {
                kind: EffectKind::Exclude,
                option_id: OptionId::from(excluded.option_id()),
                value: Value::Bool(true),
            },
            reason: TIER_RULE_REASON.to_string(),
        }
    }
}
