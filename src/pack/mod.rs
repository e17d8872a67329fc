pub mod schema;

pub use schema::{
    Archetype, Bucket, ConstraintRange, CountRange, DataPack, Distribution, Objection, RangeSpec,
    Style, TraitRanges,
};

use crate::error::PackError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Constraint ids every pack must declare.
pub const REQUIRED_CONSTRAINTS: [&str; 3] =
    ["budget_ceiling", "payment_ceiling", "trade_in_value"];

impl DataPack {
    /// Parse and validate a pack from a JSON document. Schema violations are
    /// rejected here, before any seed is processed.
    pub fn from_json_str(json: &str) -> Result<Self, PackError> {
        let pack: DataPack =
            serde_json::from_str(json).map_err(|e| PackError::Load(e.to_string()))?;
        pack.validate()?;
        Ok(pack)
    }

    pub fn load(path: &Path) -> Result<Self, PackError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn constraint(&self, id: &str) -> Option<&ConstraintRange> {
        self.constraint_ranges.iter().find(|c| c.id == id)
    }

    /// Stable fingerprint of the pack content: SHA-256 of the canonical JSON
    /// serialization, truncated to 16 hex chars. Recorded on every run so a
    /// replay can prove it used the same pack.
    pub fn pack_hash(&self) -> String {
        let canonical = serde_json::to_string(self).unwrap_or_default();
        let digest = Sha256::digest(canonical.as_bytes());
        let mut fingerprint = hex::encode(digest);
        fingerprint.truncate(16);
        fingerprint
    }

    /// Structural checks. Never falls back to defaults for an invalid pack.
    pub fn validate(&self) -> Result<(), PackError> {
        if self.version.trim().is_empty() {
            return Err(PackError::Validation("pack version is empty".into()));
        }
        if self.max_rounds == 0 {
            return Err(PackError::Validation("max_rounds must be at least 1".into()));
        }

        check_weighted_category(
            "archetypes",
            self.archetypes.iter().map(|a| (a.id.as_str(), a.weight)),
        )?;
        check_weighted_category(
            "styles",
            self.styles.iter().map(|s| (s.id.as_str(), s.weight)),
        )?;
        check_weighted_category(
            "objections",
            self.objections.iter().map(|o| (o.id.as_str(), o.weight)),
        )?;

        for archetype in &self.archetypes {
            for (name, range) in [
                ("patience", &archetype.traits.patience),
                ("price_sensitivity", &archetype.traits.price_sensitivity),
                ("trust", &archetype.traits.trust),
            ] {
                if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
                    return Err(PackError::Validation(format!(
                        "archetype {} trait {name} has malformed range [{}, {}]",
                        archetype.id, range.min, range.max
                    )));
                }
            }
        }

        for style in &self.styles {
            validate_style(style)?;
        }

        for required in REQUIRED_CONSTRAINTS {
            if self.constraint(required).is_none() {
                return Err(PackError::Validation(format!(
                    "missing required constraint range {required}"
                )));
            }
        }
        for range in &self.constraint_ranges {
            validate_constraint(range)?;
        }

        let available = u32::try_from(self.objections.len()).unwrap_or(u32::MAX);
        if self.objection_count.min > self.objection_count.max {
            return Err(PackError::Validation(format!(
                "objection_count min {} exceeds max {}",
                self.objection_count.min, self.objection_count.max
            )));
        }
        if self.objection_count.max > available {
            return Err(PackError::Validation(format!(
                "objection_count max {} exceeds catalog size {available}",
                self.objection_count.max
            )));
        }

        Ok(())
    }
}

fn check_weighted_category<'a>(
    category: &str,
    entries: impl Iterator<Item = (&'a str, f64)>,
) -> Result<(), PackError> {
    let mut seen = std::collections::HashSet::new();
    let mut any_positive = false;
    let mut count = 0usize;

    for (id, weight) in entries {
        count += 1;
        if !seen.insert(id.to_string()) {
            return Err(PackError::Validation(format!(
                "duplicate id {id:?} in {category}"
            )));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(PackError::Validation(format!(
                "{category} entry {id:?} has invalid weight {weight}"
            )));
        }
        if weight > 0.0 {
            any_positive = true;
        }
    }

    if count == 0 {
        return Err(PackError::Validation(format!("{category} is empty")));
    }
    if !any_positive {
        return Err(PackError::Validation(format!(
            "{category} has no entry with positive weight"
        )));
    }
    Ok(())
}

fn validate_style(style: &Style) -> Result<(), PackError> {
    let id = &style.id;
    if !(0.0..1.0).contains(&style.anchor_offset) {
        return Err(PackError::Validation(format!(
            "style {id} anchor_offset {} outside [0, 1)",
            style.anchor_offset
        )));
    }
    if !(style.concession_rate > 0.0 && style.concession_rate <= 1.0) {
        return Err(PackError::Validation(format!(
            "style {id} concession_rate {} outside (0, 1]",
            style.concession_rate
        )));
    }
    if !(style.concession_decay > 0.0 && style.concession_decay <= 1.0) {
        return Err(PackError::Validation(format!(
            "style {id} concession_decay {} outside (0, 1]",
            style.concession_decay
        )));
    }
    if !(style.walk_away_threshold > 0.0 && style.walk_away_threshold.is_finite()) {
        return Err(PackError::Validation(format!(
            "style {id} walk_away_threshold {} must be positive",
            style.walk_away_threshold
        )));
    }
    Ok(())
}

fn validate_constraint(range: &ConstraintRange) -> Result<(), PackError> {
    match &range.distribution {
        Distribution::Uniform { min, max } => {
            if min > max {
                return Err(PackError::Validation(format!(
                    "constraint {} has inverted range [{min}, {max}]",
                    range.id
                )));
            }
        }
        Distribution::WeightedBuckets { buckets } => {
            if buckets.is_empty() {
                return Err(PackError::Validation(format!(
                    "constraint {} has no buckets",
                    range.id
                )));
            }
            let mut any_positive = false;
            for bucket in buckets {
                if bucket.min > bucket.max {
                    return Err(PackError::Validation(format!(
                        "constraint {} bucket has inverted range [{}, {}]",
                        range.id, bucket.min, bucket.max
                    )));
                }
                if !bucket.weight.is_finite() || bucket.weight < 0.0 {
                    return Err(PackError::Validation(format!(
                        "constraint {} bucket has invalid weight {}",
                        range.id, bucket.weight
                    )));
                }
                if bucket.weight > 0.0 {
                    any_positive = true;
                }
            }
            if !any_positive {
                return Err(PackError::Validation(format!(
                    "constraint {} has no bucket with positive weight",
                    range.id
                )));
            }
        }
    }
    Ok(())
}
