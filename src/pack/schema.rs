use serde::{Deserialize, Serialize};

// ── Top-level pack ────────────────────────────────────────────────

/// Versioned, read-only configuration a run is generated from.
///
/// Deserialized once, validated once, then treated as immutable; no
/// downstream code ever touches raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPack {
    /// Pack version tag, recorded on every run (e.g. "v1").
    pub version: String,
    /// Hard cap on negotiation rounds; the state machine always terminates
    /// within this bound.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
    pub archetypes: Vec<Archetype>,
    pub styles: Vec<Style>,
    /// Ordered objection catalog. Catalog order is the priority order in
    /// which a buyer raises objections.
    pub objections: Vec<Objection>,
    pub constraint_ranges: Vec<ConstraintRange>,
    #[serde(default)]
    pub objection_count: CountRange,
}

fn default_max_rounds() -> u32 {
    12
}

// ── Archetypes ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Archetype {
    pub id: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    pub traits: TraitRanges,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitRanges {
    /// Extra patience in rounds, added to the style's patience budget.
    pub patience: RangeSpec,
    pub price_sensitivity: RangeSpec,
    pub trust: RangeSpec,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RangeSpec {
    pub min: f64,
    pub max: f64,
}

// ── Negotiation styles ────────────────────────────────────────────

/// Concession-curve parameters. Copied verbatim into the generated profile;
/// behavior differences between styles are attributable to these numbers,
/// never to extra randomization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Style {
    pub id: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Opening counter sits at `budget_ceiling * (1 - anchor_offset)`.
    pub anchor_offset: f64,
    /// Fraction of the remaining gap conceded per round.
    pub concession_rate: f64,
    /// Per-round multiplier on the concession (negotiation fatigue).
    #[serde(default = "default_concession_decay")]
    pub concession_decay: f64,
    /// Gap beyond `walk_away_threshold * budget_ceiling` drains patience.
    pub walk_away_threshold: f64,
    /// Rounds of over-threshold gap tolerated before walking.
    #[serde(default = "default_patience_budget")]
    pub patience_budget: u32,
    /// Whether this style raises must-have objections while conceding.
    #[serde(default = "default_true")]
    pub raises_objections: bool,
}

fn default_weight() -> f64 {
    1.0
}

fn default_concession_decay() -> f64 {
    0.9
}

fn default_patience_budget() -> u32 {
    3
}

fn default_true() -> bool {
    true
}

// ── Objection catalog ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objection {
    pub id: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Vehicle attribute this objection is tied to (e.g. "drivetrain").
    pub attribute: String,
    /// The buyer's line when raising this objection.
    pub line: String,
}

// ── Numeric constraint ranges ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintRange {
    pub id: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(flatten)]
    pub distribution: Distribution,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "distribution", rename_all = "snake_case")]
pub enum Distribution {
    Uniform { min: i64, max: i64 },
    WeightedBuckets { buckets: Vec<Bucket> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucket {
    pub min: i64,
    pub max: i64,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl ConstraintRange {
    /// Declared outer bounds, regardless of distribution shape.
    pub fn bounds(&self) -> (i64, i64) {
        match &self.distribution {
            Distribution::Uniform { min, max } => (*min, *max),
            Distribution::WeightedBuckets { buckets } => {
                let min = buckets.iter().map(|b| b.min).min().unwrap_or(0);
                let max = buckets.iter().map(|b| b.max).max().unwrap_or(0);
                (min, max)
            }
        }
    }
}

// ── Objection subset size ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl Default for CountRange {
    fn default() -> Self {
        Self { min: 1, max: 3 }
    }
}
