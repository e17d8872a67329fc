use serde::{Deserialize, Serialize};

/// The deterministic output of persona generation. Immutable after creation
/// and owned exclusively by the run that generated it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyerProfile {
    pub archetype_id: String,
    pub style_id: String,
    pub traits: TraitSet,
    pub constraints: Constraints,
    /// Prioritized must-have objections, in catalog order. First in list is
    /// first raised.
    pub must_haves: Vec<MustHave>,
    /// Style parameters copied verbatim from the selected style entry.
    pub concession: ConcessionPlan,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitSet {
    /// Extra rounds of patience, added to the style's patience budget.
    pub patience: f64,
    pub price_sensitivity: f64,
    pub trust: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    /// Maximum out-the-door price the buyer will ever accept.
    pub budget_ceiling: i64,
    /// Maximum monthly payment.
    pub payment_ceiling: i64,
    /// What the buyer expects for their trade-in.
    pub trade_in_value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MustHave {
    pub id: String,
    pub attribute: String,
    pub line: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcessionPlan {
    pub anchor_offset: f64,
    pub concession_rate: f64,
    pub concession_decay: f64,
    pub walk_away_threshold: f64,
    pub patience_budget: u32,
    pub raises_objections: bool,
}

impl BuyerProfile {
    /// The buyer's opening counter-offer: the ceiling discounted by the
    /// style's anchor offset.
    pub fn opening_anchor(&self) -> i64 {
        let ceiling = self.constraints.budget_ceiling as f64;
        (ceiling * (1.0 - self.concession.anchor_offset)).round() as i64
    }

    /// Absolute gap (in dollars) beyond which patience drains.
    pub fn walk_away_band(&self) -> i64 {
        let ceiling = self.constraints.budget_ceiling as f64;
        (ceiling * self.concession.walk_away_threshold).round() as i64
    }

    /// Rounds of over-threshold gap tolerated before walking: the style's
    /// budget plus the archetype's patience trait.
    pub fn patience_limit(&self) -> u32 {
        let bonus = self.traits.patience.max(0.0).round() as u32;
        self.concession.patience_budget + bonus
    }
}
