#![allow(dead_code)]

use dealsim::DataPack;
use dealsim::persona::{BuyerProfile, ConcessionPlan, Constraints, MustHave, TraitSet};

pub const DEFAULT_PACK_JSON: &str = include_str!("../../packs/default.v1.json");

pub fn default_pack() -> DataPack {
    DataPack::from_json_str(DEFAULT_PACK_JSON).expect("checked-in pack is valid")
}

/// Hand-built profile with a chosen style, so style-independent properties
/// can be asserted without hunting for seeds.
pub fn profile_with_style(style_id: &str) -> BuyerProfile {
    let pack = default_pack();
    let style = pack
        .styles
        .iter()
        .find(|s| s.id == style_id)
        .unwrap_or_else(|| panic!("style {style_id} in default pack"));

    BuyerProfile {
        archetype_id: "family_hauler".into(),
        style_id: style.id.clone(),
        traits: TraitSet {
            patience: 2.0,
            price_sensitivity: 0.6,
            trust: 0.5,
        },
        constraints: Constraints {
            budget_ceiling: 36_000,
            payment_ceiling: 550,
            trade_in_value: 4_000,
        },
        must_haves: vec![MustHave {
            id: "third_row".into(),
            attribute: "seating".into(),
            line: "Without a third row this doesn't work for my family.".into(),
        }],
        concession: ConcessionPlan {
            anchor_offset: style.anchor_offset,
            concession_rate: style.concession_rate,
            concession_decay: style.concession_decay,
            walk_away_threshold: style.walk_away_threshold,
            patience_budget: style.patience_budget,
            raises_objections: style.raises_objections,
        },
    }
}
