use super::state::Outcome;
use crate::persona::BuyerProfile;
use serde::{Deserialize, Serialize};

/// How a closed deal splits between the two sides.
///
/// The formula is symmetric and documented, not secret: the final price is
/// placed between the buyer's opening anchor (all of the surplus to the
/// buyer) and the budget ceiling (all of it to the seller), scaled to
/// 0–100. `seller + buyer == 100` always.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealScore {
    pub seller: u32,
    pub buyer: u32,
}

pub fn deal_score(profile: &BuyerProfile, price: i64) -> DealScore {
    let ceiling = profile.constraints.budget_ceiling;
    let anchor = profile.opening_anchor();
    let span = (ceiling - anchor).max(1) as f64;
    let position = (price - anchor) as f64 / span;
    let seller = (position * 100.0).round().clamp(0.0, 100.0) as u32;
    DealScore {
        seller,
        buyer: 100 - seller,
    }
}

/// Coaching-oriented breakdown of the seller's performance over a full
/// transcript. Keyword-driven and fully deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total: u32,
    pub discovery: u32,
    pub objection_handling: u32,
    pub trust: u32,
    pub efficiency: u32,
    pub constraint_accuracy: u32,
    pub deal_quality: u32,
    pub coaching: Vec<String>,
    pub detected_constraints: Vec<String>,
    pub missed_constraints: Vec<String>,
}

fn has_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

pub fn score_session(
    seller_turns: &[String],
    profile: &BuyerProfile,
    outcome: Outcome,
) -> ScoreBreakdown {
    let seller_text = seller_turns.join(" ").to_lowercase();

    let asked_budget = has_any(&seller_text, &["budget", "out the door", "otd", "price"]);
    let asked_payment = has_any(&seller_text, &["payment", "per month", "monthly"]);
    let asked_trade = has_any(&seller_text, &["trade", "trade-in", "trade in"]);
    let asked_features = has_any(
        &seller_text,
        &["feature", "must-have", "awd", "4wd", "third row", "carplay", "mpg", "safety", "tow"],
    );
    let asked_timeline = has_any(&seller_text, &["timeline", "how soon", "when do you need"]);
    let transparency = has_any(
        &seller_text,
        &["fee", "fees", "breakdown", "transparent", "out the door total"],
    );
    let pressured = has_any(&seller_text, &["today only", "sign now", "last chance"]);

    let mut discovery = 0u32;
    discovery += if asked_budget { 8 } else { 0 };
    discovery += if asked_payment { 8 } else { 0 };
    discovery += if asked_features { 6 } else { 0 };
    discovery += if asked_trade { 5 } else { 0 };
    discovery += if asked_timeline { 3 } else { 0 };
    let discovery = discovery.min(30);

    let addressed_must_have = profile
        .must_haves
        .iter()
        .any(|m| seller_text.contains(&m.id.replace('_', " ")) || seller_text.contains(&m.id));

    let mut objection_handling = 0;
    objection_handling += if transparency { 5 } else { 0 };
    objection_handling += if addressed_must_have { 5 } else { 0 };
    objection_handling += if has_any(
        &seller_text,
        &["compare", "what would make you comfortable", "help me understand"],
    ) {
        5
    } else {
        0
    };
    let objection_handling = objection_handling.min(15);

    let mut trust: i32 = 0;
    trust += if transparency { 8 } else { 0 };
    trust += if has_any(&seller_text, &["no pressure", "take your time", "happy to"]) {
        4
    } else {
        0
    };
    trust -= if pressured { 10 } else { 0 };
    let trust = trust.clamp(0, 15) as u32;

    let efficiency = match seller_turns.len() {
        0..=6 => 15,
        7..=10 => 10,
        _ => 5,
    };

    let mut detected: Vec<String> = Vec::new();
    let mut missed: Vec<String> = Vec::new();
    let mut note = |key: &str, hit: bool| {
        if hit {
            detected.push(key.to_string());
        } else {
            missed.push(key.to_string());
        }
    };
    note("budget_ceiling", asked_budget);
    note("payment_ceiling", asked_payment);
    note("trade_in_value", asked_trade);
    note("must_have_features", addressed_must_have);

    let constraint_accuracy = (4 * u32::try_from(detected.len()).unwrap_or(0)).min(15);

    let mut deal_quality = 0;
    deal_quality += if has_any(&seller_text, &["out the door", "otd"]) {
        5
    } else {
        0
    };
    deal_quality += if pressured { 0 } else { 5 };
    let deal_quality = if outcome == Outcome::WalkedAway {
        0
    } else {
        deal_quality.min(10)
    };

    let mut coaching = Vec::new();
    if !asked_budget {
        coaching.push("Ask for an out-the-door budget early.".to_string());
    }
    if !asked_payment {
        coaching.push("Confirm the monthly payment target and term assumptions.".to_string());
    }
    if !asked_features {
        coaching.push("Clarify must-have features before presenting options.".to_string());
    }
    if !transparency {
        coaching.push("Offer a clear fee breakdown and out-the-door total.".to_string());
    }
    if pressured {
        coaching.push("Avoid pressure language. It reduces trust and score.".to_string());
    }

    let total =
        (discovery + objection_handling + trust + efficiency + constraint_accuracy + deal_quality)
            .min(100);

    ScoreBreakdown {
        total,
        discovery,
        objection_handling,
        trust,
        efficiency,
        constraint_accuracy,
        deal_quality,
        coaching,
        detected_constraints: detected,
        missed_constraints: missed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::{ConcessionPlan, Constraints, MustHave, TraitSet};

    fn profile() -> BuyerProfile {
        BuyerProfile {
            archetype_id: "hawk".into(),
            style_id: "analytical".into(),
            traits: TraitSet {
                patience: 1.0,
                price_sensitivity: 0.8,
                trust: 0.5,
            },
            constraints: Constraints {
                budget_ceiling: 40_000,
                payment_ceiling: 600,
                trade_in_value: 5_000,
            },
            must_haves: vec![MustHave {
                id: "third_row".into(),
                attribute: "seating".into(),
                line: "I need the third row.".into(),
            }],
            concession: ConcessionPlan {
                anchor_offset: 0.20,
                concession_rate: 0.3,
                concession_decay: 0.9,
                walk_away_threshold: 0.2,
                patience_budget: 3,
                raises_objections: true,
            },
        }
    }

    #[test]
    fn deal_score_is_symmetric_and_anchored() {
        let p = profile();
        // anchor = 32_000, ceiling = 40_000.
        assert_eq!(deal_score(&p, 32_000), DealScore { seller: 0, buyer: 100 });
        assert_eq!(deal_score(&p, 40_000), DealScore { seller: 100, buyer: 0 });
        let mid = deal_score(&p, 36_000);
        assert_eq!(mid.seller, 50);
        assert_eq!(mid.seller + mid.buyer, 100);
    }

    #[test]
    fn deal_score_clamps_outside_the_span() {
        let p = profile();
        assert_eq!(deal_score(&p, 10_000).seller, 0);
        assert_eq!(deal_score(&p, 90_000).seller, 100);
    }

    #[test]
    fn thorough_discovery_scores_high() {
        let turns = vec![
            "What's your out-the-door budget and monthly payment target?".to_string(),
            "Any trade in? And must-have features like a third row?".to_string(),
            "Here's the full fee breakdown, no pressure.".to_string(),
        ];
        let score = score_session(&turns, &profile(), Outcome::Deal);
        assert_eq!(score.discovery, 27);
        assert!(score.trust >= 12);
        assert_eq!(score.efficiency, 15);
        assert!(score.detected_constraints.contains(&"budget_ceiling".to_string()));
        assert!(score.missed_constraints.is_empty());
        assert!(score.coaching.is_empty());
        assert!(score.total > 70);
    }

    #[test]
    fn pressure_language_costs_trust_and_earns_coaching() {
        let turns = vec!["Sign now, today only, last chance!".to_string()];
        let score = score_session(&turns, &profile(), Outcome::Ongoing);
        assert_eq!(score.trust, 0);
        assert!(
            score
                .coaching
                .iter()
                .any(|c| c.contains("pressure language"))
        );
    }

    #[test]
    fn walked_away_zeroes_deal_quality() {
        let turns = vec!["Our price is our price, out the door.".to_string()];
        let score = score_session(&turns, &profile(), Outcome::WalkedAway);
        assert_eq!(score.deal_quality, 0);
    }

    #[test]
    fn empty_transcript_scores_only_efficiency() {
        let score = score_session(&[], &profile(), Outcome::Ongoing);
        assert_eq!(score.discovery, 0);
        assert_eq!(score.efficiency, 15);
        assert_eq!(score.detected_constraints.len(), 0);
        assert_eq!(score.missed_constraints.len(), 4);
    }
}
