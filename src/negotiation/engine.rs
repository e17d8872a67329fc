use super::language::{
    SAFE_REDIRECT, base_line, contains_pressure, detect_disallowed, extract_keywords,
    opening_line, parse_monthly, parse_offer,
};
use super::state::{BuyerReply, NegotiationState, Outcome, SellerMessage};
use crate::error::NegotiationError;
use crate::persona::BuyerProfile;
use tracing::debug;

/// The buyer speaks first. Emitted by the runner as transcript turn 0;
/// never advances the round counter.
pub fn opening_reply(profile: &BuyerProfile) -> BuyerReply {
    BuyerReply {
        text: opening_line(profile),
        counter_offer: None,
        objection: None,
        tags: vec!["opening".into()],
    }
}

/// Advance the state machine by one seller turn.
///
/// Pure and total: every `(state, seller turn)` pair maps to exactly one
/// next state, with no hidden randomness. Errors reject the turn without
/// mutating anything; the caller may retry with a corrected turn.
///
/// Transition order is fixed: guardrail, acceptance, round cap, walk-away,
/// concession.
pub fn step(
    profile: &BuyerProfile,
    state: &NegotiationState,
    msg: &SellerMessage,
) -> Result<(NegotiationState, BuyerReply), NegotiationError> {
    if msg.text.trim().is_empty() && msg.offer.is_none() {
        return Err(NegotiationError::Protocol(
            "seller turn has neither text nor offer".into(),
        ));
    }
    if state.outcome.is_terminal() {
        return Err(NegotiationError::Finished {
            outcome: state.outcome.to_string(),
        });
    }

    let mut next = state.clone();
    next.round += 1;

    // Guardrail: redirect and consume the round, touching nothing else.
    if detect_disallowed(&msg.text) {
        debug!(round = next.round, "guardrail redirect");
        if next.round >= next.max_rounds {
            next.outcome = Outcome::MaxRoundsReached;
        }
        let reply = BuyerReply {
            text: SAFE_REDIRECT.to_string(),
            counter_offer: None,
            objection: None,
            tags: vec!["guardrail".into()],
        };
        return Ok((next, reply));
    }

    let mut tags = extract_keywords(&msg.text);
    let offer = msg.offer.or_else(|| parse_offer(&msg.text));
    let monthly = parse_monthly(&msg.text);
    if let Some(o) = offer {
        next.seller_offer = Some(o);
    }

    let ceiling = profile.constraints.budget_ceiling;
    let payment_ceiling = profile.constraints.payment_ceiling;

    // Acceptance. The region is downward-closed: any price at or below the
    // ceiling closes, regardless of style (a monthly figure above the
    // payment ceiling still blocks it).
    if let Some(o) = offer {
        let monthly_ok = monthly.is_none_or(|m| m <= payment_ceiling);
        if o <= ceiling && monthly_ok {
            next.outcome = Outcome::Deal;
            next.buyer_counter = Some(o);
            tags.push("deal".into());
            debug!(round = next.round, price = o, "deal reached");
            let reply = BuyerReply {
                text: format!("Okay, ${o} out the door works for me. Let's write it up."),
                counter_offer: Some(o),
                objection: None,
                tags,
            };
            return Ok((next, reply));
        }
    }

    // Round cap.
    if next.round >= next.max_rounds {
        next.outcome = Outcome::MaxRoundsReached;
        debug!(round = next.round, "max rounds reached");
        let reply = BuyerReply {
            text: "I've given this as much time as I can today. Let me think it over."
                .to_string(),
            counter_offer: next.buyer_counter,
            objection: None,
            tags,
        };
        return Ok((next, reply));
    }

    // Walk-away: an over-threshold gap drains patience; when the patience
    // budget is exhausted the buyer leaves without a deal.
    let anchor = profile.opening_anchor();
    if let Some(o) = offer {
        let base = next.buyer_counter.unwrap_or(anchor);
        let gap = o - base;
        if gap > profile.walk_away_band() {
            next.patience_spent += 1;
            if next.patience_spent >= profile.patience_limit() {
                next.outcome = Outcome::WalkedAway;
                debug!(round = next.round, gap, "buyer walked away");
                let reply = BuyerReply {
                    text: "We're too far apart. I'm going to walk. Thanks for your time."
                        .to_string(),
                    counter_offer: next.buyer_counter,
                    objection: None,
                    tags,
                };
                return Ok((next, reply));
            }
        }
    }

    // Remain ongoing: concede toward the offer and compose the reply.
    let mut parts: Vec<String> = vec![base_line(profile).to_string()];
    apply_reveals(profile, &mut next, &tags, &mut parts);

    if let Some(m) = monthly
        && m > payment_ceiling
    {
        parts.push(format!(
            "That's higher than my ${payment_ceiling}/month target."
        ));
    }
    if contains_pressure(&msg.text) {
        parts.push("That feels pushy. If we can't keep this calm, I'll walk.".to_string());
        tags.push("pressure".into());
    }

    if let Some(o) = offer {
        let base = next.buyer_counter.unwrap_or(anchor);
        let concession = concession_step(profile, state, base, o);
        let counter = (base + concession).min(ceiling);
        let applied = counter - base;
        next.buyer_counter = Some(counter);
        next.cumulative_concession += applied;
        next.last_concession = Some(applied);
        parts.push(format!("I could do ${counter} out the door."));
        debug!(round = next.round, counter, concession = applied, "buyer countered");
    }

    let objection = raise_objection(profile, &mut next);
    if let Some(id) = &objection {
        if let Some(must) = profile.must_haves.iter().find(|m| &m.id == id) {
            parts.push(must.line.clone());
        }
        tags.push("objection".into());
    }

    let reply = BuyerReply {
        text: parts.join(" "),
        counter_offer: offer.and(next.buyer_counter),
        objection,
        tags,
    };
    Ok((next, reply))
}

/// Concession for this round: `gap * rate * decay^rounds_elapsed`, clamped
/// so its magnitude never exceeds the previous round's concession. The
/// decay models negotiation fatigue; the clamp makes the diminishing-
/// returns property unconditional.
fn concession_step(
    profile: &BuyerProfile,
    prior: &NegotiationState,
    base: i64,
    offer: i64,
) -> i64 {
    let gap = (offer - base).max(0) as f64;
    let plan = &profile.concession;
    let decay = plan.concession_decay.powi(i32::try_from(prior.round).unwrap_or(i32::MAX));
    let mut concession = (gap * plan.concession_rate * decay).round() as i64;
    if let Some(last) = prior.last_concession {
        concession = concession.min(last);
    }
    concession.max(0)
}

fn apply_reveals(
    profile: &BuyerProfile,
    next: &mut NegotiationState,
    tags: &[String],
    parts: &mut Vec<String>,
) {
    let asked = |t: &str| tags.iter().any(|tag| tag == t);
    let c = &profile.constraints;

    if asked("budget") && !next.revealed.budget {
        parts.push(format!(
            "My max out-the-door budget is ${}.",
            c.budget_ceiling
        ));
        next.revealed.budget = true;
    }
    if asked("payment") && !next.revealed.payment {
        parts.push(format!(
            "I'm trying to stay around ${}/month.",
            c.payment_ceiling
        ));
        next.revealed.payment = true;
    }
    if asked("trade_in") && !next.revealed.trade_in {
        parts.push(format!(
            "For my trade-in I'd want around ${}.",
            c.trade_in_value
        ));
        next.revealed.trade_in = true;
    }
    if asked("features") && !next.revealed.features {
        let features: Vec<String> = profile
            .must_haves
            .iter()
            .map(|m| m.id.replace('_', " "))
            .collect();
        if !features.is_empty() {
            parts.push(format!("Must-haves for me are: {}.", features.join(", ")));
        }
        next.revealed.features = true;
    }
}

/// Tie-break rule: objections are raised first-in-list-first. This ordering
/// is a determinism guarantee, not flavor.
fn raise_objection(profile: &BuyerProfile, next: &mut NegotiationState) -> Option<String> {
    if !profile.concession.raises_objections || next.outstanding_objections.is_empty() {
        return None;
    }
    Some(next.outstanding_objections.remove(0))
}
