use super::profile::{BuyerProfile, ConcessionPlan, Constraints, MustHave, TraitSet};
use crate::error::{PersonaError, Result};
use crate::pack::{Archetype, ConstraintRange, DataPack, Distribution, Style};
use crate::seed::{FacetRng, SeedStream};
use tracing::debug;

/// Derive a buyer profile from a seed and a validated pack.
///
/// Every facet draws from its own namespaced generator, so adding or
/// reordering draws in one facet never perturbs any other facet. Total
/// determinism for a fixed `(seed, pack)` pair; the only failure paths are
/// internal invariant violations, which abort rather than emit an invalid
/// profile.
pub fn generate(seed: u64, pack: &DataPack) -> Result<BuyerProfile> {
    let stream = SeedStream::new(seed);

    let archetype = select_archetype(&mut stream.facet_rng("archetype"), &pack.archetypes)?;
    let style = select_style(&mut stream.facet_rng("style"), &pack.styles)?;
    let traits = draw_traits(&stream, archetype);
    let constraints = draw_constraints(&stream, pack)?;
    let must_haves = draw_objections(&mut stream.facet_rng("objections"), pack);

    debug!(
        seed,
        archetype = %archetype.id,
        style = %style.id,
        budget = constraints.budget_ceiling,
        "generated buyer profile"
    );

    Ok(BuyerProfile {
        archetype_id: archetype.id.clone(),
        style_id: style.id.clone(),
        traits,
        constraints,
        must_haves,
        // Verbatim copy: behavior differences are attributable to style
        // choice, not double-randomization.
        concession: ConcessionPlan {
            anchor_offset: style.anchor_offset,
            concession_rate: style.concession_rate,
            concession_decay: style.concession_decay,
            walk_away_threshold: style.walk_away_threshold,
            patience_budget: style.patience_budget,
            raises_objections: style.raises_objections,
        },
    })
}

/// Map one uniform draw to a weighted option list in declaration order:
/// the first option whose cumulative weight exceeds the draw wins. The same
/// draw always selects the same option for a given pack ordering; reordering
/// the pack is the only thing that can change a mapping (a documented
/// compatibility concern, not a bug).
fn weighted_index(draw: f64, weights: &[f64]) -> Option<usize> {
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if total <= 0.0 {
        return None;
    }
    let target = draw * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (index, weight) in weights.iter().enumerate() {
        if *weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        last_positive = Some(index);
        if cumulative > target {
            return Some(index);
        }
    }
    // Floating-point edge: draw landed exactly on the total.
    last_positive
}

fn select_archetype<'a>(
    rng: &mut FacetRng,
    archetypes: &'a [Archetype],
) -> Result<&'a Archetype> {
    let weights: Vec<f64> = archetypes.iter().map(|a| a.weight).collect();
    let index = weighted_index(rng.next_unit(), &weights)
        .ok_or_else(|| PersonaError::EmptyCategory("archetypes".into()))?;
    Ok(&archetypes[index])
}

fn select_style<'a>(rng: &mut FacetRng, styles: &'a [Style]) -> Result<&'a Style> {
    let weights: Vec<f64> = styles.iter().map(|s| s.weight).collect();
    let index = weighted_index(rng.next_unit(), &weights)
        .ok_or_else(|| PersonaError::EmptyCategory("styles".into()))?;
    Ok(&styles[index])
}

fn draw_traits(stream: &SeedStream, archetype: &Archetype) -> TraitSet {
    let t = &archetype.traits;
    TraitSet {
        patience: stream
            .facet_rng("trait:patience")
            .range_f64(t.patience.min, t.patience.max),
        price_sensitivity: stream
            .facet_rng("trait:price_sensitivity")
            .range_f64(t.price_sensitivity.min, t.price_sensitivity.max),
        trust: stream
            .facet_rng("trait:trust")
            .range_f64(t.trust.min, t.trust.max),
    }
}

fn draw_constraints(stream: &SeedStream, pack: &DataPack) -> Result<Constraints> {
    Ok(Constraints {
        budget_ceiling: draw_constraint(stream, pack, "budget_ceiling")?,
        payment_ceiling: draw_constraint(stream, pack, "payment_ceiling")?,
        trade_in_value: draw_constraint(stream, pack, "trade_in_value")?,
    })
}

fn draw_constraint(stream: &SeedStream, pack: &DataPack, id: &str) -> Result<i64> {
    let range = pack
        .constraint(id)
        .ok_or_else(|| PersonaError::EmptyCategory(format!("constraint:{id}")))?;
    let mut rng = stream.facet_rng(&format!("constraint:{id}"));

    let raw = match &range.distribution {
        Distribution::Uniform { min, max } => rng.range_i64(*min, *max),
        Distribution::WeightedBuckets { buckets } => {
            let weights: Vec<f64> = buckets.iter().map(|b| b.weight).collect();
            let index = weighted_index(rng.next_unit(), &weights)
                .ok_or_else(|| PersonaError::EmptyCategory(format!("constraint:{id}")))?;
            let bucket = &buckets[index];
            rng.range_i64(bucket.min, bucket.max)
        }
    };

    let (min, max) = range.bounds();
    let clamped = raw.clamp(min, max);
    if clamped < min || clamped > max {
        // Unreachable given correct clamping; abort rather than emit an
        // invalid profile.
        return Err(PersonaError::ConstraintViolation {
            constraint: id.to_string(),
            value: clamped,
            min,
            max,
        }
        .into());
    }
    Ok(clamped)
}

/// Ordered subset of the objection catalog: size drawn from the declared
/// count range, members chosen by weighted draws without replacement, then
/// emitted in catalog order so the buyer's priority order matches the pack.
fn draw_objections(rng: &mut FacetRng, pack: &DataPack) -> Vec<MustHave> {
    let count = rng.range_u32(pack.objection_count.min, pack.objection_count.max) as usize;
    let count = count.min(pack.objections.len());

    let mut remaining: Vec<usize> = (0..pack.objections.len()).collect();
    let mut chosen: Vec<usize> = Vec::with_capacity(count);

    while chosen.len() < count {
        let weights: Vec<f64> = remaining
            .iter()
            .map(|&i| pack.objections[i].weight)
            .collect();
        let Some(pick) = weighted_index(rng.next_unit(), &weights) else {
            break; // only zero-weight entries left
        };
        chosen.push(remaining.remove(pick));
    }

    chosen.sort_unstable();
    chosen
        .into_iter()
        .map(|i| {
            let objection = &pack.objections[i];
            MustHave {
                id: objection.id.clone(),
                attribute: objection.attribute.clone(),
                line: objection.line.clone(),
            }
        })
        .collect()
}
