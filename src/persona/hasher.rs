use super::profile::BuyerProfile;
use sha2::{Digest, Sha256};

/// Stable fingerprint of a profile's canonical selection fields.
///
/// Covers exactly: archetype id, style id, the three constraint values, and
/// the ordered objection ids. Two profiles hash equal iff all of these are
/// equal; incidental fields (traits, concession parameters, objection lines)
/// never enter the hash. Displayed to users to verify that two runs of the
/// same seed produced the same buyer. Not a security credential.
pub fn profile_hash(profile: &BuyerProfile) -> String {
    let objection_ids: Vec<&str> = profile.must_haves.iter().map(|m| m.id.as_str()).collect();
    let canonical = format!(
        "archetype={};style={};budget={};payment={};trade={};objections={}",
        profile.archetype_id,
        profile.style_id,
        profile.constraints.budget_ceiling,
        profile.constraints.payment_ceiling,
        profile.constraints.trade_in_value,
        objection_ids.join(",")
    );

    let digest = Sha256::digest(canonical.as_bytes());
    let mut fingerprint = hex::encode(digest);
    fingerprint.truncate(16);
    fingerprint
}
