use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `dealsim`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum DealsimError {
    // ── Data pack ────────────────────────────────────────────────────────
    #[error("pack: {0}")]
    Pack(#[from] PackError),

    // ── Seed parsing ─────────────────────────────────────────────────────
    #[error("seed: {0}")]
    Seed(#[from] SeedError),

    // ── Persona generation ───────────────────────────────────────────────
    #[error("persona: {0}")]
    Persona(#[from] PersonaError),

    // ── Negotiation protocol ─────────────────────────────────────────────
    #[error("negotiation: {0}")]
    Negotiation(#[from] NegotiationError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Data pack errors ────────────────────────────────────────────────────────

/// A pack that fails validation is rejected before any seed is processed.
/// There is no fallback to defaults.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("failed to load pack: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Seed errors ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("seed is not a valid integer: {0:?}")]
    Invalid(String),
}

// ─── Persona errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PersonaError {
    /// A drawn value escaped its declared bounds after clamping. This is an
    /// internal invariant violation; the profile is aborted rather than
    /// emitted invalid.
    #[error("constraint {constraint} value {value} outside declared bounds [{min}, {max}]")]
    ConstraintViolation {
        constraint: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("category {0} has no selectable option")]
    EmptyCategory(String),
}

// ─── Negotiation errors ──────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum NegotiationError {
    /// The offending turn is rejected; prior state is preserved and the
    /// caller may retry with a corrected turn.
    #[error("malformed seller turn: {0}")]
    Protocol(String),

    #[error("negotiation already ended ({outcome})")]
    Finished { outcome: String },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, DealsimError>;
