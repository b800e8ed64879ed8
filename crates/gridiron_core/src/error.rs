//! Error types for the simulation engine.
//!
//! Configuration errors surface at team/sampler construction time and are
//! never recovered. Situational lookup errors are fatal for the play that
//! triggered them; every engine call site pre-resolves through the aggregate
//! fallback so they do not surface during a healthy simulation.

#[derive(thiserror::Error, Debug)]
pub enum SimError {
    /// A yardage distribution was requested with unusable moments.
    #[error("invalid distribution parameters: mean={mean}, variance={variance}")]
    InvalidDistribution { mean: f64, variance: f64 },

    /// No rate record exists for the exact situation key.
    #[error("no rate record for situation {0}")]
    MissingSituation(String),

    /// The rate table was built without the league-wide aggregate record.
    #[error("rate table has no aggregate fallback record")]
    MissingAggregateRecord,

    /// A situational model was selected for a team that carries no rate
    /// table.
    #[error("team {0} has no situational rate table")]
    MissingRateTable(String),

    /// A play model drew from a sampler that was never fitted for this
    /// matchup. Indicates the team was not prepared for the chosen model.
    #[error("{0} sampler not initialized for this model family")]
    SamplerUninitialized(&'static str),

    /// A batch was requested with zero simulations.
    #[error("batch requires at least one simulation")]
    EmptyBatch,
}

pub type Result<T> = std::result::Result<T, SimError>;
