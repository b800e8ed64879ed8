//! Season-aggregate team rate profiles and the per-situation rate records
//! consumed by the situational models.
//!
//! Profiles are produced by an upstream statistics job and consumed here
//! read-only. Rates are fractions in [0, 1] except the two season completion
//! rates, which arrive as percentages (the play models divide by 100 at the
//! point of use, matching the upstream table layout).

use serde::{Deserialize, Serialize};

/// Fixed-shape season-aggregate rate record for one team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamProfile {
    pub games_played: u32,

    /// Share of offensive snaps that are called runs / passes.
    pub run_rate: f64,
    pub pass_rate: f64,

    /// Season completion percentage (0-100) thrown / allowed.
    pub pass_completion_rate: f64,
    pub pass_completion_rate_allowed: f64,
    pub yards_per_completion: f64,
    pub yards_allowed_per_completion: f64,

    pub rush_yards_per_carry: f64,
    pub rush_yards_per_carry_allowed: f64,

    pub turnover_rate: f64,
    pub forced_turnover_rate: f64,

    pub sacks_allowed_rate: f64,
    /// Yardage delta of a sack taken; negative, as the upstream table
    /// encodes lost yardage.
    pub sack_yards_allowed: f64,
    pub sacks_made_rate: f64,
    pub sack_yards_inflicted: f64,

    pub field_goal_success_rate: f64,

    // Moment pairs for the fitted yards-per-play distributions.
    pub off_pass_yards_per_play_mean: f64,
    pub off_pass_yards_per_play_variance: f64,
    pub def_pass_yards_per_play_mean: f64,
    pub def_pass_yards_per_play_variance: f64,
    pub off_rush_yards_per_play_mean: f64,
    pub off_rush_yards_per_play_variance: f64,
    pub def_rush_yards_per_play_mean: f64,
    pub def_rush_yards_per_play_variance: f64,

    pub off_air_yards_per_attempt: f64,
    pub def_air_yards_per_attempt: f64,
    pub off_yac_per_completion: f64,
    pub def_yac_per_completion: f64,
}

/// Per-situation rate record held by a situational rate table.
///
/// Sparse situations leave fields as NaN; the table's two-tier resolution
/// substitutes the aggregate record before a value reaches play resolution.
/// Unlike the season profile, completion rates here are fractions in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SituationalRates {
    pub run_rate: f64,
    pub pass_rate: f64,

    pub pass_completion_rate: f64,
    pub pass_completion_rate_allowed: f64,
    pub yards_per_completion: f64,
    pub yards_allowed_per_completion: f64,

    pub rush_yards_per_carry: f64,
    pub rush_yards_per_carry_allowed: f64,

    pub turnover_rate: f64,
    pub forced_turnover_rate: f64,

    pub sacks_allowed_rate: f64,
    pub sack_yards_allowed: f64,
    pub sacks_made_rate: f64,
    pub sack_yards_inflicted: f64,

    pub field_goal_success_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_round_trips_through_json() {
        let profile = crate::team::fixtures::profile();
        let json = serde_json::to_string(&profile).unwrap();
        let back: TeamProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.run_rate, profile.run_rate);
        assert_eq!(back.sack_yards_allowed, profile.sack_yards_allowed);
    }

    #[test]
    fn test_situational_nan_survives_construction() {
        let mut rates = crate::team::fixtures::situational_rates();
        rates.yards_per_completion = f64::NAN;
        assert!(rates.yards_per_completion.is_nan());
        assert!(!rates.rush_yards_per_carry.is_nan());
    }
}
