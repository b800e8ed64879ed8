pub mod rate_table;
pub mod sampler;
#[allow(clippy::module_inception)]
pub mod team;

pub use rate_table::{DistanceBucket, Situation, SituationalRateTable};
pub use sampler::YardageSampler;
pub use team::{SamplerSet, Team};

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::HashMap;

    use super::*;
    use crate::models::{SituationalRates, TeamProfile};

    /// A plausible season profile; values are in the range real rate tables
    /// produce so seeded games behave like football.
    pub fn profile() -> TeamProfile {
        TeamProfile {
            games_played: 17,
            run_rate: 0.45,
            pass_rate: 0.55,
            pass_completion_rate: 65.0,
            pass_completion_rate_allowed: 63.0,
            yards_per_completion: 11.2,
            yards_allowed_per_completion: 10.8,
            rush_yards_per_carry: 4.3,
            rush_yards_per_carry_allowed: 4.1,
            turnover_rate: 0.12,
            forced_turnover_rate: 0.11,
            sacks_allowed_rate: 0.07,
            sack_yards_allowed: -6.5,
            sacks_made_rate: 0.065,
            sack_yards_inflicted: -6.8,
            field_goal_success_rate: 0.85,
            off_pass_yards_per_play_mean: 6.4,
            off_pass_yards_per_play_variance: 28.0,
            def_pass_yards_per_play_mean: 6.1,
            def_pass_yards_per_play_variance: 26.0,
            off_rush_yards_per_play_mean: 4.3,
            off_rush_yards_per_play_variance: 12.0,
            def_rush_yards_per_play_mean: 4.1,
            def_rush_yards_per_play_variance: 11.0,
            off_air_yards_per_attempt: 7.8,
            def_air_yards_per_attempt: 7.4,
            off_yac_per_completion: 5.2,
            def_yac_per_completion: 5.0,
        }
    }

    pub fn situational_rates() -> SituationalRates {
        SituationalRates {
            run_rate: 0.45,
            pass_rate: 0.55,
            pass_completion_rate: 0.65,
            pass_completion_rate_allowed: 0.63,
            yards_per_completion: 11.2,
            yards_allowed_per_completion: 10.8,
            rush_yards_per_carry: 4.3,
            rush_yards_per_carry_allowed: 4.1,
            turnover_rate: 0.012,
            forced_turnover_rate: 0.011,
            sacks_allowed_rate: 0.07,
            sack_yards_allowed: 6.5,
            sacks_made_rate: 0.065,
            sack_yards_inflicted: 6.8,
            field_goal_success_rate: 0.85,
        }
    }

    pub fn team(name: &str) -> Team {
        Team::new(name, profile())
    }

    /// Team with a rate table that covers every situation via the aggregate
    /// record only.
    pub fn team_with_rates(name: &str) -> Team {
        let mut records = HashMap::new();
        records.insert(Situation::AGGREGATE, situational_rates());
        let table = SituationalRateTable::new(records).unwrap();
        Team::new(name, profile()).with_rate_table(table)
    }
}
