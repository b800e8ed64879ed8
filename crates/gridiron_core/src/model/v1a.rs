//! V1a play model: three-outcome fourth-down classifier with an explicit
//! go-for-it call, randomized punt distance, tighter clock window.

use std::sync::Arc;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::error::Result;
use crate::models::{PlayResult, PlayType};

use super::fourth_down::{features_from_state, map_three_class};
use super::v1::{completion_roll, sack_roll, sampled_yards, turnover_roll};
use super::{
    bernoulli, call_run_or_pass, field_goal_play, punt_play, scrimmage_play, BlendWeights,
    FourthDownCall, FourthDownModel, GameModel, ModelCode, PlayContext,
};

pub const DEFAULT_OFF_WEIGHT: f64 = 0.625;

const TURNOVER_DAMPING: f64 = 0.40;

pub struct V1aModel {
    weights: BlendWeights,
    fourth_down: Arc<dyn FourthDownModel>,
}

impl V1aModel {
    pub fn new(off_weight: f64, fourth_down: Arc<dyn FourthDownModel>) -> Self {
        Self {
            weights: BlendWeights::new(off_weight),
            fourth_down,
        }
    }

    /// Decode the classifier's call; a go-for-it becomes an ordinary run or
    /// pass. The blend intentionally pits the offense's run rate against the
    /// *defense's* pass rate, as the source model does.
    fn fourth_down_call(
        &self,
        ctx: &PlayContext<'_>,
        rng: &mut ChaCha8Rng,
    ) -> FourthDownCall {
        let call = map_three_class(self.fourth_down.predict(&features_from_state(ctx.state)));
        if call == FourthDownCall::GoForIt {
            let run_weight = ctx.posteam().profile().run_rate;
            let pass_weight = ctx.defteam().profile().pass_rate;
            match call_run_or_pass(rng, run_weight, pass_weight) {
                PlayType::Run => FourthDownCall::Run,
                _ => FourthDownCall::Pass,
            }
        } else {
            call
        }
    }
}

impl GameModel for V1aModel {
    fn code(&self) -> ModelCode {
        ModelCode::V1a
    }

    fn resolve_play(&self, ctx: &PlayContext<'_>, rng: &mut ChaCha8Rng) -> Result<PlayResult> {
        let state = ctx.state;
        let pos = ctx.posteam().profile();
        let def = ctx.defteam().profile();
        let w = &self.weights;

        let time_elapsed = rng.gen_range(20..=30);

        let call = if state.down == 4 {
            self.fourth_down_call(ctx, rng)
        } else {
            match call_run_or_pass(rng, pos.run_rate, pos.pass_rate) {
                PlayType::Run => FourthDownCall::Run,
                _ => FourthDownCall::Pass,
            }
        };

        let play_type = match call {
            FourthDownCall::Punt => {
                let punt_yards = rng.gen_range(40..=55) as f64;
                return Ok(punt_play(punt_yards, time_elapsed, state));
            }
            FourthDownCall::FieldGoal => {
                let made = bernoulli(rng, pos.field_goal_success_rate);
                return Ok(field_goal_play(made, time_elapsed, state));
            }
            FourthDownCall::Run => PlayType::Run,
            FourthDownCall::Pass | FourthDownCall::GoForIt => PlayType::Pass,
        };

        let mut weighted_yards = sampled_yards(ctx, play_type, w, rng)?;
        if play_type == PlayType::Pass && !completion_roll(rng, w, pos, def) {
            weighted_yards = 0.0;
        }

        let turnover = turnover_roll(rng, w, pos, def, TURNOVER_DAMPING);
        let mut yards_gained = if turnover { 0.0 } else { weighted_yards };

        if let Some(sack_yards) = sack_roll(rng, w, pos, def) {
            if play_type == PlayType::Pass {
                yards_gained = sack_yards;
            }
        }

        Ok(scrimmage_play(
            play_type,
            yards_gained,
            time_elapsed,
            turnover,
            state,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::fourth_down::stubs::FixedPrediction;
    use super::*;
    use crate::engine::GameState;
    use crate::team::fixtures;
    use rand::SeedableRng;

    fn prepared_team(name: &str) -> crate::team::Team {
        let mut team = fixtures::team(name);
        team.prepare_samplers(ModelCode::V1a).unwrap();
        team
    }

    #[test]
    fn test_punt_distance_is_randomized() {
        let home = prepared_team("H");
        let away = prepared_team("A");
        let mut state = GameState::kickoff();
        state.down = 4;
        state.yardline = 70.0;

        let model = V1aModel::new(DEFAULT_OFF_WEIGHT, Arc::new(FixedPrediction(2)));
        let ctx = PlayContext {
            state: &state,
            home: &home,
            away: &away,
        };

        let mut distinct = std::collections::HashSet::new();
        for seed in 0..40 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let play = model.resolve_play(&ctx, &mut rng).unwrap();
            assert_eq!(play.play_type, PlayType::Punt);
            assert!((40.0..=55.0).contains(&play.yards_gained));
            distinct.insert(play.yards_gained as i64);
        }
        assert!(distinct.len() > 1);
    }

    #[test]
    fn test_clock_window_narrows() {
        let home = prepared_team("H");
        let away = prepared_team("A");
        let state = GameState::kickoff();
        let model = V1aModel::new(DEFAULT_OFF_WEIGHT, Arc::new(FixedPrediction(2)));
        let ctx = PlayContext {
            state: &state,
            home: &home,
            away: &away,
        };
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let play = model.resolve_play(&ctx, &mut rng).unwrap();
            assert!((20..=30).contains(&play.time_elapsed));
        }
    }

    /// Go-for-it decodes to a run whenever the defense's pass rate is zero,
    /// confirming the cross-team blend the model inherits from its source.
    #[test]
    fn test_go_for_it_blends_offense_run_against_defense_pass() {
        let mut home_profile = fixtures::profile();
        home_profile.run_rate = 0.4;
        let mut away_profile = fixtures::profile();
        away_profile.pass_rate = 0.0;

        let mut home = crate::team::Team::new("H", home_profile);
        let mut away = crate::team::Team::new("A", away_profile);
        home.prepare_samplers(ModelCode::V1a).unwrap();
        away.prepare_samplers(ModelCode::V1a).unwrap();

        let mut state = GameState::kickoff();
        state.down = 4;
        state.distance = 1.0;
        state.yardline = 40.0;

        let model = V1aModel::new(DEFAULT_OFF_WEIGHT, Arc::new(FixedPrediction(0)));
        let ctx = PlayContext {
            state: &state,
            home: &home,
            away: &away,
        };
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let play = model.resolve_play(&ctx, &mut rng).unwrap();
            assert_eq!(play.play_type, PlayType::Run);
        }
    }
}
