//! V1b play model: V1a's fourth-down policy with a two-term pass yardage
//! model, sampled air yards plus yards after catch.

use std::sync::Arc;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::error::Result;
use crate::models::{PlayResult, PlayType};

use super::fourth_down::{features_from_state, map_three_class};
use super::v1::{completion_roll, sack_roll, turnover_roll};
use super::{
    bernoulli, call_run_or_pass, field_goal_play, punt_play, scrimmage_play, BlendWeights,
    FourthDownCall, FourthDownModel, GameModel, ModelCode, PlayContext,
};

pub const DEFAULT_OFF_WEIGHT: f64 = 0.575;

const TURNOVER_DAMPING: f64 = 0.375;

pub struct V1bModel {
    weights: BlendWeights,
    fourth_down: Arc<dyn FourthDownModel>,
}

impl V1bModel {
    pub fn new(off_weight: f64, fourth_down: Arc<dyn FourthDownModel>) -> Self {
        Self {
            weights: BlendWeights::new(off_weight),
            fourth_down,
        }
    }

    /// Completed-pass yardage: weighted sampled air yards per attempt plus
    /// weighted season yards after catch per completion.
    fn projected_pass_yards(
        &self,
        ctx: &PlayContext<'_>,
        rng: &mut ChaCha8Rng,
    ) -> Result<f64> {
        let w = &self.weights;
        let air = w.average(
            ctx.posteam().sample_offensive_air_yards(rng)?,
            ctx.defteam().sample_defensive_air_yards(rng)?,
        );
        let yac = w.average(
            ctx.posteam().profile().off_yac_per_completion,
            ctx.defteam().profile().def_yac_per_completion,
        );
        Ok(air + yac)
    }

    fn fourth_down_call(&self, ctx: &PlayContext<'_>, rng: &mut ChaCha8Rng) -> FourthDownCall {
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

impl GameModel for V1bModel {
    fn code(&self) -> ModelCode {
        ModelCode::V1b
    }

    fn resolve_play(&self, ctx: &PlayContext<'_>, rng: &mut ChaCha8Rng) -> Result<PlayResult> {
        let state = ctx.state;
        let pos = ctx.posteam().profile();
        let def = ctx.defteam().profile();
        let w = &self.weights;

        let time_elapsed = rng.gen_range(17..=30);

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

        let weighted_yards = if play_type == PlayType::Run {
            w.average(
                ctx.posteam().sample_offensive_rushing(rng)?,
                ctx.defteam().sample_defensive_rushing(rng)?,
            )
        } else if completion_roll(rng, w, pos, def) {
            self.projected_pass_yards(ctx, rng)?
        } else {
            0.0
        };

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
