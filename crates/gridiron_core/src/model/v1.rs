//! V1 play model: classifier-driven fourth downs, sampled yardage from the
//! fitted log-normal distributions, damped turnover probability.

use std::sync::Arc;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::error::Result;
use crate::models::{PlayResult, PlayType, TeamProfile};

use super::fourth_down::{features_from_state, map_four_class};
use super::{
    bernoulli, call_run_or_pass, field_goal_play, punt_play, scrimmage_play, BlendWeights,
    FourthDownCall, FourthDownModel, GameModel, ModelCode, PlayContext,
};

pub const DEFAULT_OFF_WEIGHT: f64 = 0.65;

/// Aggregate turnover rates overstate live single-play risk; the Bernoulli
/// draw is damped by a fixed constant.
const TURNOVER_DAMPING: f64 = 0.45;

pub struct V1Model {
    weights: BlendWeights,
    fourth_down: Arc<dyn FourthDownModel>,
}

impl V1Model {
    pub fn new(off_weight: f64, fourth_down: Arc<dyn FourthDownModel>) -> Self {
        Self {
            weights: BlendWeights::new(off_weight),
            fourth_down,
        }
    }
}

/// Weighted yardage from the teams' fitted samplers for the play family.
pub(super) fn sampled_yards(
    ctx: &PlayContext<'_>,
    play_type: PlayType,
    weights: &BlendWeights,
    rng: &mut ChaCha8Rng,
) -> Result<f64> {
    let (off, def) = if play_type == PlayType::Run {
        (
            ctx.posteam().sample_offensive_rushing(rng)?,
            ctx.defteam().sample_defensive_rushing(rng)?,
        )
    } else {
        (
            ctx.posteam().sample_offensive_passing(rng)?,
            ctx.defteam().sample_defensive_passing(rng)?,
        )
    };
    Ok(weights.average(off, def))
}

/// Completion roll on the season completion percentages.
pub(super) fn completion_roll(
    rng: &mut ChaCha8Rng,
    weights: &BlendWeights,
    pos: &TeamProfile,
    def: &TeamProfile,
) -> bool {
    let rate = weights.average(
        pos.pass_completion_rate / 100.0,
        def.pass_completion_rate_allowed / 100.0,
    );
    bernoulli(rng, rate)
}

pub(super) fn turnover_roll(
    rng: &mut ChaCha8Rng,
    weights: &BlendWeights,
    pos: &TeamProfile,
    def: &TeamProfile,
    damping: f64,
) -> bool {
    let rate = damping * weights.average(pos.turnover_rate, def.forced_turnover_rate);
    bernoulli(rng, rate)
}

/// Sack roll; `Some(yardage)` when the play is brought down behind the line.
pub(super) fn sack_roll(
    rng: &mut ChaCha8Rng,
    weights: &BlendWeights,
    pos: &TeamProfile,
    def: &TeamProfile,
) -> Option<f64> {
    let rate = weights.average(pos.sacks_allowed_rate, def.sacks_made_rate);
    if bernoulli(rng, rate) {
        Some(weights.average(pos.sack_yards_allowed, def.sack_yards_inflicted))
    } else {
        None
    }
}

impl GameModel for V1Model {
    fn code(&self) -> ModelCode {
        ModelCode::V1
    }

    fn resolve_play(&self, ctx: &PlayContext<'_>, rng: &mut ChaCha8Rng) -> Result<PlayResult> {
        let state = ctx.state;
        let pos = ctx.posteam().profile();
        let def = ctx.defteam().profile();
        let w = &self.weights;

        let time_elapsed = rng.gen_range(15..=40);

        let call = if state.down == 4 {
            map_four_class(self.fourth_down.predict(&features_from_state(state)))
        } else {
            match call_run_or_pass(rng, pos.run_rate, pos.pass_rate) {
                PlayType::Run => FourthDownCall::Run,
                _ => FourthDownCall::Pass,
            }
        };

        let play_type = match call {
            FourthDownCall::Punt => return Ok(punt_play(40.0, time_elapsed, state)),
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
