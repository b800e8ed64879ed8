//! Prototype play model: flat season-aggregate rates, fixed-band fourth-down
//! policy, no distribution sampling.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::error::Result;
use crate::models::{PlayResult, PlayType};

use super::{
    bernoulli, call_run_or_pass, field_goal_play, punt_play, scrimmage_play, BlendWeights,
    GameModel, ModelCode, PlayContext,
};

pub const DEFAULT_OFF_WEIGHT: f64 = 0.55;

pub struct PrototypeModel {
    weights: BlendWeights,
}

impl PrototypeModel {
    pub fn new(off_weight: f64) -> Self {
        Self {
            weights: BlendWeights::new(off_weight),
        }
    }
}

impl Default for PrototypeModel {
    fn default() -> Self {
        Self::new(DEFAULT_OFF_WEIGHT)
    }
}

impl GameModel for PrototypeModel {
    fn code(&self) -> ModelCode {
        ModelCode::Proto
    }

    fn resolve_play(&self, ctx: &PlayContext<'_>, rng: &mut ChaCha8Rng) -> Result<PlayResult> {
        let state = ctx.state;
        let pos = ctx.posteam().profile();
        let def = ctx.defteam().profile();
        let w = &self.weights;

        let time_elapsed = rng.gen_range(15..=40);

        // Fixed fourth-down bands: punt from deep, kick when in range.
        // Yardlines 46-55 fall through to an ordinary snap.
        if state.down == 4 && state.yardline > 55.0 {
            return Ok(punt_play(40.0, time_elapsed, state));
        }
        if state.down == 4 && state.yardline <= 45.0 {
            let made = bernoulli(rng, pos.field_goal_success_rate);
            return Ok(field_goal_play(made, time_elapsed, state));
        }

        let play_type = call_run_or_pass(rng, pos.run_rate, pos.pass_rate);

        let (off_yards, def_yards) = match play_type {
            PlayType::Run => (pos.rush_yards_per_carry, def.rush_yards_per_carry_allowed),
            _ => (pos.yards_per_completion, def.yards_allowed_per_completion),
        };
        let mut weighted_yards = w.average(off_yards, def_yards);

        if play_type == PlayType::Pass {
            let completion_rate = w.average(
                pos.pass_completion_rate / 100.0,
                def.pass_completion_rate_allowed / 100.0,
            );
            if !bernoulli(rng, completion_rate) {
                weighted_yards = 0.0;
            }
        }

        // Turnover check precedes the sack check; a sack can still overwrite
        // the yardage of a non-turnover pass play.
        let turnover_rate = w.average(pos.turnover_rate, def.forced_turnover_rate);
        let turnover = bernoulli(rng, turnover_rate);
        let mut yards_gained = if turnover { 0.0 } else { weighted_yards };

        let sack_rate = w.average(pos.sacks_allowed_rate, def.sacks_made_rate);
        if bernoulli(rng, sack_rate) && play_type == PlayType::Pass {
            yards_gained = w.average(pos.sack_yards_allowed, def.sack_yards_inflicted);
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
