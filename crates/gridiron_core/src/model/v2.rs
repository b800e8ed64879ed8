//! V2 play model family: situational rate tables with aggregate fallback and
//! a strength-rating bias on offensive and defensive rate values.
//!
//! The three variants share one resolution path and differ only in how the
//! yards-per-play figure is sourced: exact two-tier resolution (base), an
//! average of the situational and aggregate tiers (averaged), or a blend
//! with a live sampler draw (sampler blend).

use std::sync::Arc;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::error::{Result, SimError};
use crate::models::{PlayResult, PlayType, SituationalRates, TeamSide};
use crate::team::{DistanceBucket, Situation, SituationalRateTable, Team};

use super::fourth_down::{features_from_state, map_three_class};
use super::{
    bernoulli, call_run_or_pass, field_goal_play, punt_play, scrimmage_play, BlendWeights,
    FourthDownCall, FourthDownModel, GameModel, ModelCode, PlayContext,
};

/// League-wide field goal rate used when the table carries no usable value.
const FALLBACK_FIELD_GOAL_RATE: f64 = 0.75;

/// Yards-per-play sourcing strategy within the V2 family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum V2Variant {
    Base,
    Averaged,
    SamplerBlend,
}

pub fn default_off_weight(variant: V2Variant) -> f64 {
    match variant {
        V2Variant::Base | V2Variant::Averaged => 0.525,
        V2Variant::SamplerBlend => 0.5,
    }
}

/// Parameters of the bounded-exponential strength multiplier.
#[derive(Debug, Clone, Copy)]
pub struct RatingParams {
    pub gamma: f64,
    pub multiplier_floor: f64,
    pub multiplier_ceiling: f64,
    pub hfa_const: f64,
}

impl Default for RatingParams {
    fn default() -> Self {
        Self {
            gamma: 0.06,
            multiplier_floor: 0.80,
            multiplier_ceiling: 1.20,
            hfa_const: 0.08,
        }
    }
}

/// Per-matchup strength multipliers derived from the teams' standardized
/// rating z-scores. Applied multiplicatively to offensive rate values and
/// divisively to defensive ones.
#[derive(Debug, Clone, Copy)]
pub struct StrengthBias {
    home_multiplier: f64,
    away_multiplier: f64,
}

impl StrengthBias {
    /// Neutral multipliers; every biased value passes through unchanged.
    pub fn disabled() -> Self {
        Self {
            home_multiplier: 1.0,
            away_multiplier: 1.0,
        }
    }

    /// Home gets `clip(exp(gamma * z_diff), floor, ceiling)` and away its
    /// reciprocal counterpart, where `z_diff` includes the home-field
    /// advantage constant.
    pub fn from_z_scores(home_z: f64, away_z: f64, params: &RatingParams) -> Self {
        let z_diff = home_z - away_z + params.hfa_const;
        let clip = |value: f64| value.clamp(params.multiplier_floor, params.multiplier_ceiling);
        Self {
            home_multiplier: clip((params.gamma * z_diff).exp()),
            away_multiplier: clip((-params.gamma * z_diff).exp()),
        }
    }

    fn multiplier(&self, side: TeamSide) -> f64 {
        match side {
            TeamSide::Home => self.home_multiplier,
            TeamSide::Away => self.away_multiplier,
        }
    }

    pub fn bias_off(&self, value: f64, side: TeamSide) -> f64 {
        value * self.multiplier(side)
    }

    pub fn bias_def(&self, value: f64, side: TeamSide) -> f64 {
        value / self.multiplier(side)
    }
}

pub struct V2Model {
    variant: V2Variant,
    weights: BlendWeights,
    fourth_down: Arc<dyn FourthDownModel>,
    strength: StrengthBias,
}

fn rates_for(team: &Team) -> Result<&SituationalRateTable> {
    team.rate_table()
        .ok_or_else(|| SimError::MissingRateTable(team.name().to_string()))
}

impl V2Model {
    pub fn new(
        variant: V2Variant,
        off_weight: f64,
        fourth_down: Arc<dyn FourthDownModel>,
        strength: StrengthBias,
    ) -> Self {
        Self {
            variant,
            weights: BlendWeights::new(off_weight),
            fourth_down,
            strength,
        }
    }

    /// Run/pass coin on the situational call rates, after fallback.
    fn conditional_play_type(
        &self,
        posteam: &Team,
        situation: Situation,
        rng: &mut ChaCha8Rng,
    ) -> Result<PlayType> {
        let table = rates_for(posteam)?;
        let run_rate = table.resolve(situation, |r| r.run_rate)?;
        let pass_rate = table.resolve(situation, |r| r.pass_rate)?;
        Ok(call_run_or_pass(rng, run_rate, pass_rate))
    }

    /// Yards-per-play source value for one team, per variant. The sampler
    /// draw only participates for the sampler-blend variant.
    fn source_value(
        &self,
        table: &SituationalRateTable,
        situation: Situation,
        field: fn(&SituationalRates) -> f64,
        sample: impl FnOnce(&mut ChaCha8Rng) -> Result<f64>,
        rng: &mut ChaCha8Rng,
    ) -> Result<f64> {
        match self.variant {
            V2Variant::Base => table.resolve(situation, field),
            V2Variant::Averaged => {
                let (situational, aggregate) = table.resolve_pair(situation, field);
                if situational.is_nan() {
                    Ok(aggregate)
                } else {
                    Ok((situational + aggregate) / 2.0)
                }
            }
            V2Variant::SamplerBlend => {
                let draw = sample(rng)?;
                let (situational, aggregate) = table.resolve_pair(situation, field);
                if situational.is_nan() {
                    Ok((draw + aggregate) / 2.0)
                } else {
                    Ok((situational + draw) / 2.0)
                }
            }
        }
    }

    fn off_yards_per_play(
        &self,
        ctx: &PlayContext<'_>,
        play_type: PlayType,
        situation: Situation,
        rng: &mut ChaCha8Rng,
    ) -> Result<f64> {
        let team = ctx.posteam();
        let table = rates_for(team)?;
        let raw = if play_type == PlayType::Pass {
            self.source_value(
                table,
                situation,
                |r| r.yards_per_completion,
                |rng| team.sample_offensive_passing(rng),
                rng,
            )?
        } else {
            self.source_value(
                table,
                situation,
                |r| r.rush_yards_per_carry,
                |rng| team.sample_offensive_rushing(rng),
                rng,
            )?
        };
        Ok(self.strength.bias_off(raw, ctx.state.possession))
    }

    fn def_yards_per_play(
        &self,
        ctx: &PlayContext<'_>,
        play_type: PlayType,
        situation: Situation,
        rng: &mut ChaCha8Rng,
    ) -> Result<f64> {
        let team = ctx.defteam();
        let table = rates_for(team)?;
        let raw = if play_type == PlayType::Pass {
            self.source_value(
                table,
                situation,
                |r| r.yards_allowed_per_completion,
                |rng| team.sample_defensive_passing(rng),
                rng,
            )?
        } else {
            self.source_value(
                table,
                situation,
                |r| r.rush_yards_per_carry_allowed,
                |rng| team.sample_defensive_rushing(rng),
                rng,
            )?
        };
        Ok(self.strength.bias_def(raw, ctx.state.defense()))
    }

    fn field_goal_success_rate(&self, posteam: &Team) -> Result<f64> {
        let rate = rates_for(posteam)?.aggregate().field_goal_success_rate;
        if rate.is_nan() {
            Ok(FALLBACK_FIELD_GOAL_RATE)
        } else {
            Ok(rate)
        }
    }
}

impl GameModel for V2Model {
    fn code(&self) -> ModelCode {
        match self.variant {
            V2Variant::Base => ModelCode::V2,
            V2Variant::Averaged => ModelCode::V2a,
            V2Variant::SamplerBlend => ModelCode::V2b,
        }
    }

    fn resolve_play(&self, ctx: &PlayContext<'_>, rng: &mut ChaCha8Rng) -> Result<PlayResult> {
        let state = ctx.state;
        let posteam = ctx.posteam();
        let defteam = ctx.defteam();
        let w = &self.weights;

        let situation = Situation::new(
            state.down,
            DistanceBucket::from_distance(state.distance),
            state.yardline <= 20.0,
        );

        let time_elapsed = rng.gen_range(15..=40);

        let play_type = if state.down == 4 {
            let call =
                map_three_class(self.fourth_down.predict(&features_from_state(state)));
            match call {
                FourthDownCall::Punt => return Ok(punt_play(40.0, time_elapsed, state)),
                FourthDownCall::FieldGoal => {
                    let made = bernoulli(rng, self.field_goal_success_rate(posteam)?);
                    return Ok(field_goal_play(made, time_elapsed, state));
                }
                _ => self.conditional_play_type(posteam, situation, rng)?,
            }
        } else {
            self.conditional_play_type(posteam, situation, rng)?
        };

        let off_ypp = self.off_yards_per_play(ctx, play_type, situation, rng)?;
        let def_ypp = self.def_yards_per_play(ctx, play_type, situation, rng)?;
        let mut yards_gained = w.average(off_ypp, def_ypp);
        if yards_gained.is_nan() {
            log::warn!(
                "yards_gained is NaN: off={off_ypp}, def={def_ypp}, situation={situation:?}"
            );
        }

        // Pass-only events resolve in table order: sack, then completion. An
        // incomplete pass zeroes the yardage even after a sack.
        if play_type == PlayType::Pass {
            let pos_table = rates_for(posteam)?;
            let def_table = rates_for(defteam)?;

            let sack_rate = w.average(
                pos_table.resolve(situation, |r| r.sacks_allowed_rate)?,
                def_table.resolve(situation, |r| r.sacks_made_rate)?,
            );
            if bernoulli(rng, sack_rate) {
                let sack_yards = w.average(
                    pos_table.resolve(situation, |r| r.sack_yards_allowed)?,
                    def_table.resolve(situation, |r| r.sack_yards_inflicted)?,
                );
                yards_gained = -sack_yards;
            }

            let completion_rate = w.average(
                self.strength.bias_off(
                    pos_table.resolve(situation, |r| r.pass_completion_rate)?,
                    state.possession,
                ),
                self.strength.bias_def(
                    def_table.resolve(situation, |r| r.pass_completion_rate_allowed)?,
                    state.defense(),
                ),
            );
            if !bernoulli(rng, completion_rate) {
                yards_gained = 0.0;
            }
        }

        let turnover_rate = w.average(
            rates_for(posteam)?.resolve(situation, |r| r.turnover_rate)?,
            rates_for(defteam)?.resolve(situation, |r| r.forced_turnover_rate)?,
        );
        let turnover = bernoulli(rng, turnover_rate);
        if turnover {
            yards_gained = 0.0;
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
