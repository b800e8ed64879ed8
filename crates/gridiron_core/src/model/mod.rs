//! Play resolution models.
//!
//! Each variant turns the current game state plus the two teams' statistical
//! profiles into a single play outcome. Variants share one dispatch surface
//! ([`GameModel`]) and a handful of helpers; behavioral differences between
//! them (yardage sourcing, turnover damping, fourth-down policy, strength
//! bias) live in the individual strategy structs.

pub mod fourth_down;
pub mod prototype;
pub mod v1;
pub mod v1a;
pub mod v1b;
pub mod v2;

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::engine::GameState;
use crate::error::Result;
use crate::models::{PlayResult, PlayType};
use crate::team::Team;

pub use fourth_down::{
    half_seconds_remaining, BaselineFourthDownModel, BaselineGoForItModel, FourthDownCall,
    FourthDownFeatures, FourthDownModel,
};
pub use prototype::PrototypeModel;
pub use v1::V1Model;
pub use v1a::V1aModel;
pub use v1b::V1bModel;
pub use v2::{RatingParams, StrengthBias, V2Model, V2Variant};

/// Selection code for a play model variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelCode {
    Proto,
    V1,
    V1a,
    V1b,
    V2,
    V2a,
    V2b,
}

impl ModelCode {
    pub fn parse(code: &str) -> Option<ModelCode> {
        match code {
            "proto" => Some(ModelCode::Proto),
            "v1" => Some(ModelCode::V1),
            "v1a" => Some(ModelCode::V1a),
            "v1b" => Some(ModelCode::V1b),
            "v2" => Some(ModelCode::V2),
            "v2a" => Some(ModelCode::V2a),
            "v2b" => Some(ModelCode::V2b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelCode::Proto => "proto",
            ModelCode::V1 => "v1",
            ModelCode::V1a => "v1a",
            ModelCode::V1b => "v1b",
            ModelCode::V2 => "v2",
            ModelCode::V2a => "v2a",
            ModelCode::V2b => "v2b",
        }
    }
}

impl fmt::Display for ModelCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Offense/defense blend weights. The single mechanism by which the two
/// teams' strength is combined for every modeled quantity.
#[derive(Debug, Clone, Copy)]
pub struct BlendWeights {
    off_weight: f64,
}

impl BlendWeights {
    pub fn new(off_weight: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&off_weight));
        Self { off_weight }
    }

    pub fn off_weight(&self) -> f64 {
        self.off_weight
    }

    pub fn def_weight(&self) -> f64 {
        1.0 - self.off_weight
    }

    pub fn average(&self, off_stat: f64, def_stat: f64) -> f64 {
        weighted_average(off_stat, def_stat, self.off_weight)
    }
}

/// `off_weight * off_stat + (1 - off_weight) * def_stat`.
pub fn weighted_average(off_stat: f64, def_stat: f64, off_weight: f64) -> f64 {
    off_stat * off_weight + def_stat * (1.0 - off_weight)
}

/// Read-only view of the state a model resolves one play against.
#[derive(Clone, Copy)]
pub struct PlayContext<'a> {
    pub state: &'a GameState,
    pub home: &'a Team,
    pub away: &'a Team,
}

impl<'a> PlayContext<'a> {
    pub fn team(&self, side: crate::models::TeamSide) -> &'a Team {
        match side {
            crate::models::TeamSide::Home => self.home,
            crate::models::TeamSide::Away => self.away,
        }
    }

    pub fn posteam(&self) -> &'a Team {
        self.team(self.state.possession)
    }

    pub fn defteam(&self) -> &'a Team {
        self.team(self.state.possession.opponent())
    }
}

/// One interchangeable probabilistic play-resolution strategy.
pub trait GameModel: Send + Sync {
    fn code(&self) -> ModelCode;

    /// Resolve a single play against the current state. Models are stateless
    /// across plays; all randomness comes from the engine's RNG.
    fn resolve_play(&self, ctx: &PlayContext<'_>, rng: &mut ChaCha8Rng) -> Result<PlayResult>;
}

/// Weighted coin flip on a probability. Weights outside [0, 1] saturate, the
/// same way relative-weight sampling treats them.
pub(crate) fn bernoulli(rng: &mut (impl Rng + ?Sized), p: f64) -> bool {
    if !(p > 0.0) {
        false
    } else if p >= 1.0 {
        true
    } else {
        rng.gen_bool(p)
    }
}

/// Run/pass call from a pair of relative weights.
pub(crate) fn call_run_or_pass(
    rng: &mut (impl Rng + ?Sized),
    run_weight: f64,
    pass_weight: f64,
) -> PlayType {
    let total = run_weight + pass_weight;
    if !(total > 0.0) {
        return PlayType::Run;
    }
    if rng.gen::<f64>() * total < run_weight {
        PlayType::Run
    } else {
        PlayType::Pass
    }
}

pub(crate) fn punt_play(yards: f64, time_elapsed: u32, state: &GameState) -> PlayResult {
    PlayResult::of_play(
        PlayType::Punt,
        yards,
        time_elapsed,
        false,
        None,
        state.quarter,
        state.quarter_seconds_remaining,
        state.possession,
    )
}

pub(crate) fn field_goal_play(made: bool, time_elapsed: u32, state: &GameState) -> PlayResult {
    PlayResult::of_play(
        PlayType::FieldGoal,
        0.0,
        time_elapsed,
        false,
        Some(made),
        state.quarter,
        state.quarter_seconds_remaining,
        state.possession,
    )
}

pub(crate) fn scrimmage_play(
    play_type: PlayType,
    yards_gained: f64,
    time_elapsed: u32,
    turnover: bool,
    state: &GameState,
) -> PlayResult {
    PlayResult::of_play(
        play_type,
        yards_gained,
        time_elapsed,
        turnover,
        None,
        state.quarter,
        state.quarter_seconds_remaining,
        state.possession,
    )
}

/// Per-batch model configuration surface.
#[derive(Clone)]
pub struct ModelConfig {
    /// Override the variant's default offensive blend weight.
    pub off_weight: Option<f64>,
    /// Enables the strength-rating bias term for the V2 family.
    pub rating_bias_enabled: bool,
    /// Injected fourth-down decision predictor; the crate baseline is used
    /// when absent.
    pub fourth_down: Option<Arc<dyn FourthDownModel>>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            off_weight: None,
            rating_bias_enabled: true,
            fourth_down: None,
        }
    }
}

/// Build the play model for a code string. Unknown codes fall back to the
/// prototype model so a batch stays runnable.
pub fn build_model(
    code: &str,
    home: &Team,
    away: &Team,
    config: &ModelConfig,
) -> Box<dyn GameModel> {
    let parsed = match ModelCode::parse(code) {
        Some(parsed) => parsed,
        None => {
            log::warn!("unknown model code {code:?}, defaulting to prototype");
            ModelCode::Proto
        }
    };
    build_model_for(parsed, home, away, config)
}

pub fn build_model_for(
    code: ModelCode,
    home: &Team,
    away: &Team,
    config: &ModelConfig,
) -> Box<dyn GameModel> {
    let four_class: Arc<dyn FourthDownModel> = config
        .fourth_down
        .clone()
        .unwrap_or_else(|| Arc::new(BaselineFourthDownModel));
    let three_class: Arc<dyn FourthDownModel> = config
        .fourth_down
        .clone()
        .unwrap_or_else(|| Arc::new(BaselineGoForItModel));

    let strength = if config.rating_bias_enabled {
        match (home.strength_z(), away.strength_z()) {
            (Some(home_z), Some(away_z)) => {
                StrengthBias::from_z_scores(home_z, away_z, &RatingParams::default())
            }
            _ => {
                log::warn!("strength bias enabled but a team is missing its z-score; disabling");
                StrengthBias::disabled()
            }
        }
    } else {
        StrengthBias::disabled()
    };

    match code {
        ModelCode::Proto => Box::new(match config.off_weight {
            Some(w) => PrototypeModel::new(w),
            None => PrototypeModel::default(),
        }),
        ModelCode::V1 => Box::new(V1Model::new(
            config.off_weight.unwrap_or(v1::DEFAULT_OFF_WEIGHT),
            four_class,
        )),
        ModelCode::V1a => Box::new(V1aModel::new(
            config.off_weight.unwrap_or(v1a::DEFAULT_OFF_WEIGHT),
            three_class,
        )),
        ModelCode::V1b => Box::new(V1bModel::new(
            config.off_weight.unwrap_or(v1b::DEFAULT_OFF_WEIGHT),
            three_class,
        )),
        ModelCode::V2 | ModelCode::V2a | ModelCode::V2b => {
            let variant = match code {
                ModelCode::V2 => V2Variant::Base,
                ModelCode::V2a => V2Variant::Averaged,
                _ => V2Variant::SamplerBlend,
            };
            let off_weight = config
                .off_weight
                .unwrap_or(v2::default_off_weight(variant));
            Box::new(V2Model::new(variant, off_weight, three_class, strength))
        }
    }
}
