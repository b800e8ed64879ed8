//! Fourth-down decision predictors.
//!
//! Trained classifiers live outside this crate; the engine depends only on
//! the `predict(features) -> category index` contract plus each variant's
//! index-to-call mapping. Two deterministic baselines ship here so the V1/V2
//! families run without external artifacts, and tests substitute stubs.

use serde::{Deserialize, Serialize};

/// Feature vector handed to a fourth-down predictor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FourthDownFeatures {
    pub game_seconds_remaining: i32,
    pub half_seconds_remaining: i32,
    pub ydstogo: f64,
    pub yardline_100: f64,
    pub score_differential: i32,
}

/// Pre-trained categorical classifier contract. The meaning of the returned
/// index is model-specific; each play model owns its own mapping.
pub trait FourthDownModel: Send + Sync {
    fn predict(&self, features: &FourthDownFeatures) -> usize;
}

/// Play call decoded from a predictor's category index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FourthDownCall {
    Run,
    Pass,
    Punt,
    FieldGoal,
    GoForIt,
}

/// Seconds left in the current half.
pub fn half_seconds_remaining(quarter: u8, quarter_seconds_remaining: i32) -> i32 {
    if quarter == 1 || quarter == 3 {
        quarter_seconds_remaining + 900
    } else {
        quarter_seconds_remaining
    }
}

/// Feature vector for the current game situation, from the possession
/// team's perspective.
pub fn features_from_state(state: &crate::engine::GameState) -> FourthDownFeatures {
    FourthDownFeatures {
        game_seconds_remaining: state.game_seconds_remaining,
        half_seconds_remaining: half_seconds_remaining(
            state.quarter,
            state.quarter_seconds_remaining,
        ),
        ydstogo: state.distance,
        yardline_100: state.yardline,
        score_differential: state.score.differential(state.possession),
    }
}

/// V1 mapping: {0: run, 1: pass, 2: punt, 3: field goal}.
pub(crate) fn map_four_class(index: usize) -> FourthDownCall {
    match index {
        0 => FourthDownCall::Run,
        1 => FourthDownCall::Pass,
        2 => FourthDownCall::Punt,
        3 => FourthDownCall::FieldGoal,
        other => {
            log::warn!("four-class predictor returned out-of-range index {other}; punting");
            FourthDownCall::Punt
        }
    }
}

/// V1a/V2-family mapping: {0: go for it, 1: field goal, 2: punt}.
pub(crate) fn map_three_class(index: usize) -> FourthDownCall {
    match index {
        0 => FourthDownCall::GoForIt,
        1 => FourthDownCall::FieldGoal,
        2 => FourthDownCall::Punt,
        other => {
            log::warn!("three-class predictor returned out-of-range index {other}; punting");
            FourthDownCall::Punt
        }
    }
}

fn should_go_for_it(features: &FourthDownFeatures) -> bool {
    // Desperation: trailing late with the half running out.
    let desperate = features.score_differential < -3
        && features.game_seconds_remaining < 240
        && features.yardline_100 <= 60.0;
    let short_and_close = features.ydstogo <= 2.0 && features.yardline_100 <= 50.0;
    desperate || short_and_close
}

/// Conservative four-class baseline standing in for the trained V1 artifact.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineFourthDownModel;

impl FourthDownModel for BaselineFourthDownModel {
    fn predict(&self, features: &FourthDownFeatures) -> usize {
        if should_go_for_it(features) {
            if features.ydstogo <= 1.0 {
                0 // run
            } else {
                1 // pass
            }
        } else if features.yardline_100 <= 38.0 {
            3 // field goal
        } else {
            2 // punt
        }
    }
}

/// Three-class baseline standing in for the trained go-for-it artifact.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineGoForItModel;

impl FourthDownModel for BaselineGoForItModel {
    fn predict(&self, features: &FourthDownFeatures) -> usize {
        if should_go_for_it(features) {
            0 // go for it
        } else if features.yardline_100 <= 38.0 {
            1 // field goal
        } else {
            2 // punt
        }
    }
}

#[cfg(test)]
pub(crate) mod stubs {
    use super::*;

    /// Predictor that always answers with a fixed category index.
    pub struct FixedPrediction(pub usize);

    impl FourthDownModel for FixedPrediction {
        fn predict(&self, _features: &FourthDownFeatures) -> usize {
            self.0
        }
    }

    /// Predictor that records the last feature vector it saw.
    pub struct CapturingPredictor {
        pub index: usize,
        pub seen: std::sync::Mutex<Vec<FourthDownFeatures>>,
    }

    impl CapturingPredictor {
        pub fn new(index: usize) -> Self {
            Self {
                index,
                seen: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    impl FourthDownModel for CapturingPredictor {
        fn predict(&self, features: &FourthDownFeatures) -> usize {
            self.seen.lock().unwrap().push(*features);
            self.index
        }
    }
}
