//! Situational rate lookup keyed by (down, distance bucket, red zone).
//!
//! Situational samples are sparse; rare down/distance/field-position
//! combinations frequently carry NaN fields or are missing outright. The
//! table therefore enforces a two-tier policy: an exact-key lookup backed by
//! the league-wide aggregate record (the all-`None` key), which every caller
//! applies before a rate reaches play resolution.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::models::SituationalRates;

/// Yards-to-gain bucket used in situation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceBucket {
    Short,
    Medium,
    Long,
}

impl DistanceBucket {
    /// Short is under 4 to gain, medium under 7, long otherwise.
    pub fn from_distance(distance: f64) -> DistanceBucket {
        if distance < 4.0 {
            DistanceBucket::Short
        } else if distance < 7.0 {
            DistanceBucket::Medium
        } else {
            DistanceBucket::Long
        }
    }
}

/// Discrete situation key. `Situation::AGGREGATE` addresses the league-wide
/// fallback record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Situation {
    pub down: Option<u8>,
    pub bucket: Option<DistanceBucket>,
    pub redzone: Option<bool>,
}

impl Situation {
    pub const AGGREGATE: Situation = Situation {
        down: None,
        bucket: None,
        redzone: None,
    };

    pub fn new(down: u8, bucket: DistanceBucket, redzone: bool) -> Self {
        Self {
            down: Some(down),
            bucket: Some(bucket),
            redzone: Some(redzone),
        }
    }
}

/// Per-team situational rate table with a mandatory aggregate fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SituationalRateTable {
    records: HashMap<Situation, SituationalRates>,
}

impl SituationalRateTable {
    /// Build a table, requiring the aggregate record to be present.
    pub fn new(records: HashMap<Situation, SituationalRates>) -> Result<Self> {
        if !records.contains_key(&Situation::AGGREGATE) {
            return Err(SimError::MissingAggregateRecord);
        }
        Ok(Self { records })
    }

    /// Exact-key lookup. Missing keys are an error; callers fall back to the
    /// aggregate record for missing or NaN situational fields.
    pub fn lookup(&self, situation: Situation) -> Result<&SituationalRates> {
        self.records
            .get(&situation)
            .ok_or_else(|| SimError::MissingSituation(format!("{situation:?}")))
    }

    pub fn aggregate(&self) -> &SituationalRates {
        // Presence is enforced at construction.
        &self.records[&Situation::AGGREGATE]
    }

    /// Two-tier resolution of a single rate field: the situational value when
    /// present and not NaN, otherwise the aggregate value.
    pub fn resolve<F>(&self, situation: Situation, field: F) -> Result<f64>
    where
        F: Fn(&SituationalRates) -> f64,
    {
        let value = match self.records.get(&situation) {
            Some(record) => field(record),
            None => f64::NAN,
        };
        if value.is_nan() {
            let fallback = field(self.aggregate());
            if fallback.is_nan() {
                log::warn!("aggregate rate is NaN for situation {situation:?}");
            }
            Ok(fallback)
        } else {
            Ok(value)
        }
    }

    /// Situational and aggregate values side by side, for models that blend
    /// the two rather than substituting. A missing key yields NaN for the
    /// situational slot so callers apply their own blend-or-fallback policy.
    pub fn resolve_pair<F>(&self, situation: Situation, field: F) -> (f64, f64)
    where
        F: Fn(&SituationalRates) -> f64,
    {
        let situational = match self.records.get(&situation) {
            Some(record) => field(record),
            None => f64::NAN,
        };
        (situational, field(self.aggregate()))
    }
}
