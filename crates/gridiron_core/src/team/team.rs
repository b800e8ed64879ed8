//! Long-lived team objects shared read-only across every simulation of a
//! matchup. The expensive distribution fitting happens once here, not once
//! per game.

use rand::Rng;

use crate::error::{Result, SimError};
use crate::model::ModelCode;
use crate::models::TeamProfile;

use super::rate_table::SituationalRateTable;
use super::sampler::YardageSampler;

/// Fitted samplers, keyed by stat family. Which slots are populated depends
/// on the play model the matchup was prepared for.
#[derive(Debug, Clone, Default)]
pub struct SamplerSet {
    pub off_passing: Option<YardageSampler>,
    pub def_passing: Option<YardageSampler>,
    pub off_rushing: Option<YardageSampler>,
    pub def_rushing: Option<YardageSampler>,
    pub off_air_yards: Option<YardageSampler>,
    pub def_air_yards: Option<YardageSampler>,
}

/// One team in a simulated matchup: name, season profile, optional
/// situational rate table, optional strength rating, and the sampler set
/// fitted for the chosen play model.
#[derive(Debug, Clone)]
pub struct Team {
    name: String,
    profile: TeamProfile,
    rate_table: Option<SituationalRateTable>,
    strength_z: Option<f64>,
    samplers: SamplerSet,
}

impl Team {
    pub fn new(name: impl Into<String>, profile: TeamProfile) -> Self {
        Self {
            name: name.into(),
            profile,
            rate_table: None,
            strength_z: None,
            samplers: SamplerSet::default(),
        }
    }

    pub fn with_rate_table(mut self, rate_table: SituationalRateTable) -> Self {
        self.rate_table = Some(rate_table);
        self
    }

    /// Attach the standardized strength z-score produced by the ratings job.
    pub fn with_strength_z(mut self, z_score: f64) -> Self {
        self.strength_z = Some(z_score);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn profile(&self) -> &TeamProfile {
        &self.profile
    }

    pub fn rate_table(&self) -> Option<&SituationalRateTable> {
        self.rate_table.as_ref()
    }

    pub fn strength_z(&self) -> Option<f64> {
        self.strength_z
    }

    /// Fit the sampler subset the chosen model family draws from. Called once
    /// per matchup, before the team is shared across simulations.
    pub fn prepare_samplers(&mut self, code: ModelCode) -> Result<()> {
        let p = &self.profile;
        self.samplers = SamplerSet::default();
        match code {
            ModelCode::Proto | ModelCode::V2 | ModelCode::V2a => {}
            ModelCode::V1 | ModelCode::V1a | ModelCode::V2b => {
                self.samplers.off_passing = Some(YardageSampler::from_moments(
                    p.off_pass_yards_per_play_mean,
                    p.off_pass_yards_per_play_variance,
                )?);
                self.samplers.def_passing = Some(YardageSampler::from_moments(
                    p.def_pass_yards_per_play_mean,
                    p.def_pass_yards_per_play_variance,
                )?);
                self.samplers.off_rushing = Some(YardageSampler::from_moments(
                    p.off_rush_yards_per_play_mean,
                    p.off_rush_yards_per_play_variance,
                )?);
                self.samplers.def_rushing = Some(YardageSampler::from_moments(
                    p.def_rush_yards_per_play_mean,
                    p.def_rush_yards_per_play_variance,
                )?);
            }
            ModelCode::V1b => {
                self.samplers.off_air_yards = Some(YardageSampler::from_moments(
                    p.off_air_yards_per_attempt,
                    p.off_pass_yards_per_play_variance,
                )?);
                self.samplers.def_air_yards = Some(YardageSampler::from_moments(
                    p.def_air_yards_per_attempt,
                    p.def_pass_yards_per_play_variance,
                )?);
                self.samplers.off_rushing = Some(YardageSampler::from_moments(
                    p.off_rush_yards_per_play_mean,
                    p.off_rush_yards_per_play_variance,
                )?);
                self.samplers.def_rushing = Some(YardageSampler::from_moments(
                    p.def_rush_yards_per_play_mean,
                    p.def_rush_yards_per_play_variance,
                )?);
            }
        }
        Ok(())
    }

    fn draw(
        sampler: &Option<YardageSampler>,
        family: &'static str,
        rng: &mut (impl Rng + ?Sized),
    ) -> Result<f64> {
        sampler
            .as_ref()
            .map(|s| s.sample(rng))
            .ok_or(SimError::SamplerUninitialized(family))
    }

    pub fn sample_offensive_passing(&self, rng: &mut (impl Rng + ?Sized)) -> Result<f64> {
        Self::draw(&self.samplers.off_passing, "offensive passing", rng)
    }

    pub fn sample_defensive_passing(&self, rng: &mut (impl Rng + ?Sized)) -> Result<f64> {
        Self::draw(&self.samplers.def_passing, "defensive passing", rng)
    }

    pub fn sample_offensive_rushing(&self, rng: &mut (impl Rng + ?Sized)) -> Result<f64> {
        Self::draw(&self.samplers.off_rushing, "offensive rushing", rng)
    }

    pub fn sample_defensive_rushing(&self, rng: &mut (impl Rng + ?Sized)) -> Result<f64> {
        Self::draw(&self.samplers.def_rushing, "defensive rushing", rng)
    }

    pub fn sample_offensive_air_yards(&self, rng: &mut (impl Rng + ?Sized)) -> Result<f64> {
        Self::draw(&self.samplers.off_air_yards, "offensive air yards", rng)
    }

    pub fn sample_defensive_air_yards(&self, rng: &mut (impl Rng + ?Sized)) -> Result<f64> {
        Self::draw(&self.samplers.def_air_yards, "defensive air yards", rng)
    }
}
