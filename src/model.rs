//! Simulation data types.

use crate::config::{AgentConfig, DomainConfig};
use anyhow::Result;
use rand::prelude::*;
use rand_distr::Uniform;

/// Health status of an agent.
///
/// `Deceased` is terminal: once reached, no rule touches the agent again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Susceptible,
    Infected,
    Quarantined,
    Deceased,
}

/// Agent of the simulation.
///
/// The probability fields and the initial countdown values are sampled once at
/// initialization and never resampled. Only `status`, the position and the two
/// countdowns are mutated by the daily rules.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Contagion probability.
    pub prob_con: f64,
    /// External contagion probability.
    pub prob_ext: f64,
    /// Fatality probability.
    pub prob_fat: f64,
    /// Mobility probability.
    pub prob_mov: f64,
    /// Short distance mobility probability.
    pub prob_smo: f64,

    /// Remaining incubation time (days).
    pub t_inc: i32,
    /// Remaining recovery time (days).
    pub t_rec: i32,

    pub status: Status,

    /// Position in x, within `[0, width]`.
    pub x: f64,
    /// Position in y, within `[0, height]`.
    pub y: f64,
}

impl Agent {
    /// Sample a new susceptible agent placed uniformly in the domain.
    pub fn random<R: Rng>(cfg: &AgentConfig, domain: &DomainConfig, rng: &mut R) -> Result<Self> {
        let prob_con = sample_range(cfg.prob_con, rng)?;
        let prob_ext = sample_range(cfg.prob_ext, rng)?;
        let prob_fat = sample_range(cfg.prob_fat, rng)?;
        let prob_mov = sample_range(cfg.prob_mov, rng)?;
        let prob_smo = sample_range(cfg.prob_smo, rng)?;

        // A continuous sample truncated to an integer, so the endpoints of the
        // configured range carry near-equal weight.
        let t_inc_dist = Uniform::new(cfg.t_inc[0] as f64, cfg.t_inc[1] as f64 + 0.99)?;
        let t_inc = rng.sample(t_inc_dist) as i32;

        let x = rng.sample(Uniform::new(0.0, domain.width)?);
        let y = rng.sample(Uniform::new(0.0, domain.height)?);

        Ok(Self {
            prob_con,
            prob_ext,
            prob_fat,
            prob_mov,
            prob_smo,
            t_inc,
            t_rec: cfg.t_rec,
            status: Status::Susceptible,
            x,
            y,
        })
    }

    /// Euclidean distance to another agent.
    pub fn distance(&self, other: &Agent) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Outcome of a single probability trial.
///
/// A draw equal to the probability counts as a success, so a probability of
/// 1.0 succeeds for every draw from `[0, 1)` and a probability of 0.0 fails
/// for every nonzero draw.
pub fn trial(draw: f64, prob: f64) -> bool {
    draw <= prob
}

fn sample_range<R: Rng>(range: [f64; 2], rng: &mut R) -> Result<f64> {
    Ok(rng.sample(Uniform::new_inclusive(range[0], range[1])?))
}
