use crate::config::Config;
use crate::model::{Agent, Status, trial};
use crate::stats::{Aggregator, Outcome, StatusCount};
use anyhow::{Context, Result};
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;
use rand_distr::Uniform;

/// Simulation engine.
///
/// Holds the configuration, the population and the random number generator,
/// and provides methods to initialize and run a simulation. The population is
/// mutated in place by the daily rules and never leaves the engine.
pub struct Engine {
    cfg: Config,
    agents: Vec<Agent>,
    rng: ChaCha12Rng,
}

impl Engine {
    /// Create a new `Engine` with a randomly initialized population.
    ///
    /// The generator is seeded from the configured seed when present, from OS
    /// entropy otherwise.
    pub fn new(cfg: Config) -> Result<Self> {
        let mut rng = match cfg.run.seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => ChaCha12Rng::try_from_os_rng()?,
        };

        let mut agents = Vec::new();
        agents
            .try_reserve_exact(cfg.init.n_agt)
            .context("failed to allocate population storage")?;
        for _ in 0..cfg.init.n_agt {
            let agent = Agent::random(&cfg.agent, &cfg.domain, &mut rng)
                .context("failed to initialize agent")?;
            agents.push(agent);
        }

        Ok(Self { cfg, agents, rng })
    }

    /// Run the full day loop and return the aggregated time series.
    pub fn run(&mut self) -> Result<Outcome> {
        let mut agg = Aggregator::new(self.cfg.init.n_agt);

        for i_day in 0..self.cfg.run.n_days {
            self.run_day().context("failed to run day")?;
            agg.record(&self.count_status());

            let progress = 100.0 * (i_day + 1) as f64 / self.cfg.run.n_days as f64;
            log::info!("completed {progress:06.2}%");
        }

        Ok(agg.finish())
    }

    /// One simulated day: the intraday movement sub-loop followed by the
    /// end-of-day rules, in fixed order. Progression runs before fatality so
    /// an agent that recovers today cannot also die today.
    fn run_day(&mut self) -> Result<()> {
        for _ in 0..self.cfg.run.moves_per_day {
            self.apply_contagion().context("failed to apply contagion")?;
            self.apply_mobility().context("failed to apply mobility")?;
        }

        self.apply_external_contagion()
            .context("failed to apply external contagion")?;
        self.apply_progression();
        self.apply_fatality().context("failed to apply fatality")?;

        Ok(())
    }

    /// Rule 1: proximity contagion.
    ///
    /// Exhaustive pairwise scan over the population. The scan stops at the
    /// first infectious neighbor: exposure is boolean, and the trial below
    /// does not depend on how many neighbors there are.
    fn apply_contagion(&mut self) -> Result<()> {
        let unit = Uniform::new(0.0, 1.0)?;
        let radius = self.cfg.rules.radius_con;

        for i_agt in 0..self.agents.len() {
            if self.agents[i_agt].status != Status::Susceptible {
                continue;
            }

            let exposed = self.agents.iter().enumerate().any(|(j_agt, agt)| {
                j_agt != i_agt
                    && agt.status == Status::Infected
                    && self.agents[i_agt].distance(agt) <= radius
            });

            if exposed && trial(self.rng.sample(unit), self.agents[i_agt].prob_con) {
                self.agents[i_agt].status = Status::Infected;
            }
        }

        Ok(())
    }

    /// Rule 2: mobility.
    ///
    /// Movers take either a local step, each axis displaced uniformly within
    /// the local movement radius and clamped to the domain, or a distant jump
    /// to a fresh uniform position.
    fn apply_mobility(&mut self) -> Result<()> {
        let unit = Uniform::new(0.0, 1.0)?;
        let step = Uniform::new_inclusive(-self.cfg.rules.radius_mov, self.cfg.rules.radius_mov)?;
        let pos_x = Uniform::new(0.0, self.cfg.domain.width)?;
        let pos_y = Uniform::new(0.0, self.cfg.domain.height)?;

        let width = self.cfg.domain.width;
        let height = self.cfg.domain.height;

        for agt in &mut self.agents {
            if agt.status == Status::Deceased {
                continue;
            }
            if !trial(self.rng.sample(unit), agt.prob_mov) {
                continue;
            }

            if trial(self.rng.sample(unit), agt.prob_smo) {
                agt.x = (agt.x + self.rng.sample(step)).clamp(0.0, width);
                agt.y = (agt.y + self.rng.sample(step)).clamp(0.0, height);
            } else {
                agt.x = self.rng.sample(pos_x);
                agt.y = self.rng.sample(pos_y);
            }
        }

        Ok(())
    }

    /// Rule 3: external contagion, one independent trial per susceptible agent.
    fn apply_external_contagion(&mut self) -> Result<()> {
        let unit = Uniform::new(0.0, 1.0)?;

        for agt in &mut self.agents {
            if agt.status == Status::Susceptible && trial(self.rng.sample(unit), agt.prob_ext) {
                agt.status = Status::Infected;
            }
        }

        Ok(())
    }

    /// Rule 4: incubation, quarantine and recovery countdowns.
    ///
    /// `t_inc` is not replenished on recovery, so a reinfected agent reaches
    /// quarantine after a single day.
    fn apply_progression(&mut self) {
        let t_rec = self.cfg.agent.t_rec;

        for agt in &mut self.agents {
            match agt.status {
                Status::Infected => {
                    agt.t_inc -= 1;
                    if agt.t_inc <= 0 {
                        agt.status = Status::Quarantined;
                    }
                }
                Status::Quarantined => {
                    agt.t_rec -= 1;
                    if agt.t_rec <= 0 {
                        agt.status = Status::Susceptible;
                        agt.t_rec = t_rec;
                    }
                }
                Status::Susceptible | Status::Deceased => {}
            }
        }
    }

    /// Rule 5: fatality, one trial per agent still quarantined after Rule 4.
    fn apply_fatality(&mut self) -> Result<()> {
        let unit = Uniform::new(0.0, 1.0)?;

        for agt in &mut self.agents {
            if agt.status == Status::Quarantined && trial(self.rng.sample(unit), agt.prob_fat) {
                agt.status = Status::Deceased;
            }
        }

        Ok(())
    }

    fn count_status(&self) -> StatusCount {
        let mut count = StatusCount::default();
        for agt in &self.agents {
            match agt.status {
                Status::Infected => count.infected += 1,
                Status::Quarantined => count.quarantined += 1,
                Status::Deceased => count.deceased += 1,
                Status::Susceptible => {}
            }
        }
        count
    }
}
