use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Simulation configuration parameters.
///
/// Loaded from a TOML file and validated before use. Every section is
/// optional; missing sections fall back to the documented defaults.
/// See [`Config::from_file`] for loading.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub init: InitConfig,

    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub domain: DomainConfig,

    #[serde(default)]
    pub rules: RulesConfig,

    #[serde(default)]
    pub agent: AgentConfig,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct InitConfig {
    /// Number of agents.
    pub n_agt: usize,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of simulated days.
    pub n_days: usize,
    /// Number of movement sub-iterations per day.
    pub moves_per_day: usize,
    /// Seed for the random number generator; OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Simulation area width (m).
    pub width: f64,
    /// Simulation area height (m).
    pub height: f64,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Contagion limit distance (m).
    pub radius_con: f64,
    /// Maximum radius for local movements (m).
    pub radius_mov: f64,
}

/// Sampling ranges for the per-agent stochastic parameters.
///
/// Each agent draws its own value once at initialization, uniformly from the
/// corresponding range.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub prob_con: [f64; 2],
    pub prob_ext: [f64; 2],
    pub prob_fat: [f64; 2],
    pub prob_mov: [f64; 2],
    pub prob_smo: [f64; 2],

    /// Incubation time range (days, inclusive).
    pub t_inc: [i32; 2],
    /// Recovery time (days).
    pub t_rec: i32,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self { n_agt: 1024 }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            n_days: 30,
            moves_per_day: 10,
            seed: None,
        }
    }
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            radius_con: 1.0,
            radius_mov: 5.0,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            prob_con: [0.02, 0.03],
            prob_ext: [0.02, 0.03],
            prob_fat: [0.007, 0.07],
            prob_mov: [0.3, 0.5],
            prob_smo: [0.7, 0.9],
            t_inc: [5, 6],
            t_rec: 14,
        }
    }
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let text = fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&text).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_num(self.init.n_agt, 1..10_000_000).context("invalid number of agents")?;

        check_num(self.run.n_days, 1..100_000).context("invalid number of days")?;
        check_num(self.run.moves_per_day, 1..10_000).context("invalid number of moves per day")?;

        check_num(self.domain.width, f64::MIN_POSITIVE..).context("invalid domain width")?;
        check_num(self.domain.height, f64::MIN_POSITIVE..).context("invalid domain height")?;

        check_num(self.rules.radius_con, f64::MIN_POSITIVE..).context("invalid contagion radius")?;
        check_num(self.rules.radius_mov, f64::MIN_POSITIVE..)
            .context("invalid local movement radius")?;

        check_prob_range(self.agent.prob_con).context("invalid contagion probabilities")?;
        check_prob_range(self.agent.prob_ext).context("invalid external contagion probabilities")?;
        check_prob_range(self.agent.prob_fat).context("invalid fatality probabilities")?;
        check_prob_range(self.agent.prob_mov).context("invalid mobility probabilities")?;
        check_prob_range(self.agent.prob_smo).context("invalid short mobility probabilities")?;

        check_time_range(self.agent.t_inc).context("invalid incubation times")?;
        check_num(self.agent.t_rec, 1..10_000).context("invalid recovery time")?;

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}

fn check_prob_range(range: [f64; 2]) -> Result<()> {
    let [lo, hi] = range;
    check_num(lo, 0.0..=1.0).context("invalid lower bound")?;
    check_num(hi, lo..=1.0).context("invalid upper bound")?;
    Ok(())
}

fn check_time_range(range: [i32; 2]) -> Result<()> {
    let [lo, hi] = range;
    check_num(lo, 1..).context("invalid lower bound")?;
    check_num(hi, lo..).context("invalid upper bound")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn empty_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_toml_overrides_defaults() {
        let text = "[init]\nn_agt = 16\n\n[run]\nn_days = 3\nmoves_per_day = 2\nseed = 99\n";
        let config: Config = toml::from_str(text).unwrap();
        config.validate().unwrap();

        assert_eq!(config.init.n_agt, 16);
        assert_eq!(config.run.n_days, 3);
        assert_eq!(config.run.moves_per_day, 2);
        assert_eq!(config.run.seed, Some(99));
        assert_eq!(config.agent, AgentConfig::default());
    }

    #[test]
    fn rejects_empty_population() {
        let mut config = Config::default();
        config.init.n_agt = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_domain() {
        let mut config = Config::default();
        config.domain.width = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.domain.height = -10.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_probabilities_outside_unit_interval() {
        let mut config = Config::default();
        config.agent.prob_fat = [0.5, 1.5];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.agent.prob_con = [-0.1, 0.3];
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_ranges() {
        let mut config = Config::default();
        config.agent.prob_mov = [0.5, 0.3];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.agent.t_inc = [6, 5];
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_durations() {
        let mut config = Config::default();
        config.agent.t_rec = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.run.n_days = 0;
        assert!(config.validate().is_err());
    }
}
