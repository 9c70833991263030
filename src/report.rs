//! Text report for a finished run.
//!
//! Pure formatting over the computed series: a formatting failure surfaces as
//! an I/O error and never touches the underlying records.

use crate::config::Config;
use crate::stats::{Outcome, Thresholds};
use std::io::{self, Write};
use std::time::Duration;

const TABLE_HEADER: &str = "Day | New Infections | New Recoveries | New Deaths | \
    Cumulative Infected | Cumulative Recovered | Cumulative Deaths";

/// Write the daily table, the milestone summary and the execution time.
pub fn write_report<W: Write>(
    writer: &mut W,
    cfg: &Config,
    outcome: &Outcome,
    elapsed: Duration,
) -> io::Result<()> {
    writeln!(
        writer,
        "================ EPIDEMIC SIMULATION RESULTS ================"
    )?;
    writeln!(writer, "Simulation Parameters:")?;
    writeln!(writer, "  Number of agents: {}", cfg.init.n_agt)?;
    writeln!(writer, "  Simulation days: {}", cfg.run.n_days)?;
    writeln!(writer, "  Movements per day: {}", cfg.run.moves_per_day)?;

    writeln!(writer)?;
    writeln!(writer, "Daily Statistics:")?;
    writeln!(writer, "{TABLE_HEADER}")?;
    writeln!(writer, "{}", "-".repeat(TABLE_HEADER.len()))?;

    for record in &outcome.records {
        writeln!(
            writer,
            "{:3} | {:14} | {:14} | {:10} | {:19} | {:20} | {:17}",
            record.day + 1,
            record.new_infected,
            record.new_recovered,
            record.new_deceased,
            record.cum_infected,
            record.cum_recovered,
            record.cum_deceased,
        )?;
    }

    writeln!(writer)?;
    writeln!(writer, "Key Milestones:")?;
    write_thresholds(writer, &outcome.milestones.infected, "infection", "infected")?;
    write_thresholds(writer, &outcome.milestones.recovered, "recovery", "recovered")?;
    write_thresholds(writer, &outcome.milestones.deceased, "death", "deaths")?;

    writeln!(writer)?;
    writeln!(
        writer,
        "Execution time: {:.6} seconds",
        elapsed.as_secs_f64()
    )?;

    Ok(())
}

fn write_thresholds<W: Write>(
    writer: &mut W,
    thresholds: &Thresholds,
    event: &str,
    share: &str,
) -> io::Result<()> {
    writeln!(writer, "First {event}: Day {}", milestone_day(thresholds.first))?;
    writeln!(writer, "50% {share}: Day {}", milestone_day(thresholds.half))?;
    writeln!(writer, "100% {share}: Day {}", milestone_day(thresholds.all))?;
    Ok(())
}

/// Milestone days are 1-indexed; -1 marks a threshold never reached.
fn milestone_day(day: Option<usize>) -> i64 {
    day.map_or(-1, |day| day as i64)
}
