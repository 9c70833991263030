//! Daily statistics aggregation and milestone tracking.

/// Population tally at the end of a day.
///
/// The susceptible count is implicit: population size minus the other three.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCount {
    pub infected: usize,
    pub quarantined: usize,
    pub deceased: usize,
}

impl StatusCount {
    pub fn susceptible(&self, n_agt: usize) -> usize {
        n_agt - self.infected - self.quarantined - self.deceased
    }
}

/// Derived statistics for a single day, immutable once computed.
///
/// `day` is 0-indexed; the report renders it 1-indexed. Deltas are signed
/// because the ever-infected series shrinks when an agent recovers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRecord {
    pub day: usize,

    pub new_infected: i64,
    pub new_recovered: i64,
    pub new_deceased: i64,

    pub cum_infected: usize,
    pub cum_recovered: usize,
    pub cum_deceased: usize,
}

/// First days (1-indexed) a cumulative series crossed its thresholds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// First day the value was above zero.
    pub first: Option<usize>,
    /// First day the value reached half the population.
    pub half: Option<usize>,
    /// First day the value reached the whole population.
    pub all: Option<usize>,
}

impl Thresholds {
    fn update(&mut self, day: usize, n_agt: usize, cum: usize) {
        if self.first.is_none() && cum > 0 {
            self.first = Some(day + 1);
        }
        if self.half.is_none() && cum >= n_agt / 2 {
            self.half = Some(day + 1);
        }
        if self.all.is_none() && cum >= n_agt {
            self.all = Some(day + 1);
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Milestones {
    pub infected: Thresholds,
    pub recovered: Thresholds,
    pub deceased: Thresholds,
}

/// Full result of a simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub records: Vec<DailyRecord>,
    pub milestones: Milestones,
}

/// Accumulates one [`DailyRecord`] per day from the day's status counts.
///
/// Keeps the previous day's cumulative totals to derive the daily deltas;
/// before day 0 all previous totals are zero.
pub struct Aggregator {
    n_agt: usize,

    prev_infected: usize,
    prev_recovered: usize,
    prev_deceased: usize,

    records: Vec<DailyRecord>,
    milestones: Milestones,
}

impl Aggregator {
    pub fn new(n_agt: usize) -> Self {
        Self {
            n_agt,
            prev_infected: 0,
            prev_recovered: 0,
            prev_deceased: 0,
            records: Vec::new(),
            milestones: Milestones::default(),
        }
    }

    /// Fold one day's status counts into the series.
    pub fn record(&mut self, count: &StatusCount) {
        let day = self.records.len();

        // Ever infected: every agent currently in an infected-lineage status,
        // plus the recoveries already folded in through yesterday's value.
        let cum_infected =
            count.infected + count.quarantined + count.deceased + self.prev_recovered;

        // Recoveries enter the cumulative series one day late: today's value
        // is a carry of yesterday's. See DESIGN.md for why this stays as is.
        let cum_recovered = self.prev_recovered;

        // Deceased is terminal, so the head count is already a running total.
        let cum_deceased = count.deceased;

        let record = DailyRecord {
            day,
            new_infected: cum_infected as i64 - self.prev_infected as i64,
            new_recovered: cum_recovered as i64 - self.prev_recovered as i64,
            new_deceased: cum_deceased as i64 - self.prev_deceased as i64,
            cum_infected,
            cum_recovered,
            cum_deceased,
        };

        self.milestones.infected.update(day, self.n_agt, cum_infected);
        self.milestones.recovered.update(day, self.n_agt, cum_recovered);
        self.milestones.deceased.update(day, self.n_agt, cum_deceased);

        self.prev_infected = cum_infected;
        self.prev_recovered = cum_recovered;
        self.prev_deceased = cum_deceased;

        self.records.push(record);
    }

    pub fn finish(self) -> Outcome {
        Outcome {
            records: self.records,
            milestones: self.milestones,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(infected: usize, quarantined: usize, deceased: usize) -> StatusCount {
        StatusCount {
            infected,
            quarantined,
            deceased,
        }
    }

    #[test]
    fn susceptible_is_population_minus_the_rest() {
        let count = count(3, 2, 1);
        assert_eq!(count.susceptible(10), 4);
    }

    #[test]
    fn day_zero_deltas_equal_the_totals() {
        let mut agg = Aggregator::new(100);
        agg.record(&count(3, 2, 1));
        let outcome = agg.finish();
        let record = &outcome.records[0];

        assert_eq!(record.day, 0);
        assert_eq!(record.cum_infected, 6);
        assert_eq!(record.cum_recovered, 0);
        assert_eq!(record.cum_deceased, 1);
        assert_eq!(record.new_infected, 6);
        assert_eq!(record.new_recovered, 0);
        assert_eq!(record.new_deceased, 1);
    }

    #[test]
    fn deltas_subtract_the_previous_day() {
        let mut agg = Aggregator::new(100);
        agg.record(&count(3, 2, 1));
        agg.record(&count(1, 4, 2));
        let outcome = agg.finish();
        let record = &outcome.records[1];

        assert_eq!(record.day, 1);
        assert_eq!(record.cum_infected, 7);
        assert_eq!(record.cum_deceased, 2);
        assert_eq!(record.new_infected, 1);
        assert_eq!(record.new_deceased, 1);
    }

    #[test]
    fn ever_infected_series_can_shrink() {
        let mut agg = Aggregator::new(100);
        agg.record(&count(3, 4, 0));
        // Recoveries lower the head counts without raising the recovered
        // carry, so the delta goes negative.
        agg.record(&count(0, 2, 0));
        let outcome = agg.finish();
        let record = &outcome.records[1];

        assert_eq!(record.cum_infected, 2);
        assert_eq!(record.new_infected, -5);
    }

    #[test]
    fn recovered_series_never_leaves_zero() {
        let mut agg = Aggregator::new(100);
        for _ in 0..50 {
            agg.record(&count(10, 20, 5));
        }
        let outcome = agg.finish();

        assert!(outcome.records.iter().all(|r| r.cum_recovered == 0));
        assert_eq!(outcome.milestones.recovered.first, None);
    }

    #[test]
    fn milestones_record_the_first_crossing_only() {
        let mut agg = Aggregator::new(10);
        agg.record(&count(0, 0, 0));
        agg.record(&count(3, 0, 0));
        agg.record(&count(6, 0, 0));
        agg.record(&count(10, 0, 0));
        agg.record(&count(10, 0, 0));
        let outcome = agg.finish();

        assert_eq!(outcome.milestones.infected.first, Some(2));
        assert_eq!(outcome.milestones.infected.half, Some(3));
        assert_eq!(outcome.milestones.infected.all, Some(4));
    }

    #[test]
    fn milestones_stay_unset_when_never_crossed() {
        let mut agg = Aggregator::new(10);
        agg.record(&count(0, 0, 0));
        agg.record(&count(2, 0, 0));
        let outcome = agg.finish();

        assert_eq!(outcome.milestones.infected.first, Some(2));
        assert_eq!(outcome.milestones.infected.half, None);
        assert_eq!(outcome.milestones.infected.all, None);
        assert_eq!(outcome.milestones.deceased.first, None);
    }

    #[test]
    fn first_infected_day_follows_the_first_positive_record() {
        let mut agg = Aggregator::new(10);
        agg.record(&count(0, 0, 0));
        agg.record(&count(0, 0, 0));
        agg.record(&count(1, 0, 0));
        let outcome = agg.finish();

        let first = outcome.milestones.infected.first.unwrap();
        assert_eq!(first, 3);
        assert!(outcome.records[first - 1].cum_infected > 0);
        assert_eq!(outcome.records[first - 2].cum_infected, 0);
    }
}
