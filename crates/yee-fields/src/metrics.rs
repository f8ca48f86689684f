//! Wall-clock accounting per activity.
//!
//! [`TimeSinks`] attributes elapsed wall time to whichever [`Activity`] is
//! current. A field set switches activity around expensive work (for
//! instance [`connect_chunks`](crate::FieldSet::connect_chunks) runs under
//! [`Activity::Connecting`]) and logs the totals when it drops.

use std::fmt;
use std::time::{Duration, Instant};

use log::info;

/// What the field set is spending time on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Activity {
    /// Building the exchange ledger.
    Connecting,
    /// Advancing fields by one step.
    Stepping,
    /// Applying boundary conditions and exchanges.
    Boundaries,
    /// Writing fields out.
    FieldOutput,
    /// Everything else.
    Other,
}

impl Activity {
    /// Number of activities.
    pub const COUNT: usize = 5;

    /// All activities, in index order.
    pub const ALL: [Activity; Self::COUNT] = [
        Activity::Connecting,
        Activity::Stepping,
        Activity::Boundaries,
        Activity::FieldOutput,
        Activity::Other,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Activity::Connecting => "connecting chunks",
            Activity::Stepping => "time stepping",
            Activity::Boundaries => "boundary conditions",
            Activity::FieldOutput => "field output",
            Activity::Other => "everything else",
        };
        f.write_str(label)
    }
}

/// Accumulated wall time per [`Activity`].
#[derive(Clone, Debug)]
pub struct TimeSinks {
    spent: [Duration; Activity::COUNT],
    working_on: Activity,
    was_working_on: Activity,
    since: Instant,
}

impl Default for TimeSinks {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSinks {
    /// Start timing, attributing to [`Activity::Other`].
    pub fn new() -> Self {
        Self {
            spent: [Duration::ZERO; Activity::COUNT],
            working_on: Activity::Other,
            was_working_on: Activity::Other,
            since: Instant::now(),
        }
    }

    fn flush(&mut self) {
        let now = Instant::now();
        self.spent[self.working_on.index()] += now - self.since;
        self.since = now;
    }

    /// Charge time from now on to `activity`, remembering the current one.
    pub fn am_now_working_on(&mut self, activity: Activity) {
        self.flush();
        self.was_working_on = self.working_on;
        self.working_on = activity;
    }

    /// Go back to the activity that was current before the last switch.
    pub fn finished_working(&mut self) {
        self.flush();
        self.working_on = self.was_working_on;
        self.was_working_on = Activity::Other;
    }

    /// The activity time is currently charged to.
    pub fn working_on(&self) -> Activity {
        self.working_on
    }

    /// Time charged to `activity` so far, including the running interval.
    pub fn time_spent_on(&self, activity: Activity) -> Duration {
        let mut t = self.spent[activity.index()];
        if activity == self.working_on {
            t += self.since.elapsed();
        }
        t
    }

    /// Activities with non-zero time, in index order.
    pub fn summary(&self) -> Vec<(Activity, Duration)> {
        Activity::ALL
            .iter()
            .map(|&a| (a, self.time_spent_on(a)))
            .filter(|(_, t)| !t.is_zero())
            .collect()
    }

    /// Log the summary at `info` level.
    pub fn log_summary(&self) {
        info!("field time usage:");
        for (activity, t) in self.summary() {
            info!("    {activity:>21}: {:.4} s", t.as_secs_f64());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_other() {
        let t = TimeSinks::new();
        assert_eq!(t.working_on(), Activity::Other);
        assert_eq!(t.time_spent_on(Activity::Connecting), Duration::ZERO);
    }

    #[test]
    fn finished_working_returns_to_previous_activity() {
        let mut t = TimeSinks::new();
        t.am_now_working_on(Activity::Stepping);
        t.am_now_working_on(Activity::Connecting);
        std::thread::sleep(Duration::from_millis(2));
        t.finished_working();
        assert_eq!(t.working_on(), Activity::Stepping);
        assert!(t.time_spent_on(Activity::Connecting) >= Duration::from_millis(2));
        t.finished_working();
        assert_eq!(t.working_on(), Activity::Other);
    }

    #[test]
    fn summary_skips_idle_activities() {
        let t = TimeSinks::new();
        let summary = t.summary();
        assert!(summary.iter().all(|(a, _)| *a == Activity::Other));
    }
}
