use std::time::Duration;

use tokio::time::{interval, Interval, MissedTickBehavior};

pub const CLOCK_PERIOD: Duration = Duration::from_secs(1);

/// Interval driving the clock header. The first tick completes immediately;
/// ticks missed while the loop was busy are skipped rather than replayed.
pub fn clock_interval() -> Interval {
    let mut clock = interval(CLOCK_PERIOD);
    clock.set_missed_tick_behavior(MissedTickBehavior::Skip);
    clock
}
