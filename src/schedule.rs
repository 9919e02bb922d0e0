use std::{
    sync::mpsc::{self, RecvTimeoutError},
    time::{Duration, Instant},
};

use crate::{
    calendar::fetch::ContributionSource,
    foundation::error::{HeatwallError, HeatwallResult},
    pipeline::Pipeline,
};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);
pub const DEFAULT_POLL: Duration = Duration::from_secs(60);

/// Requests a running scheduler to stop after its in-flight cycle.
#[derive(Clone, Debug)]
pub struct StopHandle(mpsc::Sender<()>);

impl StopHandle {
    pub fn stop(&self) {
        // A closed receiver means the scheduler already returned.
        let _ = self.0.send(());
    }
}

/// Receiving end of a [`StopHandle`]. Dropping every handle also stops the scheduler.
#[derive(Debug)]
pub struct StopSignal(mpsc::Receiver<()>);

pub fn stop_pair() -> (StopHandle, StopSignal) {
    let (tx, rx) = mpsc::channel();
    (StopHandle(tx), StopSignal(rx))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScheduleReport {
    pub cycles: u64,
    pub failures: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scheduler {
    /// Time between the starts of consecutive cycles.
    pub interval: Duration,
    /// Longest wait between checks for due work or a stop request.
    pub poll: Duration,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            poll: DEFAULT_POLL,
        }
    }
}

impl Scheduler {
    pub fn new(interval: Duration, poll: Duration) -> Self {
        Self { interval, poll }
    }

    /// Run a cycle now, then every `interval` until stopped.
    pub fn run_forever<S: ContributionSource>(
        &self,
        pipeline: &mut Pipeline<S>,
        stop: &StopSignal,
    ) -> ScheduleReport {
        self.run_from(pipeline, stop, Instant::now())
    }

    /// Run a cycle now, then keep scheduling until stopped.
    ///
    /// Only a failed fetch in the first cycle is returned as an error. Write and apply
    /// failures are counted and the schedule still starts.
    pub fn run_watch<S: ContributionSource>(
        &self,
        pipeline: &mut Pipeline<S>,
        stop: &StopSignal,
    ) -> HeatwallResult<ScheduleReport> {
        let started = Instant::now();
        let mut first = ScheduleReport {
            cycles: 1,
            failures: 0,
        };
        match pipeline.run_once() {
            Ok(r) => tracing::info!(
                total = r.total_contributions,
                path = %r.path.display(),
                "wallpaper updated"
            ),
            Err(e @ HeatwallError::Fetch(_)) => return Err(e),
            Err(e) => {
                first.failures += 1;
                tracing::warn!("first update incomplete, scheduling anyway: {e}");
            }
        }

        let rest = self.run_from(pipeline, stop, started + self.interval);
        Ok(ScheduleReport {
            cycles: first.cycles + rest.cycles,
            failures: first.failures + rest.failures,
        })
    }

    /// Like [`Scheduler::run_forever`], with the first cycle due at `first_due`.
    pub fn run_from<S: ContributionSource>(
        &self,
        pipeline: &mut Pipeline<S>,
        stop: &StopSignal,
        first_due: Instant,
    ) -> ScheduleReport {
        let mut report = ScheduleReport::default();
        let mut next_due = first_due;

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            poll_secs = self.poll.as_secs(),
            "scheduler started"
        );

        loop {
            let started = Instant::now();
            if started >= next_due {
                report.cycles += 1;
                match pipeline.run_once() {
                    Ok(r) => tracing::info!(
                        cycle = report.cycles,
                        total = r.total_contributions,
                        path = %r.path.display(),
                        "wallpaper updated"
                    ),
                    Err(e) => {
                        report.failures += 1;
                        tracing::warn!(cycle = report.cycles, "update skipped: {e}");
                    }
                }
                next_due = started + self.interval;
            }

            let wait = self
                .poll
                .min(next_due.saturating_duration_since(Instant::now()));
            match stop.0.recv_timeout(wait) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }
        }

        tracing::info!(
            cycles = report.cycles,
            failures = report.failures,
            "scheduler stopped"
        );
        report
    }
}
