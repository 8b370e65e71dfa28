use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

/// Measures named operations.
///
/// Every stopped (or dropped) event records a [`StopwatchPeriod`] under
/// its name; events with different names, or several events with the
/// same name, never interfere with each other.
#[derive(Clone, Debug, Default)]
pub struct Stopwatch {
    periods: Arc<DashMap<String, Vec<StopwatchPeriod>>>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an event sampling process memory at start and stop.
    pub fn start(&self, name: &str) -> StopwatchEvent {
        self.start_event(name, true)
    }

    /// Starts an event measuring wall-clock time only.
    pub fn start_timer(&self, name: &str) -> StopwatchEvent {
        self.start_event(name, false)
    }

    /// Periods recorded so far for the given name.
    pub fn periods(&self, name: &str) -> Vec<StopwatchPeriod> {
        self.periods
            .get(name)
            .map(|p| p.value().clone())
            .unwrap_or_default()
    }

    fn start_event(&self, name: &str, track_memory: bool) -> StopwatchEvent {
        StopwatchEvent {
            name: name.to_string(),
            periods: self.periods.clone(),
            start_memory: if track_memory { current_memory() } else { None },
            track_memory,
            started_at: Instant::now(),
            stopped: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StopwatchPeriod {
    duration: Duration,
    memory: Option<u64>,
    memory_delta: Option<i64>,
}

impl StopwatchPeriod {
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Resident memory of the process at stop, in bytes.
    pub fn memory(&self) -> Option<u64> {
        self.memory
    }

    /// Resident memory difference between start and stop, in bytes.
    pub fn memory_delta(&self) -> Option<i64> {
        self.memory_delta
    }
}

pub struct StopwatchEvent {
    name: String,
    periods: Arc<DashMap<String, Vec<StopwatchPeriod>>>,
    start_memory: Option<u64>,
    track_memory: bool,
    started_at: Instant,
    stopped: bool,
}

impl StopwatchEvent {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stop(mut self) -> StopwatchPeriod {
        self.finish()
    }

    fn finish(&mut self) -> StopwatchPeriod {
        let duration = self.started_at.elapsed();
        let memory = if self.track_memory {
            current_memory()
        } else {
            None
        };

        let period = StopwatchPeriod {
            duration,
            memory,
            memory_delta: match (self.start_memory, memory) {
                (Some(start), Some(end)) => Some(end as i64 - start as i64),
                _ => None,
            },
        };

        self.periods
            .entry(self.name.clone())
            .or_default()
            .push(period);
        self.stopped = true;

        period
    }
}

impl Drop for StopwatchEvent {
    fn drop(&mut self) {
        if !self.stopped {
            self.finish();
        }
    }
}

fn current_memory() -> Option<u64> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        false,
        ProcessRefreshKind::new().with_memory(),
    );

    system.process(pid).map(|p| p.memory())
}

/// Formats a byte count with a binary unit suffix (B, K, M, G, T).
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "K", "M", "G", "T"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{}{}", bytes, UNITS[0])
    } else {
        format!("{}{}", (value * 100.0).round() / 100.0, UNITS[unit])
    }
}
