//! Wall-clock timing of pipeline phases.
//!
//! A [`PhaseTimer`] is started once per run and records how long each named
//! phase took. [`PhaseTimer::finish`] turns it into a [`TimingReport`] that
//! can be shown as a table, serialized as JSON, or summarized as the overall
//! `XhYmZs` time.

use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::json;

/// Elapsed time of one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseTiming {
    pub name: String,
    #[serde(rename = "elapsed_us", serialize_with = "serialize_micros")]
    pub elapsed: Duration,
}

/// Per-phase timings plus the overall wall-clock time of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TimingReport {
    pub phases: Vec<PhaseTiming>,
    #[serde(rename = "total_us", serialize_with = "serialize_micros")]
    pub total: Duration,
}

/// Records phase durations in call order.
#[derive(Debug)]
pub struct PhaseTimer {
    started: Instant,
    phases: Vec<PhaseTiming>,
}

impl Default for PhaseTimer {
    fn default() -> Self {
        Self::start()
    }
}

impl PhaseTimer {
    /// Start the overall clock.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            phases: Vec::new(),
        }
    }

    /// Run `f` and record its duration under `name`.
    ///
    /// The duration is recorded whether or not `f` returns an error.
    pub fn time<R>(&mut self, name: &str, f: impl FnOnce() -> R) -> R {
        let started = Instant::now();
        let result = f();
        self.record(name, started.elapsed());
        result
    }

    /// Record an externally measured phase.
    pub fn record(&mut self, name: &str, elapsed: Duration) {
        self.phases.push(PhaseTiming {
            name: name.to_string(),
            elapsed,
        });
    }

    /// Time since [`PhaseTimer::start`].
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Stop the overall clock.
    #[must_use]
    pub fn finish(self) -> TimingReport {
        TimingReport {
            total: self.started.elapsed(),
            phases: self.phases,
        }
    }
}

impl TimingReport {
    /// Returns true when no phase was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Duration of the first phase called `name`.
    #[must_use]
    pub fn phase(&self, name: &str) -> Option<Duration> {
        self.phases
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.elapsed)
    }

    /// Overall time as `XhYmZs`, whole seconds.
    #[must_use]
    pub fn overall(&self) -> String {
        format_hms(self.total)
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let phases = self
            .phases
            .iter()
            .map(|p| json!({ "name": p.name, "elapsed_us": p.elapsed.as_micros() }))
            .collect::<Vec<_>>();

        json!({
            "phases": phases,
            "total_us": self.total.as_micros(),
            "overall": self.overall(),
        })
    }

    /// Render the report as a simple table for terminal output.
    #[must_use]
    pub fn display_table(&self) -> String {
        if self.phases.is_empty() {
            return "No phases recorded.".to_string();
        }

        let mut out = String::new();
        out.push_str("phase                    elapsed\n");
        out.push_str("--------------------------------\n");
        for phase in &self.phases {
            out.push_str(&format!(
                "{:<22} {:>9}\n",
                phase.name,
                format_duration(phase.elapsed)
            ));
        }
        out.push_str(&format!("{:<22} {:>9}\n", "overall", self.overall()));
        out
    }
}

/// Format as `XhYmZs`, truncating to whole seconds.
#[must_use]
pub fn format_hms(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}h{}m{}s", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Format with the largest sensible unit: `1.250s`, `3.004ms`, `17µs`.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();

    if micros >= 1_000_000 {
        let secs = micros / 1_000_000;
        let millis = (micros % 1_000_000) / 1_000;
        format!("{secs}.{millis:03}s")
    } else if micros >= 1_000 {
        let millis = micros / 1_000;
        let rem = micros % 1_000;
        format!("{millis}.{rem:03}ms")
    } else {
        format!("{micros}µs")
    }
}

fn serialize_micros<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_micros()).unwrap_or(u64::MAX))
}
