//! Progress of a single shear test.

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a test run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No run in progress; parameters may be adjusted freely.
    #[default]
    Idle,
    /// The box is advancing on every tick.
    Running,
    /// The run is suspended and may be resumed.
    Paused,
    /// The box reached its maximum travel.
    Completed,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Paused => "paused",
            Phase::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// One recorded point of the force-displacement curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Horizontal displacement in millimetres.
    pub displacement_mm: f64,
    /// Shear force reading in newtons.
    pub shear_force_n: f64,
}

/// Displacement, phase and recorded samples of the current run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestRunState {
    /// Current horizontal displacement in millimetres.
    displacement_mm: f64,
    /// Travel at which the run completes.
    max_displacement_mm: f64,
    /// Lifecycle phase.
    phase: Phase,
    /// Samples recorded since the run started.
    samples: Vec<Sample>,
}

impl TestRunState {
    /// Create an idle run with the given travel limit.
    #[must_use]
    pub fn new(max_displacement_mm: f64) -> Self {
        Self {
            displacement_mm: 0.0,
            max_displacement_mm,
            phase: Phase::Idle,
            samples: Vec::new(),
        }
    }

    /// Current displacement in millimetres.
    #[must_use]
    pub fn displacement_mm(&self) -> f64 {
        self.displacement_mm
    }

    /// Travel limit in millimetres.
    #[must_use]
    pub fn max_displacement_mm(&self) -> f64 {
        self.max_displacement_mm
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Samples recorded so far, in displacement order.
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Most recent sample, if any.
    #[must_use]
    pub fn last_sample(&self) -> Option<Sample> {
        self.samples.last().copied()
    }

    /// Whether the ceiling has been reached.
    #[must_use]
    pub fn at_ceiling(&self) -> bool {
        self.displacement_mm >= self.max_displacement_mm
    }

    /// Return to idle with zero displacement and no samples.
    pub(crate) fn reset(&mut self) {
        self.displacement_mm = 0.0;
        self.phase = Phase::Idle;
        self.samples.clear();
    }

    /// Set the lifecycle phase.
    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Move the box forward by `increment_mm`.
    pub(crate) fn advance(&mut self, increment_mm: f64) {
        self.displacement_mm += increment_mm;
    }

    /// Append a sample to the history.
    pub(crate) fn record(&mut self, sample: Sample) {
        self.samples.push(sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_run_is_idle_and_empty() {
        let run = TestRunState::new(300.0);
        assert_eq!(run.phase(), Phase::Idle);
        assert_eq!(run.displacement_mm(), 0.0);
        assert!(run.samples().is_empty());
        assert!(!run.at_ceiling());
    }

    #[test]
    fn reset_clears_progress() {
        let mut run = TestRunState::new(300.0);
        run.set_phase(Phase::Running);
        run.advance(12.5);
        run.record(Sample {
            displacement_mm: 12.5,
            shear_force_n: 1_000.0,
        });
        run.reset();
        assert_eq!(run, TestRunState::new(300.0));
    }

    #[test]
    fn ceiling_is_inclusive() {
        let mut run = TestRunState::new(1.0);
        run.advance(1.0);
        assert!(run.at_ceiling());
    }
}
