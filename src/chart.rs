//! Live force-displacement chart and the Mohr-Coulomb envelope series.

use serde::{Deserialize, Serialize};

use crate::parameters::TestParameters;
use crate::physics::{failure_envelope, EnvelopePoint};

/// Upper bound of the normal stress axis on the envelope chart, in kilopascals.
pub const ENVELOPE_AXIS_MAX_KPA: f64 = 350.0;

/// Most points an envelope series will hold.
pub const MAX_ENVELOPE_POINTS: usize = 1024;

/// Receiver for force-displacement points, such as a plotting widget.
pub trait ChartSink {
    /// Append a point with displacement `x` in millimetres and force `y` in newtons.
    fn append_point(&mut self, x: f64, y: f64);
    /// Remove every point.
    fn clear(&mut self);
}

/// One point of the force-displacement curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Horizontal displacement in millimetres.
    pub x: f64,
    /// Shear force in newtons.
    pub y: f64,
}

/// In-memory force-displacement series.
///
/// # Examples
///
/// ```
/// use shearbox::{ChartSink, ForceSeries};
///
/// let mut series = ForceSeries::default();
/// series.append_point(0.5, 417.0);
/// series.append_point(1.0, 834.0);
/// assert_eq!(series.len(), 2);
/// assert_eq!(series.peak().map(|point| point.y), Some(834.0));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ForceSeries {
    /// Points in the order they were appended.
    points: Vec<ChartPoint>,
}

impl ForceSeries {
    /// Points in the order they were appended.
    #[must_use]
    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point with the largest force.
    #[must_use]
    pub fn peak(&self) -> Option<ChartPoint> {
        self.points
            .iter()
            .copied()
            .max_by(|a, b| a.y.total_cmp(&b.y))
    }

    /// Serialise the series as JSON for export.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.points)
    }
}

impl ChartSink for ForceSeries {
    fn append_point(&mut self, x: f64, y: f64) {
        self.points.push(ChartPoint { x, y });
    }

    fn clear(&mut self) {
        self.points.clear();
    }
}

/// Failure envelope sampled every `step_kpa` from zero to the axis limit.
///
/// Steps too fine to fit in [`MAX_ENVELOPE_POINTS`] are widened so the
/// series still spans the whole axis. A non-positive step yields no points.
#[must_use]
pub fn envelope_series(parameters: &TestParameters, step_kpa: f64) -> Vec<EnvelopePoint> {
    if step_kpa.is_nan() || step_kpa <= 0.0 {
        return Vec::new();
    }
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    let intervals = (ENVELOPE_AXIS_MAX_KPA / step_kpa)
        .floor()
        .min((MAX_ENVELOPE_POINTS - 1) as f64) as usize;
    #[allow(clippy::cast_precision_loss)]
    let stresses: Vec<f64> = if intervals == MAX_ENVELOPE_POINTS - 1 {
        (0..=intervals)
            .map(|i| i as f64 * ENVELOPE_AXIS_MAX_KPA / intervals as f64)
            .collect()
    } else {
        (0..=intervals).map(|i| i as f64 * step_kpa).collect()
    };
    failure_envelope(parameters, &stresses)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn clear_empties_series() {
        let mut series = ForceSeries::default();
        series.append_point(1.0, 2.0);
        series.clear();
        assert!(series.is_empty());
    }

    #[test]
    fn peak_of_empty_series_is_none() {
        assert!(ForceSeries::default().peak().is_none());
    }

    #[test]
    fn json_export_lists_points() {
        let mut series = ForceSeries::default();
        series.append_point(0.5, 10.0);
        assert_eq!(
            series.to_json().expect("serialises"),
            r#"[{"x":0.5,"y":10.0}]"#
        );
    }

    #[test]
    fn envelope_spans_axis() {
        let envelope = envelope_series(&TestParameters::default(), 50.0);
        assert_eq!(envelope.len(), 8);
        assert_relative_eq!(envelope[0].shear_strength_kpa, 10.0);
        assert_relative_eq!(envelope[7].normal_stress_kpa, 350.0);
        assert!(envelope_series(&TestParameters::default(), 0.0).is_empty());
    }

    #[test]
    fn vanishing_step_is_widened_to_point_limit() {
        let envelope = envelope_series(&TestParameters::default(), 1.0e-20);
        assert_eq!(envelope.len(), MAX_ENVELOPE_POINTS);
        let last = envelope.last().expect("envelope has points");
        assert!(last.normal_stress_kpa <= ENVELOPE_AXIS_MAX_KPA);
        assert_relative_eq!(last.normal_stress_kpa, ENVELOPE_AXIS_MAX_KPA);
    }

    #[test]
    fn step_wider_than_axis_keeps_origin() {
        let envelope = envelope_series(&TestParameters::default(), 1000.0);
        assert_eq!(envelope.len(), 1);
        assert_relative_eq!(envelope[0].normal_stress_kpa, 0.0);
    }
}
