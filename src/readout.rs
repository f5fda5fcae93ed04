//! Values shown in the results panel next to the animation.

use std::fmt;

use crate::physics::FrameOutput;

/// Formatted result values for the current frame.
///
/// Before the first tick, and after a reset, every field shows a dash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Readout {
    /// Peak shear strength in kPa, two decimals.
    pub shear_strength: String,
    /// Horizontal displacement in mm, two decimals.
    pub horizontal_deformation: String,
    /// Vertical strain, four decimals.
    pub vertical_deformation: String,
    /// Shear force in N, two decimals.
    pub shear_force: String,
}

impl Readout {
    /// Readout with no run data.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            shear_strength: "-".to_string(),
            horizontal_deformation: "-".to_string(),
            vertical_deformation: "-".to_string(),
            shear_force: "-".to_string(),
        }
    }

    /// Readout for a frame at the given displacement.
    ///
    /// # Examples
    /// ```
    /// use shearbox::{physics::evaluate, Readout, TestParameters};
    ///
    /// let frame = evaluate(&TestParameters::default(), 0.5, 300.0);
    /// let readout = Readout::from_frame(0.5, &frame);
    /// assert_eq!(readout.shear_strength, "125.47");
    /// assert_eq!(readout.horizontal_deformation, "0.50");
    /// ```
    #[must_use]
    pub fn from_frame(displacement_mm: f64, frame: &FrameOutput) -> Self {
        Self {
            shear_strength: format!("{:.2}", frame.shear_strength_kpa),
            horizontal_deformation: format!("{displacement_mm:.2}"),
            vertical_deformation: format!("{:.4}", frame.vertical_strain),
            shear_force: format!("{:.2}", frame.shear_force_n),
        }
    }
}

impl Default for Readout {
    fn default() -> Self {
        Self::blank()
    }
}

impl fmt::Display for Readout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Shear strength: {} kPa", self.shear_strength)?;
        writeln!(f, "Horizontal deformation: {} mm", self.horizontal_deformation)?;
        writeln!(f, "Vertical deformation: {}", self.vertical_deformation)?;
        write!(f, "Shear force: {} N", self.shear_force)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_readout_shows_dashes() {
        let text = Readout::blank().to_string();
        assert_eq!(text.matches(": -").count(), 4);
    }

    #[test]
    fn frame_values_use_panel_precision() {
        let frame = FrameOutput {
            shear_strength_kpa: 125.470_05,
            shear_force_n: 417.233_5,
            vertical_strain: -0.098_888,
        };
        let readout = Readout::from_frame(0.5, &frame);
        assert_eq!(readout.shear_force, "417.23");
        assert_eq!(readout.vertical_deformation, "-0.0989");
    }
}
