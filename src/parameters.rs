//! Soil and apparatus parameters adjusted by the user between or during runs.

use serde::{Deserialize, Serialize};
use uom::si::f64::Pressure;
use uom::si::pressure::{kilopascal, pound_force_per_square_inch};

use crate::errors::ParameterError;

/// Water content state of the soil sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Saturation {
    /// Unsaturated sample.
    #[default]
    Dry,
    /// Fully saturated sample.
    Saturated,
}

impl Saturation {
    /// Scale applied to the initial contraction term of the dilatancy model.
    #[must_use]
    pub fn contraction_factor(self) -> f64 {
        match self {
            Saturation::Dry => 1.0,
            Saturation::Saturated => 0.7,
        }
    }
}

impl std::fmt::Display for Saturation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Saturation::Dry => f.write_str("unsaturated"),
            Saturation::Saturated => f.write_str("saturated"),
        }
    }
}

/// Current values of every test parameter.
///
/// Profiles that do not expose a control simply leave its value at the
/// default; the physics only reads saturation, and the driver only reads speed
/// when the profile advances from it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestParameters {
    /// Cohesion `c` in kilopascals.
    pub cohesion_kpa: f64,
    /// Friction angle `φ` in degrees.
    pub friction_angle_deg: f64,
    /// Normal stress `σ` in kilopascals.
    pub normal_stress_kpa: f64,
    /// Saturation state of the sample.
    pub saturation: Saturation,
    /// Drive speed in millimetres per minute.
    pub shear_speed_mm_per_min: f64,
    /// Pneumatic supply pressure in psi.
    pub pneumatic_pressure_psi: f64,
    /// Whether the pneumatic valve is open.
    pub valve_open: bool,
}

impl Default for TestParameters {
    fn default() -> Self {
        Self {
            cohesion_kpa: 10.0,
            friction_angle_deg: 30.0,
            normal_stress_kpa: 200.0,
            saturation: Saturation::Dry,
            shear_speed_mm_per_min: 30.0,
            pneumatic_pressure_psi: 29.0,
            valve_open: false,
        }
    }
}

impl TestParameters {
    /// Check every value against its physical range.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParameterError`] encountered.
    ///
    /// # Examples
    ///
    /// ```
    /// use shearbox::{ParameterError, TestParameters};
    ///
    /// let parameters = TestParameters {
    ///     friction_angle_deg: 120.0,
    ///     ..TestParameters::default()
    /// };
    /// assert_eq!(
    ///     parameters.validate(),
    ///     Err(ParameterError::FrictionAngleOutOfRange(120.0))
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), ParameterError> {
        check_cohesion(self.cohesion_kpa)?;
        check_friction_angle(self.friction_angle_deg)?;
        check_normal_stress(self.normal_stress_kpa)?;
        check_shear_speed(self.shear_speed_mm_per_min)?;
        check_pressure(self.pneumatic_pressure_psi)?;
        Ok(())
    }

    /// Normal stress delivered by the pneumatic ram at the current pressure.
    #[must_use]
    pub fn pneumatic_normal_stress_kpa(&self) -> f64 {
        psi_to_kpa(self.pneumatic_pressure_psi)
    }

    /// Copy the pneumatic pressure into the normal stress when the valve is open.
    ///
    /// Returns `true` when the normal stress changed.
    pub fn sync_pneumatic_load(&mut self) -> bool {
        if !self.valve_open {
            return false;
        }
        let stress = self.pneumatic_normal_stress_kpa();
        let changed = (stress - self.normal_stress_kpa).abs() > f64::EPSILON;
        self.normal_stress_kpa = stress;
        changed
    }
}

/// Convert a gauge pressure in psi to kilopascals.
#[must_use]
pub fn psi_to_kpa(psi: f64) -> f64 {
    Pressure::new::<pound_force_per_square_inch>(psi).get::<kilopascal>()
}

/// Validate a cohesion value in kilopascals.
pub(crate) fn check_cohesion(value: f64) -> Result<(), ParameterError> {
    if value.is_nan() || value < 0.0 {
        return Err(ParameterError::NegativeCohesion(value));
    }
    Ok(())
}

/// Validate a friction angle in degrees.
pub(crate) fn check_friction_angle(value: f64) -> Result<(), ParameterError> {
    if !(0.0..=90.0).contains(&value) {
        return Err(ParameterError::FrictionAngleOutOfRange(value));
    }
    Ok(())
}

/// Validate a normal stress in kilopascals.
pub(crate) fn check_normal_stress(value: f64) -> Result<(), ParameterError> {
    if value.is_nan() || value < 0.0 {
        return Err(ParameterError::NegativeNormalStress(value));
    }
    Ok(())
}

/// Validate a shear speed in millimetres per minute.
pub(crate) fn check_shear_speed(value: f64) -> Result<(), ParameterError> {
    if value.is_nan() || value <= 0.0 {
        return Err(ParameterError::NonPositiveShearSpeed(value));
    }
    Ok(())
}

/// Validate a pneumatic pressure in psi.
pub(crate) fn check_pressure(value: f64) -> Result<(), ParameterError> {
    if value.is_nan() || value < 0.0 {
        return Err(ParameterError::NegativePressure(value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        TestParameters::default()
            .validate()
            .expect("defaults within range");
    }

    #[test]
    fn psi_conversion_matches_reference_factor() {
        assert_relative_eq!(psi_to_kpa(1.0), 6.894_757, epsilon = 1.0e-6);
        assert_relative_eq!(psi_to_kpa(29.0), 199.947_95, epsilon = 1.0e-3);
    }

    #[test]
    fn closed_valve_leaves_normal_stress_alone() {
        let mut parameters = TestParameters {
            pneumatic_pressure_psi: 10.0,
            ..TestParameters::default()
        };
        assert!(!parameters.sync_pneumatic_load());
        assert_relative_eq!(parameters.normal_stress_kpa, 200.0);
    }

    #[test]
    fn open_valve_applies_pneumatic_stress() {
        let mut parameters = TestParameters {
            pneumatic_pressure_psi: 10.0,
            valve_open: true,
            ..TestParameters::default()
        };
        assert!(parameters.sync_pneumatic_load());
        assert_relative_eq!(parameters.normal_stress_kpa, 68.947_57, epsilon = 1.0e-4);
        assert!(!parameters.sync_pneumatic_load());
    }

    #[test]
    fn range_checks_reject_out_of_range_values() {
        assert_eq!(
            check_cohesion(-1.0),
            Err(ParameterError::NegativeCohesion(-1.0))
        );
        assert!(check_friction_angle(90.0).is_ok());
        assert!(check_friction_angle(f64::NAN).is_err());
        assert_eq!(
            check_shear_speed(0.0),
            Err(ParameterError::NonPositiveShearSpeed(0.0))
        );
        assert_eq!(
            check_pressure(-2.5),
            Err(ParameterError::NegativePressure(-2.5))
        );
        assert!(check_normal_stress(0.0).is_ok());
    }

    #[test]
    fn saturation_scales_contraction() {
        assert_relative_eq!(Saturation::Dry.contraction_factor(), 1.0);
        assert_relative_eq!(Saturation::Saturated.contraction_factor(), 0.7);
    }
}
