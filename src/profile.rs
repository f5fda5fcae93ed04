//! Apparatus profiles describing what each shear box variant exposes.

use serde::{Deserialize, Serialize};

use crate::errors::ProfileError;
use crate::parameters::TestParameters;

/// Horizontal travel of the shear box before the test stops, in millimetres.
pub const DEFAULT_MAX_DISPLACEMENT_MM: f64 = 300.0;

/// Animation frames per minute of simulated shearing at the nominal 60 Hz rate.
const FRAMES_PER_MINUTE: f64 = 60.0;

/// How far the moving half of the box travels on each frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Advance {
    /// A constant distance per frame in millimetres.
    Fixed {
        /// Distance travelled per frame.
        mm_per_frame: f64,
    },
    /// Derived from the configured shear speed as `speed / 60` per frame.
    FromSpeed,
}

/// Capabilities and constants of a shear box variant.
///
/// All variants share the same physics; the profile only decides which
/// controls are exposed and how the run advances.
///
/// # Examples
///
/// ```
/// use shearbox::TestProfile;
///
/// let profile = TestProfile::hm5750();
/// assert!(profile.has_saturation);
/// assert!(!profile.has_pneumatic_control);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestProfile {
    /// Display name of the apparatus.
    pub name: String,
    /// Whether the saturation selector is available.
    #[serde(default)]
    pub has_saturation: bool,
    /// Whether the pneumatic pressure and valve controls are available.
    #[serde(default)]
    pub has_pneumatic_control: bool,
    /// Whether the shear speed slider is available.
    #[serde(default)]
    pub has_variable_speed: bool,
    /// Per-frame displacement rule.
    pub advance: Advance,
    /// Displacement at which the test completes, in millimetres.
    #[serde(default = "default_max_displacement")]
    pub max_displacement_mm: f64,
    /// Whether Reset stays disabled while a freshly started run is active.
    #[serde(default)]
    pub locks_reset_while_running: bool,
}

/// Serde default for [`TestProfile::max_displacement_mm`].
fn default_max_displacement() -> f64 {
    DEFAULT_MAX_DISPLACEMENT_MM
}

impl TestProfile {
    /// Dead-weight apparatus with a saturation selector and a fixed feed.
    #[must_use]
    pub fn hm5750() -> Self {
        Self {
            name: "HM-5750".to_string(),
            has_saturation: true,
            has_pneumatic_control: false,
            has_variable_speed: false,
            advance: Advance::Fixed { mm_per_frame: 0.5 },
            max_displacement_mm: DEFAULT_MAX_DISPLACEMENT_MM,
            locks_reset_while_running: true,
        }
    }

    /// Pneumatically loaded apparatus with a variable-speed drive.
    #[must_use]
    pub fn hm5755() -> Self {
        Self {
            name: "HM-5755".to_string(),
            has_saturation: false,
            has_pneumatic_control: true,
            has_variable_speed: true,
            advance: Advance::FromSpeed,
            max_displacement_mm: DEFAULT_MAX_DISPLACEMENT_MM,
            locks_reset_while_running: false,
        }
    }

    /// Generic shear box with only the Mohr-Coulomb parameters exposed.
    #[must_use]
    pub fn generic() -> Self {
        Self {
            name: "Generic".to_string(),
            has_saturation: false,
            has_pneumatic_control: false,
            has_variable_speed: false,
            advance: Advance::Fixed { mm_per_frame: 2.0 },
            max_displacement_mm: DEFAULT_MAX_DISPLACEMENT_MM,
            locks_reset_while_running: false,
        }
    }

    /// Return the three built-in profiles.
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        vec![Self::hm5750(), Self::hm5755(), Self::generic()]
    }

    /// Parse and validate a profile from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Json`] for malformed documents and the
    /// `NonPositive*` variants when the ceiling or increment would stall or
    /// divide by zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use shearbox::{Advance, TestProfile};
    ///
    /// let profile = TestProfile::from_json(
    ///     r#"{ "name": "Bench", "advance": { "mode": "fixed", "mm_per_frame": 1.0 } }"#,
    /// )
    /// .expect("valid profile");
    /// assert_eq!(profile.advance, Advance::Fixed { mm_per_frame: 1.0 });
    /// assert_eq!(profile.max_displacement_mm, 300.0);
    /// ```
    pub fn from_json(source: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_json::from_str(source)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Serialise the profile as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Json`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, ProfileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the profile can drive a run to completion.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NonPositiveCeiling`] or
    /// [`ProfileError::NonPositiveIncrement`].
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.max_displacement_mm.is_nan() || self.max_displacement_mm <= 0.0 {
            return Err(ProfileError::NonPositiveCeiling(self.max_displacement_mm));
        }
        if let Advance::Fixed { mm_per_frame } = self.advance {
            if mm_per_frame.is_nan() || mm_per_frame <= 0.0 {
                return Err(ProfileError::NonPositiveIncrement(mm_per_frame));
            }
        }
        Ok(())
    }

    /// Displacement added per frame for the given parameters.
    #[must_use]
    pub fn increment_mm(&self, parameters: &TestParameters) -> f64 {
        match self.advance {
            Advance::Fixed { mm_per_frame } => mm_per_frame,
            Advance::FromSpeed => parameters.shear_speed_mm_per_min / FRAMES_PER_MINUTE,
        }
    }
}

impl Default for TestProfile {
    fn default() -> Self {
        Self::hm5750()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_profiles_are_valid() {
        for profile in TestProfile::builtin() {
            profile.validate().expect("built-in profile is valid");
        }
    }

    #[test]
    fn speed_profile_advances_one_sixtieth_of_speed() {
        let profile = TestProfile::hm5755();
        let parameters = TestParameters {
            shear_speed_mm_per_min: 30.0,
            ..TestParameters::default()
        };
        assert!((profile.increment_mm(&parameters) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn json_round_trip_preserves_profile() {
        let profile = TestProfile::hm5755();
        let json = profile.to_json().expect("serialises");
        assert!(json.contains("\"from_speed\""));
        let parsed = TestProfile::from_json(&json).expect("parses");
        assert_eq!(parsed, profile);
    }

    #[test]
    fn zero_ceiling_is_rejected() {
        let error = TestProfile::from_json(
            r#"{ "name": "Broken", "advance": { "mode": "from_speed" }, "max_displacement_mm": 0.0 }"#,
        )
        .expect_err("zero ceiling rejected");
        assert!(matches!(error, ProfileError::NonPositiveCeiling(v) if v == 0.0));
    }

    #[test]
    fn zero_increment_is_rejected() {
        let error = TestProfile::from_json(
            r#"{ "name": "Stuck", "advance": { "mode": "fixed", "mm_per_frame": 0.0 } }"#,
        )
        .expect_err("zero increment rejected");
        assert!(matches!(error, ProfileError::NonPositiveIncrement(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let error = TestProfile::from_json("{ not json").expect_err("parse failure");
        assert!(matches!(error, ProfileError::Json(_)));
    }
}
