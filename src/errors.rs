//! Error types produced while configuring or driving a shear test.

use thiserror::Error;

use crate::run::Phase;

/// Name of a user-adjustable test parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parameter {
    /// Soil cohesion in kilopascals.
    Cohesion,
    /// Internal friction angle in degrees.
    FrictionAngle,
    /// Normal stress in kilopascals.
    NormalStress,
    /// Saturation state of the sample.
    Saturation,
    /// Shear speed in millimetres per minute.
    ShearSpeed,
    /// Pneumatic supply pressure in psi.
    PneumaticPressure,
    /// Pneumatic valve state.
    Valve,
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Parameter::Cohesion => "cohesion",
            Parameter::FrictionAngle => "friction angle",
            Parameter::NormalStress => "normal stress",
            Parameter::Saturation => "saturation",
            Parameter::ShearSpeed => "shear speed",
            Parameter::PneumaticPressure => "pneumatic pressure",
            Parameter::Valve => "pneumatic valve",
        };
        f.write_str(name)
    }
}

/// Error returned when a test parameter is rejected.
///
/// The variants carry the rejected value so callers can present actionable
/// feedback next to the slider that produced it.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParameterError {
    /// Returned when cohesion is negative.
    #[error("cohesion must not be negative (received {0} kPa)")]
    NegativeCohesion(f64),
    /// Returned when the friction angle lies outside `[0, 90]` degrees.
    #[error("friction angle must lie between 0 and 90 degrees (received {0})")]
    FrictionAngleOutOfRange(f64),
    /// Returned when the normal stress is negative.
    #[error("normal stress must not be negative (received {0} kPa)")]
    NegativeNormalStress(f64),
    /// Returned when the shear speed is zero or negative.
    #[error("shear speed must be positive (received {0} mm/min)")]
    NonPositiveShearSpeed(f64),
    /// Returned when the pneumatic pressure is negative.
    #[error("pneumatic pressure must not be negative (received {0} psi)")]
    NegativePressure(f64),
    /// Returned when the active profile does not expose the parameter.
    #[error("{profile} does not support adjusting the {parameter}")]
    Unsupported {
        /// Parameter the caller attempted to change.
        parameter: Parameter,
        /// Name of the active profile.
        profile: String,
    },
}

/// Error returned when a test profile cannot be loaded.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Returned when a profile cannot be read from or written to JSON.
    #[error("profile JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Returned when the displacement ceiling is zero or negative.
    #[error("maximum displacement must be positive (received {0} mm)")]
    NonPositiveCeiling(f64),
    /// Returned when a fixed per-frame increment is zero or negative.
    #[error("displacement increment must be positive (received {0} mm/frame)")]
    NonPositiveIncrement(f64),
}

/// Error returned when a session is created from an unusable configuration.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Returned when the profile cannot drive a run to completion.
    #[error(transparent)]
    Profile(#[from] ProfileError),
    /// Returned when a starting parameter lies outside its range.
    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

/// Error returned when a run control is used in the wrong state.
///
/// # Examples
///
/// ```
/// use shearbox::{SessionError, TestProfile, TestSession};
///
/// let mut session = TestSession::new(TestProfile::hm5755()).expect("valid profile");
/// let error = session.start().expect_err("valve starts closed");
/// assert_eq!(error, SessionError::ValveClosed);
/// ```
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Returned when a pneumatic apparatus is started with its valve closed.
    #[error("open the pneumatic valve before starting the test")]
    ValveClosed,
    /// Returned when an action is not available in the current phase.
    #[error("cannot {action} while the test is {from}")]
    InvalidTransition {
        /// Phase the session was in.
        from: Phase,
        /// Action that was requested.
        action: Action,
    },
}

/// Run control requested by the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Start or resume the test.
    Start,
    /// Pause a running test.
    Pause,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Start => f.write_str("start"),
            Action::Pause => f.write_str("pause"),
        }
    }
}
