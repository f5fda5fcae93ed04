//! Run-control state machine for a shear test.
//!
//! The session owns the profile, the parameters and the run state. It exposes
//! no timer: the host calls [`TestSession::tick`] once per animation frame and
//! the session advances only while it is running.

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::errors::{Action, Parameter, ParameterError, SessionError, SetupError};
use crate::parameters::{self, Saturation, TestParameters};
use crate::physics::{evaluate, FrameOutput};
use crate::profile::TestProfile;
use crate::run::{Phase, Sample, TestRunState};

/// Label shown on the start button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StartLabel {
    /// A fresh test will begin.
    Start,
    /// A paused test will continue.
    Resume,
}

/// Which run controls are available in the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Controls {
    /// Whether the start button accepts clicks.
    pub start_enabled: bool,
    /// Text on the start button.
    pub start_label: StartLabel,
    /// Whether the pause button accepts clicks.
    pub pause_enabled: bool,
    /// Whether the reset button accepts clicks.
    pub reset_enabled: bool,
}

/// Outcome of a single tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    /// Sample recorded on this tick.
    pub sample: Sample,
    /// Soil response at the new displacement.
    pub frame: FrameOutput,
    /// Whether this tick reached the ceiling.
    pub completed: bool,
}

/// A simulated direct shear test.
///
/// # Examples
///
/// ```
/// use shearbox::{Phase, TestProfile, TestSession};
///
/// let mut session = TestSession::new(TestProfile::hm5750()).expect("valid session");
/// session.start().expect("dead-weight box starts without preconditions");
/// while session.tick().is_some() {}
/// assert_eq!(session.phase(), Phase::Completed);
/// assert_eq!(session.run().samples().len(), 600);
/// ```
#[derive(Clone, Debug)]
pub struct TestSession {
    /// Capabilities of the apparatus being simulated.
    profile: TestProfile,
    /// Current parameter values.
    parameters: TestParameters,
    /// Progress of the current run.
    run: TestRunState,
    /// Set when the current run was started fresh rather than resumed.
    fresh_run: bool,
}

impl TestSession {
    /// Create an idle session with default parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Profile`] when the profile has a non-positive
    /// ceiling or frame increment.
    pub fn new(profile: TestProfile) -> Result<Self, SetupError> {
        Self::with_parameters(profile, TestParameters::default())
    }

    /// Create an idle session with explicit starting parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Profile`] when the profile has a non-positive
    /// ceiling or frame increment, and [`SetupError::Parameter`] when a
    /// starting parameter lies outside its range.
    pub fn with_parameters(
        profile: TestProfile,
        parameters: TestParameters,
    ) -> Result<Self, SetupError> {
        profile.validate()?;
        parameters.validate()?;
        let run = TestRunState::new(profile.max_displacement_mm);
        Ok(Self {
            profile,
            parameters,
            run,
            fresh_run: false,
        })
    }

    /// Active apparatus profile.
    #[must_use]
    pub fn profile(&self) -> &TestProfile {
        &self.profile
    }

    /// Current parameter values.
    #[must_use]
    pub fn parameters(&self) -> &TestParameters {
        &self.parameters
    }

    /// Progress of the current run.
    #[must_use]
    pub fn run(&self) -> &TestRunState {
        &self.run
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.run.phase()
    }

    /// Soil response at the current displacement.
    #[must_use]
    pub fn current_frame(&self) -> FrameOutput {
        evaluate(
            &self.parameters,
            self.run.displacement_mm(),
            self.run.max_displacement_mm(),
        )
    }

    /// Start a fresh run or resume a paused one.
    ///
    /// Starting while already running leaves the scheduled run untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ValveClosed`] when a pneumatic apparatus is
    /// started with its valve closed, and [`SessionError::InvalidTransition`]
    /// after the run has completed.
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.run.phase() {
            Phase::Idle => {
                if self.profile.has_pneumatic_control && !self.parameters.valve_open {
                    debug!(profile = %self.profile.name, "start rejected: valve closed");
                    return Err(SessionError::ValveClosed);
                }
                self.run.reset();
                self.run.set_phase(Phase::Running);
                self.fresh_run = true;
                info!(
                    profile = %self.profile.name,
                    cohesion_kpa = self.parameters.cohesion_kpa,
                    friction_angle_deg = self.parameters.friction_angle_deg,
                    normal_stress_kpa = self.parameters.normal_stress_kpa,
                    "Starting shear test"
                );
                Ok(())
            }
            Phase::Paused => {
                self.run.set_phase(Phase::Running);
                self.fresh_run = false;
                info!(
                    displacement_mm = self.run.displacement_mm(),
                    "Resuming shear test"
                );
                Ok(())
            }
            Phase::Running => {
                debug!("start ignored: test already running");
                Ok(())
            }
            Phase::Completed => Err(SessionError::InvalidTransition {
                from: Phase::Completed,
                action: Action::Start,
            }),
        }
    }

    /// Suspend a running test.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] unless the test is running.
    pub fn pause(&mut self) -> Result<(), SessionError> {
        if self.run.phase() != Phase::Running {
            debug!(phase = %self.run.phase(), "pause rejected");
            return Err(SessionError::InvalidTransition {
                from: self.run.phase(),
                action: Action::Pause,
            });
        }
        self.run.set_phase(Phase::Paused);
        self.fresh_run = false;
        info!(
            displacement_mm = self.run.displacement_mm(),
            "Paused shear test"
        );
        Ok(())
    }

    /// Return to idle from any phase, discarding progress and samples.
    pub fn reset(&mut self) {
        self.run.reset();
        self.fresh_run = false;
        debug!(profile = %self.profile.name, "Reset shear test");
    }

    /// Advance the box by one frame.
    ///
    /// Returns `None` when the session is not running.
    pub fn tick(&mut self) -> Option<Tick> {
        if self.run.phase() != Phase::Running {
            return None;
        }
        self.run.advance(self.profile.increment_mm(&self.parameters));
        let frame = self.current_frame();
        let sample = Sample {
            displacement_mm: self.run.displacement_mm(),
            shear_force_n: frame.shear_force_n,
        };
        self.run.record(sample);
        trace!(
            displacement_mm = sample.displacement_mm,
            shear_force_n = sample.shear_force_n,
            "tick"
        );

        let completed = self.run.at_ceiling();
        if completed {
            self.run.set_phase(Phase::Completed);
            self.fresh_run = false;
            info!(
                samples = self.run.samples().len(),
                displacement_mm = self.run.displacement_mm(),
                "Shear test completed"
            );
        }
        Some(Tick {
            sample,
            frame,
            completed,
        })
    }

    /// Button availability for the current phase.
    #[must_use]
    pub fn controls(&self) -> Controls {
        let phase = self.run.phase();
        Controls {
            start_enabled: matches!(phase, Phase::Idle | Phase::Paused),
            start_label: if phase == Phase::Paused {
                StartLabel::Resume
            } else {
                StartLabel::Start
            },
            pause_enabled: phase == Phase::Running,
            reset_enabled: !(phase == Phase::Running
                && self.fresh_run
                && self.profile.locks_reset_while_running),
        }
    }

    /// Set the cohesion in kilopascals.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::NegativeCohesion`] for negative values.
    pub fn set_cohesion(&mut self, cohesion_kpa: f64) -> Result<(), ParameterError> {
        parameters::check_cohesion(cohesion_kpa)?;
        self.parameters.cohesion_kpa = cohesion_kpa;
        debug!(cohesion_kpa, "Updated cohesion");
        Ok(())
    }

    /// Set the friction angle in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::FrictionAngleOutOfRange`] outside `[0, 90]`.
    pub fn set_friction_angle(&mut self, friction_angle_deg: f64) -> Result<(), ParameterError> {
        parameters::check_friction_angle(friction_angle_deg)?;
        self.parameters.friction_angle_deg = friction_angle_deg;
        debug!(friction_angle_deg, "Updated friction angle");
        Ok(())
    }

    /// Set the normal stress in kilopascals.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::NegativeNormalStress`] for negative values.
    pub fn set_normal_stress(&mut self, normal_stress_kpa: f64) -> Result<(), ParameterError> {
        parameters::check_normal_stress(normal_stress_kpa)?;
        self.parameters.normal_stress_kpa = normal_stress_kpa;
        debug!(normal_stress_kpa, "Updated normal stress");
        Ok(())
    }

    /// Set the saturation state.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Unsupported`] when the profile has no
    /// saturation selector.
    pub fn set_saturation(&mut self, saturation: Saturation) -> Result<(), ParameterError> {
        self.require(self.profile.has_saturation, Parameter::Saturation)?;
        self.parameters.saturation = saturation;
        debug!(%saturation, "Updated saturation");
        Ok(())
    }

    /// Set the drive speed in millimetres per minute.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Unsupported`] on fixed-feed profiles and
    /// [`ParameterError::NonPositiveShearSpeed`] for non-positive speeds.
    pub fn set_shear_speed(&mut self, speed_mm_per_min: f64) -> Result<(), ParameterError> {
        self.require(self.profile.has_variable_speed, Parameter::ShearSpeed)?;
        parameters::check_shear_speed(speed_mm_per_min)?;
        self.parameters.shear_speed_mm_per_min = speed_mm_per_min;
        debug!(speed_mm_per_min, "Updated shear speed");
        Ok(())
    }

    /// Set the pneumatic pressure in psi.
    ///
    /// The normal stress follows the pressure only while the valve is open.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Unsupported`] without pneumatic control and
    /// [`ParameterError::NegativePressure`] for negative values.
    pub fn set_pneumatic_pressure(&mut self, pressure_psi: f64) -> Result<(), ParameterError> {
        self.require(
            self.profile.has_pneumatic_control,
            Parameter::PneumaticPressure,
        )?;
        parameters::check_pressure(pressure_psi)?;
        self.parameters.pneumatic_pressure_psi = pressure_psi;
        if self.parameters.sync_pneumatic_load() {
            debug!(
                pressure_psi,
                normal_stress_kpa = self.parameters.normal_stress_kpa,
                "Pneumatic load applied"
            );
        }
        Ok(())
    }

    /// Open or close the pneumatic valve, returning the new state.
    ///
    /// Opening the valve immediately applies the pneumatic load.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Unsupported`] without pneumatic control.
    pub fn toggle_valve(&mut self) -> Result<bool, ParameterError> {
        self.require(self.profile.has_pneumatic_control, Parameter::Valve)?;
        self.parameters.valve_open = !self.parameters.valve_open;
        self.parameters.sync_pneumatic_load();
        info!(
            valve_open = self.parameters.valve_open,
            normal_stress_kpa = self.parameters.normal_stress_kpa,
            "Toggled pneumatic valve"
        );
        Ok(self.parameters.valve_open)
    }

    /// Reject a change to a control the profile does not expose.
    fn require(&self, supported: bool, parameter: Parameter) -> Result<(), ParameterError> {
        if supported {
            Ok(())
        } else {
            Err(ParameterError::Unsupported {
                parameter,
                profile: self.profile.name.clone(),
            })
        }
    }
}
