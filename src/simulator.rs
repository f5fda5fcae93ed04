//! A test session wired to a drawing surface and a chart.
//!
//! The [`Simulator`] performs the side effects a page performs around the
//! session: every tick draws a frame and appends a chart point, a fresh start
//! or a reset clears the chart, and parameter changes redraw while the box is
//! not moving.

use crate::chart::{envelope_series, ChartSink};
use crate::errors::{ParameterError, SessionError};
use crate::parameters::Saturation;
use crate::physics::{EnvelopePoint, FrameOutput};
use crate::readout::Readout;
use crate::render::{render_frame, RenderConfig, Surface, Viewport};
use crate::run::Phase;
use crate::session::{Controls, Tick, TestSession};

/// Session, surface and chart driven together.
///
/// # Examples
///
/// ```
/// use shearbox::render::Viewport;
/// use shearbox::{ForceSeries, Phase, Simulator, SvgSurface, TestProfile, TestSession};
///
/// let session = TestSession::new(TestProfile::generic()).expect("valid session");
/// let mut simulator = Simulator::new(
///     session,
///     SvgSurface::default(),
///     ForceSeries::default(),
///     Viewport::new(800.0, 400.0),
/// );
/// simulator.start().expect("starts");
/// while simulator.tick().is_some() {}
/// assert_eq!(simulator.session().phase(), Phase::Completed);
/// assert_eq!(simulator.chart().len(), 150);
/// ```
#[derive(Debug)]
pub struct Simulator<S: Surface, C: ChartSink> {
    /// Run-control state machine.
    session: TestSession,
    /// Surface frames are drawn on.
    surface: S,
    /// Chart receiving force-displacement points.
    chart: C,
    /// Current surface size.
    viewport: Viewport,
    /// Drawing constants.
    config: RenderConfig,
    /// Displacement and soil response of the most recent tick.
    last_frame: Option<(f64, FrameOutput)>,
}

impl<S: Surface, C: ChartSink> Simulator<S, C> {
    /// Wire a session to its collaborators and draw the initial frame.
    pub fn new(session: TestSession, surface: S, chart: C, viewport: Viewport) -> Self {
        Self::with_config(session, surface, chart, viewport, RenderConfig::default())
    }

    /// Like [`Simulator::new`] with explicit drawing constants.
    pub fn with_config(
        session: TestSession,
        surface: S,
        chart: C,
        viewport: Viewport,
        config: RenderConfig,
    ) -> Self {
        let mut simulator = Self {
            session,
            surface,
            chart,
            viewport,
            config,
            last_frame: None,
        };
        simulator.redraw();
        simulator
    }

    /// Underlying session.
    #[must_use]
    pub fn session(&self) -> &TestSession {
        &self.session
    }

    /// Drawing surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Chart sink.
    #[must_use]
    pub fn chart(&self) -> &C {
        &self.chart
    }

    /// Current viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Button availability for the current phase.
    #[must_use]
    pub fn controls(&self) -> Controls {
        self.session.controls()
    }

    /// Results panel text for the most recent tick.
    ///
    /// Parameter changes made after that tick do not alter the panel until the
    /// next tick. Blank before the first tick of a run.
    #[must_use]
    pub fn readout(&self) -> Readout {
        self.last_frame
            .map_or_else(Readout::blank, |(displacement_mm, frame)| {
                Readout::from_frame(displacement_mm, &frame)
            })
    }

    /// Failure envelope for the current cohesion and friction angle, sampled
    /// every `step_kpa` along the normal stress axis.
    #[must_use]
    pub fn envelope(&self, step_kpa: f64) -> Vec<EnvelopePoint> {
        envelope_series(self.session.parameters(), step_kpa)
    }

    /// Start a fresh run or resume a paused one.
    ///
    /// # Errors
    ///
    /// Propagates [`SessionError`] from [`TestSession::start`].
    pub fn start(&mut self) -> Result<(), SessionError> {
        let fresh = self.session.phase() == Phase::Idle;
        self.session.start()?;
        if fresh {
            self.chart.clear();
            self.last_frame = None;
        }
        Ok(())
    }

    /// Pause a running test.
    ///
    /// # Errors
    ///
    /// Propagates [`SessionError`] from [`TestSession::pause`].
    pub fn pause(&mut self) -> Result<(), SessionError> {
        self.session.pause()
    }

    /// Return to idle, clear the chart and redraw the zero-displacement frame.
    pub fn reset(&mut self) {
        self.session.reset();
        self.chart.clear();
        self.last_frame = None;
        self.redraw();
    }

    /// Advance one frame, drawing it and charting the new sample.
    pub fn tick(&mut self) -> Option<Tick> {
        let tick = self.session.tick()?;
        self.last_frame = Some((tick.sample.displacement_mm, tick.frame));
        self.redraw();
        self.chart
            .append_point(tick.sample.displacement_mm, tick.sample.shear_force_n);
        Some(tick)
    }

    /// Adopt a new surface size and redraw immediately.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.redraw();
    }

    /// Draw the current state.
    pub fn redraw(&mut self) {
        render_frame(
            &mut self.surface,
            self.viewport,
            &self.config,
            self.session.profile(),
            self.session.parameters(),
            self.session.run().displacement_mm(),
        );
    }

    /// Set the cohesion in kilopascals.
    ///
    /// # Errors
    ///
    /// See [`TestSession::set_cohesion`].
    pub fn set_cohesion(&mut self, cohesion_kpa: f64) -> Result<(), ParameterError> {
        self.session.set_cohesion(cohesion_kpa)?;
        self.refresh_if_still();
        Ok(())
    }

    /// Set the friction angle in degrees.
    ///
    /// # Errors
    ///
    /// See [`TestSession::set_friction_angle`].
    pub fn set_friction_angle(&mut self, friction_angle_deg: f64) -> Result<(), ParameterError> {
        self.session.set_friction_angle(friction_angle_deg)?;
        self.refresh_if_still();
        Ok(())
    }

    /// Set the normal stress in kilopascals.
    ///
    /// # Errors
    ///
    /// See [`TestSession::set_normal_stress`].
    pub fn set_normal_stress(&mut self, normal_stress_kpa: f64) -> Result<(), ParameterError> {
        self.session.set_normal_stress(normal_stress_kpa)?;
        self.refresh_if_still();
        Ok(())
    }

    /// Set the saturation state.
    ///
    /// # Errors
    ///
    /// See [`TestSession::set_saturation`].
    pub fn set_saturation(&mut self, saturation: Saturation) -> Result<(), ParameterError> {
        self.session.set_saturation(saturation)?;
        self.refresh_if_still();
        Ok(())
    }

    /// Set the drive speed in millimetres per minute.
    ///
    /// # Errors
    ///
    /// See [`TestSession::set_shear_speed`].
    pub fn set_shear_speed(&mut self, speed_mm_per_min: f64) -> Result<(), ParameterError> {
        self.session.set_shear_speed(speed_mm_per_min)
    }

    /// Set the pneumatic pressure in psi.
    ///
    /// # Errors
    ///
    /// See [`TestSession::set_pneumatic_pressure`].
    pub fn set_pneumatic_pressure(&mut self, pressure_psi: f64) -> Result<(), ParameterError> {
        self.session.set_pneumatic_pressure(pressure_psi)?;
        self.refresh_if_still();
        Ok(())
    }

    /// Open or close the pneumatic valve, returning the new state.
    ///
    /// # Errors
    ///
    /// See [`TestSession::toggle_valve`].
    pub fn toggle_valve(&mut self) -> Result<bool, ParameterError> {
        let open = self.session.toggle_valve()?;
        self.refresh_if_still();
        Ok(open)
    }

    /// Redraw unless the next tick is about to do so.
    fn refresh_if_still(&mut self) {
        if self.session.phase() != Phase::Running {
            self.redraw();
        }
    }

    /// Split the simulator back into its parts.
    pub fn into_parts(self) -> (TestSession, S, C) {
        (self.session, self.surface, self.chart)
    }
}
