use shearbox::render::Viewport;
use shearbox::{
    ChartPoint, EnvelopePoint, ForceSeries, FrameOutput, Readout, SessionError, Simulator,
    SvgSurface, TestSession,
};

/// Normal stress spacing of the reported failure envelope, in kilopascals.
pub const ENVELOPE_STEP_KPA: f64 = 50.0;

/// Summary of a shear test run to completion.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Name of the apparatus profile.
    pub profile: String,
    /// Number of frames the box advanced.
    pub ticks: usize,
    /// Soil response at the final displacement.
    pub final_frame: FrameOutput,
    /// Point of the curve with the largest force.
    pub peak: Option<ChartPoint>,
    /// Results panel at the end of the run.
    pub readout: Readout,
    /// Final frame of the animation as SVG.
    pub svg: String,
    /// Force-displacement curve recorded during the run.
    pub chart: ForceSeries,
    /// Failure envelope for the soil parameters of the run.
    pub envelope: Vec<EnvelopePoint>,
}

/// Shear the sample until the box reaches its maximum travel.
pub fn run_to_completion(session: TestSession) -> Result<RunSummary, SessionError> {
    let mut simulator = Simulator::new(
        session,
        SvgSurface::default(),
        ForceSeries::default(),
        Viewport::default(),
    );
    simulator.start()?;

    let mut ticks = 0;
    while simulator.tick().is_some() {
        ticks += 1;
    }

    let readout = simulator.readout();
    let svg = simulator.surface().to_svg();
    let envelope = simulator.envelope(ENVELOPE_STEP_KPA);
    let (session, _, chart) = simulator.into_parts();

    Ok(RunSummary {
        profile: session.profile().name.clone(),
        ticks,
        final_frame: session.current_frame(),
        peak: chart.peak(),
        readout,
        svg,
        chart,
        envelope,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::conditions::prepare_session;
    use shearbox::{evaluate, TestParameters, TestProfile};

    #[test]
    fn dead_weight_run_takes_six_hundred_frames() {
        let session = prepare_session(TestProfile::hm5750()).expect("session prepared");
        let summary = run_to_completion(session).expect("run completes");

        assert_eq!(summary.ticks, 600);
        let expected = evaluate(&TestParameters::default(), 300.0, 300.0);
        assert_relative_eq!(summary.final_frame.shear_force_n, expected.shear_force_n);

        let peak = summary.peak.expect("curve recorded");
        assert_relative_eq!(peak.x, 150.0);
        assert_relative_eq!(peak.y, expected.shear_strength_kpa * 1000.0, epsilon = 1.0e-6);
        assert!(summary.svg.contains("<polyline"));
        assert_eq!(summary.chart.len(), 600);
        assert_eq!(summary.envelope.len(), 8);
        assert_relative_eq!(
            summary.envelope[4].shear_strength_kpa,
            expected.shear_strength_kpa
        );
    }
}
