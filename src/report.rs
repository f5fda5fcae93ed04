use crate::analysis::RunSummary;
use std::fmt::Write;

/// Render a textual summary of a completed shear test.
///
/// The peak is the Mohr-Coulomb strength reached at half travel; the final
/// reading shows how far the sample softened by the end of the run
/// (<https://en.wikipedia.org/wiki/Direct_shear_test>).
#[must_use]
pub fn render_summary(summary: &RunSummary) -> String {
    let mut output = String::new();

    writeln!(
        &mut output,
        "{} direct shear test ({} frames)",
        summary.profile, summary.ticks
    )
    .expect("writing to string cannot fail");

    if let Some(peak) = summary.peak {
        writeln!(
            &mut output,
            "Peak shear force: {:.2} N at {:.2} mm",
            peak.y, peak.x
        )
        .expect("writing to string cannot fail");
    } else {
        output.push_str("Peak shear force: not available (no samples recorded)\n");
    }

    // The panel values use the same precision as the live readout.
    writeln!(&mut output, "{}", summary.readout).expect("writing to string cannot fail");

    let softening = summary
        .peak
        .filter(|peak| peak.y > 0.0)
        .map(|peak| 1.0 - summary.final_frame.shear_force_n / peak.y);
    if let Some(softening) = softening {
        writeln!(
            &mut output,
            "Post-peak softening: {:.1}%",
            softening * 100.0
        )
        .expect("writing to string cannot fail");
    }

    if !summary.envelope.is_empty() {
        output.push_str("Failure envelope:\n");
        for point in &summary.envelope {
            writeln!(
                &mut output,
                "  σ = {:>5.0} kPa  τf = {:>7.2} kPa",
                point.normal_stress_kpa, point.shear_strength_kpa
            )
            .expect("writing to string cannot fail");
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use shearbox::{
        envelope_series, ChartPoint, ForceSeries, FrameOutput, Readout, TestParameters,
    };

    #[test]
    fn formats_human_readable_report() {
        let final_frame = FrameOutput {
            shear_strength_kpa: 125.47,
            shear_force_n: 100_376.0,
            vertical_strain: 0.21,
        };
        let summary = RunSummary {
            profile: "HM-5750".to_string(),
            ticks: 600,
            final_frame,
            peak: Some(ChartPoint {
                x: 150.0,
                y: 125_470.0,
            }),
            readout: Readout::from_frame(300.0, &final_frame),
            svg: String::new(),
            chart: ForceSeries::default(),
            envelope: envelope_series(&TestParameters::default(), 100.0),
        };
        let report = render_summary(&summary);
        assert!(report.contains("HM-5750 direct shear test (600 frames)"));
        assert!(report.contains("Peak shear force: 125470.00 N at 150.00 mm"));
        assert!(report.contains("Horizontal deformation: 300.00 mm"));
        assert!(report.contains("Post-peak softening: 20.0%"));
        assert!(report.contains("σ =   200 kPa  τf =  125.47 kPa"));
        assert!(report.contains("σ =     0 kPa  τf =   10.00 kPa"));
    }
}
