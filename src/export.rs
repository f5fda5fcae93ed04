use crate::analysis::RunSummary;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error returned when run artefacts cannot be written.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Returned when the output directory or a file cannot be written.
    #[error("failed to write run output")]
    Io(#[from] std::io::Error),
    /// Returned when the force series cannot be serialised.
    #[error("failed to serialise force series")]
    Json(#[from] serde_json::Error),
}

/// Files written for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artefacts {
    /// Final frame as SVG.
    pub svg: PathBuf,
    /// Force-displacement curve as JSON.
    pub series: PathBuf,
}

/// File stem derived from a profile name, e.g. `HM-5750` becomes `hm-5750`.
#[must_use]
pub fn file_stem(profile: &str) -> String {
    let stem: String = profile
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let stem = stem.trim_matches('-');
    if stem.is_empty() {
        "profile".to_string()
    } else {
        stem.to_string()
    }
}

/// Write the final frame and the force series of a run into `dir`.
///
/// # Errors
///
/// Returns [`ExportError`] when the directory cannot be created, a file
/// cannot be written, or the series cannot be serialised.
pub fn write_artefacts(dir: &Path, summary: &RunSummary) -> Result<Artefacts, ExportError> {
    fs::create_dir_all(dir)?;
    let stem = file_stem(&summary.profile);

    let svg = dir.join(format!("{stem}.svg"));
    fs::write(&svg, &summary.svg)?;

    let series = dir.join(format!("{stem}.json"));
    fs::write(&series, summary.chart.to_json()?)?;

    Ok(Artefacts { svg, series })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::analysis::run_to_completion;
    use crate::conditions::prepare_session;
    use shearbox::{ChartPoint, TestProfile};

    #[test]
    fn stems_are_lowercase_and_dashed() {
        assert_eq!(file_stem("HM-5750"), "hm-5750");
        assert_eq!(file_stem("Short box"), "short-box");
        assert_eq!(file_stem("  "), "profile");
    }

    #[test]
    fn writes_svg_and_series() {
        let profile = TestProfile {
            max_displacement_mm: 10.0,
            ..TestProfile::generic()
        };
        let session = prepare_session(profile).expect("session prepared");
        let summary = run_to_completion(session).expect("run completes");

        let dir = std::env::temp_dir().join(format!("shearbox-export-{}", std::process::id()));
        assert!(!dir.exists());
        let artefacts = write_artefacts(&dir, &summary).expect("artefacts written");

        assert_eq!(artefacts.svg, dir.join("generic.svg"));
        let svg = fs::read_to_string(&artefacts.svg).expect("svg readable");
        assert!(svg.starts_with("<svg"));

        let series = fs::read_to_string(&artefacts.series).expect("series readable");
        let points: Vec<ChartPoint> = serde_json::from_str(&series).expect("series parses");
        assert_eq!(points.len(), 5);
        for (written, recorded) in points.iter().zip(summary.chart.points()) {
            assert_relative_eq!(written.x, recorded.x);
            assert_relative_eq!(written.y, recorded.y, max_relative = 1.0e-12);
        }

        fs::remove_dir_all(&dir).expect("temporary directory removed");
    }
}
