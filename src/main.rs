mod analysis;
mod conditions;
mod export;
mod report;

use analysis::run_to_completion;
use conditions::prepare_session;
use export::write_artefacts;
use report::render_summary;
use shearbox::TestProfile;
use std::error::Error;
use std::path::PathBuf;
use tracing::{info, Level};

/// Command-line options.
#[derive(Debug, Default, PartialEq)]
struct Options {
    /// Profile file replacing the built-in apparatus list.
    profile: Option<PathBuf>,
    /// Directory receiving the final frame and force series of each run.
    out_dir: Option<PathBuf>,
}

/// Parse `[--out DIR] [PROFILE.json]` from the arguments after the program name.
fn parse_options(args: impl IntoIterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--out" {
            let dir = args.next().ok_or("--out requires a directory")?;
            options.out_dir = Some(PathBuf::from(dir));
        } else if arg.starts_with("--") {
            return Err(format!("unknown option {arg}"));
        } else if options.profile.is_none() {
            options.profile = Some(PathBuf::from(arg));
        } else {
            return Err(format!("unexpected argument {arg}"));
        }
    }
    Ok(options)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let options = parse_options(std::env::args().skip(1))?;

    // A profile file replaces the built-in apparatus list. See README.md for
    // the fields a profile carries.
    let profiles = match &options.profile {
        Some(path) => vec![TestProfile::from_json(&std::fs::read_to_string(path)?)?],
        None => TestProfile::builtin(),
    };

    for profile in profiles {
        // Put the apparatus into a startable state before shearing.
        let session = prepare_session(profile)?;

        // Drive the box frame by frame to its maximum travel, exactly as the
        // animation loop would.
        let summary = run_to_completion(session)?;

        println!("{}", render_summary(&summary));

        if let Some(dir) = &options.out_dir {
            let artefacts = write_artefacts(dir, &summary)?;
            info!(
                svg = %artefacts.svg.display(),
                series = %artefacts.series.display(),
                "Wrote run output"
            );
        }
    }

    Ok(())
}
