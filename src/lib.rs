#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod chart;
mod errors;
pub mod parameters;
pub mod physics;
pub mod profile;
pub mod readout;
pub mod render;
pub mod run;
pub mod session;
pub mod simulator;
pub mod svg;

pub use chart::{envelope_series, ChartPoint, ChartSink, ForceSeries};
pub use errors::{
    Action, Parameter, ParameterError, ProfileError, SessionError, SetupError,
};
pub use parameters::{Saturation, TestParameters};
pub use physics::{evaluate, EnvelopePoint, FrameOutput};
pub use profile::{Advance, TestProfile};
pub use readout::Readout;
pub use render::Surface;
pub use run::{Phase, Sample, TestRunState};
pub use session::{Controls, StartLabel, TestSession, Tick};
pub use simulator::Simulator;
pub use svg::SvgSurface;
