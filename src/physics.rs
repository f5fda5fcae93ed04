//! Simplified soil response used to animate the test.
//!
//! Strength follows the Mohr-Coulomb envelope
//! (<https://en.wikipedia.org/wiki/Mohr%E2%80%93Coulomb_theory>). The load
//! path rises linearly to the envelope at half the travel and softens
//! afterwards, while the vertical strain traces a contraction followed by
//! dilation.

use serde::{Deserialize, Serialize};

use crate::parameters::{Saturation, TestParameters};

/// Factor used to present the mobilised stress as a force reading.
///
/// The value is a display convention: the sample area is never modelled.
pub const FORCE_DISPLAY_FACTOR: f64 = 1000.0;

/// Fraction of the peak lost per unit of progress past the peak.
const POST_PEAK_SOFTENING: f64 = 0.2;

/// Fraction of the peak dilation lost per unit of progress past the peak.
const POST_PEAK_DILATION_DECAY: f64 = 0.1;

/// Initial contraction of a dry sample.
const BASE_CONTRACTION: f64 = -0.1;

/// Results of evaluating the soil model for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameOutput {
    /// Peak shear strength in kilopascals.
    pub shear_strength_kpa: f64,
    /// Mobilised shear force reading in newtons.
    pub shear_force_n: f64,
    /// Vertical strain; negative values are contraction.
    pub vertical_strain: f64,
}

/// Peak shear strength `τ = c + σ·tan φ` in kilopascals.
///
/// # Examples
/// ```
/// use shearbox::physics::shear_strength;
///
/// let tau = shear_strength(10.0, 30.0, 200.0);
/// assert!((tau - 125.47).abs() < 0.01);
/// ```
#[must_use]
pub fn shear_strength(cohesion_kpa: f64, friction_angle_deg: f64, normal_stress_kpa: f64) -> f64 {
    cohesion_kpa + normal_stress_kpa * friction_angle_deg.to_radians().tan()
}

/// Ratio of the current displacement to the displacement at peak.
///
/// The peak is reached at half of `max_displacement_mm`.
#[must_use]
pub fn progress(displacement_mm: f64, max_displacement_mm: f64) -> f64 {
    displacement_mm / (max_displacement_mm / 2.0)
}

/// Mobilised shear stress in kilopascals for a given progress ratio.
#[must_use]
pub fn mobilised_stress(strength_kpa: f64, progress: f64) -> f64 {
    if progress < 1.0 {
        strength_kpa * progress
    } else {
        strength_kpa * (1.0 - (progress - 1.0) * POST_PEAK_SOFTENING)
    }
}

/// Vertical strain for a given progress ratio.
#[must_use]
pub fn vertical_strain(friction_angle_deg: f64, saturation: Saturation, progress: f64) -> f64 {
    let contraction = BASE_CONTRACTION * saturation.contraction_factor();
    let dilation = friction_angle_deg / 45.0 * 0.5;
    if progress < 1.0 {
        contraction + dilation * progress
    } else {
        (contraction + dilation) * (1.0 - (progress - 1.0) * POST_PEAK_DILATION_DECAY)
    }
}

/// Evaluate the soil response at a horizontal displacement.
///
/// `max_displacement_mm` must be positive; profiles are validated before a
/// run so the session never passes zero.
///
/// # Examples
/// ```
/// use shearbox::{physics::evaluate, TestParameters};
///
/// let frame = evaluate(&TestParameters::default(), 150.0, 300.0);
/// assert!((frame.shear_force_n - frame.shear_strength_kpa * 1000.0).abs() < 1.0e-6);
/// ```
#[must_use]
pub fn evaluate(
    parameters: &TestParameters,
    displacement_mm: f64,
    max_displacement_mm: f64,
) -> FrameOutput {
    let strength = shear_strength(
        parameters.cohesion_kpa,
        parameters.friction_angle_deg,
        parameters.normal_stress_kpa,
    );
    let p = progress(displacement_mm, max_displacement_mm);
    FrameOutput {
        shear_strength_kpa: strength,
        shear_force_n: mobilised_stress(strength, p) * FORCE_DISPLAY_FACTOR,
        vertical_strain: vertical_strain(parameters.friction_angle_deg, parameters.saturation, p),
    }
}

/// Point on the Mohr-Coulomb failure envelope.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvelopePoint {
    /// Normal stress in kilopascals.
    pub normal_stress_kpa: f64,
    /// Shear strength in kilopascals.
    pub shear_strength_kpa: f64,
}

/// Sample the failure envelope for the current cohesion and friction angle.
#[must_use]
pub fn failure_envelope(parameters: &TestParameters, normal_stresses: &[f64]) -> Vec<EnvelopePoint> {
    normal_stresses
        .iter()
        .map(|&sigma| EnvelopePoint {
            normal_stress_kpa: sigma,
            shear_strength_kpa: shear_strength(
                parameters.cohesion_kpa,
                parameters.friction_angle_deg,
                sigma,
            ),
        })
        .collect()
}
