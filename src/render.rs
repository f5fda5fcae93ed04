//! Drawing the shear box apparatus onto a 2D surface.
//!
//! [`render_frame`] is a pure function of the viewport, the parameters and the
//! displacement: it clears the surface first, so drawing the same inputs twice
//! yields the same picture.

use nalgebra::{Point2, Rotation2, Vector2};
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;
use uom::si::length::{inch, millimeter};

use crate::parameters::{Saturation, TestParameters};
use crate::profile::TestProfile;

/// Position on the drawing surface in pixels, origin at the top left.
pub type Point = Point2<f64>;

/// Opaque RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Create a colour from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a colour from unbounded channel values, clamping to `0..=255`.
    #[must_use]
    pub fn clamped(r: f64, g: f64, b: f64) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let channel = |value: f64| value.round().clamp(0.0, 255.0) as u8;
        Self::rgb(channel(r), channel(g), channel(b))
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Axis-aligned rectangle in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Size of the drawing surface in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a viewport of the given size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 400.0)
    }
}

/// Minimal 2D drawing interface the renderer needs.
///
/// It mirrors the handful of canvas primitives the apparatus drawing uses, so
/// an HTML canvas, an image buffer or a recording surface can sit behind it.
pub trait Surface {
    /// Erase the whole surface.
    fn clear(&mut self, viewport: Viewport);
    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// Stroke an open polyline.
    fn stroke_polyline(&mut self, points: &[Point], color: Color, line_width: f64);
    /// Fill a closed polygon.
    fn fill_polygon(&mut self, points: &[Point], color: Color);
    /// Fill a circle.
    fn fill_circle(&mut self, center: Point, radius: f64, color: Color);
    /// Draw a line of text with its baseline starting at `at`.
    fn fill_text(&mut self, text: &str, at: Point, size_px: f64, color: Color);
}

/// Drawing constants that are visual conventions rather than physics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Box widths the upper half moves per inch of displacement.
    pub box_widths_per_inch: f64,
    /// Length of arrow heads in pixels.
    pub arrow_head_px: f64,
    /// Radius of the alignment screws in pixels.
    pub screw_radius_px: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            box_widths_per_inch: 0.25,
            arrow_head_px: 10.0,
            screw_radius_px: 5.0,
        }
    }
}

/// Fixed lower half of the box.
const LOWER_HALF: Color = Color::rgb(0x95, 0xa5, 0xa6);
/// Moving upper half of the box.
const UPPER_HALF: Color = Color::rgb(0x7f, 0x8c, 0x8d);
/// Joint line between the halves.
const SEPARATOR: Color = Color::rgb(0x34, 0x49, 0x5e);
/// Arrows and failure plane.
const ACCENT: Color = Color::rgb(0xe7, 0x4c, 0x3c);
/// Screw slots.
const SCREW_SLOT: Color = Color::rgb(0xc0, 0x39, 0x2b);
/// Annotation text and weights.
const INK: Color = Color::rgb(0x2c, 0x3e, 0x50);
/// Open-valve indicator.
const VALVE_OPEN: Color = Color::rgb(0x27, 0xae, 0x60);

/// Pixel geometry of the apparatus for a given viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxLayout {
    /// Outline of the shear box at zero displacement.
    pub frame: Rect,
    /// Soil sample inside the box.
    pub soil: Rect,
}

impl BoxLayout {
    /// Centre a box covering 80% × 50% of the viewport.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        let width = viewport.width * 0.8;
        let height = viewport.height * 0.5;
        let frame = Rect::new(
            (viewport.width - width) / 2.0,
            (viewport.height - height) / 2.0,
            width,
            height,
        );
        let soil_width = width * 0.9;
        let soil_height = height * 0.8;
        let soil = Rect::new(
            frame.x + (width - soil_width) / 2.0,
            frame.y + (height - soil_height) / 2.0,
            soil_width,
            soil_height,
        );
        Self { frame, soil }
    }

    /// Horizontal pixel offset of the upper half for a displacement.
    #[must_use]
    pub fn displacement_px(&self, config: &RenderConfig, displacement_mm: f64) -> f64 {
        let inches = Length::new::<millimeter>(displacement_mm).get::<inch>();
        inches * self.frame.width * config.box_widths_per_inch
    }
}

/// Colour of the soil sample for the current parameters.
///
/// Stronger soils render redder and greener; saturated samples are darker.
#[must_use]
pub fn soil_color(parameters: &TestParameters) -> Color {
    let (r, g, b) = match parameters.saturation {
        Saturation::Saturated => (70.0, 40.0, 20.0),
        Saturation::Dry => (139.0, 69.0, 19.0),
    };
    Color::clamped(
        r + parameters.cohesion_kpa * 2.0,
        g + parameters.friction_angle_deg * 2.0,
        b,
    )
}

/// Draw the apparatus at the given displacement.
pub fn render_frame<S: Surface + ?Sized>(
    surface: &mut S,
    viewport: Viewport,
    config: &RenderConfig,
    profile: &TestProfile,
    parameters: &TestParameters,
    displacement_mm: f64,
) {
    let layout = BoxLayout::new(viewport);
    let frame = layout.frame;
    let soil = layout.soil;
    let offset = layout.displacement_px(config, displacement_mm);
    let half = frame.height / 2.0;

    surface.clear(viewport);

    surface.fill_rect(
        Rect::new(frame.x, frame.y + half, frame.width, half),
        LOWER_HALF,
    );
    surface.fill_rect(
        Rect::new(frame.x + offset, frame.y, frame.width, half),
        UPPER_HALF,
    );
    surface.stroke_polyline(
        &[
            Point::new(frame.x, frame.y + half),
            Point::new(frame.x + frame.width, frame.y + half),
        ],
        SEPARATOR,
        2.0,
    );

    if profile.has_pneumatic_control {
        draw_pneumatic_ram(surface, frame, parameters);
    } else {
        draw_dead_weights(surface, frame, parameters);
    }

    surface.fill_rect(soil, soil_color(parameters));
    draw_screws(surface, config, frame, offset);

    // Failure plane: sheared portion follows the upper half.
    let plane_y = soil.y + soil.height / 2.0;
    surface.stroke_polyline(
        &[
            Point::new(soil.x, plane_y),
            Point::new(soil.x + offset, plane_y),
            Point::new(soil.x + soil.width + offset, plane_y),
        ],
        ACCENT,
        2.0,
    );

    annotate_sample(surface, profile, parameters, soil);

    let normal_x = frame.x + frame.width / 2.0 + offset;
    draw_arrow(
        surface,
        config,
        Point::new(normal_x, frame.y - 30.0),
        Point::new(normal_x, frame.y),
        &format!("σ = {:.0} kPa", parameters.normal_stress_kpa),
    );
    let shear_x = frame.x + frame.width + 30.0;
    draw_arrow(
        surface,
        config,
        Point::new(shear_x, frame.y + half),
        Point::new(shear_x - 20.0, frame.y + half),
        "τ",
    );
}

/// Four alignment screws straddling the joint, travelling with the upper half.
fn draw_screws<S: Surface + ?Sized>(surface: &mut S, config: &RenderConfig, frame: Rect, offset: f64) {
    let radius = config.screw_radius_px;
    let x = frame.x + offset;
    let mid = frame.y + frame.height / 2.0;
    let positions = [
        Point::new(x + 20.0, mid - 10.0),
        Point::new(x + frame.width - 20.0, mid - 10.0),
        Point::new(x + 20.0, mid + 10.0),
        Point::new(x + frame.width - 20.0, mid + 10.0),
    ];
    for center in positions {
        surface.fill_circle(center, radius, ACCENT);
        surface.stroke_polyline(
            &[
                Point::new(center.x - radius + 1.0, center.y),
                Point::new(center.x + radius - 1.0, center.y),
            ],
            SCREW_SLOT,
            2.0,
        );
    }
}

/// Lever and hanger weights to the left of the box.
fn draw_dead_weights<S: Surface + ?Sized>(surface: &mut S, frame: Rect, parameters: &TestParameters) {
    let width = 80.0;
    let height = 120.0;
    let x = frame.x - width - 20.0;
    let y = frame.y + 20.0;

    surface.fill_rect(Rect::new(x, y, width, height), LOWER_HALF);
    surface.fill_rect(Rect::new(x + width / 2.0 - 5.0, y, 10.0, 20.0), UPPER_HALF);
    surface.fill_rect(Rect::new(x + width / 2.0 - 40.0, y + 15.0, 80.0, 10.0), UPPER_HALF);
    for slot in 0..3 {
        let top = y + 25.0 + f64::from(slot) * 15.0;
        surface.fill_rect(Rect::new(x + width / 2.0 - 20.0, top, 40.0, 10.0), INK);
    }
    surface.fill_text(
        &format!("{:.0} kPa", parameters.normal_stress_kpa),
        Point::new(x, y - 10.0),
        12.0,
        INK,
    );
}

/// Pneumatic cylinder with a valve indicator to the left of the box.
fn draw_pneumatic_ram<S: Surface + ?Sized>(
    surface: &mut S,
    frame: Rect,
    parameters: &TestParameters,
) {
    let width = 80.0;
    let height = 120.0;
    let x = frame.x - width - 20.0;
    let y = frame.y + 20.0;

    surface.fill_rect(Rect::new(x, y, width, height), LOWER_HALF);
    surface.fill_rect(Rect::new(x + 15.0, y + 10.0, width - 30.0, height - 40.0), UPPER_HALF);
    let valve = if parameters.valve_open { VALVE_OPEN } else { ACCENT };
    surface.fill_circle(Point::new(x + width / 2.0, y + height - 15.0), 8.0, valve);
    surface.fill_text(
        &format!("{:.0} psi", parameters.pneumatic_pressure_psi),
        Point::new(x, y - 10.0),
        12.0,
        INK,
    );
}

/// Three lines of annotation in the top-left corner of the sample.
fn annotate_sample<S: Surface + ?Sized>(
    surface: &mut S,
    profile: &TestProfile,
    parameters: &TestParameters,
    soil: Rect,
) {
    let x = soil.x + 10.0;
    surface.fill_text("Soil sample", Point::new(x, soil.y + 20.0), 14.0, INK);
    surface.fill_text(
        &format!(
            "c = {:.0} kPa, φ = {:.0}°",
            parameters.cohesion_kpa, parameters.friction_angle_deg
        ),
        Point::new(x, soil.y + 40.0),
        14.0,
        INK,
    );
    let condition = if profile.has_saturation {
        format!(" - {}", parameters.saturation)
    } else if profile.has_pneumatic_control {
        let state = if parameters.valve_open { "open" } else { "closed" };
        format!(" - valve {state}")
    } else {
        String::new()
    };
    surface.fill_text(
        &format!("σ = {:.0} kPa{condition}", parameters.normal_stress_kpa),
        Point::new(x, soil.y + 60.0),
        14.0,
        INK,
    );
}

/// Straight arrow with a filled head at `to` and a label near `from`.
fn draw_arrow<S: Surface + ?Sized>(
    surface: &mut S,
    config: &RenderConfig,
    from: Point,
    to: Point,
    label: &str,
) {
    surface.stroke_polyline(&[from, to], ACCENT, 2.0);

    let direction = to - from;
    let back = if direction.norm() > 0.0 {
        -direction.normalize() * config.arrow_head_px
    } else {
        Vector2::new(-config.arrow_head_px, 0.0)
    };
    let spread = std::f64::consts::FRAC_PI_6;
    surface.fill_polygon(
        &[
            to,
            to + Rotation2::new(spread) * back,
            to + Rotation2::new(-spread) * back,
        ],
        ACCENT,
    );

    surface.fill_text(label, Point::new(from.x - 40.0, from.y - 10.0), 12.0, INK);
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    /// Surface that keeps only the calls the assertions need.
    #[derive(Default)]
    struct CallLog {
        clears: usize,
        rects: Vec<(Rect, Color)>,
        polylines: Vec<Vec<Point>>,
        polygons: Vec<Vec<Point>>,
        texts: Vec<String>,
    }

    impl Surface for CallLog {
        fn clear(&mut self, _viewport: Viewport) {
            self.clears += 1;
        }
        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.rects.push((rect, color));
        }
        fn stroke_polyline(&mut self, points: &[Point], _color: Color, _line_width: f64) {
            self.polylines.push(points.to_vec());
        }
        fn fill_polygon(&mut self, points: &[Point], _color: Color) {
            self.polygons.push(points.to_vec());
        }
        fn fill_circle(&mut self, _center: Point, _radius: f64, _color: Color) {}
        fn fill_text(&mut self, text: &str, _at: Point, _size_px: f64, _color: Color) {
            self.texts.push(text.to_string());
        }
    }

    #[test]
    fn layout_centres_box_in_viewport() {
        let layout = BoxLayout::new(Viewport::new(1000.0, 400.0));
        assert_eq!(layout.frame, Rect::new(100.0, 100.0, 800.0, 200.0));
        assert_relative_eq!(layout.soil.width, 720.0);
        assert_relative_eq!(layout.soil.x, 140.0);
    }

    #[test]
    fn one_inch_moves_a_quarter_box() {
        let layout = BoxLayout::new(Viewport::new(1000.0, 400.0));
        let offset = layout.displacement_px(&RenderConfig::default(), 25.4);
        assert_relative_eq!(offset, 200.0, epsilon = 1.0e-9);
    }

    #[test]
    fn soil_colour_darkens_when_saturated() {
        let dry = soil_color(&TestParameters::default());
        assert_eq!(dry, Color::rgb(159, 129, 19));
        let wet = soil_color(&TestParameters {
            saturation: Saturation::Saturated,
            ..TestParameters::default()
        });
        assert_eq!(wet, Color::rgb(90, 100, 20));
        assert_eq!(wet.to_string(), "rgb(90, 100, 20)");
    }

    #[test]
    fn soil_colour_saturates_at_full_channel() {
        let strong = soil_color(&TestParameters {
            cohesion_kpa: 200.0,
            friction_angle_deg: 90.0,
            ..TestParameters::default()
        });
        assert_eq!(strong, Color::rgb(255, 249, 19));
    }

    #[test]
    fn upper_half_and_failure_plane_follow_displacement() {
        let viewport = Viewport::new(1000.0, 400.0);
        let mut calls = CallLog::default();
        render_frame(
            &mut calls,
            viewport,
            &RenderConfig::default(),
            &TestProfile::hm5750(),
            &TestParameters::default(),
            25.4,
        );
        assert_eq!(calls.clears, 1);
        let (upper, color) = calls.rects[1];
        assert_eq!(color, UPPER_HALF);
        assert_relative_eq!(upper.x, 300.0, epsilon = 1.0e-9);

        let plane = calls
            .polylines
            .iter()
            .find(|line| line.len() == 3)
            .expect("failure plane drawn");
        assert_relative_eq!(plane[1].x, 340.0, epsilon = 1.0e-9);
        assert_relative_eq!(plane[2].x, 1060.0, epsilon = 1.0e-9);
        assert_relative_eq!(plane[0].y, 200.0);
    }

    #[test]
    fn arrows_point_into_the_box() {
        let mut calls = CallLog::default();
        render_frame(
            &mut calls,
            Viewport::new(1000.0, 400.0),
            &RenderConfig::default(),
            &TestProfile::generic(),
            &TestParameters::default(),
            0.0,
        );
        assert_eq!(calls.polygons.len(), 2);
        let normal_head = &calls.polygons[0];
        assert_relative_eq!(normal_head[0].y, 100.0);
        assert!(normal_head[1].y < normal_head[0].y);
        let shear_head = &calls.polygons[1];
        assert!(shear_head[1].x > shear_head[0].x);
        assert!(calls.texts.iter().any(|text| text == "σ = 200 kPa"));
        assert!(calls.texts.iter().any(|text| text == "τ"));
    }

    #[test]
    fn annotations_reflect_profile_controls() {
        let mut calls = CallLog::default();
        let parameters = TestParameters {
            saturation: Saturation::Saturated,
            ..TestParameters::default()
        };
        render_frame(
            &mut calls,
            Viewport::default(),
            &RenderConfig::default(),
            &TestProfile::hm5750(),
            &parameters,
            0.0,
        );
        assert!(calls.texts.contains(&"σ = 200 kPa - saturated".to_string()));
        assert!(calls.texts.contains(&"c = 10 kPa, φ = 30°".to_string()));

        let mut calls = CallLog::default();
        render_frame(
            &mut calls,
            Viewport::default(),
            &RenderConfig::default(),
            &TestProfile::hm5755(),
            &TestParameters::default(),
            0.0,
        );
        assert!(calls.texts.contains(&"σ = 200 kPa - valve closed".to_string()));
        assert!(calls.texts.contains(&"29 psi".to_string()));
    }

    #[test]
    fn open_valve_labels_round_the_pneumatic_load() {
        let mut parameters = TestParameters {
            valve_open: true,
            ..TestParameters::default()
        };
        parameters.sync_pneumatic_load();
        assert!((parameters.normal_stress_kpa - 200.0).abs() > 0.01);

        let mut calls = CallLog::default();
        render_frame(
            &mut calls,
            Viewport::default(),
            &RenderConfig::default(),
            &TestProfile::hm5755(),
            &parameters,
            0.0,
        );
        assert!(calls.texts.contains(&"σ = 200 kPa - valve open".to_string()));
        assert!(calls.texts.contains(&"σ = 200 kPa".to_string()));
        assert!(calls.texts.contains(&"29 psi".to_string()));
    }

    #[test]
    fn fractional_soil_parameters_are_rounded() {
        let mut calls = CallLog::default();
        let parameters = TestParameters {
            cohesion_kpa: 12.4,
            friction_angle_deg: 27.6,
            normal_stress_kpa: 149.6,
            ..TestParameters::default()
        };
        render_frame(
            &mut calls,
            Viewport::default(),
            &RenderConfig::default(),
            &TestProfile::generic(),
            &parameters,
            0.0,
        );
        assert!(calls.texts.contains(&"c = 12 kPa, φ = 28°".to_string()));
        assert!(calls.texts.contains(&"150 kPa".to_string()));
    }
}
