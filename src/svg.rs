//! Recording surface that turns a rendered frame into SVG.

use std::fmt::Write;

use serde::Serialize;

use crate::render::{Color, Point, Rect, Surface, Viewport};

/// A single recorded drawing call.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Filled rectangle.
    Rect {
        /// Rectangle bounds.
        rect: Rect,
        /// Fill colour.
        color: Color,
    },
    /// Stroked polyline.
    Polyline {
        /// Vertices as `[x, y]` pairs.
        points: Vec<[f64; 2]>,
        /// Stroke colour.
        color: Color,
        /// Stroke width in pixels.
        line_width: f64,
    },
    /// Filled polygon.
    Polygon {
        /// Vertices as `[x, y]` pairs.
        points: Vec<[f64; 2]>,
        /// Fill colour.
        color: Color,
    },
    /// Filled circle.
    Circle {
        /// Centre as `[x, y]`.
        center: [f64; 2],
        /// Radius in pixels.
        radius: f64,
        /// Fill colour.
        color: Color,
    },
    /// Text run.
    Text {
        /// Text content.
        text: String,
        /// Baseline origin as `[x, y]`.
        at: [f64; 2],
        /// Font size in pixels.
        size_px: f64,
        /// Fill colour.
        color: Color,
    },
}

/// [`Surface`] that records drawing calls since the last clear.
///
/// # Examples
///
/// ```
/// use shearbox::render::{render_frame, RenderConfig, Viewport};
/// use shearbox::{SvgSurface, TestParameters, TestProfile};
///
/// let mut surface = SvgSurface::default();
/// render_frame(
///     &mut surface,
///     Viewport::new(640.0, 320.0),
///     &RenderConfig::default(),
///     &TestProfile::hm5750(),
///     &TestParameters::default(),
///     0.0,
/// );
/// let svg = surface.to_svg();
/// assert!(svg.starts_with("<svg"));
/// assert!(svg.contains("Soil sample"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SvgSurface {
    /// Size of the surface at the last clear.
    viewport: Viewport,
    /// Calls recorded since the last clear.
    commands: Vec<DrawCommand>,
}

impl SvgSurface {
    /// Recorded calls in drawing order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Size of the surface at the last clear.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Render the recorded calls as a standalone SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let mut output = String::new();
        writeln!(
            &mut output,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.viewport.width,
            h = self.viewport.height
        )
        .expect("writing to string cannot fail");
        for command in &self.commands {
            write_command(&mut output, command).expect("writing to string cannot fail");
        }
        output.push_str("</svg>\n");
        output
    }
}

/// Append one SVG element for a recorded call.
fn write_command(output: &mut String, command: &DrawCommand) -> std::fmt::Result {
    match command {
        DrawCommand::Rect { rect, color } => writeln!(
            output,
            r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{color}"/>"#,
            rect.x, rect.y, rect.width, rect.height
        ),
        DrawCommand::Polyline {
            points,
            color,
            line_width,
        } => writeln!(
            output,
            r#"  <polyline points="{}" fill="none" stroke="{color}" stroke-width="{line_width}"/>"#,
            point_list(points)
        ),
        DrawCommand::Polygon { points, color } => writeln!(
            output,
            r#"  <polygon points="{}" fill="{color}"/>"#,
            point_list(points)
        ),
        DrawCommand::Circle {
            center,
            radius,
            color,
        } => writeln!(
            output,
            r#"  <circle cx="{}" cy="{}" r="{radius}" fill="{color}"/>"#,
            center[0], center[1]
        ),
        DrawCommand::Text {
            text,
            at,
            size_px,
            color,
        } => writeln!(
            output,
            r#"  <text x="{}" y="{}" font-family="Arial" font-size="{size_px}" fill="{color}">{}</text>"#,
            at[0],
            at[1],
            escape(text)
        ),
    }
}

/// Format vertices as an SVG `points` attribute.
fn point_list(points: &[[f64; 2]]) -> String {
    points
        .iter()
        .map(|[x, y]| format!("{x},{y}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape XML metacharacters in text content.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Convert a surface point to a serialisable pair.
fn pair(point: &Point) -> [f64; 2] {
    [point.x, point.y]
}

impl Surface for SvgSurface {
    fn clear(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.commands.clear();
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    fn stroke_polyline(&mut self, points: &[Point], color: Color, line_width: f64) {
        self.commands.push(DrawCommand::Polyline {
            points: points.iter().map(pair).collect(),
            color,
            line_width,
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        self.commands.push(DrawCommand::Polygon {
            points: points.iter().map(pair).collect(),
            color,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center: pair(&center),
            radius,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, at: Point, size_px: f64, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at: pair(&at),
            size_px,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::TestParameters;
    use crate::profile::TestProfile;
    use crate::render::{render_frame, RenderConfig};

    fn draw(surface: &mut SvgSurface, displacement_mm: f64) {
        render_frame(
            surface,
            Viewport::new(640.0, 320.0),
            &RenderConfig::default(),
            &TestProfile::hm5750(),
            &TestParameters::default(),
            displacement_mm,
        );
    }

    #[test]
    fn redraw_is_idempotent() {
        let mut first = SvgSurface::default();
        draw(&mut first, 42.0);
        let mut second = SvgSurface::default();
        draw(&mut second, 10.0);
        draw(&mut second, 42.0);
        assert_eq!(first, second);
    }

    #[test]
    fn svg_contains_every_command() {
        let mut surface = SvgSurface::default();
        draw(&mut surface, 0.0);
        let svg = surface.to_svg();
        let elements = svg.lines().filter(|line| line.starts_with("  <")).count();
        assert_eq!(elements, surface.commands().len());
        assert!(svg.contains(r#"width="640""#));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn text_is_escaped() {
        let mut surface = SvgSurface::default();
        surface.fill_text("a < b & c", Point::new(0.0, 0.0), 12.0, Color::rgb(0, 0, 0));
        assert!(surface.to_svg().contains("a &lt; b &amp; c"));
    }

    #[test]
    fn commands_serialise_to_json() {
        let mut surface = SvgSurface::default();
        surface.fill_circle(Point::new(1.0, 2.0), 3.0, Color::rgb(1, 2, 3));
        let json = serde_json::to_string(surface.commands()).expect("serialises");
        assert_eq!(
            json,
            r#"[{"kind":"circle","center":[1.0,2.0],"radius":3.0,"color":{"r":1,"g":2,"b":3}}]"#
        );
    }
}
