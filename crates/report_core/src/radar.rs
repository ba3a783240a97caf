//! Spider-chart geometry for per-cluster scores.
//!
//! Coordinates use the SVG convention: origin top-left, y grows downward.
//! Axis `i` of `N` sits at `i * 2π / N - π/2`, so the first axis points up
//! and the rest follow clockwise.

use std::f64::consts::PI;
use std::fmt::Write as _;

/// Distance between the outer ring and the axis labels.
const LABEL_OFFSET: f64 = 25.0;

/// Palette slots cycled across axes; renderers map them to concrete colours.
pub const PALETTE_SIZE: usize = 7;

#[derive(Debug, Clone)]
pub struct RadarLabels {
    entries: Vec<(String, String)>,
}

impl Default for RadarLabels {
    fn default() -> Self {
        Self::new([
            ("Core Idea", "CI & I"),
            ("Market Opportunity", "M & CO"),
            ("Execution", "E & O"),
            ("Business Model", "BM & S"),
            ("Team", "T & OH"),
            ("Compliance", "EE & C"),
            ("Risk & Strategy", "R & FO"),
        ])
    }
}

impl RadarLabels {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(full, short)| (full.into(), short.into()))
                .collect(),
        }
    }

    pub fn short(&self, full: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == full)
            .map(|(_, short)| short.as_str())
    }

    pub fn contains(&self, full: &str) -> bool {
        self.short(full).is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub const fn as_svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Which side of the label's anchor point the text sits on vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    Above,
    Middle,
    Below,
}

impl Baseline {
    pub const fn as_svg(self) -> &'static str {
        match self {
            Self::Above => "alphabetic",
            Self::Middle => "middle",
            Self::Below => "hanging",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarAxis {
    pub label: String,
    pub short_label: String,
    pub value: f64,
    pub angle: f64,
    pub point: Point,
    pub spoke_end: Point,
    pub label_at: Point,
    pub anchor: TextAnchor,
    pub baseline: Baseline,
    pub palette_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarLayout {
    pub size: f64,
    pub center: Point,
    pub radius: f64,
    pub max_score: f64,
    pub axes: Vec<RadarAxis>,
    /// One closed polygon per grid level, innermost first.
    pub rings: Vec<Vec<Point>>,
}

#[derive(Debug, Clone)]
pub struct RadarChart {
    pub size: f64,
    pub padding: f64,
    pub max_score: f64,
    pub levels: u32,
    pub labels: RadarLabels,
}

impl Default for RadarChart {
    fn default() -> Self {
        Self {
            size: 400.0,
            padding: 80.0,
            max_score: 100.0,
            levels: 4,
            labels: RadarLabels::default(),
        }
    }
}

impl RadarChart {
    #[must_use]
    pub fn with_size(mut self, size: f64, padding: f64) -> Self {
        self.size = size;
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_labels(mut self, labels: RadarLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn radius(&self) -> f64 {
        ((self.size - self.padding * 2.0) / 2.0).max(0.0)
    }

    /// Lays out the recognised, finite entries; `None` when none survive.
    pub fn layout<L: AsRef<str>>(&self, data: &[(L, f64)]) -> Option<RadarLayout> {
        let valid: Vec<(&str, f64)> = data
            .iter()
            .map(|(label, value)| (label.as_ref(), *value))
            .filter(|(label, value)| value.is_finite() && self.labels.contains(label))
            .collect();
        if valid.is_empty() {
            return None;
        }

        let center = Point {
            x: self.size / 2.0,
            y: self.size / 2.0,
        };
        let radius = self.radius();
        #[allow(clippy::cast_precision_loss)]
        let count = valid.len() as f64;

        let axes = valid
            .iter()
            .enumerate()
            .map(|(i, (label, value))| {
                #[allow(clippy::cast_precision_loss)]
                let angle = (i as f64) * 2.0 * PI / count - PI / 2.0;
                let clamped = value.clamp(0.0, self.max_score);
                let label_at = polar(center, radius + LABEL_OFFSET, angle);
                RadarAxis {
                    label: (*label).to_string(),
                    short_label: self.labels.short(label).unwrap_or(*label).to_string(),
                    value: *value,
                    angle,
                    point: polar(center, self.scale(clamped, radius), angle),
                    spoke_end: polar(center, radius, angle),
                    label_at,
                    anchor: anchor_for(label_at, center),
                    baseline: baseline_for(label_at, center),
                    palette_index: i % PALETTE_SIZE,
                }
            })
            .collect::<Vec<_>>();

        let rings = (1..=self.levels)
            .map(|level| {
                let ring_radius = radius * f64::from(level) / f64::from(self.levels);
                axes.iter()
                    .map(|axis| polar(center, ring_radius, axis.angle))
                    .collect()
            })
            .collect();

        Some(RadarLayout {
            size: self.size,
            center,
            radius,
            max_score: self.max_score,
            axes,
            rings,
        })
    }

    fn scale(&self, value: f64, radius: f64) -> f64 {
        if self.max_score <= 0.0 {
            return 0.0;
        }
        value / self.max_score * radius
    }
}

impl RadarLayout {
    /// Data polygon vertices in axis order; the shape closes back to the first.
    pub fn polygon(&self) -> Vec<Point> {
        self.axes.iter().map(|axis| axis.point).collect()
    }

    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let size = self.size;
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
        );
        for ring in &self.rings {
            let _ = writeln!(
                svg,
                r#"  <polygon points="{}" fill="none" stroke="currentColor" stroke-opacity="0.3"/>"#,
                svg_points(ring)
            );
        }
        for axis in &self.axes {
            let _ = writeln!(
                svg,
                r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke-dasharray="2 4" data-palette="{}"/>"#,
                self.center.x, self.center.y, axis.spoke_end.x, axis.spoke_end.y, axis.palette_index
            );
        }
        let _ = writeln!(
            svg,
            r#"  <polygon points="{}" fill-opacity="0.25" stroke-width="2.5"/>"#,
            svg_points(&self.polygon())
        );
        for axis in &self.axes {
            let _ = writeln!(
                svg,
                r#"  <text x="{:.2}" y="{:.2}" text-anchor="{}" dominant-baseline="{}">{}% {}</text>"#,
                axis.label_at.x,
                axis.label_at.y,
                axis.anchor.as_svg(),
                axis.baseline.as_svg(),
                axis.value.round(),
                escape(&axis.short_label)
            );
        }
        svg.push_str("</svg>\n");
        svg
    }
}

pub fn svg_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|point| format!("{:.2},{:.2}", point.x, point.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn polar(center: Point, radius: f64, angle: f64) -> Point {
    Point {
        x: angle.cos().mul_add(radius, center.x),
        y: angle.sin().mul_add(radius, center.y),
    }
}

fn anchor_for(label_at: Point, center: Point) -> TextAnchor {
    if label_at.x < center.x - 1.0 {
        TextAnchor::End
    } else if label_at.x > center.x + 1.0 {
        TextAnchor::Start
    } else {
        TextAnchor::Middle
    }
}

fn baseline_for(label_at: Point, center: Point) -> Baseline {
    if label_at.y < center.y - 1.0 {
        Baseline::Above
    } else if label_at.y > center.y + 1.0 {
        Baseline::Below
    } else {
        Baseline::Middle
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn first_axis_points_up() {
        let layout = RadarChart::default()
            .layout(&[("Core Idea", 100.0), ("Team", 50.0), ("Execution", 0.0)])
            .unwrap();
        assert_eq!(layout.axis_count(), 3);
        assert!(close(layout.radius, 120.0));
        let first = &layout.axes[0];
        assert!(close(first.point.x, 200.0));
        assert!(close(first.point.y, 80.0));
        assert_eq!(first.anchor, TextAnchor::Middle);
        assert_eq!(first.baseline, Baseline::Above);
    }

    #[test]
    fn axes_proceed_clockwise() {
        let layout = RadarChart::default()
            .layout(&[("Core Idea", 100.0), ("Team", 100.0), ("Execution", 100.0), ("Compliance", 100.0)])
            .unwrap();
        let right = &layout.axes[1];
        assert!(close(right.point.x, 320.0));
        assert!(close(right.point.y, 200.0));
        assert_eq!(right.anchor, TextAnchor::Start);
        let left = &layout.axes[3];
        assert_eq!(left.anchor, TextAnchor::End);
        assert_eq!(layout.axes[2].baseline, Baseline::Below);
    }

    #[test]
    fn rings_sit_at_even_fractions() {
        let layout = RadarChart::default()
            .layout(&[("Core Idea", 40.0), ("Team", 60.0)])
            .unwrap();
        assert_eq!(layout.rings.len(), 4);
        let innermost_top = layout.rings[0][0];
        assert!(close(200.0 - innermost_top.y, 30.0));
        let outer_top = layout.rings[3][0];
        assert!(close(200.0 - outer_top.y, 120.0));
    }

    #[test]
    fn invalid_entries_are_dropped() {
        let layout = RadarChart::default()
            .layout(&[
                ("Core Idea", 70.0),
                ("Unknown Cluster", 80.0),
                ("Team", f64::NAN),
                ("Execution", 65.0),
            ])
            .unwrap();
        assert_eq!(layout.axis_count(), 2);
        assert_eq!(layout.axes[1].label, "Execution");
        assert_eq!(layout.axes[1].short_label, "E & O");
    }

    #[test]
    fn nothing_valid_renders_nothing() {
        assert!(RadarChart::default().layout(&[("Nope", 10.0)]).is_none());
        assert!(RadarChart::default().layout::<&str>(&[]).is_none());
    }

    #[test]
    fn custom_labels_widen_the_recognised_set() {
        let chart = RadarChart::default().with_labels(RadarLabels::new([("Traction", "TR")]));
        let layout = chart.layout(&[("Traction", 55.0), ("Team", 90.0)]).unwrap();
        assert_eq!(layout.axis_count(), 1);
    }

    #[test]
    fn values_beyond_max_stay_on_the_outer_ring() {
        let layout = RadarChart::default().layout(&[("Core Idea", 140.0)]).unwrap();
        assert!(close(layout.axes[0].point.y, 80.0));
        assert!(close(layout.axes[0].value, 140.0));
    }

    #[test]
    fn svg_contains_polygon_and_escaped_labels() {
        let svg = RadarChart::default()
            .layout(&[("Core Idea", 92.0), ("Team", 70.0)])
            .unwrap()
            .to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("CI &amp; I"));
        assert_eq!(svg.matches("<polygon").count(), 5);
    }

    #[test]
    fn axis_count_matches_valid_entries() {
        for valid in 1..=7_usize {
            let labels = [
                "Core Idea",
                "Market Opportunity",
                "Execution",
                "Business Model",
                "Team",
                "Compliance",
                "Risk & Strategy",
            ];
            let mut data: Vec<(String, f64)> = labels[..valid]
                .iter()
                .map(|label| ((*label).to_string(), 50.0))
                .collect();
            for junk in 0..valid.saturating_sub(1) {
                data.push((format!("junk-{junk}"), 50.0));
            }
            let layout = RadarChart::default().layout(&data).unwrap();
            assert_eq!(layout.axis_count(), valid);
        }
    }
}
