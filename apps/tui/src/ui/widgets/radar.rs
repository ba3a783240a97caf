use pitch_report_core::radar::{Point, RadarChart, RadarLayout, TextAnchor, PALETTE_SIZE};
use pitch_report_core::ReportSummary;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::Line;
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub const PALETTE: [Color; PALETTE_SIZE] = [
    Color::Rgb(99, 102, 241),
    Color::Rgb(16, 185, 129),
    Color::Rgb(245, 158, 11),
    Color::Rgb(239, 68, 68),
    Color::Rgb(139, 92, 246),
    Color::Rgb(6, 182, 212),
    Color::Rgb(236, 72, 153),
];

pub const fn palette_color(index: usize) -> Color {
    PALETTE[index % PALETTE_SIZE]
}

/// Largest area with a 2:1 cell ratio, so the chart looks round in most terminals.
fn chart_area(inner: Rect) -> Rect {
    let width = inner.width.min(inner.height.saturating_mul(2));
    let height = width / 2;
    Rect {
        x: inner.x + (inner.width - width) / 2,
        y: inner.y + (inner.height - height) / 2,
        width,
        height,
    }
}

/// Canvas y points up while layout coordinates point down.
fn flip(point: Point, size: f64) -> (f64, f64) {
    (point.x, size - point.y)
}

/// Cluster score spider chart. `highlight` names a cluster whose vertex pulses.
pub fn render_score_radar(
    f: &mut Frame<'_>,
    area: Rect,
    summary: &ReportSummary,
    highlight: Option<&str>,
    animation: f64,
) {
    let block = Block::default()
        .title("Cluster Scores")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(layout) = RadarChart::default().layout(&summary.chart_points()) else {
        let paragraph = Paragraph::new("No data available for chart")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, inner);
        return;
    };

    let square = chart_area(inner);
    if square.width < 8 || square.height < 4 {
        return;
    }

    // Canvas units per terminal column, used to anchor labels.
    let unit = layout.size / f64::from(square.width);

    f.render_widget(
        Canvas::default()
            .paint(|ctx| {
                draw_grid(ctx, &layout);
                draw_polygon(ctx, &layout);
                ctx.layer();

                for axis in &layout.axes {
                    let (x, y) = flip(axis.point, layout.size);
                    let pulsing = highlight == Some(axis.label.as_str());
                    let scale = if pulsing {
                        (animation * 3.0).sin().mul_add(0.4, 1.4)
                    } else {
                        1.0
                    };
                    ctx.draw(&Circle {
                        x,
                        y,
                        radius: 5.0 * scale,
                        color: palette_color(axis.palette_index),
                    });

                    let text = format!("{} {:.0}", axis.short_label, axis.value);
                    #[allow(clippy::cast_precision_loss)]
                    let text_width = text.chars().count() as f64 * unit;
                    let (label_x, label_y) = flip(axis.label_at, layout.size);
                    let label_x = match axis.anchor {
                        TextAnchor::Start => label_x,
                        TextAnchor::Middle => label_x - text_width / 2.0,
                        TextAnchor::End => label_x - text_width,
                    };
                    let style = if pulsing {
                        Style::default().fg(Color::Yellow).bold()
                    } else {
                        Style::default().fg(palette_color(axis.palette_index))
                    };
                    ctx.print(label_x.max(0.0), label_y, Line::styled(text, style));
                }
            })
            .x_bounds([0.0, layout.size])
            .y_bounds([0.0, layout.size]),
        square,
    );
}

fn draw_grid(ctx: &mut ratatui::widgets::canvas::Context<'_>, layout: &RadarLayout) {
    for ring in &layout.rings {
        for (i, point) in ring.iter().enumerate() {
            let next = ring[(i + 1) % ring.len()];
            let (x1, y1) = flip(*point, layout.size);
            let (x2, y2) = flip(next, layout.size);
            ctx.draw(&CanvasLine {
                x1,
                y1,
                x2,
                y2,
                color: Color::DarkGray,
            });
        }
    }

    let (cx, cy) = flip(layout.center, layout.size);
    for axis in &layout.axes {
        let (x2, y2) = flip(axis.spoke_end, layout.size);
        ctx.draw(&CanvasLine {
            x1: cx,
            y1: cy,
            x2,
            y2,
            color: Color::DarkGray,
        });
    }
}

fn draw_polygon(ctx: &mut ratatui::widgets::canvas::Context<'_>, layout: &RadarLayout) {
    let polygon = layout.polygon();
    for (i, point) in polygon.iter().enumerate() {
        let next = polygon[(i + 1) % polygon.len()];
        let (x1, y1) = flip(*point, layout.size);
        let (x2, y2) = flip(next, layout.size);
        ctx.draw(&CanvasLine {
            x1,
            y1,
            x2,
            y2,
            color: Color::Cyan,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitch_report_core::aggregate::ClusterScore;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn chart_area_keeps_two_to_one_ratio() {
        let area = chart_area(Rect::new(0, 0, 100, 20));
        assert_eq!((area.width, area.height), (40, 20));
        assert_eq!(area.x, 30);
    }

    #[test]
    fn empty_summary_shows_placeholder() {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal
            .draw(|f| render_score_radar(f, f.area(), &ReportSummary::default(), None, 0.0))
            .unwrap();
        assert!(buffer_text(&terminal).contains("No data available for chart"));
    }

    #[test]
    fn axes_are_labelled_with_short_names() {
        let summary = ReportSummary {
            chart: vec![
                ClusterScore {
                    name: "Team".to_string(),
                    score: 82,
                },
                ClusterScore {
                    name: "Execution".to_string(),
                    score: 64,
                },
                ClusterScore {
                    name: "Compliance".to_string(),
                    score: 71,
                },
            ],
            ..ReportSummary::default()
        };
        let mut terminal = Terminal::new(TestBackend::new(90, 34)).unwrap();
        terminal
            .draw(|f| render_score_radar(f, f.area(), &summary, Some("Team"), 0.0))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("T & OH 82"));
        assert!(text.contains("E & O 64"));
    }
}
