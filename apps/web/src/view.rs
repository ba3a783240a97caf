use pitch_report_core::navigation::OutlineRow;
use pitch_report_core::radar::{Point, RadarChart, TextAnchor, PALETTE_SIZE};
use pitch_report_core::roadmap::RoadmapView;
use pitch_report_core::score::{format_score, gauge_ratio, ScoreBand};
use pitch_report_core::viewer::{LoadedReport, ViewerState};
use pitch_report_core::TopBottomEntry;
use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line as TextLine, Span, Text},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Block, Borders, Gauge, Paragraph, Wrap,
    },
    Frame,
};

use crate::animation::pulse_level;
use crate::state::{Pane, WebState};

const PALETTE: [Color; PALETTE_SIZE] = [
    Color::Rgb(99, 102, 241),
    Color::Rgb(16, 185, 129),
    Color::Rgb(245, 158, 11),
    Color::Rgb(239, 68, 68),
    Color::Rgb(139, 92, 246),
    Color::Rgb(6, 182, 212),
    Color::Rgb(236, 72, 153),
];

const KEY_HINTS: &str = "Tab/1-3 pane  arrows move  Enter open  e expand all  c share  r reload";

const fn band_color(band: ScoreBand) -> Color {
    match band {
        ScoreBand::Strong => Color::Green,
        ScoreBand::Moderate => Color::Yellow,
        ScoreBand::Weak => Color::Red,
        ScoreBand::Unknown => Color::Gray,
    }
}

pub fn render(state: &WebState, f: &mut Frame<'_>) {
    let area = f.area();
    let block = Block::default()
        .title("Pitch Report")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area).inner(Margin::new(1, 0));
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(inner);

    if let Some(message) = state.route_error() {
        render_message(f, chunks[0], message, Color::Red);
    } else {
        match state.session.state() {
            ViewerState::Idle => render_message(f, chunks[0], "Waiting for a report...", Color::Gray),
            ViewerState::Loading { ticket } => render_message(
                f,
                chunks[0],
                &format!("Loading report {}...", ticket.report_id()),
                Color::Yellow,
            ),
            ViewerState::Failed { message } => render_message(f, chunks[0], message, Color::Red),
            ViewerState::Ready(report) => render_report(state, report, f, chunks[0]),
        }
    }

    render_status(state, f, chunks[1]);
}

fn render_message(f: &mut Frame<'_>, area: Rect, message: &str, color: Color) {
    let paragraph = Paragraph::new(Text::from(TextLine::from(message.to_string())))
        .alignment(Alignment::Center)
        .style(Style::default().fg(color));
    let middle = Rect {
        y: area.y + area.height / 2,
        height: 1.min(area.height),
        ..area
    };
    f.render_widget(paragraph, middle);
}

fn render_status(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let color = if state.session.error_message().is_some() {
        Color::Red
    } else {
        Color::Yellow
    };
    let line = TextLine::from(vec![
        Span::styled(state.status.clone(), Style::default().fg(color)),
        Span::raw("  "),
        Span::styled(KEY_HINTS, Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_report(state: &WebState, report: &LoadedReport, f: &mut Frame<'_>, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(10)])
        .split(area);
    render_header(report, f, rows[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[1]);
    render_radar_panel(state, report, f, body[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(5)])
        .split(body[1]);
    render_pane_tabs(state.pane, f, right[0]);

    match state.pane {
        Pane::Highlights => render_highlights(state, report, f, right[1]),
        Pane::Outline => render_outline(state, f, right[1]),
        Pane::Roadmap => render_roadmap(state.roadmap.as_ref(), f, right[1]),
    }
}

fn render_header(report: &LoadedReport, f: &mut Frame<'_>, area: Rect) {
    let document = &report.document;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let mut lines = vec![
        TextLine::from(Span::styled(
            document.title_or_default().to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(Span::styled(
            format!("Report {}  |  {}", document.display_id(), document.created_label()),
            Style::default().fg(Color::Gray),
        )),
    ];
    if let Some(outcome) = &document.validation_outcome {
        lines.push(TextLine::from(Span::styled(
            outcome.clone(),
            Style::default().fg(Color::Cyan),
        )));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), chunks[0]);

    let score = document.overall_score;
    let band = ScoreBand::for_overall(score);
    let gauge = Gauge::default()
        .block(Block::default().title("Overall").borders(Borders::ALL))
        .gauge_style(Style::default().fg(band_color(band)))
        .ratio(gauge_ratio(score))
        .label(format!("{} / 100 ({})", format_score(score), band.label()));
    f.render_widget(gauge, chunks[1]);
}

fn flip(point: Point, size: f64) -> (f64, f64) {
    (point.x, size - point.y)
}

fn render_radar_panel(state: &WebState, report: &LoadedReport, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Cluster Scores")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(layout) = RadarChart::default().layout(&report.summary.chart_points()) else {
        let paragraph = Paragraph::new("No data available for chart")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, inner);
        return;
    };

    let width = inner.width.min(inner.height.saturating_mul(2));
    let square = Rect {
        x: inner.x + (inner.width - width) / 2,
        y: inner.y + (inner.height - width / 2) / 2,
        width,
        height: width / 2,
    };
    if square.width < 8 || square.height < 4 {
        return;
    }

    let highlight = state
        .session
        .navigation()
        .focused()
        .map(|target| target.cluster.as_str());
    let pulse = pulse_level(state.pulse);
    let unit = layout.size / f64::from(square.width);

    f.render_widget(
        Canvas::default()
            .paint(|ctx| {
                for ring in &layout.rings {
                    for (i, point) in ring.iter().enumerate() {
                        let (x1, y1) = flip(*point, layout.size);
                        let (x2, y2) = flip(ring[(i + 1) % ring.len()], layout.size);
                        ctx.draw(&CanvasLine { x1, y1, x2, y2, color: Color::DarkGray });
                    }
                }
                let polygon = layout.polygon();
                for (i, point) in polygon.iter().enumerate() {
                    let (x1, y1) = flip(*point, layout.size);
                    let (x2, y2) = flip(polygon[(i + 1) % polygon.len()], layout.size);
                    ctx.draw(&CanvasLine { x1, y1, x2, y2, color: Color::Cyan });
                }
                ctx.layer();

                for axis in &layout.axes {
                    let color = PALETTE[axis.palette_index % PALETTE_SIZE];
                    let pulsing = highlight == Some(axis.label.as_str());
                    let (x, y) = flip(axis.point, layout.size);
                    ctx.draw(&Circle {
                        x,
                        y,
                        radius: if pulsing { pulse.mul_add(4.0, 5.0) } else { 5.0 },
                        color,
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
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(color)
                    };
                    ctx.print(label_x.max(0.0), label_y, TextLine::styled(text, style));
                }
            })
            .x_bounds([0.0, layout.size])
            .y_bounds([0.0, layout.size]),
        square,
    );
}

fn render_pane_tabs(pane: Pane, f: &mut Frame<'_>, area: Rect) {
    let mut spans = Vec::new();
    for (index, candidate) in Pane::ALL.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        }
        let style = if *candidate == pane {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!("{} {}", index + 1, candidate.title()), style));
    }
    f.render_widget(Paragraph::new(TextLine::from(spans)), area);
}

fn entry_line(entry: &TopBottomEntry, selected: bool, focused: bool) -> TextLine<'static> {
    let marker = if selected { "> " } else { "  " };
    let style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    };
    TextLine::from(vec![
        Span::raw(marker),
        Span::styled(format!("{:>3.0} ", entry.score), style),
        Span::styled(entry.name.clone(), style),
        Span::styled(
            format!("  {} / {}", entry.cluster_name, entry.param_name),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn render_highlights(state: &WebState, report: &LoadedReport, f: &mut Frame<'_>, area: Rect) {
    let performers = &report.summary.performers;
    let focused = state.session.navigation().focused();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let offset = performers.top.len();
    for (chunk, title, entries, start) in [
        (chunks[0], "Top Performers", &performers.top, 0),
        (chunks[1], "Needs Attention", &performers.bottom, offset),
    ] {
        let lines: Vec<TextLine<'static>> = if entries.is_empty() {
            vec![TextLine::from(Span::styled(
                "Nothing in this range",
                Style::default().fg(Color::Gray),
            ))]
        } else {
            entries
                .iter()
                .enumerate()
                .map(|(index, entry)| {
                    let is_focused = focused.is_some_and(|target| {
                        target.cluster == entry.cluster_name
                            && target.parameter == entry.param_name
                            && target.sub_parameter == entry.name
                    });
                    entry_line(entry, state.performer_index == start + index, is_focused)
                })
                .collect()
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        f.render_widget(Paragraph::new(lines).block(block), chunk);
    }
}

fn outline_line(row: &OutlineRow<'_>, selected: bool, pulse: f64) -> TextLine<'static> {
    let indent = "  ".repeat(row.depth());
    let cursor = if selected { "> " } else { "  " };
    match row {
        OutlineRow::Cluster {
            cluster,
            expanded,
            score,
        } => TextLine::from(vec![
            Span::raw(format!("{cursor}{indent}{} ", if *expanded { "▾" } else { "▸" })),
            Span::styled(
                cluster.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {score}"),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        OutlineRow::Parameter {
            parameter,
            expanded,
            badge,
            ..
        } => TextLine::from(vec![
            Span::raw(format!("{cursor}{indent}{} ", if *expanded { "▾" } else { "▸" })),
            Span::raw(parameter.name.clone()),
            Span::styled(
                format!("  [{badge:>3}]"),
                Style::default().fg(band_color(ScoreBand::for_badge(Some(f64::from(*badge))))),
            ),
        ]),
        OutlineRow::Finding {
            finding, focused, ..
        } => {
            let style = if *focused && pulse > 0.5 {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else if *focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            TextLine::from(vec![
                Span::raw(format!("{cursor}{indent}{} ", if *focused { "★" } else { "•" })),
                Span::styled(format!("{} ({:.0})", finding.name, finding.assigned_score), style),
            ])
        }
    }
}

fn render_outline(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let rows = state.outline_rows();
    let pulse = pulse_level(state.pulse);
    let visible = usize::from(area.height.saturating_sub(2)).max(1);
    let skip = state.outline_index.saturating_sub(visible - 1);

    let mut lines: Vec<TextLine<'static>> = rows
        .iter()
        .enumerate()
        .skip(skip)
        .take(visible)
        .map(|(index, row)| outline_line(row, index == state.outline_index, pulse))
        .collect();

    if let Some(OutlineRow::Finding { finding, .. }) = rows.get(state.outline_index) {
        lines.push(TextLine::from(""));
        lines.push(TextLine::from(Span::styled(
            format!("What went well: {}", finding.what_went_well),
            Style::default().fg(Color::Green),
        )));
        lines.push(TextLine::from(Span::styled(
            format!("What can be improved: {}", finding.what_can_be_improved),
            Style::default().fg(Color::Yellow),
        )));
    }

    let block = Block::default()
        .title(Pane::Outline.title())
        .borders(Borders::ALL);
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_roadmap(roadmap: Option<&RoadmapView>, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(Pane::Roadmap.title())
        .borders(Borders::ALL);
    let Some(view) = roadmap else {
        let paragraph = Paragraph::new("No roadmap available")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    };

    let phase = view.viewed_phase();
    let mut lines = vec![
        TextLine::from(vec![
            Span::styled(
                if view.can_go_back() { "< " } else { "  " },
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                phase.name,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                if view.can_go_forward() { " >" } else { "  " },
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        TextLine::from(Span::styled(
            format!("Progress {:.0}%", view.progress() * 100.0),
            Style::default().fg(Color::Gray),
        )),
        TextLine::from(""),
    ];
    for activity in view.activities() {
        lines.push(TextLine::from(vec![
            Span::styled(
                format!("{:<12}", activity.timeline),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(activity.text.to_string()),
        ]));
    }

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
