use pitch_report_core::navigation::OutlineRow;
use pitch_report_core::viewer::LoadedReport;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Tabs};
use ratatui::Frame;

use crate::app::{App, Pane};
use crate::ui::widgets::outline::{render_finding_detail, render_outline};
use crate::ui::widgets::performers::{render_next_steps, render_performers};
use crate::ui::widgets::radar::render_score_radar;
use crate::ui::widgets::roadmap::render_roadmap;
use crate::ui::widgets::score::render_report_top;

pub fn render_report(app: &App, report: &LoadedReport, f: &mut Frame<'_>, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(10)])
        .split(area);

    render_report_top(f, rows[0], &report.document);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    let highlighted_cluster = app
        .session
        .navigation()
        .focused()
        .map(|target| target.cluster.as_str());
    render_score_radar(
        f,
        body[0],
        &report.summary,
        highlighted_cluster,
        app.animation_counter,
    );

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(5)])
        .split(body[1]);
    render_pane_tabs(app.pane, f, right[0]);

    match app.pane {
        Pane::Performers => render_highlights_pane(app, report, f, right[1]),
        Pane::Outline => render_outline_pane(app, f, right[1]),
        Pane::Roadmap => render_roadmap(f, right[1], app.roadmap.as_ref(), true),
    }
}

fn render_pane_tabs(pane: Pane, f: &mut Frame<'_>, area: Rect) {
    let selected = Pane::ALL.iter().position(|candidate| *candidate == pane);
    let tabs = Tabs::new(Pane::ALL.iter().map(|pane| pane.title()))
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" | ");
    f.render_widget(tabs, area);
}

fn render_highlights_pane(app: &App, report: &LoadedReport, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(9)])
        .split(area);
    render_performers(
        f,
        chunks[0],
        &report.summary.performers,
        Some(app.performer_index),
        app.session.navigation().focused(),
        true,
    );
    render_next_steps(f, chunks[1], &report.document, &report.summary.performers);
}

fn render_outline_pane(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let rows = app.outline_rows();
    let pulse = (app.animation_counter * 2.0).sin().mul_add(0.5, 0.5);
    render_outline(f, chunks[0], &rows, Some(app.outline_index), pulse, true);

    let selected_finding = rows.get(app.outline_index).and_then(|row| match row {
        OutlineRow::Finding { finding, .. } => Some(*finding),
        _ => None,
    });
    let finding = selected_finding.or_else(|| {
        app.session
            .navigation()
            .focused()
            .and_then(|target| app.lookup_finding(target))
    });
    render_finding_detail(f, chunks[1], finding);
}

/// Status text on the left, key hints on the right.
pub fn render_status_bar(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(42)])
        .split(area);

    let status_style = if app.status_message.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Yellow)
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            app.status_message.clone(),
            status_style,
        ))),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Tab pane  / search  x export  ? help  q quit",
            Style::default().fg(Color::DarkGray),
        ))),
        chunks[1],
    );
}
