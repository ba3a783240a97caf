use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, Result, WrapErr};
use pitch_report_core::export::{
    export_file_name, export_width, page_rows_for_width, paginate, radar_file_name,
};
use pitch_report_core::radar::RadarChart;
use pitch_report_core::roadmap::RoadmapView;
use pitch_report_core::{NavigationController, ReportDocument, ReportSummary};
use ratatui::backend::TestBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};

use crate::ui::widgets::outline::{outline_line, render_outline};
use crate::ui::widgets::performers::{next_step_lines, render_next_steps, render_performers};
use crate::ui::widgets::radar::render_score_radar;
use crate::ui::widgets::roadmap::{activity_lines, render_roadmap};
use crate::ui::widgets::score::render_report_top;

const RADAR_ROWS: u16 = 26;

/// Greedy word wrap; words longer than `width` get a line of their own.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Every finding with both assessments, wrapped to `width`.
fn assessment_lines(document: &ReportDocument, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for entry in document.findings() {
        lines.push(Line::from(Span::styled(
            format!(
                "{} / {} / {} ({:.0})",
                entry.cluster.name, entry.parameter.name, entry.finding.name, entry.finding.assigned_score
            ),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (heading, body) in [
            ("What went well: ", &entry.finding.what_went_well),
            ("What can be improved: ", &entry.finding.what_can_be_improved),
        ] {
            let text = format!("{heading}{body}");
            lines.extend(wrap_text(&text, width).into_iter().map(Line::from));
        }
        lines.push(Line::from(""));
    }
    lines
}

fn expanded_navigation(document: &ReportDocument) -> NavigationController {
    let mut navigation = NavigationController::new(Default::default());
    navigation.toggle_expand_all(document.cluster_names().as_slice());
    for cluster in &document.clusters {
        for parameter in &cluster.parameters {
            navigation.toggle_parameter(&pitch_report_core::ParameterKey::new(
                cluster.name.as_str(),
                parameter.name.as_str(),
            ));
        }
    }
    navigation
}

fn clamp_rows(rows: usize) -> u16 {
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Renders the whole report, every section open, as plain text rows.
pub fn render_export_lines(
    document: &ReportDocument,
    summary: &ReportSummary,
    width: u16,
) -> Result<Vec<String>> {
    let navigation = expanded_navigation(document);
    let rows = navigation.outline(document);
    let roadmap = document.roadmap.as_ref().and_then(RoadmapView::new);
    let text_width = usize::from(width.saturating_sub(4)).max(20);
    let assessments = assessment_lines(document, text_width);

    let performer_rows = summary.performers.top.len().max(summary.performers.bottom.len()) * 2 + 2;
    let heights = [
        4,
        RADAR_ROWS,
        clamp_rows(performer_rows.max(3)),
        clamp_rows(next_step_lines(document, &summary.performers).len().max(1) + 2),
        clamp_rows(rows.len().max(1) + 2),
        clamp_rows(assessments.len().max(1) + 2),
        roadmap
            .as_ref()
            .map_or(3, |view| clamp_rows(activity_lines(view).len() + 4)),
    ];
    let total = heights.iter().fold(0_u16, |sum, height| sum.saturating_add(*height));

    let mut terminal = Terminal::new(TestBackend::new(width, total))
        .map_err(|e| eyre!("Unable to create export canvas: {e}"))?;
    terminal
        .draw(|f: &mut Frame<'_>| {
            let area = f.area();
            let sections = Layout::default()
                .direction(Direction::Vertical)
                .constraints(heights.map(Constraint::Length))
                .split(area);

            render_report_top(f, sections[0], document);
            render_score_radar(f, sections[1], summary, None, 0.0);
            render_performers(f, sections[2], &summary.performers, None, None, false);
            render_next_steps(f, sections[3], document, &summary.performers);
            render_outline(f, sections[4], &rows, None, 1.0, false);
            render_assessments(f, sections[5], assessments);
            render_roadmap(f, sections[6], roadmap.as_ref(), false);
        })
        .map_err(|e| eyre!("Unable to render export: {e}"))?;

    let buffer = terminal.backend().buffer();
    let lines = (0..buffer.area.height)
        .map(|y| {
            let row: String = (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect();
            row.trim_end().to_string()
        })
        .collect();
    Ok(lines)
}

fn render_assessments(f: &mut Frame<'_>, area: Rect, lines: Vec<Line<'static>>) {
    let paragraph =
        Paragraph::new(lines).block(Block::default().title("Assessments").borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

/// Outline rows as plain text, used by the headless summary.
pub fn outline_text(document: &ReportDocument) -> Vec<String> {
    let navigation = expanded_navigation(document);
    navigation
        .outline(document)
        .iter()
        .map(|row| outline_line(row, 0.0).to_string())
        .collect()
}

/// Writes `{id}-report.txt` into `dir`, one form-feed separated page per A4 slice,
/// plus `{id}-radar.svg` when any cluster has a radar axis.
///
/// `summary` is the one the viewer already derived for `document`.
pub fn export_report(
    document: &ReportDocument,
    summary: &ReportSummary,
    dir: &Path,
    screen_width: u16,
) -> Result<PathBuf> {
    let width = export_width(screen_width.max(40));
    let lines = render_export_lines(document, summary, width)?;
    let pages = paginate(&lines, page_rows_for_width(width));

    std::fs::create_dir_all(dir)
        .wrap_err_with(|| format!("Unable to create export directory {}", dir.display()))?;
    let path = dir.join(export_file_name(&document.id));
    std::fs::write(&path, pages).wrap_err_with(|| format!("Unable to write {}", path.display()))?;

    if let Some(layout) = RadarChart::default().layout(&summary.chart_points()) {
        let svg_path = dir.join(radar_file_name(&document.id));
        std::fs::write(&svg_path, layout.to_svg())
            .wrap_err_with(|| format!("Unable to write {}", svg_path.display()))?;
    }

    tracing::info!(path = %path.display(), rows = lines.len(), "report exported");
    Ok(path)
}
