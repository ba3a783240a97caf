use pitch_report_core::score::{badge, format_score, gauge_ratio, ScoreBand};
use pitch_report_core::ReportDocument;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use ratatui::Frame;

pub const fn band_color(band: ScoreBand) -> Color {
    match band {
        ScoreBand::Strong => Color::Green,
        ScoreBand::Moderate => Color::Yellow,
        ScoreBand::Weak => Color::Red,
        ScoreBand::Unknown => Color::Gray,
    }
}

/// `[ 78 ]` coloured by band.
pub fn badge_span(score: f64) -> Span<'static> {
    let value = badge(score);
    Span::styled(
        format!("[{value:>3}]"),
        Style::default().fg(band_color(ScoreBand::for_badge(Some(f64::from(value))))),
    )
}

/// Title, id, creation date and outcome.
pub fn render_header(f: &mut Frame<'_>, area: Rect, document: &ReportDocument) {
    let outcome = document
        .validation_outcome
        .as_deref()
        .filter(|outcome| !outcome.trim().is_empty())
        .unwrap_or("Pending");

    let lines = vec![
        Line::from(Span::styled(
            document.title_or_default().to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Report ", Style::default().fg(Color::Gray)),
            Span::raw(document.display_id()),
            Span::styled("  Created ", Style::default().fg(Color::Gray)),
            Span::raw(document.created_label()),
            Span::styled("  Outcome ", Style::default().fg(Color::Gray)),
            Span::styled(outcome.to_string(), Style::default().bold()),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(paragraph, area);
}

pub fn render_overall_gauge(f: &mut Frame<'_>, area: Rect, document: &ReportDocument) {
    let band = ScoreBand::for_overall(document.overall_score);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title("Overall Score")
                .borders(Borders::ALL),
        )
        .gauge_style(Style::default().fg(band_color(band)))
        .ratio(gauge_ratio(document.overall_score))
        .label(format!(
            "{} / 100 ({})",
            format_score(document.overall_score),
            band.label()
        ));
    f.render_widget(gauge, area);
}

/// Header above a gauge, the top strip of every report layout.
pub fn render_report_top(f: &mut Frame<'_>, area: Rect, document: &ReportDocument) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(34)])
        .split(area);
    render_header(f, chunks[0], document);
    render_overall_gauge(f, chunks[1], document);
}
