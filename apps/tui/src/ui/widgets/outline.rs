use pitch_report_core::model::SubParameterFinding;
use pitch_report_core::navigation::OutlineRow;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use super::score::badge_span;

/// One line per visible row, indented by depth. `pulse` in `[0, 1]` drives the focus highlight.
pub fn outline_line(row: &OutlineRow<'_>, pulse: f64) -> Line<'static> {
    let indent = "  ".repeat(row.depth());
    match row {
        OutlineRow::Cluster {
            cluster,
            expanded,
            score,
        } => {
            let marker = if *expanded { "▾" } else { "▸" };
            Line::from(vec![
                Span::styled(
                    format!("{indent}{marker} {}", cluster.name),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                badge_span(f64::from(*score)),
            ])
        }
        OutlineRow::Parameter {
            parameter,
            expanded,
            badge,
            ..
        } => {
            let marker = if *expanded { "▾" } else { "▸" };
            Line::from(vec![
                Span::raw(format!("{indent}{marker} {} ", parameter.name)),
                badge_span(f64::from(*badge)),
            ])
        }
        OutlineRow::Finding {
            finding, focused, ..
        } => {
            let style = if *focused {
                let color = if pulse >= 0.5 {
                    Color::Yellow
                } else {
                    Color::LightYellow
                };
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let marker = if *focused { "★" } else { "•" };
            Line::from(vec![
                Span::styled(format!("{indent}{marker} {} ", finding.name), style),
                badge_span(finding.assigned_score),
            ])
        }
    }
}

pub fn render_outline(
    f: &mut Frame<'_>,
    area: Rect,
    rows: &[OutlineRow<'_>],
    selected: Option<usize>,
    pulse: f64,
    active: bool,
) {
    let border = if active { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .title("Detailed Analysis (Enter: open, e: expand all)")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    if rows.is_empty() {
        let paragraph = Paragraph::new("No detailed analysis available")
            .style(Style::default().fg(Color::Gray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem<'_>> = rows
        .iter()
        .map(|row| ListItem::new(outline_line(row, pulse)))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    state.select(selected);
    f.render_stateful_widget(list, area, &mut state);
}

pub fn finding_lines(finding: &SubParameterFinding) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled(
                finding.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            badge_span(finding.assigned_score),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "What went well",
            Style::default().fg(Color::Green),
        )),
        Line::from(finding.what_went_well.clone()),
        Line::from(""),
        Line::from(Span::styled(
            "What can be improved",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(finding.what_can_be_improved.clone()),
    ]
}

pub fn render_finding_detail(f: &mut Frame<'_>, area: Rect, finding: Option<&SubParameterFinding>) {
    let lines = finding.map_or_else(
        || {
            vec![Line::from(Span::styled(
                "Select a finding to read its assessment",
                Style::default().fg(Color::Gray),
            ))]
        },
        finding_lines,
    );
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Finding").borders(Borders::ALL));
    f.render_widget(paragraph, area);
}
