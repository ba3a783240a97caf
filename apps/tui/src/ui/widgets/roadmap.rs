use pitch_report_core::roadmap::{RoadmapView, ROADMAP_PHASES};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::Frame;

/// Phase track: finished phases dimmed, the current one bold, the viewed one bracketed.
pub fn phase_track(view: &RoadmapView) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, phase) in ROADMAP_PHASES.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" ─ ", Style::default().fg(Color::DarkGray)));
        }
        let short = phase.name.split(": ").nth(1).unwrap_or(phase.name);
        let text = if i == view.viewed_index() {
            format!("[{short}]")
        } else {
            short.to_string()
        };
        let style = match i.cmp(&view.current_index()) {
            std::cmp::Ordering::Less => Style::default().fg(Color::Green),
            std::cmp::Ordering::Equal => Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            std::cmp::Ordering::Greater => Style::default().fg(Color::Gray),
        };
        spans.push(Span::styled(text, style));
    }
    Line::from(spans)
}

pub fn activity_lines(view: &RoadmapView) -> Vec<Line<'static>> {
    let phase = view.viewed_phase();
    let mut lines = vec![Line::from(vec![
        Span::styled(phase.name, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  ({}, {})", phase.trls.join(" / "), phase.timeline),
            Style::default().fg(Color::Gray),
        ),
    ])];
    lines.extend(view.activities().into_iter().map(|activity| {
        Line::from(vec![
            Span::raw(format!("• {}", activity.text)),
            Span::styled(
                format!("  {}", activity.timeline),
                Style::default().fg(Color::DarkGray),
            ),
        ])
    }));
    lines
}

pub fn render_roadmap(f: &mut Frame<'_>, area: Rect, view: Option<&RoadmapView>, active: bool) {
    let border = if active { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .title("Roadmap (←/→: browse phases)")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let Some(view) = view else {
        let paragraph = Paragraph::new("No roadmap available for this report")
            .style(Style::default().fg(Color::Gray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    f.render_widget(Paragraph::new(phase_track(view)), chunks[0]);
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio(view.progress().clamp(0.0, 1.0))
            .label(""),
        chunks[1],
    );
    f.render_widget(
        Paragraph::new(activity_lines(view)).wrap(Wrap { trim: true }),
        chunks[2],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitch_report_core::model::{KeyActivity, RoadmapData};

    fn view() -> RoadmapView {
        RoadmapView::new(&RoadmapData {
            current_trl: "trl-4".to_string(),
            key_activities: vec![KeyActivity {
                text: "Pilot with two farms".to_string(),
                timeline: "6 Weeks".to_string(),
            }],
        })
        .unwrap()
    }

    #[test]
    fn track_brackets_the_viewed_phase() {
        let mut view = view();
        assert!(phase_track(&view).to_string().contains("[Prototyping]"));
        view.next();
        assert!(phase_track(&view).to_string().contains("Prototyping ─ [Validation"));
    }

    #[test]
    fn current_phase_lists_report_activities() {
        let mut view = view();
        let lines: Vec<String> = activity_lines(&view).iter().map(ToString::to_string).collect();
        assert_eq!(lines[1], "• Pilot with two farms  6 Weeks");

        view.previous();
        let lines: Vec<String> = activity_lines(&view).iter().map(ToString::to_string).collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Phase 1: Ideation"));
    }
}
