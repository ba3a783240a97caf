use pitch_report_core::aggregate::TopBottomEntry;
use pitch_report_core::model::NO_DATA;
use pitch_report_core::{FocusTarget, Performers, ReportDocument};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use super::score::badge_span;

/// How many bottom performers feed the next steps list.
pub const NEXT_STEP_COUNT: usize = 3;

pub fn entry_target(entry: &TopBottomEntry) -> FocusTarget {
    FocusTarget::new(
        entry.cluster_name.as_str(),
        entry.param_name.as_str(),
        entry.name.as_str(),
    )
}

fn entry_item(entry: &TopBottomEntry, focused: Option<&FocusTarget>) -> ListItem<'static> {
    let mut name_style = Style::default();
    if focused == Some(&entry_target(entry)) {
        name_style = name_style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
    }
    ListItem::new(vec![
        Line::from(vec![
            badge_span(entry.score),
            Span::raw(" "),
            Span::styled(entry.name.clone(), name_style),
        ]),
        Line::from(Span::styled(
            format!("      {} / {}", entry.cluster_name, entry.param_name),
            Style::default().fg(Color::DarkGray),
        )),
    ])
}

/// Top and bottom lists side by side. `selected` indexes top entries first, then bottom ones.
pub fn render_performers(
    f: &mut Frame<'_>,
    area: Rect,
    performers: &Performers,
    selected: Option<usize>,
    focused: Option<&FocusTarget>,
    active: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let top_count = performers.top.len();
    let top_selected = selected.filter(|index| *index < top_count);
    let bottom_selected = selected
        .filter(|index| *index >= top_count)
        .map(|index| index - top_count);

    render_entry_list(
        f,
        chunks[0],
        "Top Performers",
        "No top performers",
        Color::Green,
        &performers.top,
        top_selected,
        focused,
        active,
    );
    render_entry_list(
        f,
        chunks[1],
        "Needs Attention",
        "No low scores",
        Color::Red,
        &performers.bottom,
        bottom_selected,
        focused,
        active,
    );
}

fn render_entry_list(
    f: &mut Frame<'_>,
    area: Rect,
    title: &str,
    empty: &str,
    accent: Color,
    entries: &[TopBottomEntry],
    selected: Option<usize>,
    focused: Option<&FocusTarget>,
    active: bool,
) {
    let border = if active { accent } else { Color::DarkGray };
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    if entries.is_empty() {
        let paragraph = Paragraph::new(empty.to_string())
            .style(Style::default().fg(Color::Gray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem<'_>> = entries
        .iter()
        .map(|entry| entry_item(entry, focused))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if active {
        state.select(selected);
    }
    f.render_stateful_widget(list, area, &mut state);
}

/// Improvement notes for the weakest findings, numbered.
pub fn next_step_lines(document: &ReportDocument, performers: &Performers) -> Vec<Line<'static>> {
    performers
        .bottom
        .iter()
        .take(NEXT_STEP_COUNT)
        .enumerate()
        .flat_map(|(i, entry)| {
            let advice = document
                .cluster(&entry.cluster_name)
                .and_then(|cluster| cluster.parameter(&entry.param_name))
                .and_then(|parameter| parameter.finding(&entry.name))
                .map(|finding| finding.what_can_be_improved.trim().to_string())
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| NO_DATA.to_string());
            [
                Line::from(Span::styled(
                    format!("{}. {}", i + 1, entry.name),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(format!("   {advice}")),
            ]
        })
        .collect()
}

pub fn render_next_steps(
    f: &mut Frame<'_>,
    area: Rect,
    document: &ReportDocument,
    performers: &Performers,
) {
    let mut lines = next_step_lines(document, performers);
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nothing scored below the attention threshold",
            Style::default().fg(Color::Gray),
        )));
    }
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().title("Next Steps").borders(Borders::ALL));
    f.render_widget(paragraph, area);
}
