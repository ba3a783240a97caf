use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::Buffer;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Widget, Wrap};
use ratatui::Frame;

use crate::app::state::SearchState;
use crate::cli::CliArgs;

pub const KEY_HELP: &[(&str, &str)] = &[
    ("Tab / Shift+Tab", "Switch pane"),
    ("Up / Down", "Move selection"),
    ("Left / Right", "Browse roadmap phases"),
    ("Enter", "Open row or jump to finding"),
    ("e", "Expand or collapse all clusters"),
    ("/", "Search findings"),
    ("c", "Copy share link to the status bar"),
    ("x", "Export report"),
    ("r", "Reload"),
    ("Esc", "Clear highlight / close popup"),
    ("? / F1", "Toggle help"),
    ("q", "Quit"),
];

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);

    horizontal_layout[1]
}

pub struct ClearWidget;

impl Widget for ClearWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        ratatui::widgets::Clear.render(area, buf);
    }
}

pub fn render_help_popup(f: &mut Frame<'_>) {
    let area = centered_rect(70, 80, f.area());
    f.render_widget(ClearWidget, area);

    let mut lines: Vec<Line<'_>> = KEY_HELP
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(
                    format!("{key:<18}"),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw(*action),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.extend(CliArgs::help_text().lines().map(|line| Line::from(line.to_string())));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Help (Esc to close)")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(paragraph, area);
}

pub fn render_search_popup(f: &mut Frame<'_>, search: &SearchState) {
    let area = centered_rect(60, 60, f.area());
    f.render_widget(ClearWidget, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let input = Paragraph::new(format!("{}_", search.query)).block(
        Block::default()
            .title("Search findings")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(input, chunks[0]);

    let items: Vec<ListItem<'_>> = if search.hits.is_empty() {
        vec![ListItem::new(Span::styled(
            "No matching findings",
            Style::default().fg(Color::Gray),
        ))]
    } else {
        search
            .hits
            .iter()
            .map(|hit| ListItem::new(hit.label.as_str()))
            .collect()
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    if !search.hits.is_empty() {
        state.select(Some(search.selected));
    }
    f.render_stateful_widget(list, chunks[1], &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_sits_in_the_middle() {
        let area = centered_rect(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!(area, Rect::new(25, 10, 50, 20));
    }
}
