use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::Throbber;

use crate::app::App;

fn middle_band(area: Rect, height: u16) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    chunks[1]
}

pub fn render_loading(app: &App, f: &mut Frame<'_>, area: Rect) {
    let label = app
        .source
        .as_ref()
        .map_or_else(|| "Loading report...".to_string(), |source| {
            format!("Loading report {}...", source.label())
        });
    let throbber = Throbber::default()
        .label(label)
        .style(Style::default().fg(Color::Cyan))
        .throbber_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let band = middle_band(area, 1);
    let mut state = app.throbber.clone();
    f.render_stateful_widget(throbber, band, &mut state);
}

/// Full-page error panel; the previous report is never shown behind it.
pub fn render_error(f: &mut Frame<'_>, area: Rect, message: &str) {
    let lines = vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press r to retry or q to quit",
            Style::default().fg(Color::Gray),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Error")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    f.render_widget(paragraph, middle_band(area, 5));
}

pub fn render_idle(f: &mut Frame<'_>, area: Rect) {
    let paragraph = Paragraph::new(vec![
        Line::from("No report selected."),
        Line::from(""),
        Line::from(Span::styled(
            "Run `pitch-report <REPORT_ID>` or `pitch-report list <USER_ID>`",
            Style::default().fg(Color::Gray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, middle_band(area, 5));
}
