pub mod screens;
pub mod widgets;

use pitch_report_core::ViewerState;
use ratatui::layout::{Constraint, Direction, Layout, Margin};
use ratatui::Frame;

use crate::app::App;
use screens::loading::{render_error, render_idle, render_loading};
use screens::report::{render_report, render_status_bar};
use widgets::popup::{render_help_popup, render_search_popup};

pub fn ui(app: &App, f: &mut Frame<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(f.area().inner(Margin::new(1, 0)));

    match app.session.state() {
        ViewerState::Idle => render_idle(f, chunks[0]),
        ViewerState::Loading { .. } => render_loading(app, f, chunks[0]),
        ViewerState::Failed { message } => render_error(f, chunks[0], message),
        ViewerState::Ready(report) => render_report(app, report, f, chunks[0]),
    }
    render_status_bar(app, f, chunks[1]);

    if let Some(search) = &app.search {
        render_search_popup(f, search);
    }
    if app.show_help {
        render_help_popup(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Pane, ReportSource};
    use crate::config::AppConfig;
    use pitch_report_core::{ReportDocument, ReportError};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use serde_json::json;

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| ui(app, f)).unwrap();
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

    fn app_with(result: Result<ReportDocument, ReportError>) -> App {
        let mut app = App::new(AppConfig::default(), Some(ReportSource::Api("r1".to_string())));
        let (ticket, _) = app.begin_load().unwrap();
        app.finish_load(&ticket, result);
        app
    }

    fn document() -> ReportDocument {
        ReportDocument::from_value(&json!({
            "_id": "r1",
            "title": "Solar Drones",
            "overall_score": 72,
            "detailed_viability_assessment": { "clusters": {
                "Team": { "Skills": { "Depth": { "assignedScore": 91 } } },
                "Execution": { "Plan": { "Milestones": { "assignedScore": 42 } } },
                "Compliance": { "Rules": { "Permits": { "assignedScore": 66 } } }
            }}
        }))
        .unwrap()
    }

    #[test]
    fn loaded_report_shows_title_and_highlights() {
        let text = screen_text(&app_with(Ok(document())));
        assert!(text.contains("Solar Drones"));
        assert!(text.contains("Top Performers"));
        assert!(text.contains("Depth"));
        assert!(text.contains("Milestones"));
    }

    #[test]
    fn failure_replaces_the_report() {
        let text = screen_text(&app_with(Err(ReportError::NotFound)));
        assert!(text.contains("Report not found"));
        assert!(!text.contains("Top Performers"));
    }

    #[test]
    fn outline_pane_lists_clusters() {
        let mut app = app_with(Ok(document()));
        app.pane = Pane::Outline;
        let text = screen_text(&app);
        assert!(text.contains("▸ Team"));
        assert!(text.contains("▸ Execution"));
    }

    #[test]
    fn help_popup_lists_keys() {
        let mut app = app_with(Ok(document()));
        app.show_help = true;
        assert!(screen_text(&app).contains("Expand or collapse all clusters"));
    }
}
