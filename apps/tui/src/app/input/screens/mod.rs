use crate::app::state::App;
use crossterm::event::KeyCode;

mod help;
mod report;
mod search;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if app.search.is_some() {
        search::handle_search_input(app, key);
        return;
    }

    if help::handle_help_toggle(app, key) {
        return;
    }

    report::handle_report_input(app, key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::{Pane, PendingAction, ReportSource};
    use crate::config::AppConfig;
    use pitch_report_core::ReportDocument;
    use serde_json::json;

    fn app() -> App {
        let mut app = App::new(AppConfig::default(), Some(ReportSource::Api("r1".to_string())));
        let (ticket, _) = app.begin_load().unwrap();
        let document = ReportDocument::from_value(&json!({
            "_id": "r1",
            "detailed_viability_assessment": { "clusters": {
                "Team": { "Skills": { "Depth": { "assignedScore": 90 } } }
            }},
            "roadmap": { "current_trl": "TRL-1" }
        }))
        .unwrap();
        app.finish_load(&ticket, Ok(document));
        app
    }

    #[test]
    fn help_swallows_keys_until_closed() {
        let mut app = app();
        dispatch_input(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        dispatch_input(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        dispatch_input(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
        dispatch_input(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn search_popup_captures_typing() {
        let mut app = app();
        dispatch_input(&mut app, KeyCode::Char('/'));
        dispatch_input(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        assert_eq!(app.search.as_ref().unwrap().query, "q");
        dispatch_input(&mut app, KeyCode::Esc);
        assert!(app.search.is_none());
    }

    #[test]
    fn export_and_reload_are_queued() {
        let mut app = app();
        dispatch_input(&mut app, KeyCode::Char('x'));
        assert_eq!(app.pending, Some(PendingAction::Export));
        dispatch_input(&mut app, KeyCode::Char('r'));
        assert_eq!(app.pending, Some(PendingAction::Reload));
    }

    #[test]
    fn roadmap_pane_browses_phases() {
        let mut app = app();
        app.pane = Pane::Roadmap;
        dispatch_input(&mut app, KeyCode::Left);
        assert_eq!(app.roadmap.as_ref().unwrap().viewed_index(), 0);
        dispatch_input(&mut app, KeyCode::Right);
        dispatch_input(&mut app, KeyCode::Right);
        assert_eq!(app.roadmap.as_ref().unwrap().viewed_index(), 2);
    }

    #[test]
    fn performer_enter_highlights_finding() {
        let mut app = app();
        dispatch_input(&mut app, KeyCode::Enter);
        let focused = app.session.navigation().focused().unwrap();
        assert_eq!(focused.sub_parameter, "Depth");
    }
}
