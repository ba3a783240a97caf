use crossterm::event::KeyCode;

use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::{App, Pane, PendingAction};

pub fn handle_report_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Esc => {
            app.session.navigation_mut().clear_focus();
            app.status_message.clear();
        }
        KeyCode::Tab => app.next_pane(),
        KeyCode::BackTab => app.previous_pane(),
        KeyCode::Char('r') => app.pending = Some(PendingAction::Reload),
        KeyCode::Char('x') if app.session.document().is_some() => {
            app.pending = Some(PendingAction::Export);
        }
        KeyCode::Char('c') => {
            app.share_link();
        }
        KeyCode::Char('e') => app.toggle_expand_all(),
        KeyCode::Char('/') if app.session.document().is_some() => app.open_search(),
        _ => handle_pane_input(app, key),
    }
}

fn handle_pane_input(app: &mut App, key: KeyCode) {
    match app.pane {
        Pane::Performers => {
            let len = app.performer_entries().len();
            match key {
                KeyCode::Up => app.performer_index = wrap_decrement(app.performer_index, len),
                KeyCode::Down => app.performer_index = wrap_increment(app.performer_index, len),
                KeyCode::Enter => app.focus_selected_performer(),
                _ => {}
            }
        }
        Pane::Outline => {
            let len = app.outline_rows().len();
            match key {
                KeyCode::Up => app.outline_index = wrap_decrement(app.outline_index, len),
                KeyCode::Down => app.outline_index = wrap_increment(app.outline_index, len),
                KeyCode::Enter | KeyCode::Char(' ') => app.activate_outline_row(),
                _ => {}
            }
        }
        Pane::Roadmap => {
            if let Some(roadmap) = app.roadmap.as_mut() {
                match key {
                    KeyCode::Left | KeyCode::Up => roadmap.previous(),
                    KeyCode::Right | KeyCode::Down => roadmap.next(),
                    _ => {}
                }
            }
        }
    }
}
