use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use crossterm::event::KeyCode;

/// Keys typed while the finding search popup is open.
pub fn handle_search_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => app.search = None,
        KeyCode::Enter => app.confirm_search(),
        KeyCode::Backspace => app.search_input(|query| {
            query.pop();
        }),
        KeyCode::Up => {
            if let Some(search) = app.search.as_mut() {
                search.selected = wrap_decrement(search.selected, search.hits.len());
            }
        }
        KeyCode::Down => {
            if let Some(search) = app.search.as_mut() {
                search.selected = wrap_increment(search.selected, search.hits.len());
            }
        }
        KeyCode::Char(ch) => app.search_input(|query| query.push(ch)),
        _ => {}
    }
}
