pub mod actions;
pub mod input;
pub mod state;

pub use actions::{AppActions, ExportResult, LoadResult};
pub use input::handle_input;
pub use state::{App, Pane, PendingAction, ReportSource};
