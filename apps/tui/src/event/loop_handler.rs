use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::convert::TryFrom;
use std::fmt;
use std::io::Stdout;
use std::path::PathBuf;

use crate::app::{handle_input, App, AppActions, ExportResult, PendingAction};
use crate::ui;

// States of an export run
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ExportState {
    Idle,
    Exporting,
    Success,
    Error,
}

impl fmt::Display for ExportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Exporting => write!(f, "Exporting"),
            Self::Success => write!(f, "Success"),
            Self::Error => write!(f, "Error"),
        }
    }
}

#[derive(Clone, Debug)]
pub enum ExportEvent {
    Start,
    Success(PathBuf),
    Error(String),
    Reset,
}

impl fmt::Display for ExportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "Start"),
            Self::Success(path) => write!(f, "Success({path})", path = path.display()),
            Self::Error(msg) => write!(f, "Error({msg})"),
            Self::Reset => write!(f, "Reset"),
        }
    }
}

#[derive(Debug)]
pub struct StateTransitionError {
    from: ExportState,
    event: ExportEvent,
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} with event {}",
            self.from, self.event
        )
    }
}

impl std::error::Error for StateTransitionError {}

/// Export progress. Only one export runs at a time; a second `x` while busy is ignored.
pub struct ExportMachine {
    state: ExportState,
}

impl ExportMachine {
    pub const fn new(initial_state: ExportState) -> Self {
        Self {
            state: initial_state,
        }
    }

    pub const fn state(&self) -> ExportState {
        self.state
    }

    pub fn process_event(
        &mut self,
        event: &ExportEvent,
        app: &mut App,
    ) -> std::result::Result<(), StateTransitionError> {
        let next_state = NextState::try_from((self.state, event, app))?;
        self.state = next_state.0;
        Ok(())
    }
}

struct NextState(ExportState);

impl NextState {
    const fn new(state: ExportState) -> Self {
        Self(state)
    }
}

impl ExportState {
    const fn next_state(self) -> NextState {
        NextState::new(self)
    }
}

impl TryFrom<(ExportState, &ExportEvent, &mut App)> for NextState {
    type Error = StateTransitionError;

    fn try_from(
        value: (ExportState, &ExportEvent, &mut App),
    ) -> std::result::Result<Self, Self::Error> {
        let (current_state, event, app) = value;

        match (current_state, event) {
            (ExportState::Idle, ExportEvent::Start) => {
                app.exporting = true;
                app.status_message = "Exporting report...".to_string();
                Ok(ExportState::Exporting.next_state())
            }
            (ExportState::Exporting, ExportEvent::Success(path)) => {
                app.exporting = false;
                app.status_message = format!("Report exported to {}", path.display());
                Ok(ExportState::Success.next_state())
            }
            (ExportState::Exporting, ExportEvent::Error(error)) => {
                app.exporting = false;
                app.status_message = format!("Error: export failed: {error}");
                Ok(ExportState::Error.next_state())
            }
            (ExportState::Success | ExportState::Error, ExportEvent::Reset) => {
                Ok(ExportState::Idle.next_state())
            }
            _ => Err(StateTransitionError {
                from: current_state,
                event: event.clone(),
            }),
        }
    }
}

/// Starts a fetch for the app's source, if it has one.
pub fn start_load(app: &mut App, actions: &AppActions) {
    if let Some((ticket, source)) = app.begin_load() {
        tracing::info!(source = %source.label(), generation = ticket.generation(), "loading report");
        actions.spawn_load(ticket, source);
    }
}

/// Moves the machine to `Exporting` and hands the render to the blocking pool.
///
/// Returns false when nothing was started: no report, or an export already running.
pub fn start_export(
    app: &mut App,
    actions: &AppActions,
    machine: &mut ExportMachine,
    width: u16,
) -> bool {
    if machine.state() != ExportState::Idle {
        tracing::debug!(state = %machine.state(), "export already running");
        return false;
    }
    let Some(report) = app.session.report().cloned() else {
        return false;
    };

    if let Err(e) = machine.process_event(&ExportEvent::Start, app) {
        tracing::warn!(error = %e, "export state machine rejected start");
        return false;
    }
    actions.spawn_export(report.document, report.summary, width);
    true
}

/// Applies a finished export and returns the machine to `Idle`.
pub fn finish_export(app: &mut App, machine: &mut ExportMachine, result: ExportResult) {
    let event = match result {
        Ok(path) => ExportEvent::Success(path),
        Err(e) => ExportEvent::Error(e),
    };
    if let Err(e) = machine.process_event(&event, app) {
        tracing::warn!(error = %e, "export state machine rejected result");
    }
    if let Err(e) = machine.process_event(&ExportEvent::Reset, app) {
        tracing::warn!(error = %e, "export state machine rejected reset");
    }
}

/// Run the main application event loop
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    actions: &mut AppActions,
) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let mut export_machine = ExportMachine::new(ExportState::Idle);
    start_load(app, actions);

    loop {
        while let Some((ticket, result)) = actions.try_next_result() {
            app.finish_load(&ticket, result);
        }
        while let Some(result) = actions.try_next_export() {
            finish_export(app, &mut export_machine, result);
        }

        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    handle_input(app, key.code);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        tracing::debug!("redraw after resize failed");
                    }
                }
                Ok(_) | Err(_) => {}
            }
        }

        match app.pending.take() {
            Some(PendingAction::Reload) => start_load(app, actions),
            Some(PendingAction::Export) => {
                let width = terminal.size().map_or(80, |size| size.width);
                if start_export(app, actions, &mut export_machine, width)
                    && terminal.draw(|f| ui::ui(app, f)).is_err()
                {
                    tracing::debug!("redraw after export start failed");
                }
            }
            None => {}
        }

        // Keep the event loop responsive to the fetch and export tasks
        tokio::task::yield_now().await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use pitch_report_core::ReportDocument;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn export_machine_walks_the_happy_path() {
        let mut app = App::new(AppConfig::default(), None);
        let mut machine = ExportMachine::new(ExportState::Idle);

        machine.process_event(&ExportEvent::Start, &mut app).unwrap();
        assert_eq!(machine.state(), ExportState::Exporting);
        assert!(app.exporting);

        machine
            .process_event(&ExportEvent::Success(PathBuf::from("out/r1-report.txt")), &mut app)
            .unwrap();
        assert_eq!(machine.state(), ExportState::Success);
        assert_eq!(app.status_message, "Report exported to out/r1-report.txt");

        machine.process_event(&ExportEvent::Reset, &mut app).unwrap();
        assert_eq!(machine.state(), ExportState::Idle);
    }

    #[test]
    fn export_machine_rejects_out_of_order_events() {
        let mut app = App::new(AppConfig::default(), None);
        let mut machine = ExportMachine::new(ExportState::Idle);
        let error = machine
            .process_event(&ExportEvent::Reset, &mut app)
            .unwrap_err();
        assert_eq!(error.to_string(), "Invalid transition from Idle with event Reset");
    }

    #[test]
    fn failed_export_is_reported() {
        let mut app = App::new(AppConfig::default(), None);
        let mut machine = ExportMachine::new(ExportState::Idle);
        machine.process_event(&ExportEvent::Start, &mut app).unwrap();
        machine
            .process_event(&ExportEvent::Error("disk full".to_string()), &mut app)
            .unwrap();
        assert_eq!(machine.state(), ExportState::Error);
        assert!(!app.exporting);
        assert_eq!(app.status_message, "Error: export failed: disk full");
    }

    fn loaded_app(export_dir: &std::path::Path) -> (App, AppActions) {
        let config = AppConfig {
            export_dir: export_dir.to_path_buf(),
            ..AppConfig::default()
        };
        let actions = AppActions::new(&config).unwrap();
        let mut app = App::new(config, None);
        let document = ReportDocument::from_value(&json!({
            "_id": "r1",
            "title": "Solar Drones",
            "detailed_viability_assessment": { "clusters": {
                "Team": { "Skills": { "Depth": { "assignedScore": 92 } } }
            }}
        }))
        .unwrap();
        app.session.load_document(document);
        (app, actions)
    }

    #[tokio::test]
    async fn export_stays_in_progress_until_its_result_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, mut actions) = loaded_app(dir.path());
        let mut machine = ExportMachine::new(ExportState::Idle);

        assert!(start_export(&mut app, &actions, &mut machine, 100));
        assert_eq!(machine.state(), ExportState::Exporting);
        assert!(app.exporting);
        assert_eq!(app.status_message, "Exporting report...");

        // A second request while busy is ignored.
        assert!(!start_export(&mut app, &actions, &mut machine, 100));

        let result = tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                if let Some(result) = actions.try_next_export() {
                    break result;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
        assert_eq!(machine.state(), ExportState::Exporting);

        finish_export(&mut app, &mut machine, result);
        assert_eq!(machine.state(), ExportState::Idle);
        assert!(!app.exporting);
        assert!(app.status_message.starts_with("Report exported to "));
        assert!(dir.path().join("r1-report.txt").exists());
    }

    #[test]
    fn export_without_a_report_does_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            export_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        let actions = AppActions::new(&config).unwrap();
        let mut app = App::new(config, None);
        let mut machine = ExportMachine::new(ExportState::Idle);
        assert!(!start_export(&mut app, &actions, &mut machine, 100));
        assert_eq!(machine.state(), ExportState::Idle);
        assert!(!app.exporting);
    }
}
