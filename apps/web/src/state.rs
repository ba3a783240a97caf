use std::time::Duration;

use pitch_report_core::navigation::{find_row, FocusTarget, NavigationEvent, OutlineRow};
use pitch_report_core::roadmap::RoadmapView;
use pitch_report_core::share::ReportRoute;
use pitch_report_core::viewer::{ApplyOutcome, LoadTicket, ViewerSession};
use pitch_report_core::{ParameterKey, ReportDocument, ReportError};
use ratzilla::event::KeyCode;

use crate::animation::{advance_pulse, PulseMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Highlights,
    Outline,
    Roadmap,
}

impl Pane {
    pub const ALL: [Self; 3] = [Self::Highlights, Self::Outline, Self::Roadmap];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Highlights => "Highlights",
            Self::Outline => "Detailed Analysis",
            Self::Roadmap => "Roadmap",
        }
    }

    const fn next(self) -> Self {
        match self {
            Self::Highlights => Self::Outline,
            Self::Outline => Self::Roadmap,
            Self::Roadmap => Self::Highlights,
        }
    }
}

/// What Enter does on the selected outline row.
enum Activation {
    Cluster(String),
    Parameter(ParameterKey),
    Finding(FocusTarget),
}

/// Browser work requested by a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Reload,
    CopyShareLink(String),
}

#[derive(Debug)]
pub struct WebState {
    pub session: ViewerSession,
    pub route: ReportRoute,
    pub pane: Pane,
    pub performer_index: usize,
    pub outline_index: usize,
    pub roadmap: Option<RoadmapView>,
    pub status: String,
    pub pulse: f64,
    last_tick: Option<f64>,
    started_ms: Option<f64>,
}

impl WebState {
    pub fn new(route: ReportRoute) -> Self {
        Self {
            session: ViewerSession::default(),
            route,
            pane: Pane::Highlights,
            performer_index: 0,
            outline_index: 0,
            roadmap: None,
            status: String::new(),
            pulse: 0.0,
            last_tick: None,
            started_ms: None,
        }
    }

    pub fn report_id(&self) -> Option<&str> {
        match &self.route {
            ReportRoute::Direct(id) | ReportRoute::Shared(id) => Some(id),
            ReportRoute::InvalidShare | ReportRoute::Missing => None,
        }
    }

    /// Message for URLs that never reach the API.
    pub fn route_error(&self) -> Option<&'static str> {
        match self.route {
            ReportRoute::InvalidShare => Some("This share link is invalid or has expired"),
            ReportRoute::Missing => Some("No report id in the URL"),
            ReportRoute::Direct(_) | ReportRoute::Shared(_) => None,
        }
    }

    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        let id = self.report_id()?.to_string();
        self.performer_index = 0;
        self.outline_index = 0;
        self.roadmap = None;
        self.status = format!("Loading report {id}...");
        Some(self.session.begin_load(id))
    }

    pub fn finish_load(&mut self, ticket: &LoadTicket, result: Result<ReportDocument, ReportError>) {
        if self.session.apply(ticket, result) == ApplyOutcome::Stale {
            return;
        }
        self.roadmap = self
            .session
            .document()
            .and_then(|document| document.roadmap.as_ref())
            .and_then(RoadmapView::new);
        self.status = self
            .session
            .error_message()
            .map_or_else(String::new, ToString::to_string);
    }

    fn elapsed(&mut self, now_ms: f64) -> Duration {
        let started = *self.started_ms.get_or_insert(now_ms);
        Duration::from_secs_f64(((now_ms - started) / 1000.0).max(0.0))
    }

    /// Per-frame update: pulse phase, then navigation timers.
    pub fn tick(&mut self, now_ms: f64) {
        let mode = if self.session.navigation().focused().is_some() {
            PulseMode::Running
        } else {
            PulseMode::Paused
        };
        let (pulse, last_tick) = advance_pulse(self.pulse, self.last_tick, now_ms / 1000.0, mode);
        self.pulse = pulse;
        self.last_tick = last_tick;

        let now = self.elapsed(now_ms);
        for event in self.session.navigation_mut().tick(now) {
            if let NavigationEvent::ScrollTo(target) = event {
                if let Some(index) = self.row_of(&target) {
                    self.outline_index = index;
                    self.pane = Pane::Outline;
                }
            }
        }
    }

    fn row_of(&self, target: &FocusTarget) -> Option<usize> {
        let document = self.session.document()?;
        find_row(&self.session.navigation().outline(document), target)
    }

    pub fn outline_rows(&self) -> Vec<OutlineRow<'_>> {
        self.session
            .document()
            .map_or_else(Vec::new, |document| self.session.navigation().outline(document))
    }

    fn performer_targets(&self) -> Vec<FocusTarget> {
        self.session.summary().map_or_else(Vec::new, |summary| {
            summary
                .performers
                .top
                .iter()
                .chain(summary.performers.bottom.iter())
                .map(|entry| {
                    FocusTarget::new(
                        entry.cluster_name.as_str(),
                        entry.param_name.as_str(),
                        entry.name.as_str(),
                    )
                })
                .collect()
        })
    }

    fn activate(&mut self, now_ms: f64) {
        let now = self.elapsed(now_ms);
        match self.pane {
            Pane::Highlights => {
                if let Some(target) = self.performer_targets().into_iter().nth(self.performer_index) {
                    self.session.navigation_mut().focus_sub_parameter(target, now);
                }
            }
            Pane::Outline => {
                let activation = self.outline_rows().get(self.outline_index).map(|row| match row {
                    OutlineRow::Cluster { cluster, .. } => Activation::Cluster(cluster.name.clone()),
                    OutlineRow::Parameter { key, .. } => Activation::Parameter(key.clone()),
                    OutlineRow::Finding { target, .. } => Activation::Finding(target.clone()),
                });
                let navigation = self.session.navigation_mut();
                match activation {
                    Some(Activation::Cluster(name)) => navigation.toggle_cluster(&name),
                    Some(Activation::Parameter(key)) => navigation.toggle_parameter(&key),
                    Some(Activation::Finding(target)) => navigation.focus_sub_parameter(target, now),
                    None => {}
                }
                let len = self.outline_rows().len();
                self.outline_index = self.outline_index.min(len.saturating_sub(1));
            }
            Pane::Roadmap => {}
        }
    }

    fn move_selection(&mut self, forward: bool) {
        let step = |index: usize, len: usize| {
            if len == 0 {
                0
            } else if forward {
                (index + 1) % len
            } else {
                (index + len - 1) % len
            }
        };
        match self.pane {
            Pane::Highlights => {
                self.performer_index = step(self.performer_index, self.performer_targets().len());
            }
            Pane::Outline => {
                self.outline_index = step(self.outline_index, self.outline_rows().len());
            }
            Pane::Roadmap => {
                if let Some(roadmap) = self.roadmap.as_mut() {
                    if forward {
                        roadmap.next();
                    } else {
                        roadmap.previous();
                    }
                }
            }
        }
    }

    pub fn handle_key(&mut self, code: &KeyCode, now_ms: f64, origin: &str) -> Option<Command> {
        match code {
            KeyCode::Tab => self.pane = self.pane.next(),
            KeyCode::Char('1') => self.pane = Pane::Highlights,
            KeyCode::Char('2') => self.pane = Pane::Outline,
            KeyCode::Char('3') => self.pane = Pane::Roadmap,
            KeyCode::Up | KeyCode::Left => self.move_selection(false),
            KeyCode::Down | KeyCode::Right => self.move_selection(true),
            KeyCode::Enter => self.activate(now_ms),
            KeyCode::Esc => self.session.navigation_mut().clear_focus(),
            KeyCode::Char('e') => {
                let names = self
                    .session
                    .document()
                    .map(ReportDocument::cluster_names)
                    .unwrap_or_default();
                self.session.navigation_mut().toggle_expand_all(names.as_slice());
                let len = self.outline_rows().len();
                self.outline_index = self.outline_index.min(len.saturating_sub(1));
            }
            KeyCode::Char('r') => return Some(Command::Reload),
            KeyCode::Char('c') => {
                let id = self.session.document()?.id.clone();
                return Some(Command::CopyShareLink(
                    pitch_report_core::share::shareable_url(origin, &id),
                ));
            }
            _ => {}
        }
        None
    }
}
