use std::path::PathBuf;
use std::time::{Duration, Instant};

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use pitch_report_core::aggregate::TopBottomEntry;
use pitch_report_core::model::SubParameterFinding;
use pitch_report_core::navigation::{find_row, FocusTarget, NavigationEvent, OutlineRow};
use pitch_report_core::roadmap::RoadmapView;
use pitch_report_core::share::shareable_url;
use pitch_report_core::viewer::{LoadTicket, ViewerSession};
use pitch_report_core::{ReportDocument, ReportError};
use throbber_widgets_tui::ThrobberState;

use crate::config::AppConfig;

/// Where the report shown by the viewer comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSource {
    Api(String),
    File(PathBuf),
}

impl ReportSource {
    /// A path to an existing `.json` file is read from disk, anything else is a report id.
    pub fn parse(raw: &str) -> Self {
        let path = PathBuf::from(raw);
        let is_json = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
        if is_json || path.is_file() {
            Self::File(path)
        } else {
            Self::Api(raw.trim().to_string())
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Api(id) => id.clone(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Performers,
    Outline,
    Roadmap,
}

impl Pane {
    pub const ALL: [Self; 3] = [Self::Performers, Self::Outline, Self::Roadmap];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Performers => "Highlights",
            Self::Outline => "Detailed Analysis",
            Self::Roadmap => "Roadmap",
        }
    }
}

/// Work the event loop picks up after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Reload,
    Export,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub target: FocusTarget,
    pub label: String,
    pub score: i64,
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: String,
    pub hits: Vec<SearchHit>,
    pub selected: usize,
}

impl SearchState {
    pub fn refresh(&mut self, document: Option<&ReportDocument>) {
        self.hits = document.map_or_else(Vec::new, |doc| search_findings(doc, &self.query));
        self.selected = self.selected.min(self.hits.len().saturating_sub(1));
    }

    pub fn selected_hit(&self) -> Option<&SearchHit> {
        self.hits.get(self.selected)
    }
}

/// Fuzzy matches `query` against "cluster / parameter / finding" labels, best first.
pub fn search_findings(document: &ReportDocument, query: &str) -> Vec<SearchHit> {
    let matcher = SkimMatcherV2::default();
    let query = query.trim();
    let mut hits: Vec<SearchHit> = document
        .findings()
        .filter_map(|entry| {
            let label = format!(
                "{} / {} / {}",
                entry.cluster.name, entry.parameter.name, entry.finding.name
            );
            let score = if query.is_empty() {
                0
            } else {
                matcher.fuzzy_match(&label, query)?
            };
            Some(SearchHit {
                target: FocusTarget::new(
                    entry.cluster.name.as_str(),
                    entry.parameter.name.as_str(),
                    entry.finding.name.as_str(),
                ),
                label,
                score,
            })
        })
        .collect();
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub config: AppConfig,
    pub source: Option<ReportSource>,
    pub session: ViewerSession,
    pub pane: Pane,
    pub performer_index: usize,
    pub outline_index: usize,
    pub roadmap: Option<RoadmapView>,
    pub search: Option<SearchState>,
    pub show_help: bool,
    pub status_message: String,
    pub pending: Option<PendingAction>,
    pub exporting: bool,
    pub animation_counter: f64,
    pub throbber: ThrobberState,
    pub started: Instant,
    pub last_frame: Instant,
}

impl App {
    pub fn new(config: AppConfig, source: Option<ReportSource>) -> Self {
        let now = Instant::now();
        Self {
            running: true,
            session: ViewerSession::new(Default::default(), config.timings),
            config,
            source,
            pane: Pane::Performers,
            performer_index: 0,
            outline_index: 0,
            roadmap: None,
            search: None,
            show_help: false,
            status_message: String::new(),
            pending: None,
            exporting: false,
            animation_counter: 0.0,
            throbber: ThrobberState::default(),
            started: now,
            last_frame: now,
        }
    }

    /// Time since the view started; the navigation controller runs on this clock.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Advances animations and the highlight timers.
    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        // Cycles between 0 and 2*PI
        self.animation_counter += delta.as_secs_f64() * 2.0;
        if self.animation_counter > 2.0 * std::f64::consts::PI {
            self.animation_counter -= 2.0 * std::f64::consts::PI;
        }

        if self.session.is_loading() || self.exporting {
            self.throbber.calc_next();
        }

        let elapsed = now.duration_since(self.started);
        let events = self.session.navigation_mut().tick(elapsed);
        for event in events {
            self.handle_navigation_event(&event);
        }
    }

    fn handle_navigation_event(&mut self, event: &NavigationEvent) {
        match event {
            NavigationEvent::ScrollTo(target) => {
                if let Some(index) = self.outline_row_of(target) {
                    self.outline_index = index;
                    self.pane = Pane::Outline;
                } else {
                    tracing::debug!(finding = %target.sub_parameter, "focused finding is not visible");
                }
            }
            NavigationEvent::FocusCleared(target) => {
                tracing::debug!(finding = %target.sub_parameter, "highlight cleared");
            }
        }
    }

    fn outline_row_of(&self, target: &FocusTarget) -> Option<usize> {
        let document = self.session.document()?;
        find_row(&self.session.navigation().outline(document), target)
    }

    pub fn outline_rows(&self) -> Vec<OutlineRow<'_>> {
        self.session
            .document()
            .map_or_else(Vec::new, |document| self.session.navigation().outline(document))
    }

    /// Top performers followed by bottom performers, the order the highlights pane lists them.
    pub fn performer_entries(&self) -> Vec<&TopBottomEntry> {
        self.session.summary().map_or_else(Vec::new, |summary| {
            summary
                .performers
                .top
                .iter()
                .chain(summary.performers.bottom.iter())
                .collect()
        })
    }

    pub fn lookup_finding(&self, target: &FocusTarget) -> Option<&SubParameterFinding> {
        self.session
            .document()?
            .cluster(&target.cluster)?
            .parameter(&target.parameter)?
            .finding(&target.sub_parameter)
    }

    pub fn focus(&mut self, target: FocusTarget) {
        let now = self.elapsed();
        tracing::debug!(
            cluster = %target.cluster,
            parameter = %target.parameter,
            finding = %target.sub_parameter,
            "focusing finding"
        );
        self.session.navigation_mut().focus_sub_parameter(target, now);
    }

    pub fn focus_selected_performer(&mut self) {
        let target = self.performer_entries().get(self.performer_index).map(|entry| {
            FocusTarget::new(
                entry.cluster_name.as_str(),
                entry.param_name.as_str(),
                entry.name.as_str(),
            )
        });
        if let Some(target) = target {
            self.focus(target);
        }
    }

    /// Enter on an outline row: open or close clusters and parameters, re-highlight findings.
    pub fn activate_outline_row(&mut self) {
        enum Activation {
            Cluster(String),
            Parameter(pitch_report_core::ParameterKey),
            Finding(FocusTarget),
        }

        let activation = self.outline_rows().get(self.outline_index).map(|row| match row {
            OutlineRow::Cluster { cluster, .. } => Activation::Cluster(cluster.name.clone()),
            OutlineRow::Parameter { key, .. } => Activation::Parameter(key.clone()),
            OutlineRow::Finding { target, .. } => Activation::Finding(target.clone()),
        });

        match activation {
            Some(Activation::Cluster(name)) => self.session.navigation_mut().toggle_cluster(&name),
            Some(Activation::Parameter(key)) => self.session.navigation_mut().toggle_parameter(&key),
            Some(Activation::Finding(target)) => self.focus(target),
            None => {}
        }
        self.clamp_outline_index();
    }

    pub fn toggle_expand_all(&mut self) {
        let names = self
            .session
            .document()
            .map(ReportDocument::cluster_names)
            .unwrap_or_default();
        let navigation = self.session.navigation_mut();
        navigation.toggle_expand_all(names.as_slice());
        self.status_message = if navigation.all_expanded(names.as_slice()) {
            "Expanded all clusters".to_string()
        } else {
            "Collapsed all clusters".to_string()
        };
        self.clamp_outline_index();
    }

    pub fn clamp_outline_index(&mut self) {
        let rows = self.outline_rows().len();
        self.outline_index = self.outline_index.min(rows.saturating_sub(1));
    }

    pub fn open_search(&mut self) {
        let mut search = SearchState::default();
        search.refresh(self.session.document());
        self.search = Some(search);
    }

    pub fn search_input(&mut self, edit: impl FnOnce(&mut String)) {
        let document = self.session.document();
        if let Some(search) = self.search.as_mut() {
            edit(&mut search.query);
            search.selected = 0;
            search.refresh(document);
        }
    }

    pub fn confirm_search(&mut self) {
        let target = self
            .search
            .take()
            .and_then(|search| search.selected_hit().map(|hit| hit.target.clone()));
        if let Some(target) = target {
            self.focus(target);
        }
    }

    pub fn share_link(&mut self) -> Option<String> {
        let id = self.session.document().map(|document| document.id.clone())?;
        if id.is_empty() {
            self.status_message = "This report has no id to share".to_string();
            return None;
        }
        let url = shareable_url(&self.config.app_url, &id);
        tracing::info!(%url, "share link generated");
        self.status_message = format!("Share link: {url}");
        Some(url)
    }

    /// Starts a load for the current source. The caller performs the fetch.
    pub fn begin_load(&mut self) -> Option<(LoadTicket, ReportSource)> {
        let source = self.source.clone()?;
        let ticket = self.session.begin_load(source.label());
        self.performer_index = 0;
        self.outline_index = 0;
        self.roadmap = None;
        self.search = None;
        self.status_message = format!("Loading {}...", source.label());
        Some((ticket, source))
    }

    pub fn finish_load(&mut self, ticket: &LoadTicket, result: Result<ReportDocument, ReportError>) {
        use pitch_report_core::viewer::ApplyOutcome;

        if self.session.apply(ticket, result) == ApplyOutcome::Stale {
            return;
        }
        self.roadmap = self
            .session
            .document()
            .and_then(|document| document.roadmap.as_ref())
            .and_then(RoadmapView::new);
        self.status_message = self.session.error_message().map_or_else(
            || "Report loaded".to_string(),
            |message| format!("Error: {message}"),
        );
    }

    pub fn next_pane(&mut self) {
        let index = Pane::ALL.iter().position(|pane| *pane == self.pane).unwrap_or(0);
        self.pane = Pane::ALL[(index + 1) % Pane::ALL.len()];
    }

    pub fn previous_pane(&mut self) {
        let index = Pane::ALL.iter().position(|pane| *pane == self.pane).unwrap_or(0);
        self.pane = Pane::ALL[(index + Pane::ALL.len() - 1) % Pane::ALL.len()];
    }
}
