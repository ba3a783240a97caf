//! Fetch lifecycle for the report view.
//!
//! Every load is tagged with a [`LoadTicket`]. Responses that arrive for a
//! ticket other than the current one are dropped, so switching reports while
//! a request is in flight can never show the older document.

use tracing::debug;

use crate::aggregate::{summarize, ReportSummary, Thresholds};
use crate::error::ReportError;
use crate::model::ReportDocument;
use crate::navigation::{NavigationController, NavigationTimings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    report_id: String,
}

impl LoadTicket {
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub fn report_id(&self) -> &str {
        &self.report_id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedReport {
    pub document: ReportDocument,
    pub summary: ReportSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerState {
    Idle,
    Loading { ticket: LoadTicket },
    Ready(Box<LoadedReport>),
    Failed { message: String },
}

/// Whether `apply` changed the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    Stale,
}

#[derive(Debug, Clone)]
pub struct ViewerSession {
    generation: u64,
    state: ViewerState,
    navigation: NavigationController,
    thresholds: Thresholds,
}

impl Default for ViewerSession {
    fn default() -> Self {
        Self::new(Thresholds::default(), NavigationTimings::default())
    }
}

impl ViewerSession {
    pub const fn new(thresholds: Thresholds, timings: NavigationTimings) -> Self {
        Self {
            generation: 0,
            state: ViewerState::Idle,
            navigation: NavigationController::new(timings),
            thresholds,
        }
    }

    pub const fn state(&self) -> &ViewerState {
        &self.state
    }

    pub const fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self.state, ViewerState::Loading { .. })
    }

    pub fn report(&self) -> Option<&LoadedReport> {
        match &self.state {
            ViewerState::Ready(report) => Some(report.as_ref()),
            _ => None,
        }
    }

    pub fn document(&self) -> Option<&ReportDocument> {
        self.report().map(|report| &report.document)
    }

    pub fn summary(&self) -> Option<&ReportSummary> {
        self.report().map(|report| &report.summary)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            ViewerState::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub const fn navigation(&self) -> &NavigationController {
        &self.navigation
    }

    pub fn navigation_mut(&mut self) -> &mut NavigationController {
        &mut self.navigation
    }

    /// Report and controller together, for handlers that read one while mutating the other.
    pub fn parts_mut(&mut self) -> (Option<&LoadedReport>, &mut NavigationController) {
        let report = match &self.state {
            ViewerState::Ready(report) => Some(report.as_ref()),
            _ => None,
        };
        (report, &mut self.navigation)
    }

    /// Starts a new load, dropping the current document and all navigation state.
    pub fn begin_load(&mut self, report_id: impl Into<String>) -> LoadTicket {
        self.generation += 1;
        let ticket = LoadTicket {
            generation: self.generation,
            report_id: report_id.into(),
        };
        self.navigation.reset();
        self.state = ViewerState::Loading {
            ticket: ticket.clone(),
        };
        ticket
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    pub fn apply(
        &mut self,
        ticket: &LoadTicket,
        result: Result<ReportDocument, ReportError>,
    ) -> ApplyOutcome {
        if !self.is_current(ticket) {
            debug!(
                report_id = ticket.report_id(),
                generation = ticket.generation,
                current = self.generation,
                "dropping stale report response"
            );
            return ApplyOutcome::Stale;
        }

        self.state = match result {
            Ok(document) => {
                let summary = summarize(&document, &self.thresholds);
                ViewerState::Ready(Box::new(LoadedReport { document, summary }))
            }
            Err(error) => {
                debug!(report_id = ticket.report_id(), %error, "report load failed");
                ViewerState::Failed {
                    message: error.user_message(),
                }
            }
        };
        ApplyOutcome::Applied
    }

    /// Loads a document that is already in memory, such as one read from disk.
    pub fn load_document(&mut self, document: ReportDocument) {
        let ticket = self.begin_load(document.id.clone());
        self.apply(&ticket, Ok(document));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::navigation::FocusTarget;

    fn titled(title: &str) -> ReportDocument {
        ReportDocument::from_value(&json!({
            "_id": title,
            "title": title,
            "detailed_viability_assessment": { "clusters": {
                "Team": { "Skills": { "Depth": { "assignedScore": 90 } } }
            }}
        }))
        .unwrap()
    }

    #[test]
    fn successful_load_caches_summary() {
        let mut session = ViewerSession::default();
        let ticket = session.begin_load("A");
        assert!(session.is_loading());
        assert_eq!(session.apply(&ticket, Ok(titled("A"))), ApplyOutcome::Applied);
        let summary = session.summary().unwrap();
        assert_eq!(summary.chart[0].score, 90);
        assert_eq!(summary.performers.top.len(), 1);
    }

    #[test]
    fn late_response_for_previous_id_is_ignored() {
        let mut session = ViewerSession::default();
        let first = session.begin_load("A");
        let second = session.begin_load("B");

        assert_eq!(session.apply(&second, Ok(titled("B"))), ApplyOutcome::Applied);
        assert_eq!(session.apply(&first, Ok(titled("A"))), ApplyOutcome::Stale);
        assert_eq!(session.document().unwrap().title, "B");
    }

    #[test]
    fn stale_failure_does_not_replace_ready_report() {
        let mut session = ViewerSession::default();
        let first = session.begin_load("A");
        let second = session.begin_load("B");
        session.apply(&second, Ok(titled("B")));
        session.apply(&first, Err(ReportError::NotFound));
        assert!(session.error_message().is_none());
    }

    #[test]
    fn failure_surfaces_user_message() {
        let mut session = ViewerSession::default();
        let ticket = session.begin_load("A");
        session.apply(&ticket, Err(ReportError::Http { status: 500 }));
        assert_eq!(session.error_message(), Some("Failed to fetch report data"));
        assert!(session.document().is_none());
    }

    #[test]
    fn new_load_resets_navigation() {
        let mut session = ViewerSession::default();
        session.load_document(titled("A"));
        session
            .navigation_mut()
            .focus_sub_parameter(FocusTarget::new("Team", "Skills", "Depth"), Duration::ZERO);
        assert!(session.navigation().is_cluster_expanded("Team"));

        session.begin_load("B");
        assert!(!session.navigation().is_cluster_expanded("Team"));
        assert!(session.navigation().focused().is_none());
        assert!(session.document().is_none());
    }
}
