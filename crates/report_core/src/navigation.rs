//! Expansion and highlight state for the detailed report outline.
//!
//! The controller never reads a clock. Callers pass the time elapsed since
//! the view started, and deadlines are plain data inside the focus slot, so
//! a superseded or dropped controller cannot fire anything later.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::Serialize;

use crate::aggregate::{cluster_average, parameter_average};
use crate::model::{Cluster, Parameter, ParameterKey, ReportDocument, SubParameterFinding};
use crate::score::badge;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationTimings {
    /// Delay before scrolling, long enough for the expand transition to start.
    pub scroll_delay: Duration,
    /// How long a focused finding stays highlighted.
    pub highlight: Duration,
}

impl Default for NavigationTimings {
    fn default() -> Self {
        Self {
            scroll_delay: Duration::from_millis(500),
            highlight: Duration::from_millis(3000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FocusTarget {
    pub cluster: String,
    pub parameter: String,
    pub sub_parameter: String,
}

impl FocusTarget {
    pub fn new(
        cluster: impl Into<String>,
        parameter: impl Into<String>,
        sub_parameter: impl Into<String>,
    ) -> Self {
        Self {
            cluster: cluster.into(),
            parameter: parameter.into(),
            sub_parameter: sub_parameter.into(),
        }
    }

    pub fn parameter_key(&self) -> ParameterKey {
        ParameterKey::new(self.cluster.as_str(), self.parameter.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusSlot {
    Idle,
    Focused {
        target: FocusTarget,
        /// Pending scroll; `None` once it has been emitted.
        scroll_at: Option<Duration>,
        clear_at: Duration,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    ScrollTo(FocusTarget),
    FocusCleared(FocusTarget),
}

#[derive(Debug, Clone)]
pub struct NavigationController {
    expanded_clusters: BTreeSet<String>,
    expanded_parameters: BTreeSet<ParameterKey>,
    focus: FocusSlot,
    timings: NavigationTimings,
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new(NavigationTimings::default())
    }
}

impl NavigationController {
    pub const fn new(timings: NavigationTimings) -> Self {
        Self {
            expanded_clusters: BTreeSet::new(),
            expanded_parameters: BTreeSet::new(),
            focus: FocusSlot::Idle,
            timings,
        }
    }

    pub const fn timings(&self) -> NavigationTimings {
        self.timings
    }

    pub const fn focus(&self) -> &FocusSlot {
        &self.focus
    }

    pub const fn focused(&self) -> Option<&FocusTarget> {
        match &self.focus {
            FocusSlot::Focused { target, .. } => Some(target),
            FocusSlot::Idle => None,
        }
    }

    pub fn is_focused(&self, target: &FocusTarget) -> bool {
        self.focused() == Some(target)
    }

    pub fn is_cluster_expanded(&self, cluster: &str) -> bool {
        self.expanded_clusters.contains(cluster)
    }

    pub fn is_parameter_expanded(&self, key: &ParameterKey) -> bool {
        self.expanded_parameters.contains(key)
    }

    pub const fn expanded_clusters(&self) -> &BTreeSet<String> {
        &self.expanded_clusters
    }

    pub const fn expanded_parameters(&self) -> &BTreeSet<ParameterKey> {
        &self.expanded_parameters
    }

    /// Opens the ancestors of a finding and makes it the single focused entry.
    ///
    /// Expansion only grows here. Any pending scroll or clear for a previous
    /// target is replaced, not left to run.
    pub fn focus_sub_parameter(&mut self, target: FocusTarget, now: Duration) {
        if !self.expanded_clusters.contains(&target.cluster) {
            self.expanded_clusters.insert(target.cluster.clone());
        }
        let key = target.parameter_key();
        if !self.expanded_parameters.contains(&key) {
            self.expanded_parameters.insert(key);
        }

        self.focus = FocusSlot::Focused {
            target,
            scroll_at: Some(now + self.timings.scroll_delay),
            clear_at: now + self.timings.highlight,
        };
    }

    /// Advances the focus slot to `now` and reports what became due.
    pub fn tick(&mut self, now: Duration) -> Vec<NavigationEvent> {
        let mut events = Vec::new();

        if let FocusSlot::Focused {
            target, scroll_at, ..
        } = &mut self.focus
        {
            if scroll_at.is_some_and(|due| now >= due) {
                *scroll_at = None;
                events.push(NavigationEvent::ScrollTo(target.clone()));
            }
        }

        if let FocusSlot::Focused {
            target, clear_at, ..
        } = &self.focus
        {
            if now >= *clear_at {
                events.push(NavigationEvent::FocusCleared(target.clone()));
                self.focus = FocusSlot::Idle;
            }
        }

        events
    }

    pub fn clear_focus(&mut self) {
        self.focus = FocusSlot::Idle;
    }

    /// Collapses everything when every listed cluster is open, otherwise opens them all.
    pub fn toggle_expand_all<S: AsRef<str>>(&mut self, all_clusters: &[S]) {
        if self.all_expanded(all_clusters) {
            self.expanded_clusters.clear();
        } else {
            self.expanded_clusters = all_clusters
                .iter()
                .map(|name| name.as_ref().to_string())
                .collect();
        }
    }

    pub fn all_expanded<S: AsRef<str>>(&self, all_clusters: &[S]) -> bool {
        !all_clusters.is_empty()
            && all_clusters
                .iter()
                .all(|name| self.expanded_clusters.contains(name.as_ref()))
    }

    pub fn toggle_cluster(&mut self, cluster: &str) {
        if !self.expanded_clusters.remove(cluster) {
            self.expanded_clusters.insert(cluster.to_string());
        }
    }

    pub fn toggle_parameter(&mut self, key: &ParameterKey) {
        if !self.expanded_parameters.remove(key) {
            self.expanded_parameters.insert(key.clone());
        }
    }

    /// Forgets all expansion and focus, used when a different document is loaded.
    pub fn reset(&mut self) {
        self.expanded_clusters.clear();
        self.expanded_parameters.clear();
        self.focus = FocusSlot::Idle;
    }

    /// Rows of the outline that are visible under the current expansion state.
    pub fn outline<'a>(&self, document: &'a ReportDocument) -> Vec<OutlineRow<'a>> {
        let mut rows = Vec::new();
        for cluster in &document.clusters {
            let cluster_open = self.is_cluster_expanded(&cluster.name);
            rows.push(OutlineRow::Cluster {
                cluster,
                expanded: cluster_open,
                score: badge(cluster_average(cluster)),
            });
            if !cluster_open {
                continue;
            }

            for parameter in &cluster.parameters {
                let key = ParameterKey::new(cluster.name.as_str(), parameter.name.as_str());
                let parameter_open = self.is_parameter_expanded(&key);
                rows.push(OutlineRow::Parameter {
                    key,
                    parameter,
                    expanded: parameter_open,
                    badge: badge(parameter_average(parameter)),
                });
                if !parameter_open {
                    continue;
                }

                for finding in &parameter.findings {
                    let target = FocusTarget::new(
                        cluster.name.as_str(),
                        parameter.name.as_str(),
                        finding.name.as_str(),
                    );
                    let focused = self.is_focused(&target);
                    rows.push(OutlineRow::Finding {
                        target,
                        finding,
                        focused,
                    });
                }
            }
        }
        rows
    }
}

#[derive(Debug, Clone)]
pub enum OutlineRow<'a> {
    Cluster {
        cluster: &'a Cluster,
        expanded: bool,
        score: u32,
    },
    Parameter {
        key: ParameterKey,
        parameter: &'a Parameter,
        expanded: bool,
        badge: u32,
    },
    Finding {
        target: FocusTarget,
        finding: &'a SubParameterFinding,
        focused: bool,
    },
}

impl OutlineRow<'_> {
    pub const fn depth(&self) -> usize {
        match self {
            Self::Cluster { .. } => 0,
            Self::Parameter { .. } => 1,
            Self::Finding { .. } => 2,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Cluster { cluster, .. } => &cluster.name,
            Self::Parameter { parameter, .. } => &parameter.name,
            Self::Finding { finding, .. } => &finding.name,
        }
    }
}

/// Index of the row showing `target`, if it is currently visible.
pub fn find_row(rows: &[OutlineRow<'_>], target: &FocusTarget) -> Option<usize> {
    rows.iter().position(|row| match row {
        OutlineRow::Finding { target: shown, .. } => shown == target,
        _ => false,
    })
}
