//! Technology readiness roadmap shown beside the report.

use crate::model::{KeyActivity, RoadmapData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activity {
    pub text: &'static str,
    pub timeline: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub name: &'static str,
    pub trls: &'static [&'static str],
    pub timeline: &'static str,
    pub key_activities: &'static [Activity],
}

pub const PHASE_COUNT: usize = 5;

pub static ROADMAP_PHASES: [Phase; PHASE_COUNT] = [
    Phase {
        name: "Phase 1: Ideation",
        trls: &["TRL-1", "TRL-2"],
        timeline: "1-2 Weeks",
        key_activities: &[
            Activity {
                text: "Conduct market research and competitive analysis (SWOT).",
                timeline: "3-5 Days",
            },
            Activity {
                text: "Define your value proposition and business model.",
                timeline: "2-4 Days",
            },
            Activity {
                text: "Secure your idea with provisional patents or NDAs.",
                timeline: "5-7 Days",
            },
        ],
    },
    Phase {
        name: "Phase 2: Prototyping",
        trls: &["TRL-3", "TRL-4"],
        timeline: "3-6 Weeks",
        key_activities: &[
            Activity {
                text: "Create detailed product designs, mockups, and wireframes.",
                timeline: "7-10 Days",
            },
            Activity {
                text: "Build a Proof-of-Concept (POC) or Minimum Viable Product (MVP).",
                timeline: "10-20 Days",
            },
            Activity {
                text: "Conduct user testing with a small, targeted group.",
                timeline: "4-7 Days",
            },
        ],
    },
    Phase {
        name: "Phase 3: Validation",
        trls: &["TRL-5", "TRL-6", "TRL-7"],
        timeline: "4-8 Weeks",
        key_activities: &[
            Activity {
                text: "Finalize technical specifications for manufacturing (DFM).",
                timeline: "10-15 Days",
            },
            Activity {
                text: "Launch a market test via crowdfunding or a pilot program.",
                timeline: "15-30 Days",
            },
            Activity {
                text: "Perform live demonstrations of the product in a real-world setting.",
                timeline: "5-10 Days",
            },
        ],
    },
    Phase {
        name: "Phase 4: Launch",
        trls: &["TRL-8"],
        timeline: "6-10 Weeks",
        key_activities: &[
            Activity {
                text: "Establish supplier relationships and finalize production plans.",
                timeline: "20-30 Days",
            },
            Activity {
                text: "Develop a comprehensive branding and marketing strategy.",
                timeline: "15-20 Days",
            },
            Activity {
                text: "Execute the launch plan and monitor key performance indicators (KPIs).",
                timeline: "10-15 Days",
            },
        ],
    },
    Phase {
        name: "Phase 5: Growth",
        trls: &["TRL-9"],
        timeline: "Ongoing",
        key_activities: &[
            Activity {
                text: "Scale production and explore new market segments or product variations.",
                timeline: "Ongoing",
            },
            Activity {
                text: "Continuously gather customer feedback for future iterations.",
                timeline: "Ongoing",
            },
            Activity {
                text: "Optimize operations and streamline processes to increase efficiency.",
                timeline: "Ongoing",
            },
        ],
    },
];

pub fn current_phase_index(trl: &str) -> Option<usize> {
    let trl = trl.trim();
    ROADMAP_PHASES
        .iter()
        .position(|phase| phase.trls.iter().any(|candidate| candidate.eq_ignore_ascii_case(trl)))
}

/// Activity line as displayed, borrowed from either the report or the phase table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityLine<'a> {
    pub text: &'a str,
    pub timeline: &'a str,
}

/// Phase browser over a report's roadmap. The viewed phase starts on the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapView {
    current: usize,
    viewed: usize,
    dynamic: Vec<KeyActivity>,
}

impl RoadmapView {
    /// `None` when the TRL does not match any phase.
    pub fn new(data: &RoadmapData) -> Option<Self> {
        let current = current_phase_index(&data.current_trl)?;
        Some(Self {
            current,
            viewed: current,
            dynamic: data.key_activities.clone(),
        })
    }

    pub const fn current_index(&self) -> usize {
        self.current
    }

    pub const fn viewed_index(&self) -> usize {
        self.viewed
    }

    pub fn viewed_phase(&self) -> &'static Phase {
        &ROADMAP_PHASES[self.viewed]
    }

    pub const fn can_go_back(&self) -> bool {
        self.viewed > 0
    }

    pub const fn can_go_forward(&self) -> bool {
        self.viewed + 1 < PHASE_COUNT
    }

    pub fn previous(&mut self) {
        self.viewed = self.viewed.saturating_sub(1);
    }

    pub fn next(&mut self) {
        self.viewed = (self.viewed + 1).min(PHASE_COUNT - 1);
    }

    /// Report activities for the current phase when it has any, otherwise the phase defaults.
    pub fn activities(&self) -> Vec<ActivityLine<'_>> {
        if self.viewed == self.current && !self.dynamic.is_empty() {
            return self
                .dynamic
                .iter()
                .map(|activity| ActivityLine {
                    text: &activity.text,
                    timeline: &activity.timeline,
                })
                .collect();
        }
        self.viewed_phase()
            .key_activities
            .iter()
            .map(|activity| ActivityLine {
                text: activity.text,
                timeline: activity.timeline,
            })
            .collect()
    }

    /// Fraction of the phase track completed up to the current phase.
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        self.current as f64 / (PHASE_COUNT - 1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(trl: &str, activities: &[(&str, &str)]) -> RoadmapData {
        RoadmapData {
            current_trl: trl.to_string(),
            key_activities: activities
                .iter()
                .map(|(text, timeline)| KeyActivity {
                    text: (*text).to_string(),
                    timeline: (*timeline).to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn trl_maps_to_phase() {
        assert_eq!(current_phase_index("TRL-1"), Some(0));
        assert_eq!(current_phase_index("trl-6"), Some(2));
        assert_eq!(current_phase_index("TRL-9"), Some(4));
        assert_eq!(current_phase_index("TRL-10"), None);
        assert!(RoadmapView::new(&data("", &[])).is_none());
    }

    #[test]
    fn current_phase_prefers_report_activities() {
        let view = RoadmapView::new(&data("TRL-3", &[("Build MVP", "10 Days")])).unwrap();
        assert_eq!(view.activities().len(), 1);
        assert_eq!(view.activities()[0].text, "Build MVP");
    }

    #[test]
    fn other_phases_show_defaults() {
        let mut view = RoadmapView::new(&data("TRL-3", &[("Build MVP", "10 Days")])).unwrap();
        view.next();
        assert_eq!(view.viewed_phase().name, "Phase 3: Validation");
        assert_eq!(view.activities().len(), 3);
        view.previous();
        view.previous();
        assert_eq!(view.activities()[0].timeline, "3-5 Days");
        assert!(!view.can_go_back());
    }

    #[test]
    fn empty_report_activities_fall_back() {
        let view = RoadmapView::new(&data("TRL-8", &[])).unwrap();
        assert_eq!(view.activities()[0].timeline, "20-30 Days");
        assert!((view.progress() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn browsing_stops_at_the_ends() {
        let mut view = RoadmapView::new(&data("TRL-9", &[])).unwrap();
        assert!(!view.can_go_forward());
        view.next();
        assert_eq!(view.viewed_index(), 4);
    }
}
