//! Roll-ups derived from a [`ReportDocument`].
//!
//! Everything here is a pure function of the document, so callers recompute
//! it wholesale whenever a new document arrives instead of patching cached
//! numbers.

use std::cmp::Ordering;

use serde::Serialize;

use crate::model::{Cluster, Parameter, ParameterKey, ReportDocument};
use crate::score::{badge, mean, round_to};

/// Bounds for the top/bottom performer lists.
///
/// Scores in `[bottom, top)` land in neither list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub top: f64,
    pub bottom: f64,
    pub limit: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            top: 85.0,
            bottom: 70.0,
            limit: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopBottomEntry {
    pub cluster_name: String,
    pub param_name: String,
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Performers {
    pub top: Vec<TopBottomEntry>,
    pub bottom: Vec<TopBottomEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterScore {
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterAverage {
    pub key: ParameterKey,
    pub average: f64,
    pub badge: u32,
    pub findings: usize,
}

/// Everything the viewer derives from one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportSummary {
    pub chart: Vec<ClusterScore>,
    pub performers: Performers,
    pub parameters: Vec<ParameterAverage>,
}

impl ReportSummary {
    pub fn chart_points(&self) -> Vec<(&str, f64)> {
        self.chart
            .iter()
            .map(|cluster| (cluster.name.as_str(), f64::from(cluster.score)))
            .collect()
    }

    pub fn parameter(&self, key: &ParameterKey) -> Option<&ParameterAverage> {
        self.parameters.iter().find(|average| &average.key == key)
    }
}

/// Mean of a parameter's finding scores to two decimals, 0 when it has none.
pub fn parameter_average(parameter: &Parameter) -> f64 {
    mean(&parameter.scores()).map_or(0.0, |value| round_to(value, 2))
}

/// Mean of every parameter average, empty parameters counting as 0; 0 without parameters.
pub fn cluster_average(cluster: &Cluster) -> f64 {
    let averages: Vec<f64> = cluster.parameters.iter().map(parameter_average).collect();
    mean(&averages).unwrap_or(0.0)
}

/// Rounded score for every cluster, in document order.
pub fn cluster_chart_data(document: &ReportDocument) -> Vec<ClusterScore> {
    document
        .clusters
        .iter()
        .map(|cluster| ClusterScore {
            name: cluster.name.clone(),
            score: badge(cluster_average(cluster)),
        })
        .collect()
}

pub fn extract_top_bottom(document: &ReportDocument, thresholds: &Thresholds) -> Performers {
    let mut top = Vec::new();
    let mut bottom = Vec::new();

    for entry in document.findings() {
        let score = entry.finding.assigned_score;
        let performer = || TopBottomEntry {
            cluster_name: entry.cluster.name.clone(),
            param_name: entry.parameter.name.clone(),
            name: entry.finding.name.clone(),
            score,
        };

        if score >= thresholds.top {
            top.push(performer());
        } else if score < thresholds.bottom {
            bottom.push(performer());
        }
    }

    // `sort_by` is stable, so equal scores keep document order.
    top.sort_by(|a, b| descending(a.score, b.score));
    bottom.sort_by(|a, b| a.score.total_cmp(&b.score));
    top.truncate(thresholds.limit);
    bottom.truncate(thresholds.limit);

    Performers { top, bottom }
}

pub fn parameter_averages(document: &ReportDocument) -> Vec<ParameterAverage> {
    document
        .clusters
        .iter()
        .flat_map(|cluster| {
            cluster.parameters.iter().map(move |parameter| {
                let average = parameter_average(parameter);
                ParameterAverage {
                    key: ParameterKey::new(cluster.name.as_str(), parameter.name.as_str()),
                    average,
                    badge: badge(average),
                    findings: parameter.findings.len(),
                }
            })
        })
        .collect()
}

pub fn summarize(document: &ReportDocument, thresholds: &Thresholds) -> ReportSummary {
    ReportSummary {
        chart: cluster_chart_data(document),
        performers: extract_top_bottom(document, thresholds),
        parameters: parameter_averages(document),
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Map, Value};

    fn document(value: &Value) -> ReportDocument {
        ReportDocument::from_value(value).unwrap()
    }

    #[test]
    fn single_finding_drives_chart_and_top_list() {
        let doc = document(&json!({
            "detailed_viability_assessment": { "clusters": {
                "Core Idea": { "Vision": { "Clarity": { "assignedScore": 92 } } }
            }}
        }));

        assert_eq!(
            cluster_chart_data(&doc),
            vec![ClusterScore { name: "Core Idea".to_string(), score: 92 }]
        );
        let performers = extract_top_bottom(&doc, &Thresholds::default());
        assert_eq!(
            performers.top,
            vec![TopBottomEntry {
                cluster_name: "Core Idea".to_string(),
                param_name: "Vision".to_string(),
                name: "Clarity".to_string(),
                score: 92.0,
            }]
        );
        assert!(performers.bottom.is_empty());
    }

    #[test]
    fn parameter_average_keeps_two_decimals_and_badge_rounds_up() {
        let doc = document(&json!({
            "detailed_viability_assessment": { "clusters": {
                "Team": { "Skills": {
                    "Depth": { "assignedScore": 60 },
                    "Breadth": { "assignedScore": 95 }
                }}
            }}
        }));
        let averages = parameter_averages(&doc);
        assert_eq!(averages.len(), 1);
        assert!((averages[0].average - 77.5).abs() < 1e-9);
        assert_eq!(averages[0].badge, 78);
        assert_eq!(cluster_chart_data(&doc)[0].score, 78);
    }

    #[test]
    fn entries_without_score_are_ignored() {
        let doc = document(&json!({
            "detailed_viability_assessment": { "clusters": {
                "Team": { "Skills": {
                    "Depth": { "assignedScore": 40 },
                    "junk": { "foo": "bar" }
                }}
            }}
        }));
        let averages = parameter_averages(&doc);
        assert!((averages[0].average - 40.0).abs() < 1e-9);
        let performers = extract_top_bottom(&doc, &Thresholds::default());
        assert_eq!(performers.bottom.len(), 1);
        assert!(performers.top.is_empty());
    }

    #[test]
    fn cluster_uses_mean_of_parameter_averages() {
        // Leaf mean would be (100 + 0 + 0) / 3 = 33; parameter mean is (100 + 0) / 2 = 50.
        let doc = document(&json!({
            "detailed_viability_assessment": { "clusters": {
                "Execution": {
                    "Plan": { "A": { "assignedScore": 100 } },
                    "Ops": { "B": { "assignedScore": 0 }, "C": { "assignedScore": 0 } }
                }
            }}
        }));
        assert_eq!(cluster_chart_data(&doc)[0].score, 50);
    }

    #[test]
    fn empty_parameters_count_as_zero_and_empty_clusters_chart_zero() {
        let doc = document(&json!({
            "detailed_viability_assessment": { "clusters": {
                "Execution": {
                    "Plan": { "A": { "assignedScore": 80 } },
                    "Empty": { "note": { "foo": "bar" } }
                },
                "Team": { "Skills": {} },
                "Bare": {}
            }}
        }));
        let chart = cluster_chart_data(&doc);
        assert_eq!(
            chart,
            vec![
                ClusterScore { name: "Execution".to_string(), score: 40 },
                ClusterScore { name: "Team".to_string(), score: 0 },
                ClusterScore { name: "Bare".to_string(), score: 0 },
            ]
        );
    }

    #[test]
    fn missing_clusters_yield_empty_outputs() {
        let doc = document(&json!({ "title": "bare" }));
        let summary = summarize(&doc, &Thresholds::default());
        assert!(summary.chart.is_empty());
        assert!(summary.performers.top.is_empty());
        assert!(summary.parameters.is_empty());
    }

    #[test]
    fn ties_keep_document_order() {
        let doc = document(&json!({
            "detailed_viability_assessment": { "clusters": {
                "A": { "P": { "first": { "assignedScore": 90 }, "second": { "assignedScore": 90 } } },
                "B": { "Q": { "third": { "assignedScore": 90 } } }
            }}
        }));
        let names: Vec<_> = extract_top_bottom(&doc, &Thresholds::default())
            .top
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn lists_are_truncated_to_limit() {
        let findings: Map<String, Value> = (0..8)
            .map(|i| (format!("f{i}"), json!({ "assignedScore": 90 + i })))
            .collect();
        let doc = document(&json!({
            "detailed_viability_assessment": { "clusters": { "A": { "P": findings } } }
        }));
        let top = extract_top_bottom(&doc, &Thresholds::default()).top;
        assert_eq!(top.len(), 5);
        assert!((top[0].score - 97.0).abs() < f64::EPSILON);
    }

    fn scored_document(scores: &[Vec<Vec<u8>>]) -> ReportDocument {
        let clusters: Map<String, Value> = scores
            .iter()
            .enumerate()
            .map(|(c, parameters)| {
                let parameters: Map<String, Value> = parameters
                    .iter()
                    .enumerate()
                    .map(|(p, findings)| {
                        let findings: Map<String, Value> = findings
                            .iter()
                            .enumerate()
                            .map(|(f, score)| (format!("s{f}"), json!({ "assignedScore": score })))
                            .collect();
                        (format!("p{p}"), Value::Object(findings))
                    })
                    .collect();
                (format!("c{c}"), Value::Object(parameters))
            })
            .collect();
        document(&json!({ "detailed_viability_assessment": { "clusters": clusters } }))
    }

    fn score_tree() -> impl Strategy<Value = Vec<Vec<Vec<u8>>>> {
        prop::collection::vec(
            prop::collection::vec(prop::collection::vec(0_u8..=100, 0..5), 0..4),
            0..5,
        )
    }

    proptest! {
        #[test]
        fn aggregation_is_deterministic(tree in score_tree()) {
            let doc = scored_document(&tree);
            let thresholds = Thresholds::default();
            prop_assert_eq!(summarize(&doc, &thresholds), summarize(&doc, &thresholds));
        }

        #[test]
        fn thresholds_partition_findings(tree in score_tree()) {
            let doc = scored_document(&tree);
            let unlimited = Thresholds { limit: usize::MAX, ..Thresholds::default() };
            let performers = extract_top_bottom(&doc, &unlimited);

            let expected_top = doc.findings().filter(|f| f.finding.assigned_score >= 85.0).count();
            let expected_bottom = doc.findings().filter(|f| f.finding.assigned_score < 70.0).count();
            prop_assert_eq!(performers.top.len(), expected_top);
            prop_assert_eq!(performers.bottom.len(), expected_bottom);
            prop_assert!(performers.top.iter().all(|entry| entry.score >= 85.0));
            prop_assert!(performers.bottom.iter().all(|entry| entry.score < 70.0));
        }

        #[test]
        fn lists_are_ranked_and_bounded(tree in score_tree()) {
            let doc = scored_document(&tree);
            let performers = extract_top_bottom(&doc, &Thresholds::default());
            prop_assert!(performers.top.len() <= 5);
            prop_assert!(performers.bottom.len() <= 5);
            prop_assert!(performers.top.windows(2).all(|pair| pair[0].score >= pair[1].score));
            prop_assert!(performers.bottom.windows(2).all(|pair| pair[0].score <= pair[1].score));
        }
    }
}
