//! Typed view over the report JSON returned by the scoring API.
//!
//! The upstream document is trusted but not validated: any field may be
//! missing and nested maps may hold entries that are not findings at all.
//! Building the model never fails on such input; unusable entries are
//! dropped and optional text falls back to [`NO_DATA`].

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ReportError;

/// Placeholder for a finding's missing narrative.
pub const NO_DATA: &str = "No data";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    pub id: String,
    pub title: String,
    pub overall_score: Option<f64>,
    pub validation_outcome: Option<String>,
    pub created_at: Option<String>,
    pub clusters: Vec<Cluster>,
    pub roadmap: Option<RoadmapData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    pub name: String,
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub findings: Vec<SubParameterFinding>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubParameterFinding {
    pub name: String,
    pub assigned_score: f64,
    pub what_went_well: String,
    pub what_can_be_improved: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoadmapData {
    pub current_trl: String,
    pub key_activities: Vec<KeyActivity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyActivity {
    pub text: String,
    pub timeline: String,
}

/// Identity of a parameter inside the outline: the pair of names, never a joined string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ParameterKey {
    pub cluster: String,
    pub parameter: String,
}

impl ParameterKey {
    pub fn new(cluster: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            parameter: parameter.into(),
        }
    }
}

/// One finding together with the names of its ancestors, in document order.
#[derive(Debug, Clone, Copy)]
pub struct FindingRef<'a> {
    pub cluster: &'a Cluster,
    pub parameter: &'a Parameter,
    pub finding: &'a SubParameterFinding,
}

impl ReportDocument {
    pub fn from_json(body: &str) -> Result<Self, ReportError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|error| ReportError::MalformedBody(error.to_string()))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, ReportError> {
        let root = value
            .as_object()
            .ok_or_else(|| ReportError::MalformedBody("expected a JSON object".to_string()))?;

        let clusters = root
            .get("detailed_viability_assessment")
            .and_then(|assessment| assessment.get("clusters"))
            .and_then(Value::as_object)
            .map(parse_clusters)
            .unwrap_or_default();

        Ok(Self {
            id: root
                .get("_id")
                .or_else(|| root.get("id"))
                .and_then(identifier)
                .unwrap_or_default(),
            title: text(root.get("title")).unwrap_or_default(),
            overall_score: root.get("overall_score").and_then(Value::as_f64),
            validation_outcome: text(root.get("validation_outcome")),
            created_at: text(root.get("created_at")),
            clusters,
            roadmap: root.get("roadmap").and_then(parse_roadmap),
        })
    }

    pub fn cluster(&self, name: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|cluster| cluster.name == name)
    }

    pub fn cluster_names(&self) -> Vec<String> {
        self.clusters.iter().map(|cluster| cluster.name.clone()).collect()
    }

    pub fn findings(&self) -> impl Iterator<Item = FindingRef<'_>> {
        self.clusters.iter().flat_map(|cluster| {
            cluster.parameters.iter().flat_map(move |parameter| {
                parameter.findings.iter().map(move |finding| FindingRef {
                    cluster,
                    parameter,
                    finding,
                })
            })
        })
    }

    pub fn finding_count(&self) -> usize {
        self.findings().count()
    }

    /// Short identifier shown in the report header.
    pub fn display_id(&self) -> String {
        let chars: Vec<char> = self.id.chars().collect();
        if chars.len() <= 16 {
            return format!("IDE-{}", self.id);
        }
        let end = chars.len().min(25);
        format!("IDE-{}", chars[16..end].iter().collect::<String>())
    }

    pub fn created_date(&self) -> Option<NaiveDate> {
        let raw = self.created_at.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|timestamp| timestamp.date_naive())
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|ts| ts.date()))
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .ok()
    }

    /// Creation date for display; the raw value when it is not a recognised timestamp.
    pub fn created_label(&self) -> String {
        self.created_date().map_or_else(
            || self.created_at.clone().unwrap_or_else(|| "N/A".to_string()),
            |date| date.format("%Y-%m-%d").to_string(),
        )
    }

    pub fn title_or_default(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled report"
        } else {
            &self.title
        }
    }
}

impl Cluster {
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|parameter| parameter.name == name)
    }
}

impl Parameter {
    pub fn finding(&self, name: &str) -> Option<&SubParameterFinding> {
        self.findings.iter().find(|finding| finding.name == name)
    }

    pub fn scores(&self) -> Vec<f64> {
        self.findings.iter().map(|finding| finding.assigned_score).collect()
    }
}

fn parse_clusters(clusters: &Map<String, Value>) -> Vec<Cluster> {
    clusters
        .iter()
        .filter_map(|(name, value)| {
            let parameters = value.as_object()?;
            Some(Cluster {
                name: name.clone(),
                parameters: parameters
                    .iter()
                    .filter_map(|(name, value)| parse_parameter(name, value))
                    .collect(),
            })
        })
        .collect()
}

fn parse_parameter(name: &str, value: &Value) -> Option<Parameter> {
    let entries = value.as_object()?;
    Some(Parameter {
        name: name.to_string(),
        findings: entries
            .iter()
            .filter_map(|(name, value)| parse_finding(name, value))
            .collect(),
    })
}

fn parse_finding(name: &str, value: &Value) -> Option<SubParameterFinding> {
    let entry = value.as_object()?;
    let assigned_score = entry.get("assignedScore").and_then(Value::as_f64)?;
    Some(SubParameterFinding {
        name: name.to_string(),
        assigned_score,
        what_went_well: text(entry.get("whatWentWell")).unwrap_or_else(|| NO_DATA.to_string()),
        what_can_be_improved: text(entry.get("whatCanBeImproved"))
            .unwrap_or_else(|| NO_DATA.to_string()),
    })
}

fn parse_roadmap(value: &Value) -> Option<RoadmapData> {
    let roadmap = value.as_object()?;
    let key_activities = roadmap
        .get("key_activities")
        .and_then(Value::as_array)
        .map(|activities| {
            activities
                .iter()
                .filter_map(|activity| {
                    Some(KeyActivity {
                        text: text(activity.get("text"))?,
                        timeline: text(activity.get("timeline")).unwrap_or_default(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Some(RoadmapData {
        current_trl: text(roadmap.get("current_trl")).unwrap_or_default(),
        key_activities,
    })
}

/// Non-empty string content of a field.
fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|content| !content.trim().is_empty())
        .map(str::to_string)
}

fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        Value::Object(map) => map.get("$oid").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}
