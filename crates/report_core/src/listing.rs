//! Reports list returned for a user.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportListing {
    #[serde(default, rename = "_id")]
    pub object_id: Option<String>,
    #[serde(default, alias = "id")]
    pub report_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub validation_outcome: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub reports: Vec<ReportListing>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Date,
    Score,
}

impl SortKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Score => "score",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "score" => Ok(Self::Score),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

impl ReportListing {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .map(|timestamp| timestamp.with_timezone(&Utc))
            .ok()
    }

    pub fn title_or_default(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or("Untitled report")
    }

    pub fn created_label(&self) -> String {
        match (self.created(), self.created_at.as_deref()) {
            (Some(timestamp), _) => timestamp.format("%b %d, %Y %H:%M").to_string(),
            (None, Some(raw)) => raw.to_string(),
            (None, None) => "No date".to_string(),
        }
    }
}

/// Newest first for `Date`, highest first for `Score`; missing values sort last.
pub fn sort_listings(listings: &mut [ReportListing], key: SortKey) {
    match key {
        SortKey::Date => listings.sort_by(|a, b| descending_missing_last(a.created(), b.created())),
        SortKey::Score => listings.sort_by(|a, b| {
            descending_missing_last(
                a.overall_score.filter(|score| score.is_finite()).map(OrderedScore),
                b.overall_score.filter(|score| score.is_finite()).map(OrderedScore),
            )
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct OrderedScore(f64);

impl Eq for OrderedScore {}

impl PartialOrd for OrderedScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedScore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn descending_missing_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listings() -> Vec<ReportListing> {
        let response: ListResponse = serde_json::from_value(json!({
            "success": true,
            "total": 3,
            "reports": [
                { "_id": "a", "reportId": "r-old", "title": "Old", "createdAt": "2024-01-01T00:00:00Z", "overallScore": 91.0 },
                { "_id": "b", "reportId": "r-new", "createdAt": "2024-06-01T00:00:00Z", "overallScore": 40.5 },
                { "_id": "c", "reportId": "r-none" }
            ]
        }))
        .unwrap();
        response.reports
    }

    #[test]
    fn parses_camel_case_response() {
        let reports = listings();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].report_id, "r-old");
        assert_eq!(reports[1].title_or_default(), "Untitled report");
        assert_eq!(reports[2].created_label(), "No date");
    }

    #[test]
    fn sorts_by_date_newest_first() {
        let mut reports = listings();
        sort_listings(&mut reports, SortKey::Date);
        let ids: Vec<_> = reports.iter().map(|r| r.report_id.as_str()).collect();
        assert_eq!(ids, vec!["r-new", "r-old", "r-none"]);
    }

    #[test]
    fn sorts_by_score_highest_first() {
        let mut reports = listings();
        sort_listings(&mut reports, SortKey::Score);
        let ids: Vec<_> = reports.iter().map(|r| r.report_id.as_str()).collect();
        assert_eq!(ids, vec!["r-old", "r-new", "r-none"]);
    }

    #[test]
    fn sort_key_parses_case_insensitively() {
        assert_eq!("Score".parse::<SortKey>(), Ok(SortKey::Score));
        assert!("size".parse::<SortKey>().is_err());
    }
}
