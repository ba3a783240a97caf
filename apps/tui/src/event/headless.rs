use std::path::Path;

use color_eyre::eyre::{eyre, Result, WrapErr};
use pitch_report_core::aggregate::{ClusterScore, ParameterAverage, TopBottomEntry};
use pitch_report_core::export::pdf_file_name;
use pitch_report_core::listing::{sort_listings, ReportListing, SortKey};
use pitch_report_core::roadmap::RoadmapView;
use pitch_report_core::score::format_score;
use pitch_report_core::upload::validate_deck;
use pitch_report_core::viewer::LoadedReport;
use pitch_report_core::{ReportDocument, ReportSummary, Thresholds, ViewerSession};
use serde::Serialize;

use crate::api::ApiClient;
use crate::app::actions::load_source;
use crate::app::ReportSource;
use crate::config::AppConfig;
use crate::export::{export_report, outline_text};

#[derive(Debug, Serialize)]
pub struct HeadlessReport {
    id: String,
    title: String,
    created: String,
    overall_score: Option<f64>,
    validation_outcome: Option<String>,
    clusters: Vec<ClusterScore>,
    top_performers: Vec<TopBottomEntry>,
    bottom_performers: Vec<TopBottomEntry>,
    parameters: Vec<ParameterAverage>,
    roadmap: Option<HeadlessRoadmap>,
}

#[derive(Debug, Serialize)]
struct HeadlessRoadmap {
    current_trl: String,
    phase: &'static str,
    progress: f64,
}

pub fn build_headless_report(document: &ReportDocument, summary: &ReportSummary) -> HeadlessReport {
    let roadmap = document.roadmap.as_ref().and_then(|data| {
        RoadmapView::new(data).map(|view| HeadlessRoadmap {
            current_trl: data.current_trl.clone(),
            phase: view.viewed_phase().name,
            progress: view.progress(),
        })
    });

    HeadlessReport {
        id: document.id.clone(),
        title: document.title_or_default().to_string(),
        created: document.created_label(),
        overall_score: document.overall_score,
        validation_outcome: document.validation_outcome.clone(),
        clusters: summary.chart.clone(),
        top_performers: summary.performers.top.clone(),
        bottom_performers: summary.performers.bottom.clone(),
        parameters: summary.parameters.clone(),
        roadmap,
    }
}

pub fn headless_text(document: &ReportDocument, report: &HeadlessReport) -> String {
    let mut out = Vec::new();
    out.push(String::new());
    out.push(report.title.clone());
    out.push("=".repeat(report.title.chars().count().max(3)));
    out.push(format!("Report: {}", document.display_id()));
    out.push(format!("Created: {}", report.created));
    out.push(format!("Overall score: {}", format_score(report.overall_score)));
    if let Some(outcome) = &report.validation_outcome {
        out.push(format!("Outcome: {outcome}"));
    }

    out.push(String::new());
    out.push("Cluster scores:".to_string());
    out.extend(
        report
            .clusters
            .iter()
            .map(|cluster| format!("- {}: {}", cluster.name, cluster.score)),
    );

    for (heading, entries) in [
        ("Top performers:", &report.top_performers),
        ("Needs attention:", &report.bottom_performers),
    ] {
        out.push(String::new());
        out.push(heading.to_string());
        if entries.is_empty() {
            out.push("- (none)".to_string());
        }
        out.extend(entries.iter().map(|entry| {
            format!(
                "- {:.0} | {} | {} / {}",
                entry.score, entry.name, entry.cluster_name, entry.param_name
            )
        }));
    }

    out.push(String::new());
    out.push("Detailed analysis:".to_string());
    out.extend(outline_text(document));

    if let Some(roadmap) = &report.roadmap {
        out.push(String::new());
        out.push(format!("Roadmap: {} ({})", roadmap.phase, roadmap.current_trl));
    }

    out.join("\n")
}

/// Load one report and print it, or export it, without starting the UI.
pub async fn run_headless(
    client: &ApiClient,
    config: &AppConfig,
    source: &ReportSource,
    json: bool,
    export: bool,
) -> Result<()> {
    let document = load_source(client, source).await.map_err(|e| {
        tracing::error!(source = %source.label(), error = %e, "headless load failed");
        eyre!("{}", e.user_message())
    })?;

    let mut session = ViewerSession::new(Thresholds::default(), config.timings);
    session.load_document(document);
    let Some(LoadedReport { document, summary }) = session.report() else {
        return Err(eyre!("report could not be summarized"));
    };

    if export {
        let path = export_report(document, summary, &config.export_dir, 100)?;
        println!("Report exported to {}", path.display());
        return Ok(());
    }

    let report = build_headless_report(document, summary);
    if json {
        let json = serde_json::to_string_pretty(&report)?;
        println!("{json}");
    } else {
        println!("{}", headless_text(document, &report));
    }
    Ok(())
}

pub fn listing_lines(listings: &[ReportListing]) -> Vec<String> {
    listings
        .iter()
        .map(|listing| {
            format!(
                "{} | {:>3} | {} | {}",
                listing.created_label(),
                format_score(listing.overall_score),
                listing.title_or_default(),
                listing.report_id
            )
        })
        .collect()
}

pub async fn run_list(client: &ApiClient, user_id: &str, sort: SortKey, json: bool) -> Result<()> {
    let mut listing = client.list_reports(user_id).await?;
    sort_listings(&mut listing.reports, sort);

    if json {
        println!("{}", serde_json::to_string_pretty(&listing.reports)?);
        return Ok(());
    }

    if listing.reports.is_empty() {
        println!("No reports found for {user_id}");
        return Ok(());
    }
    println!("Reports for {user_id} ({} total, by {sort})", listing.total);
    for line in listing_lines(&listing.reports) {
        println!("{line}");
    }
    Ok(())
}

pub async fn run_upload(client: &ApiClient, user_id: &str, title: &str, file: &Path) -> Result<()> {
    let size = std::fs::metadata(file)
        .wrap_err_with(|| format!("Unable to read {}", file.display()))?
        .len();
    let deck = validate_deck(user_id, title, Some((file, size)))?;

    let response = client.upload_deck(&deck, file).await?;
    match response.report_id {
        Some(report_id) => println!("Report generated: {report_id}"),
        None => println!("Pitch deck accepted"),
    }
    Ok(())
}

pub async fn run_download(client: &ApiClient, report_id: &str, dir: &Path) -> Result<()> {
    let bytes = client.download_pdf(report_id).await?;
    std::fs::create_dir_all(dir)
        .wrap_err_with(|| format!("Unable to create export directory {}", dir.display()))?;
    let path = dir.join(pdf_file_name(report_id));
    std::fs::write(&path, bytes).wrap_err_with(|| format!("Unable to write {}", path.display()))?;
    println!("PDF downloaded to {}", path.display());
    Ok(())
}

pub async fn run_delete(client: &ApiClient, report_id: &str, confirmed: bool) -> Result<()> {
    if !confirmed {
        return Err(eyre!(
            "Deleting {report_id} cannot be undone; pass --yes to confirm"
        ));
    }
    client.delete_report(report_id).await?;
    println!("Report {report_id} deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitch_report_core::summarize;
    use serde_json::json;

    fn document() -> ReportDocument {
        ReportDocument::from_value(&json!({
            "_id": "r1",
            "title": "Solar Drones",
            "overall_score": 74.4,
            "detailed_viability_assessment": { "clusters": {
                "Team": { "Skills": { "Depth": { "assignedScore": 90 } } },
                "Execution": { "Plan": { "Milestones": { "assignedScore": 40 } } }
            }},
            "roadmap": { "current_trl": "TRL-8" }
        }))
        .unwrap()
    }

    fn headless(document: &ReportDocument) -> HeadlessReport {
        build_headless_report(document, &summarize(document, &Thresholds::default()))
    }

    #[test]
    fn headless_json_carries_summary() {
        let report = headless(&document());
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["clusters"][0]["name"], "Team");
        assert_eq!(value["top_performers"][0]["name"], "Depth");
        assert_eq!(value["bottom_performers"][0]["name"], "Milestones");
        assert_eq!(value["roadmap"]["phase"], "Phase 4: Launch");
    }

    #[test]
    fn headless_text_lists_sections() {
        let document = document();
        let text = headless_text(&document, &headless(&document));
        assert!(text.contains("Overall score: 74"));
        assert!(text.contains("- Team: 90"));
        assert!(text.contains("- 40 | Milestones | Execution / Plan"));
        assert!(text.contains("Roadmap: Phase 4: Launch (TRL-8)"));
    }

    #[test]
    fn listing_lines_fall_back_for_missing_fields() {
        let listing: ReportListing = serde_json::from_value(json!({ "id": "r5" })).unwrap();
        assert_eq!(listing_lines(&[listing]), vec!["No date | N/A | Untitled report | r5"]);
    }

    #[tokio::test]
    async fn headless_export_reads_a_saved_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.json");
        let body = json!({
            "_id": "r1",
            "detailed_viability_assessment": { "clusters": {
                "Team": { "Skills": { "Depth": { "assignedScore": 90 } } }
            }}
        });
        std::fs::write(&path, body.to_string()).unwrap();

        let config = AppConfig {
            export_dir: dir.path().join("out"),
            ..AppConfig::default()
        };
        let client = ApiClient::new("http://localhost:8000", std::time::Duration::from_secs(1)).unwrap();
        run_headless(&client, &config, &ReportSource::File(path), false, true)
            .await
            .unwrap();

        assert!(dir.path().join("out/r1-report.txt").exists());
        assert!(dir.path().join("out/r1-radar.svg").exists());
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let client = ApiClient::new("http://localhost:8000", std::time::Duration::from_secs(1)).unwrap();
        let error = run_delete(&client, "r1", false).await.unwrap_err();
        assert!(error.to_string().contains("pass --yes"));
    }

    #[tokio::test]
    async fn upload_rejects_unsupported_files_locally() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.txt");
        std::fs::write(&path, b"hello").unwrap();

        let client = ApiClient::new("http://localhost:8000", std::time::Duration::from_secs(1)).unwrap();
        let error = run_upload(&client, "u1", "Deck", &path).await.unwrap_err();
        assert_eq!(error.to_string(), "Please upload a PDF or PPTX file");
    }
}
