use std::path::{Path, PathBuf};

use color_eyre::Result;
use pitch_report_core::viewer::LoadTicket;
use pitch_report_core::{ReportDocument, ReportError, ReportSummary};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::api::ApiClient;
use crate::app::state::ReportSource;
use crate::config::AppConfig;
use crate::export::export_report;

/// A finished load, tagged with the ticket it was started for.
pub type LoadResult = (LoadTicket, Result<ReportDocument, ReportError>);

/// Where a finished export was written, or why it failed.
pub type ExportResult = std::result::Result<PathBuf, String>;

/// Side effects of the viewer: fetching documents and writing exports.
#[derive(Debug)]
pub struct AppActions {
    pub client: ApiClient,
    pub export_dir: PathBuf,
    sender: UnboundedSender<LoadResult>,
    receiver: UnboundedReceiver<LoadResult>,
    export_sender: UnboundedSender<ExportResult>,
    export_receiver: UnboundedReceiver<ExportResult>,
}

impl AppActions {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = ApiClient::new(config.api_url.as_str(), config.request_timeout)?;
        let (sender, receiver) = unbounded_channel();
        let (export_sender, export_receiver) = unbounded_channel();
        Ok(Self {
            client,
            export_dir: config.export_dir.clone(),
            sender,
            receiver,
            export_sender,
            export_receiver,
        })
    }

    /// Fetches in the background; the result arrives through [`Self::try_next_result`].
    pub fn spawn_load(&self, ticket: LoadTicket, source: ReportSource) {
        let client = self.client.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let result = load_source(&client, &source).await;
            if sender.send((ticket, result)).is_err() {
                tracing::debug!("viewer closed before the report arrived");
            }
        });
    }

    pub fn try_next_result(&mut self) -> Option<LoadResult> {
        self.receiver.try_recv().ok()
    }

    /// Renders and writes the export on the blocking pool; the outcome arrives
    /// through [`Self::try_next_export`].
    pub fn spawn_export(&self, document: ReportDocument, summary: ReportSummary, width: u16) {
        let dir = self.export_dir.clone();
        let sender = self.export_sender.clone();
        tokio::task::spawn_blocking(move || {
            let result = export_report(&document, &summary, &dir, width).map_err(|e| {
                tracing::error!(error = %e, "export failed");
                e.to_string()
            });
            if sender.send(result).is_err() {
                tracing::debug!("viewer closed before the export finished");
            }
        });
    }

    pub fn try_next_export(&mut self) -> Option<ExportResult> {
        self.export_receiver.try_recv().ok()
    }
}

/// Loads a report from the API or from a saved JSON body.
pub async fn load_source(client: &ApiClient, source: &ReportSource) -> Result<ReportDocument, ReportError> {
    match source {
        ReportSource::Api(id) => client.fetch_report(id).await.map_err(ReportError::from),
        ReportSource::File(path) => load_file(path).await,
    }
}

async fn load_file(path: &Path) -> Result<ReportDocument, ReportError> {
    let body = tokio::fs::read_to_string(path).await.map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "unable to read report file");
        if e.kind() == std::io::ErrorKind::NotFound {
            ReportError::NotFound
        } else {
            ReportError::Transport(e.to_string())
        }
    })?;
    ReportDocument::from_json(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn saved_report_is_parsed() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"_id": "r9", "title": "Saved", "detailed_viability_assessment": {{"clusters": {{}}}}}}"#
        )
        .unwrap();

        let client = ApiClient::new("http://localhost:8000", std::time::Duration::from_secs(1)).unwrap();
        let document = load_source(&client, &ReportSource::File(file.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(document.id, "r9");
        assert_eq!(document.title, "Saved");
    }

    #[tokio::test]
    async fn missing_file_reads_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let client = ApiClient::new("http://localhost:8000", std::time::Duration::from_secs(1)).unwrap();
        let error = load_source(&client, &ReportSource::File(dir.path().join("gone.json")))
            .await
            .unwrap_err();
        assert_eq!(error, ReportError::NotFound);
    }

    #[tokio::test]
    async fn spawned_load_reports_back_with_its_ticket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, r#"{"_id": "r3"}"#).unwrap();

        let mut actions = AppActions::new(&AppConfig::default()).unwrap();
        let mut session = pitch_report_core::ViewerSession::default();
        let ticket = session.begin_load("r3");
        actions.spawn_load(ticket.clone(), ReportSource::File(path));

        let (received, result) = actions.receiver.recv().await.unwrap();
        assert_eq!(received, ticket);
        assert_eq!(result.unwrap().id, "r3");
    }
}
