use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use pitch_report_core::listing::SortKey;

#[derive(Debug, Parser)]
#[command(
    name = "pitch-report",
    version,
    about = "Pitch deck report viewer",
    args_conflicts_with_subcommands = true
)]
pub struct CliArgs {
    /// Report id to fetch, or a path to a saved report JSON file
    #[arg(value_name = "REPORT")]
    pub report: Option<String>,

    /// Print the report summary and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless output as JSON
    #[arg(long)]
    pub json: bool,

    /// Write the paginated export and exit
    #[arg(long)]
    pub export: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Override the scoring API base URL
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Override the export output directory
    #[arg(long = "export-dir", value_name = "PATH", global = true)]
    pub export_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the reports generated for a user
    List {
        user_id: String,

        /// Order by creation date or overall score
        #[arg(long, default_value = "date")]
        sort: SortKey,

        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Upload a pitch deck (PDF or PPTX) for scoring
    Upload {
        #[arg(long = "user-id")]
        user_id: String,

        #[arg(long)]
        title: String,

        file: PathBuf,
    },
    /// Download the server-rendered PDF of a report into the export directory
    Download { report_id: String },
    /// Delete a report
    Delete {
        report_id: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.api_url {
            std::env::set_var("REPORT_API_URL", url);
        }
        if let Some(dir) = &self.export_dir {
            std::env::set_var("EXPORT_DIR", dir);
        }
        if self.debug {
            std::env::set_var("PITCH_REPORT_LOG", "debug");
        }
    }

    /// Headless when asked for, or when stdout is not a terminal.
    pub fn wants_headless(&self, stdout_is_terminal: bool) -> bool {
        self.headless || self.json || self.export || !stdout_is_terminal
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_argument_and_flags_parse() {
        let args = CliArgs::try_parse_from(["pitch-report", "abc123", "--json"]).unwrap();
        assert_eq!(args.report.as_deref(), Some("abc123"));
        assert!(args.wants_headless(true));
        assert!(args.command.is_none());
    }

    #[test]
    fn list_subcommand_takes_sort_key() {
        let args =
            CliArgs::try_parse_from(["pitch-report", "list", "founder_01", "--sort", "score"]).unwrap();
        match args.command {
            Some(Command::List { user_id, sort, json }) => {
                assert_eq!(user_id, "founder_01");
                assert_eq!(sort, SortKey::Score);
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn interactive_by_default_on_a_terminal() {
        let args = CliArgs::try_parse_from(["pitch-report", "abc123"]).unwrap();
        assert!(!args.wants_headless(true));
        assert!(args.wants_headless(false));
    }

    #[test]
    fn help_mentions_subcommands() {
        let help = CliArgs::help_text();
        assert!(help.contains("list"));
        assert!(help.contains("upload"));
        assert!(help.contains("download"));
    }

    #[test]
    fn delete_needs_explicit_flag_to_confirm() {
        let args = CliArgs::try_parse_from(["pitch-report", "delete", "r1"]).unwrap();
        assert!(matches!(
            args.command,
            Some(Command::Delete { ref report_id, yes: false }) if report_id == "r1"
        ));
    }
}
