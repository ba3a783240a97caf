use clap::Parser;
use color_eyre::Result;
use pitch_report::api::ApiClient;
use pitch_report::app::{App, AppActions, ReportSource};
use pitch_report::cli::{CliArgs, Command};
use pitch_report::config::init_app_config;
use pitch_report::telemetry::{self, LogTarget, LOG_FILE};
use pitch_report::{event, terminal};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = init_app_config()?;

    let interactive = args.command.is_none() && !args.wants_headless(is_terminal());
    let log_target = if interactive {
        LogTarget::File(LOG_FILE.into())
    } else {
        LogTarget::Stderr
    };
    telemetry::init(&log_target)?;
    tracing::debug!(api_url = %config.api_url, interactive, "starting");

    let client = ApiClient::new(config.api_url.as_str(), config.request_timeout)?;
    let source = args.report.as_deref().map(ReportSource::parse);

    match &args.command {
        Some(Command::List { user_id, sort, json }) => {
            return event::run_list(&client, user_id, *sort, *json).await;
        }
        Some(Command::Upload {
            user_id,
            title,
            file,
        }) => {
            return event::run_upload(&client, user_id, title, file).await;
        }
        Some(Command::Download { report_id }) => {
            return event::run_download(&client, report_id, &config.export_dir).await;
        }
        Some(Command::Delete { report_id, yes }) => {
            return event::run_delete(&client, report_id, *yes).await;
        }
        None => {}
    }

    if !interactive {
        let Some(source) = source else {
            return Err(color_eyre::eyre::eyre!(
                "A report id or JSON file is required in headless mode"
            ));
        };
        return event::run_headless(&client, &config, &source, args.json, args.export).await;
    }

    let mut actions = AppActions::new(&config)?;
    let mut app = App::new(config, source);

    let mut terminal = terminal::setup_terminal()?;
    let result = event::run(&mut terminal, &mut app, &mut actions).await;
    terminal::cleanup_terminal_state(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
