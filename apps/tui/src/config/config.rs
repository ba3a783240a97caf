use color_eyre::eyre::eyre;
use dotenv::dotenv;
use pitch_report_core::navigation::NavigationTimings;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_APP_URL: &str = "http://localhost:5173";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the scoring API.
    pub api_url: String,
    /// Origin of the web app; share links point here.
    pub app_url: String,
    pub export_dir: PathBuf,
    pub timings: NavigationTimings,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            app_url: DEFAULT_APP_URL.to_string(),
            export_dir: PathBuf::from("./exports"),
            timings: NavigationTimings::default(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Initializes the application configuration from `.env` and the environment.
pub fn init_app_config() -> color_eyre::eyre::Result<AppConfig> {
    dotenv().ok();

    let defaults = NavigationTimings::default();
    let timings = NavigationTimings {
        scroll_delay: millis_var("SCROLL_DELAY_MS", defaults.scroll_delay)?,
        highlight: millis_var("HIGHLIGHT_MS", defaults.highlight)?,
    };

    let timeout_secs = parse_number(
        "REQUEST_TIMEOUT_SECS",
        env::var("REQUEST_TIMEOUT_SECS").ok(),
        DEFAULT_TIMEOUT_SECS,
    )?;

    Ok(AppConfig {
        api_url: trimmed_url(env::var("REPORT_API_URL").ok(), DEFAULT_API_URL),
        app_url: trimmed_url(env::var("REPORT_APP_URL").ok(), DEFAULT_APP_URL),
        export_dir: get_export_dir(),
        timings,
        request_timeout: Duration::from_secs(timeout_secs),
    })
}

/// Gets the directory path for writing report exports
pub fn get_export_dir() -> PathBuf {
    env::var("EXPORT_DIR").map_or_else(|_| PathBuf::from("./exports"), PathBuf::from)
}

fn millis_var(name: &str, default: Duration) -> color_eyre::eyre::Result<Duration> {
    #[allow(clippy::cast_possible_truncation)]
    let fallback = default.as_millis() as u64;
    parse_number(name, env::var(name).ok(), fallback).map(Duration::from_millis)
}

fn parse_number(name: &str, raw: Option<String>, default: u64) -> color_eyre::eyre::Result<u64> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|e| eyre!("{name} must be a whole number, got '{value}': {e}")),
    }
}

fn trimmed_url(raw: Option<String>, default: &str) -> String {
    raw.map(|url| url.trim().trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_fall_back_when_unset_or_blank() {
        assert_eq!(parse_number("X", None, 500).unwrap(), 500);
        assert_eq!(parse_number("X", Some("  ".to_string()), 500).unwrap(), 500);
        assert_eq!(parse_number("X", Some("750".to_string()), 500).unwrap(), 750);
    }

    #[test]
    fn invalid_number_names_the_variable() {
        let error = parse_number("HIGHLIGHT_MS", Some("soon".to_string()), 3000).unwrap_err();
        assert!(error.to_string().contains("HIGHLIGHT_MS"));
    }

    #[test]
    fn urls_lose_trailing_slashes() {
        assert_eq!(
            trimmed_url(Some("https://api.example/ ".to_string()), DEFAULT_API_URL),
            "https://api.example"
        );
        assert_eq!(trimmed_url(None, DEFAULT_API_URL), DEFAULT_API_URL);
    }
}
