#[allow(clippy::module_inception)]
mod config;

pub use config::{get_export_dir, init_app_config, AppConfig};
