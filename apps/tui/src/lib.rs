//! Terminal client for scored pitch deck reports.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod event;
pub mod export;
pub mod telemetry;
pub mod terminal;
pub mod ui;
