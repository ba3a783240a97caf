//! Core of the pitch report viewer, shared by the terminal and web clients.
//!
//! Nothing in this crate performs I/O or reads a clock; the clients fetch
//! documents and pass the elapsed time in.

pub mod aggregate;
pub mod error;
pub mod export;
pub mod listing;
pub mod model;
pub mod navigation;
pub mod radar;
pub mod roadmap;
pub mod score;
pub mod share;
pub mod upload;
pub mod viewer;

pub use aggregate::{
    cluster_chart_data, extract_top_bottom, summarize, ClusterScore, Performers, ReportSummary,
    Thresholds, TopBottomEntry,
};
pub use error::ReportError;
pub use model::{ParameterKey, ReportDocument};
pub use navigation::{FocusTarget, NavigationController, NavigationEvent, NavigationTimings};
pub use radar::{RadarChart, RadarLayout};
pub use viewer::{LoadTicket, ViewerSession, ViewerState};
