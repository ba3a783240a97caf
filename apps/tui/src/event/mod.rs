mod headless;
mod loop_handler;

pub use headless::{
    build_headless_report, run_delete, run_download, run_headless, run_list, run_upload,
};
pub use loop_handler::{run, start_load, ExportEvent, ExportMachine, ExportState};
