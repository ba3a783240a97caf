//! Page slicing for exported reports.
//!
//! The rendered report is treated as one tall image that is cut at fixed
//! page-height increments. There is no attempt to avoid splitting a row or a
//! section across two pages.

use std::ops::Range;

/// Exports are rendered at twice the on-screen width.
pub const EXPORT_SCALE: u16 = 2;

/// Height over width of an A4 page.
const A4_RATIO: f64 = 297.0 / 210.0;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;

/// Page form feed used between pages in text exports.
pub const PAGE_BREAK: char = '\u{000C}';

/// Number of pages needed for `content_height`; always at least one.
pub fn page_count(content_height: usize, page_height: usize) -> usize {
    if page_height == 0 {
        return 1;
    }
    content_height.div_ceil(page_height).max(1)
}

/// Offset into the content at which page `k` starts.
pub fn page_offsets(content_height: usize, page_height: usize) -> Vec<usize> {
    (0..page_count(content_height, page_height))
        .map(|page| page * page_height)
        .collect()
}

/// Content rows covered by each page; the last page may be short.
pub fn row_ranges(content_height: usize, page_height: usize) -> Vec<Range<usize>> {
    if page_height == 0 {
        return vec![0..content_height];
    }
    page_offsets(content_height, page_height)
        .into_iter()
        .map(|start| start..(start + page_height).min(content_height))
        .collect()
}

/// Rows on one A4 page when the export is `width` cells wide.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn page_rows_for_width(width: u16) -> usize {
    let rows = (f64::from(width) * A4_RATIO / CELL_ASPECT).round() as usize;
    rows.max(1)
}

pub const fn export_width(screen_width: u16) -> u16 {
    screen_width.saturating_mul(EXPORT_SCALE)
}

fn safe_id(report_id: &str) -> Option<String> {
    let id = report_id.trim();
    if id.is_empty() {
        return None;
    }
    Some(
        id.chars()
            .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
            .collect(),
    )
}

pub fn export_file_name(report_id: &str) -> String {
    safe_id(report_id).map_or_else(|| "report.txt".to_string(), |id| format!("{id}-report.txt"))
}

/// Name for the radar chart written next to the text export.
pub fn radar_file_name(report_id: &str) -> String {
    safe_id(report_id).map_or_else(|| "radar.svg".to_string(), |id| format!("{id}-radar.svg"))
}

/// Name for a server-rendered PDF download.
pub fn pdf_file_name(report_id: &str) -> String {
    safe_id(report_id).map_or_else(|| "report.pdf".to_string(), |id| format!("report-{id}.pdf"))
}

/// Joins rendered lines into pages separated by form feeds.
pub fn paginate<S: AsRef<str>>(lines: &[S], page_height: usize) -> String {
    let mut out = String::new();
    for (page, range) in row_ranges(lines.len(), page_height).into_iter().enumerate() {
        if page > 0 {
            out.push(PAGE_BREAK);
            out.push('\n');
        }
        for line in &lines[range] {
            out.push_str(line.as_ref());
            out.push('\n');
        }
    }
    out
}
