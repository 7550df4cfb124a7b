// src/process/segment.rs

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::Row;
use crate::extract::RawTable;

/// Rendered statement tables carry no markup distinguishing section
/// headings from data rows, so segmentation leans on layout heuristics.
/// The thresholds below are tuned against real filings; taxonomy drift
/// should be absorbed by retuning them, not by rewriting the walk.

/// How many leading rows to scan for the date-header row.
const DATE_HEADER_SCAN_ROWS: usize = 3;
/// A section heading has at most this many non-blank cells.
const SECTION_MAX_NON_EMPTY: usize = 2;
/// A section heading's label is mostly uppercase: alphabetic characters
/// must exceed this uppercase ratio (unless the label ends with a colon).
const SECTION_CAPS_RATIO: f64 = 0.7;

/// A cell that looks like part of a date header: a 4-digit year in
/// 1900..=2099 or a 3-letter month abbreviation.
static DATE_ISH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(20\d{2}|19\d{2}|Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)").unwrap()
});

fn mostly_caps(s: &str) -> bool {
    let alpha: Vec<char> = s.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    if alpha.is_empty() {
        return false;
    }
    let upper = alpha.iter().filter(|c| c.is_ascii_uppercase()).count();
    upper as f64 / alpha.len() as f64 > SECTION_CAPS_RATIO
}

/// Index of the date-header row: the first of the leading rows where at
/// least half the cells look date-ish, defaulting to row 0.
///
/// The threshold runs against the full table width, not the row's own
/// cell count: HTML rows come out ragged (a colspan title row extracts
/// as a single cell), and a short row must not pass on its own shrunken
/// denominator.
fn find_date_header_row(table: &RawTable) -> usize {
    let width = table.width();
    for (i, row) in table.rows.iter().take(DATE_HEADER_SCAN_ROWS).enumerate() {
        let date_count = row.iter().filter(|cell| DATE_ISH.is_match(cell)).count();
        if date_count >= width / 2 {
            return i;
        }
    }
    0
}

/// Segment a raw statement table into typed section/line rows.
///
/// Tables with fewer than two columns, or no rows at all, segment to
/// nothing; that is "no data for this filing", not an error.
pub fn segment(table: &RawTable) -> Vec<Row> {
    if table.rows.is_empty() || table.width() < 2 {
        return Vec::new();
    }

    let header_row = find_date_header_row(table);
    let date_labels: Vec<String> = table.rows[header_row]
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    debug!(header_row, columns = date_labels.len(), "segmenting table");

    let mut out = Vec::new();
    let mut current_section = String::new();

    for (row_i, row) in table.rows.iter().enumerate().skip(header_row + 1) {
        if row.is_empty() {
            continue;
        }

        let label = row[0].trim();
        let non_empty = row.iter().filter(|c| !c.trim().is_empty()).count();

        if non_empty <= SECTION_MAX_NON_EMPTY && (mostly_caps(label) || label.ends_with(':')) {
            current_section = label.trim_end_matches(':').to_string();
            out.push(Row::Section {
                name: current_section.clone(),
            });
            continue;
        }

        let mut values = BTreeMap::new();
        for (col_i, cell) in row.iter().enumerate().skip(1) {
            if let Some(dlabel) = date_labels.get(col_i) {
                let val = cell.trim();
                if !val.is_empty() {
                    values.insert(dlabel.clone(), val.to_string());
                }
            }
        }

        let label = if label.is_empty() {
            format!("Line_{}", row_i)
        } else {
            label.to_string()
        };
        out.push(Row::Line {
            section: current_section.clone(),
            label,
            values,
        });
    }

    out
}
