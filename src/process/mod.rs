// src/process/mod.rs

pub mod dates;
pub mod reclassify;
pub mod segment;

use std::collections::BTreeMap;

use chrono::NaiveDate;

/// One typed row of a segmented statement table.
///
/// Every `Line` carries the name of the most recent `Section` emitted
/// above it (empty until the first section is seen), unless an override
/// rule moved it elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Section {
        name: String,
    },
    Line {
        section: String,
        label: String,
        /// Raw date-column header -> cell text. Keys are the header
        /// strings as rendered, not yet canonicalized; a key is present
        /// only when the cell was non-blank.
        values: BTreeMap<String, String>,
    },
}

/// The segmented rows of one filing, paired with its filing date.
/// Built once by the pipeline, consumed once by the merger.
#[derive(Debug, Clone)]
pub struct FilingStatement {
    /// Human identity, e.g. "10-Q_2025-02-05". Also the raw sheet name.
    pub filing_key: String,
    pub filing_date: NaiveDate,
    pub rows: Vec<Row>,
}
