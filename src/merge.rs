// src/merge.rs

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::NaiveDate;
use tracing::debug;

use crate::process::dates;
use crate::process::{FilingStatement, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    Section,
    Line,
}

/// Identity of one master-sheet row across filings. Equality is exact
/// and case-sensitive; label drift between filings therefore produces
/// distinct rows. That is deliberate: normalizing keys would change
/// observable output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MasterKey {
    pub kind: RowKind,
    pub section: String,
    pub label: String,
}

impl MasterKey {
    fn for_row(row: &Row) -> Self {
        match row {
            Row::Section { name } => Self {
                kind: RowKind::Section,
                section: name.clone(),
                label: String::new(),
            },
            Row::Line { section, label, .. } => Self {
                kind: RowKind::Line,
                section: section.clone(),
                label: label.clone(),
            },
        }
    }
}

/// All filings folded into one sheet: rows in first-seen order, one
/// column per canonical reporting date.
#[derive(Debug, Default)]
pub struct MasterTable {
    row_order: Vec<MasterKey>,
    seen: HashSet<MasterKey>,
    cells: HashMap<MasterKey, BTreeMap<NaiveDate, String>>,
    date_axis: BTreeSet<NaiveDate>,
}

/// Among a line's raw date labels, the one whose canonical date lies
/// closest to `filing_date`. Labels that do not canonicalize to a date
/// are excluded. Equidistant candidates resolve to the later date, so
/// selection is deterministic whatever order the labels arrive in.
fn select_closest_date(
    values: &BTreeMap<String, String>,
    filing_date: NaiveDate,
) -> Option<(&str, NaiveDate)> {
    let mut best: Option<(&str, NaiveDate, i64)> = None;
    for raw in values.keys() {
        let Some(date) = dates::parse_label(raw) else {
            continue;
        };
        let diff = (filing_date - date).num_days().abs();
        let better = match best {
            None => true,
            Some((_, best_date, best_diff)) => {
                diff < best_diff || (diff == best_diff && date > best_date)
            }
        };
        if better {
            best = Some((raw.as_str(), date, diff));
        }
    }
    best.map(|(raw, date, _)| (raw, date))
}

impl MasterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one filing's rows in. Statements must be folded in a fixed
    /// caller-determined order: first-seen row ordering makes the output
    /// sheet depend on it.
    pub fn fold(&mut self, statement: &FilingStatement) {
        debug!(
            filing = %statement.filing_key,
            rows = statement.rows.len(),
            "merging statement"
        );
        for row in &statement.rows {
            let key = MasterKey::for_row(row);
            if self.seen.insert(key.clone()) {
                self.row_order.push(key.clone());
            }

            let Row::Line { values, .. } = row else {
                continue;
            };
            if let Some((raw, canon)) = select_closest_date(values, statement.filing_date) {
                let value = values[raw].clone();
                self.cells.entry(key).or_default().insert(canon, value);
                self.date_axis.insert(canon);
            }
        }
    }

    pub fn merge(statements: &[FilingStatement]) -> Self {
        let mut master = Self::new();
        for s in statements {
            master.fold(s);
        }
        master
    }

    pub fn row_order(&self) -> &[MasterKey] {
        &self.row_order
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.date_axis.iter().copied()
    }

    /// The finished sheet: a header row, then one row per key in
    /// first-seen order. Section rows span the label column only; line
    /// labels are indented two spaces under their section.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let dates: Vec<NaiveDate> = self.date_axis.iter().copied().collect();

        let mut header = vec!["Line / Section".to_string()];
        header.extend(dates.iter().map(|d| d.format("%Y-%m-%d").to_string()));

        let mut out = vec![header];
        for key in &self.row_order {
            let row = match key.kind {
                RowKind::Section => {
                    let mut r = vec![key.section.clone()];
                    r.extend(std::iter::repeat(String::new()).take(dates.len()));
                    r
                }
                RowKind::Line => {
                    let cells = self.cells.get(key);
                    let mut r = vec![format!("  {}", key.label)];
                    r.extend(dates.iter().map(|d| {
                        cells
                            .and_then(|c| c.get(d))
                            .cloned()
                            .unwrap_or_default()
                    }));
                    r
                }
            };
            out.push(row);
        }
        out
    }
}
