// src/pipeline.rs

use std::time::Duration;

use anyhow::{bail, Result};
use reqwest::Client;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::extract::{self, RawTable};
use crate::fetch::{self, documents, filings::Filing};
use crate::merge::MasterTable;
use crate::process::{reclassify, segment, FilingStatement};

/// Pause between filings. EDGAR asks automated clients to stay well
/// under 10 requests per second.
const INTER_FILING_DELAY: Duration = Duration::from_secs(1);

/// Everything one run produces: each filing's raw table (for the raw
/// sheets) plus the merged master table.
pub struct PipelineOutput {
    pub raw_sheets: Vec<(String, RawTable)>,
    pub master: MasterTable,
    pub skipped: usize,
}

/// Fetch and segment one filing's statement table.
async fn process_filing(
    client: &Client,
    cfg: &PipelineConfig,
    filing: &Filing,
) -> Result<(RawTable, FilingStatement)> {
    let statement_url =
        documents::locate_statement_url(client, cfg, &filing.accession_nodash()).await?;
    let html = fetch::get_text(client, &statement_url).await?;

    let table = extract::first_data_table(&html, &cfg.exclusion_markers).unwrap_or_default();
    let mut rows = segment::segment(&table);
    reclassify::apply_rules(&cfg.section_rules, &mut rows);

    Ok((
        table,
        FilingStatement {
            filing_key: filing.sheet_name(),
            filing_date: filing.filing_date,
            rows,
        },
    ))
}

/// Process every listed filing in order and merge the survivors.
///
/// A single filing's failure is logged and skipped; the run only fails
/// when no filing at all produced a statement. The merge folds filings
/// in listing order, which fixes the master sheet's row order.
pub async fn run(client: &Client, cfg: &PipelineConfig) -> Result<PipelineOutput> {
    let filings = fetch::filings::list_recent_filings(client, cfg).await?;
    if filings.is_empty() {
        bail!("no recent 10-K/10-Q filings for CIK {}", cfg.cik);
    }

    let mut raw_sheets = Vec::with_capacity(filings.len());
    let mut statements = Vec::with_capacity(filings.len());
    let mut skipped = 0;

    for (i, filing) in filings.iter().enumerate() {
        let name = filing.sheet_name();
        info!(
            filing = %name,
            accession = %filing.accession_number,
            "processing ({}/{})",
            i + 1,
            filings.len()
        );

        match process_filing(client, cfg, filing).await {
            Ok((table, statement)) => {
                info!(filing = %name, rows = statement.rows.len(), "segmented");
                raw_sheets.push((name, table));
                statements.push(statement);
            }
            Err(e) => {
                warn!(filing = %name, error = %e, "skipping filing");
                skipped += 1;
            }
        }

        if i + 1 < filings.len() {
            sleep(INTER_FILING_DELAY).await;
        }
    }

    if statements.is_empty() {
        bail!(
            "no statements extracted from any of {} filings",
            filings.len()
        );
    }

    Ok(PipelineOutput {
        raw_sheets,
        master: MasterTable::merge(&statements),
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(rows: &[&[&str]]) -> RawTable {
        RawTable {
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    /// The in-memory half of the pipeline, end to end: segment a raw
    /// table, apply the section overrides, merge two filings.
    #[test]
    fn segment_reclassify_merge_round() {
        let cfg = PipelineConfig::default();

        let q1 = raw(&[
            &["", "Mar. 31, 2024", "Dec. 31, 2023"],
            &["CURRENT ASSETS:", "", ""],
            &["Cash and cash equivalents", "100", "120"],
            &["LONG-TERM LIABILITIES:", "", ""],
            &["Accrued and other current liabilities", "30", "28"],
        ]);
        let q2 = raw(&[
            &["", "Jun. 30, 2024", "Dec. 31, 2023"],
            &["CURRENT ASSETS:", "", ""],
            &["Cash and cash equivalents", "110", "120"],
        ]);

        let mut statements = Vec::new();
        for (date, table) in [("2024-05-07", &q1), ("2024-08-06", &q2)] {
            let mut rows = segment::segment(table);
            reclassify::apply_rules(&cfg.section_rules, &mut rows);
            statements.push(FilingStatement {
                filing_key: format!("10-Q_{}", date),
                filing_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
                rows,
            });
        }

        let rows = MasterTable::merge(&statements).to_rows();
        assert_eq!(rows[0], vec!["Line / Section", "2024-03-31", "2024-06-30"]);
        assert_eq!(rows[1], vec!["CURRENT ASSETS", "", ""]);
        assert_eq!(rows[2], vec!["  Cash and cash equivalents", "100", "110"]);
        assert_eq!(rows[3], vec!["LONG-TERM LIABILITIES", "", ""]);
        // The override moved the accrued line out of long-term liabilities.
        assert_eq!(
            rows[4],
            vec!["  Accrued and other current liabilities", "30", ""]
        );
    }
}
