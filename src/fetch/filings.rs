// src/fetch/filings.rs

use std::fmt;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::get_json;
use crate::config::PipelineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormType {
    TenK,
    TenQ,
}

impl FormType {
    fn from_label(form: &str) -> Option<Self> {
        match form.trim().to_uppercase().as_str() {
            "10-K" => Some(Self::TenK),
            "10-Q" => Some(Self::TenQ),
            _ => None,
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TenK => write!(f, "10-K"),
            Self::TenQ => write!(f, "10-Q"),
        }
    }
}

/// One annual or quarterly filing, as listed by the submissions feed.
#[derive(Debug, Clone)]
pub struct Filing {
    pub form_type: FormType,
    pub accession_number: String,
    pub filing_date: NaiveDate,
}

impl Filing {
    /// Accession number without dashes, as the Archives paths want it.
    pub fn accession_nodash(&self) -> String {
        self.accession_number.replace('-', "")
    }

    /// Human identity, also used as the raw sheet name.
    pub fn sheet_name(&self) -> String {
        format!("{}_{}", self.form_type, self.filing_date.format("%Y-%m-%d"))
    }
}

/// The submissions feed keeps recent filings as parallel arrays.
#[derive(Debug, Deserialize)]
struct Submissions {
    filings: Filings,
}

#[derive(Debug, Deserialize)]
struct Filings {
    recent: RecentFilings,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecentFilings {
    form: Vec<String>,
    accession_number: Vec<String>,
    filing_date: Vec<String>,
}

fn filings_from_recent(recent: &RecentFilings, count: usize) -> Result<Vec<Filing>> {
    let mut out = Vec::with_capacity(count);
    for ((form, acc), fdate) in recent
        .form
        .iter()
        .zip(&recent.accession_number)
        .zip(&recent.filing_date)
    {
        let Some(form_type) = FormType::from_label(form) else {
            continue;
        };
        let filing_date = NaiveDate::parse_from_str(fdate, "%Y-%m-%d")
            .with_context(|| format!("Bad filing date {:?} for {}", fdate, acc))?;
        out.push(Filing {
            form_type,
            accession_number: acc.clone(),
            filing_date,
        });
        if out.len() >= count {
            break;
        }
    }
    Ok(out)
}

/// The most recent `filing_count` 10-K/10-Q filings for the configured
/// entity, newest first (the feed is already ordered that way).
#[instrument(level = "info", skip(client, cfg), fields(cik = %cfg.cik))]
pub async fn list_recent_filings(client: &Client, cfg: &PipelineConfig) -> Result<Vec<Filing>> {
    let url = format!("https://data.sec.gov/submissions/CIK{}.json", cfg.cik);
    let subs: Submissions = get_json(client, &url).await?;
    let filings = filings_from_recent(&subs.filings.recent, cfg.filing_count)?;
    debug!(count = filings.len(), "listed filings");
    Ok(filings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "cik": "712515",
        "filings": {
            "recent": {
                "form": ["8-K", "10-Q", "4", "10-K", "10-Q"],
                "accessionNumber": [
                    "0000712515-25-000010",
                    "0000712515-25-000009",
                    "0000712515-25-000008",
                    "0000712515-24-000030",
                    "0000712515-24-000020"
                ],
                "filingDate": [
                    "2025-02-10",
                    "2025-02-05",
                    "2025-01-15",
                    "2024-05-22",
                    "2024-02-06"
                ]
            }
        }
    }"#;

    #[test]
    fn only_annual_and_quarterly_forms_are_kept() {
        let subs: Submissions = serde_json::from_str(SAMPLE).unwrap();
        let filings = filings_from_recent(&subs.filings.recent, 5).unwrap();
        assert_eq!(filings.len(), 3);
        assert_eq!(filings[0].form_type, FormType::TenQ);
        assert_eq!(filings[1].form_type, FormType::TenK);
        assert_eq!(
            filings[0].filing_date,
            NaiveDate::from_ymd_opt(2025, 2, 5).unwrap()
        );
    }

    #[test]
    fn count_caps_the_result() {
        let subs: Submissions = serde_json::from_str(SAMPLE).unwrap();
        let filings = filings_from_recent(&subs.filings.recent, 2).unwrap();
        assert_eq!(filings.len(), 2);
        assert_eq!(filings[1].accession_number, "0000712515-24-000030");
    }

    #[test]
    fn accession_and_sheet_name_formatting() {
        let f = Filing {
            form_type: FormType::TenQ,
            accession_number: "0000712515-25-000009".to_string(),
            filing_date: NaiveDate::from_ymd_opt(2025, 2, 5).unwrap(),
        };
        assert_eq!(f.accession_nodash(), "000071251525000009");
        assert_eq!(f.sheet_name(), "10-Q_2025-02-05");
    }
}
