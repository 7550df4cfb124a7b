// src/fetch/documents.rs

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use tracing::{debug, instrument, trace};
use url::Url;

use super::{get_json, get_text};
use crate::config::PipelineConfig;

const FILING_SUMMARY: &str = "FilingSummary.xml";

/// The filing's document manifest, from its `index.json`.
#[derive(Debug, Deserialize)]
pub struct FilingIndex {
    directory: Directory,
}

#[derive(Debug, Deserialize)]
struct Directory {
    name: String,
    #[serde(default)]
    item: Vec<DirectoryItem>,
}

#[derive(Debug, Deserialize)]
struct DirectoryItem {
    name: String,
}

impl FilingIndex {
    /// URL of the FilingSummary.xml listed in the manifest, if any.
    pub fn filing_summary_url(&self) -> Option<String> {
        let dir = self.directory.name.trim_matches('/');
        if dir.is_empty() {
            return None;
        }
        self.directory
            .item
            .iter()
            .find(|item| item.name == FILING_SUMMARY)
            .map(|item| format!("https://www.sec.gov/{}/{}", dir, item.name))
    }
}

/// Pick the report whose short name contains `target_phrase`
/// (case-insensitive) out of a FilingSummary document, returning its
/// HTML file name.
///
/// FilingSummary.xml is simple enough that the lenient HTML parser
/// handles it; tag names come out lowercased, so the selectors below
/// are lowercase too.
pub fn find_report_html_file(summary_xml: &str, target_phrase: &str) -> Option<String> {
    let doc = Html::parse_document(summary_xml);
    let report_sel = Selector::parse("report").expect("selector should parse");
    let short_name_sel = Selector::parse("shortname").expect("selector should parse");
    let html_file_sel = Selector::parse("htmlfilename").expect("selector should parse");

    let phrase_lower = target_phrase.to_lowercase();
    for report in doc.select(&report_sel) {
        let Some(short_name) = report.select(&short_name_sel).next() else {
            continue;
        };
        let short_name = short_name.text().collect::<String>();
        trace!(short_name = %short_name.trim(), "report");
        if !short_name.trim().to_lowercase().contains(&phrase_lower) {
            continue;
        }
        if let Some(html_file) = report.select(&html_file_sel).next() {
            let file = html_file.text().collect::<String>().trim().to_string();
            if !file.is_empty() {
                return Some(file);
            }
        }
    }
    None
}

/// Resolve the statement URL for one filing: manifest -> FilingSummary ->
/// the report whose short name matches the configured target phrase.
#[instrument(level = "info", skip(client, cfg), fields(accession = %accession_nodash))]
pub async fn locate_statement_url(
    client: &Client,
    cfg: &PipelineConfig,
    accession_nodash: &str,
) -> Result<String> {
    let index_url = format!(
        "https://www.sec.gov/Archives/edgar/data/{}/{}/index.json",
        cfg.cik_short(),
        accession_nodash
    );
    let index: FilingIndex = get_json(client, &index_url).await?;

    let summary_url = index
        .filing_summary_url()
        .ok_or_else(|| anyhow!("{} not listed in {}", FILING_SUMMARY, index_url))?;
    debug!(%summary_url, "found filing summary");

    let summary_xml = get_text(client, &summary_url).await?;
    let html_file = find_report_html_file(&summary_xml, &cfg.target_phrase).ok_or_else(|| {
        anyhow!(
            "no report matching {:?} in {}",
            cfg.target_phrase,
            summary_url
        )
    })?;

    let statement_url = Url::parse(&summary_url)
        .and_then(|u| u.join(&html_file))
        .with_context(|| format!("resolving {} against {}", html_file, summary_url))?;
    Ok(statement_url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filing_summary_url_is_built_from_the_manifest() {
        let index: FilingIndex = serde_json::from_str(
            r#"{
                "directory": {
                    "name": "/Archives/edgar/data/712515/000071251525000009",
                    "item": [
                        {"name": "ea-20241231.htm"},
                        {"name": "FilingSummary.xml"},
                        {"name": "R2.htm"}
                    ]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(
            index.filing_summary_url().unwrap(),
            "https://www.sec.gov/Archives/edgar/data/712515/000071251525000009/FilingSummary.xml"
        );
    }

    #[test]
    fn missing_summary_or_empty_directory_yields_none() {
        let no_summary: FilingIndex = serde_json::from_str(
            r#"{"directory": {"name": "Archives/x", "item": [{"name": "a.htm"}]}}"#,
        )
        .unwrap();
        assert!(no_summary.filing_summary_url().is_none());

        let no_dir: FilingIndex =
            serde_json::from_str(r#"{"directory": {"name": "", "item": []}}"#).unwrap();
        assert!(no_dir.filing_summary_url().is_none());
    }

    const SUMMARY: &str = r#"
        <FilingSummary>
          <MyReports>
            <Report>
              <ShortName>Cover Page</ShortName>
              <HtmlFileName>R1.htm</HtmlFileName>
            </Report>
            <Report>
              <ShortName>CONDENSED CONSOLIDATED BALANCE SHEETS</ShortName>
              <HtmlFileName>R2.htm</HtmlFileName>
            </Report>
            <Report>
              <ShortName>Condensed Consolidated Balance Sheets (Parenthetical)</ShortName>
              <HtmlFileName>R3.htm</HtmlFileName>
            </Report>
          </MyReports>
        </FilingSummary>
    "#;

    #[test]
    fn first_matching_report_is_selected_case_insensitively() {
        assert_eq!(
            find_report_html_file(SUMMARY, "balance sheets").as_deref(),
            Some("R2.htm")
        );
    }

    #[test]
    fn no_matching_report_yields_none() {
        assert!(find_report_html_file(SUMMARY, "statements of cash flows").is_none());
        assert!(find_report_html_file("<FilingSummary/>", "balance sheets").is_none());
    }
}
