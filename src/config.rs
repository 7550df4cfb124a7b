// src/config.rs

use crate::process::reclassify::SectionRule;

/// Everything the pipeline needs for one run over one entity. Passed
/// explicitly into each stage so runs over different entities or target
/// phrases need no shared state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Ticker symbol, used only for naming the output workbook.
    pub ticker: String,
    /// Zero-padded 10-digit CIK, e.g. "0000712515".
    pub cik: String,
    /// User-Agent for all EDGAR requests. EDGAR rejects anonymous clients.
    pub user_agent: String,
    /// How many of the most recent 10-K/10-Q filings to process.
    pub filing_count: usize,
    /// Case-insensitive substring matched against report short names.
    pub target_phrase: String,
    /// A table containing any of these markers is a taxonomy/reference
    /// table, not a data table, and is skipped.
    pub exclusion_markers: Vec<String>,
    /// Ordered section overrides applied to segmented line items.
    pub section_rules: Vec<SectionRule>,
    /// Path of the output workbook.
    pub output_path: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ticker: "EA".to_string(),
            cik: "0000712515".to_string(),
            user_agent: "edgarscraper/0.1 (contact@example.com)".to_string(),
            filing_count: 5,
            target_phrase: "balance sheets".to_string(),
            exclusion_markers: vec![
                "Namespace Prefix:".to_string(),
                "Data Type:".to_string(),
                "us-gaap_".to_string(),
            ],
            section_rules: SectionRule::default_rules(),
            output_path: "balance_sheets.xlsx".to_string(),
        }
    }
}

impl PipelineConfig {
    /// CIK with leading zeros stripped, as the Archives URLs expect.
    pub fn cik_short(&self) -> &str {
        let trimmed = self.cik.trim_start_matches('0');
        if trimmed.is_empty() {
            "0"
        } else {
            trimmed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cik_short_strips_leading_zeros() {
        let cfg = PipelineConfig {
            cik: "0000712515".to_string(),
            ..Default::default()
        };
        assert_eq!(cfg.cik_short(), "712515");
    }

    #[test]
    fn cik_short_of_all_zeros_is_zero() {
        let cfg = PipelineConfig {
            cik: "0000000000".to_string(),
            ..Default::default()
        };
        assert_eq!(cfg.cik_short(), "0");
    }
}
