// src/process/reclassify.rs

use super::Row;

/// How a rule's pattern is matched against a line label. Matching is
/// case-insensitive either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    Contains,
    Prefix,
}

/// One section override: lines whose label matches `pattern` are moved
/// into `section`, whatever the segmenter inferred structurally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRule {
    pub matcher: Matcher,
    pub pattern: String,
    pub section: String,
}

impl SectionRule {
    pub fn contains(pattern: &str, section: &str) -> Self {
        Self {
            matcher: Matcher::Contains,
            pattern: pattern.to_lowercase(),
            section: section.to_string(),
        }
    }

    pub fn prefix(pattern: &str, section: &str) -> Self {
        Self {
            matcher: Matcher::Prefix,
            pattern: pattern.to_lowercase(),
            section: section.to_string(),
        }
    }

    fn matches(&self, label_lower: &str) -> bool {
        match self.matcher {
            Matcher::Contains => label_lower.contains(&self.pattern),
            Matcher::Prefix => label_lower.starts_with(&self.pattern),
        }
    }

    /// The corrections the EA balance-sheet taxonomy needs. Filings file
    /// these lines under structurally wrong (or absent) headings.
    pub fn default_rules() -> Vec<SectionRule> {
        vec![
            SectionRule::contains("accounts payable", "Current liabilities"),
            SectionRule::contains(
                "accrued and other current liabilities",
                "Current liabilities",
            ),
            SectionRule::prefix("common stock, $0.01 par value", "Post-Statement"),
        ]
    }
}

/// The section a row belongs in after applying `rules` in order (first
/// match wins). `Section` rows keep their own name; unmatched lines keep
/// the section the segmenter inferred.
pub fn reclassify(rules: &[SectionRule], row: &Row) -> String {
    match row {
        Row::Section { name } => name.clone(),
        Row::Line { section, label, .. } => {
            let label_lower = label.to_lowercase();
            rules
                .iter()
                .find(|r| r.matches(&label_lower))
                .map(|r| r.section.clone())
                .unwrap_or_else(|| section.clone())
        }
    }
}

/// Apply [`reclassify`] in place across a whole statement.
pub fn apply_rules(rules: &[SectionRule], rows: &mut [Row]) {
    for row in rows.iter_mut() {
        let new_section = reclassify(rules, row);
        if let Row::Line { section, .. } = row {
            *section = new_section;
        }
    }
}
