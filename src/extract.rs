// src/extract.rs

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// One rendered statement table: rows of trimmed cell strings, exactly
/// as extracted from the HTML. No header/data distinction is made here;
/// that is the segmenter's job.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Column count, taken as the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn table_rows(table: ElementRef) -> Vec<Vec<String>> {
    let tr = Selector::parse("tr").expect("selector should parse");
    let cell = Selector::parse("th, td").expect("selector should parse");

    table
        .select(&tr)
        .map(|row| {
            row.select(&cell)
                .map(|c| c.text().collect::<String>().trim().to_string())
                .collect()
        })
        .collect()
}

/// The first `<table>` in `html` that is a data table rather than a
/// taxonomy/reference table. A table whose text contains any of the
/// `exclusion_markers` (e.g. "Namespace Prefix:") is an element
/// definition dump and is skipped. Returns `None` when no usable table
/// exists.
pub fn first_data_table(html: &str, exclusion_markers: &[String]) -> Option<RawTable> {
    let doc = Html::parse_document(html);
    let table_sel = Selector::parse("table").expect("selector should parse");

    for (i, table) in doc.select(&table_sel).enumerate() {
        let text: String = table.text().collect::<Vec<_>>().join(" ");
        if exclusion_markers.iter().any(|m| text.contains(m.as_str())) {
            debug!(table = i, "skipping reference table");
            continue;
        }
        let rows = table_rows(table);
        if !rows.is_empty() {
            return Some(RawTable { rows });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Vec<String> {
        vec![
            "Namespace Prefix:".to_string(),
            "Data Type:".to_string(),
            "us-gaap_".to_string(),
        ]
    }

    #[test]
    fn reference_tables_are_skipped() {
        let html = r#"
            <html><body>
            <table>
              <tr><td>Name:</td><td>us-gaap_CashAndCashEquivalents</td></tr>
              <tr><td>Namespace Prefix:</td><td>us-gaap_</td></tr>
            </table>
            <table>
              <tr><th></th><th>Mar. 31, 2024</th><th>Dec. 31, 2023</th></tr>
              <tr><td>Cash</td><td>100</td><td>120</td></tr>
            </table>
            </body></html>
        "#;
        let t = first_data_table(html, &markers()).expect("data table should be found");
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[1], vec!["Cash", "100", "120"]);
    }

    #[test]
    fn cell_text_is_trimmed_and_nested_markup_flattened() {
        let html = r#"
            <table>
              <tr><td>  <b>Cash</b> and equivalents </td><td> 100 </td></tr>
            </table>
        "#;
        let t = first_data_table(html, &markers()).expect("data table should be found");
        assert_eq!(t.rows[0][0], "Cash and equivalents");
        assert_eq!(t.rows[0][1], "100");
    }

    #[test]
    fn document_without_usable_table_yields_none() {
        assert!(first_data_table("<html><body><p>hi</p></body></html>", &markers()).is_none());
        let only_ref = r#"<table><tr><td>Data Type: monetary</td></tr></table>"#;
        assert!(first_data_table(only_ref, &markers()).is_none());
    }

    #[test]
    fn width_is_the_widest_row() {
        let t = RawTable {
            rows: vec![vec!["a".into()], vec!["b".into(), "c".into()]],
        };
        assert_eq!(t.width(), 2);
        assert!(!t.is_empty());
        assert_eq!(RawTable::default().width(), 0);
    }
}
