// src/export.rs

use std::path::Path;

use std::collections::HashSet;

use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;
use tracing::{info, warn};

use crate::extract::RawTable;
use crate::merge::MasterTable;

/// XLSX caps sheet names at 31 characters.
const MAX_SHEET_NAME_LEN: usize = 31;

pub fn sheet_name(name: &str) -> String {
    name.chars().take(MAX_SHEET_NAME_LEN).collect()
}

/// Truncated sheet name, counter-suffixed until it collides with none of
/// `used`. Two filings with the same form type and date would otherwise
/// produce the same name, and the workbook rejects duplicates.
fn unique_sheet_name(name: &str, used: &HashSet<String>) -> String {
    let base = sheet_name(name);
    if !used.contains(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let suffix = format!("_{}", n);
        let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.chars().count());
        let candidate: String = base.chars().take(keep).chain(suffix.chars()).collect();
        if !used.contains(&candidate) {
            warn!(sheet = %base, renamed = %candidate, "duplicate sheet name");
            return candidate;
        }
        n += 1;
    }
}

fn write_grid(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    rows: &[Vec<String>],
) -> Result<(), rust_xlsxwriter::XlsxError> {
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            worksheet.write_string(r as u32, c as u16, cell)?;
        }
    }
    Ok(())
}

/// Write one sheet per filing's raw table, then the merged master sheet.
/// An empty raw table becomes a single info cell so the sheet still
/// records that the filing was seen.
pub fn write_workbook(
    path: impl AsRef<Path>,
    raw_sheets: &[(String, RawTable)],
    master: &MasterTable,
) -> Result<()> {
    let path = path.as_ref();
    let mut workbook = Workbook::new();

    let mut used = HashSet::new();
    for (name, table) in raw_sheets {
        let sheet = unique_sheet_name(name, &used);
        used.insert(sheet.clone());
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(sheet)
            .with_context(|| format!("naming sheet {:?}", name))?;
        if table.is_empty() {
            worksheet
                .write_string(0, 0, format!("No data for {}", name))
                .context("writing info cell")?;
        } else {
            write_grid(worksheet, &table.rows)
                .with_context(|| format!("writing raw sheet {:?}", name))?;
        }
    }

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("MasterSheet")
        .context("naming master sheet")?;
    write_grid(worksheet, &master.to_rows()).context("writing master sheet")?;

    workbook
        .save(path)
        .with_context(|| format!("saving workbook {}", path.display()))?;
    info!(path = %path.display(), sheets = raw_sheets.len() + 1, "wrote workbook");
    Ok(())
}
