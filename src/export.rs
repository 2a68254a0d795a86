use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::model::Manager;

pub const CSV_FILE_NAME: &str = "fpl-leagues.csv";
pub const XLSX_FILE_NAME: &str = "fpl-leagues.xlsx";
pub const EXPORT_MIME: &str = "text/csv";

pub const CSV_COLUMNS: [&str; 10] = [
    "id",
    "player_name",
    "leagues",
    "md",
    "odds",
    "xG",
    "variance",
    "variability_sd",
    "variability_percent",
    "absolute_variability",
];

/// Fraction to percent with one decimal, halves rounded up (`0.1234` -> `12.3`).
pub fn to_percent(fraction: f64) -> f64 {
    (fraction * 1000.0 + 0.5).floor() / 10.0
}

/// Header line plus one newline-terminated line per manager, in input order.
///
/// Numbers use Rust's shortest round-trip `Display`, never exponent
/// notation: `1e21` is written as `1000000000000000000000` and `1e-7` as
/// `0.0000001`. The value is exact but differs from JavaScript's
/// `Number#toString` at those magnitudes.
pub fn to_csv(managers: &[Manager]) -> String {
    let mut out = String::with_capacity(64 * (managers.len() + 1));
    out.push_str(&CSV_COLUMNS.join(","));
    out.push('\n');
    for m in managers {
        out.push_str(&csv_line(m));
        out.push('\n');
    }
    out
}

fn csv_line(m: &Manager) -> String {
    let s = &m.scores;
    format!(
        "{},{},\"{}\",{},{},{},{},{},{},{}",
        m.id,
        csv_name(&m.player_name),
        league_list(m),
        s.md,
        s.odds,
        s.xg,
        s.variance,
        s.variability.sd,
        to_percent(s.variability.perc),
        s.variability.abs_sd,
    )
}

/// Ascending league ids joined by commas, unquoted.
pub fn league_list(m: &Manager) -> String {
    m.leagues
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

// Names only get quoted when they would break the row.
fn csv_name(name: &str) -> String {
    if name.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", name.replace('"', "\"\""))
    } else {
        name.to_string()
    }
}

pub fn write_csv(dir: &Path, managers: &[Manager]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed creating export dir {}", dir.display()))?;
    let path = dir.join(CSV_FILE_NAME);
    let tmp = path.with_extension("csv.tmp");
    let written = fs::write(&tmp, to_csv(managers))
        .context("write csv export")
        .and_then(|()| fs::rename(&tmp, &path).context("swap csv export"));
    if let Err(err) = written {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    Ok(path)
}

pub fn write_workbook(dir: &Path, managers: &[Manager]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed creating export dir {}", dir.display()))?;
    let path = dir.join(XLSX_FILE_NAME);

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Managers")?;
        write_header(sheet)?;
        for (idx, m) in managers.iter().enumerate() {
            write_manager_row(sheet, idx as u32 + 1, m)?;
        }
    }
    workbook
        .save(&path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(path)
}

fn write_header(sheet: &mut Worksheet) -> Result<()> {
    for (col, title) in CSV_COLUMNS.iter().enumerate() {
        sheet
            .write_string(0, col as u16, *title)
            .with_context(|| format!("write header {title}"))?;
    }
    Ok(())
}

fn write_manager_row(sheet: &mut Worksheet, row: u32, m: &Manager) -> Result<()> {
    let s = &m.scores;
    sheet.write_number(row, 0, m.id as f64)?;
    sheet.write_string(row, 1, &m.player_name)?;
    sheet.write_string(row, 2, league_list(m))?;
    let numbers = [
        s.md,
        s.odds,
        s.xg,
        s.variance,
        s.variability.sd,
        to_percent(s.variability.perc),
        s.variability.abs_sd,
    ];
    for (offset, value) in numbers.into_iter().enumerate() {
        sheet.write_number(row, 3 + offset as u16, value)?;
    }
    Ok(())
}
