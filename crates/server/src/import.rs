//! CSV import of name records.
//!
//! Two header layouts are understood:
//!
//! - the case-register export: `First Name (Roman)`, `Middle Name (Roman)`,
//!   `Last Name (Roman)`, `Alternative Roman Spellings`, the same three name
//!   columns in Devanagari, `Gender` (1 = male), `age`, `caseType`,
//!   `caseFIR`, `location`
//! - a flat layout: `name`, `age`, `gender`, `caseType`, `caseFIR`, `location`

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use namefind_common::record::{clean_field, Gender, NameRecord};

#[derive(Debug, Default)]
pub struct CsvImport {
    pub records: Vec<NameRecord>,
    /// Rows without a usable name.
    pub skipped: usize,
}

pub fn read_csv_file(path: &Path, today: NaiveDate) -> Result<CsvImport> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    read_csv(file, today).with_context(|| format!("reading {}", path.display()))
}

/// Parse records, generating case references for rows without one.
pub fn read_csv<R: Read>(reader: R, today: NaiveDate) -> Result<CsvImport> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: HashMap<String, usize> = rdr
        .headers()
        .context("reading CSV header")?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim_start_matches('\u{feff}').to_string(), i))
        .collect();

    let layout = if columns.contains_key(FIRST_ROMAN) {
        Layout::Register
    } else if columns.contains_key("name") {
        Layout::Flat
    } else {
        bail!("CSV header has neither a `name` nor a `{FIRST_ROMAN}` column");
    };

    let mut out = CsvImport::default();
    for (line, row) in rdr.records().enumerate() {
        let row = match row {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("skipping CSV row {}: {e}", line + 2);
                out.skipped += 1;
                continue;
            }
        };
        let cell = |name: &str| {
            columns.get(name).and_then(|&i| row.get(i)).filter(|s| !s.is_empty())
        };

        match layout.record(&cell) {
            Some(mut record) => {
                record.ensure_case_fir(today);
                out.records.push(record);
            }
            None => {
                tracing::debug!("skipping CSV row {}: no name", line + 2);
                out.skipped += 1;
            }
        }
    }
    Ok(out)
}

const FIRST_ROMAN: &str = "First Name (Roman)";
const ROMAN_PARTS: [&str; 3] = [FIRST_ROMAN, "Middle Name (Roman)", "Last Name (Roman)"];
const DEVANAGARI_PARTS: [&str; 3] = [
    "First Name (Devanagari)",
    "Middle Name (Devanagari)",
    "Last Name (Devanagari)",
];
const ALT_SPELLINGS: &str = "Alternative Roman Spellings";

#[derive(Clone, Copy)]
enum Layout {
    Register,
    Flat,
}

impl Layout {
    fn record<'r>(self, cell: &dyn Fn(&str) -> Option<&'r str>) -> Option<NameRecord> {
        let (name, alternate_names, gender) = match self {
            Layout::Register => {
                let name = join_parts(cell, &ROMAN_PARTS);
                let mut alts: Vec<String> = cell(ALT_SPELLINGS)
                    .map(|s| {
                        s.split([',', ';', '|'])
                            .filter_map(|a| clean_field(Some(a)))
                            .collect()
                    })
                    .unwrap_or_default();
                let devanagari = join_parts(cell, &DEVANAGARI_PARTS);
                if !devanagari.is_empty() {
                    alts.push(devanagari);
                }
                (name, alts, cell("Gender"))
            }
            Layout::Flat => {
                let name = cell("name").map(str::to_string).unwrap_or_default();
                (name, Vec::new(), cell("gender"))
            }
        };

        // Fall back to the first alternate when the primary name is blank.
        let (name, alternate_names) = if name.trim().is_empty() {
            let mut alts = alternate_names.into_iter();
            (alts.next()?, alts.collect())
        } else {
            (name, alternate_names)
        };

        Some(NameRecord {
            name,
            alternate_names,
            age: cell("age").map(clean_age),
            gender: gender.map(Gender::parse).unwrap_or_default(),
            case_type: clean_field(cell("caseType")),
            case_fir: clean_field(cell("caseFIR")),
            location: clean_field(cell("location")),
        })
    }
}

fn join_parts<'r>(cell: &dyn Fn(&str) -> Option<&'r str>, parts: &[&str]) -> String {
    parts
        .iter()
        .filter_map(|&p| cell(p))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Spreadsheet exports write integral ages as `34.0`.
fn clean_age(s: &str) -> String {
    s.strip_suffix(".0").unwrap_or(s).to_string()
}
