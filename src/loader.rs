use crate::catalog::CostCatalog;
use crate::company;
use crate::types::{AssignmentRecord, CostedLine};
use csv::ReaderBuilder;
use std::error::Error;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub parse_errors: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ReshapeReport {
    /// Lines emitted with a cost attached.
    pub lines: usize,
    /// Non-empty slots whose code was not in the catalog. These are excluded
    /// from every aggregate; the count is only reported as a diagnostic.
    pub unmapped: usize,
}

/// Read the wide assignment export: `;`-delimited, no header row, columns
/// `[email, company, slot1, slot2, ...]` with a variable slot count.
///
/// Rows with fewer than two columns are kept (with zero slots) so they show
/// up in `total_rows`; only rows the CSV reader itself rejects count as
/// parse errors.
pub fn read_assignments(
    path: impl AsRef<Path>,
) -> Result<(Vec<AssignmentRecord>, LoadReport), Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut records: Vec<AssignmentRecord> = Vec::new();

    for result in rdr.records() {
        total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => {
                parse_errors += 1;
                continue;
            }
        };
        let email = row.get(0).unwrap_or("").trim().to_string();
        let raw_company = row.get(1).unwrap_or("").to_string();
        let slots: Vec<String> = row.iter().skip(2).map(|s| s.to_string()).collect();
        records.push(AssignmentRecord {
            email,
            raw_company,
            slots,
        });
    }

    let report = LoadReport {
        total_rows,
        parse_errors,
    };
    Ok((records, report))
}

/// Reshape wide records into one costed line per non-empty license slot.
///
/// Company names are normalized, and the unit cost is joined by exact
/// (case-sensitive) catalog lookup. Slots whose code is missing from the
/// catalog are dropped from the output; `ReshapeReport.unmapped` counts them.
pub fn reshape(records: &[AssignmentRecord], catalog: &CostCatalog) -> (Vec<CostedLine>, ReshapeReport) {
    let mut lines: Vec<CostedLine> = Vec::new();
    let mut report = ReshapeReport::default();

    for record in records {
        let company = company::normalize(&record.raw_company);
        for slot in &record.slots {
            let code = slot.trim();
            if code.is_empty() {
                continue;
            }
            match catalog.cost_of(code) {
                Some(cost) => {
                    lines.push(CostedLine {
                        email: record.email.clone(),
                        company: company.clone(),
                        license: code.to_string(),
                        cost,
                    });
                    report.lines += 1;
                }
                None => report.unmapped += 1,
            }
        }
    }

    (lines, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn record(email: &str, company: &str, slots: &[&str]) -> AssignmentRecord {
        AssignmentRecord {
            email: email.to_string(),
            raw_company: company.to_string(),
            slots: slots.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn small_catalog() -> CostCatalog {
        let mut cat = CostCatalog::default();
        // Defaults already include the codes used below; pin one for clarity.
        cat.set("SPE_E3", 31.76).unwrap();
        cat
    }

    #[test]
    fn read_assignments_parses_semicolon_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        fs::write(
            &path,
            "a@tecnovia.pt;\"Farrobo\";SPE_E3;EMS\nb@tecnovia.pt;Continente;SPE_E3;\n",
        )
        .unwrap();
        let (records, report) = read_assignments(&path).unwrap();
        assert_eq!(report.total_rows, 2);
        assert_eq!(report.parse_errors, 0);
        assert_eq!(records[0].email, "a@tecnovia.pt");
        assert_eq!(records[0].slots, vec!["SPE_E3", "EMS"]);
        assert_eq!(records[1].slots, vec!["SPE_E3", ""]);
    }

    #[test]
    fn reshape_expands_slots_and_joins_costs() {
        let cat = small_catalog();
        let records = vec![
            record("e1@x", "Farrobo", &["SPE_E3", "EMS"]),
            record("e2@x", "Farrobo", &["SPE_E3", ""]),
        ];
        let (lines, report) = reshape(&records, &cat);
        assert_eq!(report.lines, 3);
        assert_eq!(report.unmapped, 0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].company, "Tecnovia Madeira");
        assert_eq!(lines[0].license, "SPE_E3");
        assert_eq!(lines[0].cost, 31.76);
        assert_eq!(lines[1].license, "EMS");
    }

    #[test]
    fn unmapped_codes_are_dropped_and_counted() {
        let cat = small_catalog();
        let records = vec![record("e1@x", "Continente", &["SPE_E3", "UNKNOWN_SKU"])];
        let (lines, report) = reshape(&records, &cat);
        assert_eq!(lines.len(), 1);
        assert_eq!(report.unmapped, 1);
        assert!(lines.iter().all(|l| l.license != "UNKNOWN_SKU"));
    }

    #[test]
    fn rows_without_license_columns_yield_no_lines() {
        let cat = small_catalog();
        let records = vec![record("e1@x", "Continente", &[])];
        let (lines, report) = reshape(&records, &cat);
        assert!(lines.is_empty());
        assert_eq!(report.lines, 0);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let cat = small_catalog();
        let records = vec![record("e1@x", "Continente", &["spe_e3"])];
        let (lines, report) = reshape(&records, &cat);
        assert!(lines.is_empty());
        assert_eq!(report.unmapped, 1);
    }
}
