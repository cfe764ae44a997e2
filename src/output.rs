use crate::types::PivotTable;
use crate::util::format_number;
use serde::Serialize;
use std::error::Error;
use tabled::builder::Builder;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &str, rows: &[T]) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Export a pivot with its dynamic license columns: header row, one record
/// per company, then the totals row.
pub fn write_pivot_csv(path: &str, pivot: &PivotTable, decimals: usize) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    let mut header = vec!["Empresa".to_string()];
    header.extend(pivot.columns.iter().cloned());
    header.push(pivot.total_column.clone());
    wtr.write_record(&header)?;
    for row in pivot.rows.iter().chain(std::iter::once(&pivot.totals)) {
        let mut record = vec![row.label.clone()];
        record.extend(row.values.iter().map(|v| format!("{:.*}", decimals, v)));
        record.push(format!("{:.*}", decimals, row.total));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

/// Console preview of a pivot, totals row included. `decimals` is 2 for
/// money and 0 for counts.
pub fn preview_pivot(pivot: &PivotTable, decimals: usize) {
    if pivot.rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let mut builder = Builder::default();
    let mut header = vec!["Empresa".to_string()];
    header.extend(pivot.columns.iter().cloned());
    header.push(pivot.total_column.clone());
    builder.push_record(header);
    for row in pivot.rows.iter().chain(std::iter::once(&pivot.totals)) {
        let mut record = vec![row.label.clone()];
        record.extend(row.values.iter().map(|v| format_number(*v, decimals)));
        record.push(format_number(row.total, decimals));
        builder.push_record(record);
    }
    let mut table = builder.build();
    table.with(Style::markdown());
    println!("{}\n", table);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::{cost_pivot, summarize};
    use crate::types::CostedLine;

    #[test]
    fn pivot_csv_has_header_company_rows_and_totals() {
        let lines = vec![
            CostedLine {
                email: "e1@x".to_string(),
                company: "A Co".to_string(),
                license: "EMS".to_string(),
                cost: 8.34,
            },
            CostedLine {
                email: "e2@x".to_string(),
                company: "B Co".to_string(),
                license: "SPE_E3".to_string(),
                cost: 31.76,
            },
        ];
        let pivot = cost_pivot(&summarize(&lines));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pivot.csv");
        write_pivot_csv(path.to_str().unwrap(), &pivot, 2).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], "Empresa,EMS,SPE_E3,Total (€)");
        assert_eq!(rows[1], "A Co,8.34,0.00,8.34");
        assert_eq!(rows[3], "Total Geral,8.34,31.76,40.10");
    }
}
