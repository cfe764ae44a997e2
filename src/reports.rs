use crate::surplus::PLACEHOLDER_EMAIL;
use crate::types::{
    AverageCostRow, CostTotalRow, CostedLine, PercentageRow, PivotRow, PivotTable, SummaryRow,
    SummaryStats,
};
use crate::util::format_euros;
use chrono::Local;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Group lines by (company, license) into count and total cost.
///
/// BTreeMap keys keep the output deterministically ordered, so two runs over
/// the same input produce identical aggregates.
pub fn summarize(lines: &[CostedLine]) -> Vec<SummaryRow> {
    let mut map: BTreeMap<(String, String), (usize, f64)> = BTreeMap::new();
    for line in lines {
        let entry = map
            .entry((line.company.clone(), line.license.clone()))
            .or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += line.cost;
    }
    map.into_iter()
        .map(|((company, license), (quantity, total_cost))| SummaryRow {
            company,
            license,
            quantity,
            total_cost,
        })
        .collect()
}

fn distinct_sorted<'a>(
    summary: &'a [SummaryRow],
    f: impl Fn(&'a SummaryRow) -> &'a str,
) -> Vec<String> {
    let set: BTreeSet<&str> = summary.iter().map(f).collect();
    set.into_iter().map(str::to_string).collect()
}

fn build_pivot(
    summary: &[SummaryRow],
    value: impl Fn(&SummaryRow) -> f64,
    total_column: &str,
    totals_label: &str,
) -> PivotTable {
    let columns = distinct_sorted(summary, |r| r.license.as_str());
    let companies = distinct_sorted(summary, |r| r.company.as_str());

    let mut cells: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for row in summary {
        *cells
            .entry((row.company.as_str(), row.license.as_str()))
            .or_insert(0.0) += value(row);
    }

    let rows: Vec<PivotRow> = companies
        .iter()
        .map(|company| {
            let values: Vec<f64> = columns
                .iter()
                .map(|license| {
                    cells
                        .get(&(company.as_str(), license.as_str()))
                        .copied()
                        .unwrap_or(0.0)
                })
                .collect();
            let total = values.iter().sum();
            PivotRow {
                label: company.clone(),
                values,
                total,
            }
        })
        .collect();

    // Column sums over the company rows only; the totals row never feeds
    // back into its own aggregation.
    let totals_values: Vec<f64> = (0..columns.len())
        .map(|i| rows.iter().map(|r| r.values[i]).sum())
        .collect();
    let totals = PivotRow {
        label: totals_label.to_string(),
        total: totals_values.iter().sum(),
        values: totals_values,
    };

    PivotTable {
        columns,
        total_column: total_column.to_string(),
        rows,
        totals_label: totals_label.to_string(),
        totals,
    }
}

/// Company × license matrix of total cost, with a `Total (€)` column and a
/// `Total Geral` row.
pub fn cost_pivot(summary: &[SummaryRow]) -> PivotTable {
    build_pivot(summary, |r| r.total_cost, "Total (€)", "Total Geral")
}

/// Same shape as the cost pivot, carrying license counts instead.
pub fn quantity_pivot(summary: &[SummaryRow]) -> PivotTable {
    build_pivot(summary, |r| r.quantity as f64, "Total Licenças", "Nº de Licenças")
}

/// Each license's share of one company's total cost. Percentages sum to 100
/// (modulo rounding); a company with zero total cost gets 0% rows rather
/// than NaN, and an unknown company yields no rows.
pub fn percentage_breakdown(summary: &[SummaryRow], company: &str) -> Vec<PercentageRow> {
    let rows: Vec<&SummaryRow> = summary.iter().filter(|r| r.company == company).collect();
    let company_total: f64 = rows.iter().map(|r| r.total_cost).sum();
    rows.iter()
        .map(|r| {
            let pct = if company_total > 0.0 {
                (r.total_cost / company_total) * 100.0
            } else {
                0.0
            };
            PercentageRow {
                license: r.license.clone(),
                cost: format_euros(r.total_cost),
                percentage: format!("{:.1}%", pct),
            }
        })
        .collect()
}

/// Per company: total cost divided by the distinct real employees holding a
/// license there. The surplus placeholder never counts as an employee, and
/// companies with zero real employees are left out rather than divided by
/// zero.
pub fn average_cost_report(lines: &[CostedLine]) -> Vec<AverageCostRow> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    let mut employees: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();
    for line in lines {
        *totals.entry(line.company.as_str()).or_insert(0.0) += line.cost;
        if line.email != PLACEHOLDER_EMAIL {
            employees
                .entry(line.company.as_str())
                .or_default()
                .insert(line.email.as_str());
        }
    }
    totals
        .into_iter()
        .filter_map(|(company, total_cost)| {
            let count = employees.get(company).map_or(0, HashSet::len);
            if count == 0 {
                return None;
            }
            Some(AverageCostRow {
                company: company.to_string(),
                employees: count,
                total_cost: format_euros(total_cost),
                average_cost: format_euros(total_cost / count as f64),
            })
        })
        .collect()
}

/// Total cost per license code across all companies (the per-license chart).
pub fn cost_by_license(summary: &[SummaryRow]) -> Vec<CostTotalRow> {
    let mut map: BTreeMap<&str, f64> = BTreeMap::new();
    for row in summary {
        *map.entry(row.license.as_str()).or_insert(0.0) += row.total_cost;
    }
    map.into_iter()
        .map(|(license, cost)| CostTotalRow {
            group: license.to_string(),
            total_cost: format_euros(cost),
        })
        .collect()
}

/// Total cost per company across all licenses (the per-company chart).
pub fn cost_by_company(summary: &[SummaryRow]) -> Vec<CostTotalRow> {
    let mut map: BTreeMap<&str, f64> = BTreeMap::new();
    for row in summary {
        *map.entry(row.company.as_str()).or_insert(0.0) += row.total_cost;
    }
    map.into_iter()
        .map(|(company, cost)| CostTotalRow {
            group: company.to_string(),
            total_cost: format_euros(cost),
        })
        .collect()
}

/// Per-company cost of one chosen license (the drill-down chart). Empty
/// when the license does not appear in the summary.
pub fn cost_of_license_by_company(summary: &[SummaryRow], license: &str) -> Vec<CostTotalRow> {
    summary
        .iter()
        .filter(|r| r.license == license)
        .map(|r| CostTotalRow {
            group: r.company.clone(),
            total_cost: format_euros(r.total_cost),
        })
        .collect()
}

/// Headline metrics over the final line set (surplus included).
pub fn generate_summary(lines: &[CostedLine]) -> SummaryStats {
    let companies: HashSet<&str> = lines.iter().map(|l| l.company.as_str()).collect();
    let assigned = lines
        .iter()
        .filter(|l| l.email != PLACEHOLDER_EMAIL)
        .count();
    let employees: HashSet<&str> = lines
        .iter()
        .filter(|l| l.email != PLACEHOLDER_EMAIL)
        .map(|l| l.email.as_str())
        .collect();
    let total_cost: f64 = lines.iter().map(|l| l.cost).sum();
    let avg_cost_per_employee = if employees.is_empty() {
        0.0
    } else {
        total_cost / employees.len() as f64
    };
    SummaryStats {
        total_companies: companies.len(),
        assigned_licenses: assigned,
        total_licenses: lines.len(),
        unique_employees: employees.len(),
        total_cost,
        avg_cost_per_employee,
        generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}
