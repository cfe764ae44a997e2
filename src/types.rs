use serde::Serialize;
use tabled::Tabled;

/// One wide row of the uploaded export, before reshaping.
///
/// The file has no header: cell 0 is the email, cell 1 the raw company name,
/// and every further cell is one license slot (possibly empty). Rows with
/// fewer than two columns simply carry no slots.
#[derive(Debug, Clone)]
pub struct AssignmentRecord {
    pub email: String,
    pub raw_company: String,
    pub slots: Vec<String>,
}

/// One (employee, company, license) line after reshaping, with the monthly
/// unit cost joined from the catalog at reshape time. If the catalog changes
/// afterwards, lines stay stale until the pipeline reruns end-to-end.
#[derive(Debug, Clone, PartialEq)]
pub struct CostedLine {
    pub email: String,
    pub company: String,
    pub license: String,
    pub cost: f64,
}

/// Aggregate for one (company, license) group. Kept numeric; the rendered
/// report rows are derived from this.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub company: String,
    pub license: String,
    pub quantity: usize,
    pub total_cost: f64,
}

/// A company × license matrix with a trailing total column and a totals row.
/// Columns are dynamic (one per license code), so rendering goes through
/// `tabled`'s builder rather than a derive.
#[derive(Debug, Clone)]
pub struct PivotTable {
    pub columns: Vec<String>,
    pub total_column: String,
    pub rows: Vec<PivotRow>,
    pub totals_label: String,
    pub totals: PivotRow,
}

#[derive(Debug, Clone)]
pub struct PivotRow {
    pub label: String,
    pub values: Vec<f64>,
    pub total: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PercentageRow {
    #[serde(rename = "License")]
    #[tabled(rename = "License")]
    pub license: String,
    #[serde(rename = "Custo (€)")]
    #[tabled(rename = "Custo (€)")]
    pub cost: String,
    #[serde(rename = "Percentagem")]
    #[tabled(rename = "Percentagem")]
    pub percentage: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct AverageCostRow {
    #[serde(rename = "Empresa")]
    #[tabled(rename = "Empresa")]
    pub company: String,
    #[serde(rename = "Colaboradores")]
    #[tabled(rename = "Colaboradores")]
    pub employees: usize,
    #[serde(rename = "CustoTotal")]
    #[tabled(rename = "CustoTotal")]
    pub total_cost: String,
    #[serde(rename = "CustoMedio")]
    #[tabled(rename = "CustoMedio")]
    pub average_cost: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CostTotalRow {
    #[serde(rename = "Grupo")]
    #[tabled(rename = "Grupo")]
    pub group: String,
    #[serde(rename = "CustoTotal")]
    #[tabled(rename = "CustoTotal")]
    pub total_cost: String,
}

/// Headline metrics for the JSON summary, matching the dashboard cards:
/// companies with licenses, assigned vs total line counts, distinct real
/// employees, and the monthly grand total.
#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub total_companies: usize,
    pub assigned_licenses: usize,
    pub total_licenses: usize,
    pub unique_employees: usize,
    pub total_cost: f64,
    pub avg_cost_per_employee: f64,
    pub generated_at: String,
}
