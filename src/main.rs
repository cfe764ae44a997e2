// Entry point and high-level CLI flow.
//
// The binary mirrors the original licensing dashboard:
// - Option [1] loads the `;`-delimited assignment export, printing diagnostics.
// - Option [2] edits license unit costs and optionally saves them.
// - Option [3] configures purchased-but-unassigned licenses.
// - Option [4] reruns the whole pipeline end-to-end with the current catalog
//   and selections, writes the report CSVs plus a JSON summary, and prints
//   Markdown previews.
mod catalog;
mod company;
mod loader;
mod output;
mod reports;
mod surplus;
mod types;
mod util;

use catalog::{CostCatalog, COSTS_FILE};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Mutex;
use types::AssignmentRecord;

// Simple in-memory app state: the wide records load once, but reports can be
// regenerated many times as costs and surplus selections change.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        records: None,
        catalog: CostCatalog::load(COSTS_FILE),
        selections: None,
        surplus_company: None,
    })
});

struct AppState {
    records: Option<Vec<AssignmentRecord>>,
    catalog: CostCatalog,
    selections: Option<BTreeMap<String, u32>>,
    surplus_company: Option<String>,
}

fn prompt(label: &str) -> String {
    print!("{}", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Read a single line of input after printing the common "Enter choice:"
/// prompt. Reused for the main menu and simple numeric inputs.
fn read_choice() -> String {
    prompt("Enter choice: ")
}

/// Ask the user whether to go back to the menu after generating reports.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        match prompt("Back to menu (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load the assignment export.
///
/// On success the wide records are stored in `APP_STATE`; reshaping happens
/// on every report run so cost edits always apply.
fn handle_load() {
    let path = match prompt("CSV file path [license_assignments.csv]: ").as_str() {
        "" => "license_assignments.csv".to_string(),
        p => p.to_string(),
    };
    match loader::read_assignments(&path) {
        Ok((records, report)) => {
            println!(
                "Processing export... ({} rows loaded)",
                util::format_int(report.total_rows as i64)
            );
            if report.parse_errors > 0 {
                println!(
                    "Note: {} rows skipped due to parse errors.",
                    util::format_int(report.parse_errors as i64)
                );
            }
            println!("");
            let mut state = APP_STATE.lock().unwrap();
            state.records = Some(records);
        }
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

/// Handle option [2]: edit unit costs, then optionally persist them.
fn handle_edit_costs() {
    let mut state = APP_STATE.lock().unwrap();
    println!("Current costs (€/month):");
    for (code, cost) in state.catalog.iter() {
        println!("  {} = {}", code, util::format_number(cost, 2));
    }
    println!("Enter `CODE VALUE` to change a cost, blank line to finish.");
    loop {
        let input = prompt("> ");
        if input.is_empty() {
            break;
        }
        let mut parts = input.split_whitespace();
        let code = parts.next().unwrap_or("").to_string();
        let Some(value) = util::parse_f64_safe(parts.next()) else {
            println!("Invalid entry. Use e.g. `SPE_E3 29.99`.");
            continue;
        };
        if value < 0.0 {
            println!("Cost must be non-negative.");
            continue;
        }
        if !state.catalog.contains(&code) {
            println!("Note: {} is a new license code.", code);
        }
        if let Err(e) = state.catalog.set(&code, value) {
            println!("Rejected: {}", e);
        }
    }
    if prompt("Save costs to license_costs.json (Y/N): ").to_uppercase() == "Y" {
        match state.catalog.save(COSTS_FILE) {
            Ok(()) => println!("Costs saved.\n"),
            Err(e) => eprintln!("Failed to save costs: {}\n", e),
        }
    } else {
        println!("Costs kept for this session only.\n");
    }
}

/// Handle option [3]: choose the company that receives unassigned licenses
/// and the quantity per license code.
fn handle_surplus() {
    let mut state = APP_STATE.lock().unwrap();
    let company = prompt("Company receiving unassigned licenses: ");
    if company.is_empty() {
        println!("No company chosen; surplus selections unchanged.\n");
        return;
    }
    // Aliases resolve here too, so `Farrobo` lands under `Tecnovia Madeira`
    // instead of creating a separate company.
    let company = company::normalize(&company);
    let mut selections = state
        .selections
        .clone()
        .unwrap_or_else(|| surplus::default_selections(&state.catalog));
    println!("Quantity per license (blank keeps the shown value):");
    let codes: Vec<String> = selections.keys().cloned().collect();
    for code in codes {
        let current = selections[&code];
        let input = prompt(&format!("  {} [{}]: ", code, current));
        if input.is_empty() {
            continue;
        }
        match util::parse_u32_safe(Some(&input)) {
            Some(qty) => {
                selections.insert(code, qty);
            }
            None => println!("  Invalid quantity, keeping {}.", current),
        }
    }
    state.selections = Some(selections);
    state.surplus_company = Some(company);
    println!("");
}

/// Handle option [4]: run the pipeline end-to-end and emit all reports.
///
/// This function is intentionally side-effectful:
/// - writes three CSV files and a JSON summary,
/// - and prints Markdown previews of each report to the console.
fn handle_generate_reports() {
    let (records, catalog, selections, surplus_company) = {
        let state = APP_STATE.lock().unwrap();
        (
            state.records.clone(),
            state.catalog.clone(),
            state.selections.clone(),
            state.surplus_company.clone(),
        )
    };
    let Some(records) = records else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };

    let (lines, reshape_report) = loader::reshape(&records, &catalog);
    if reshape_report.unmapped > 0 {
        println!(
            "Note: {} license entries not in the cost catalog were excluded.",
            util::format_int(reshape_report.unmapped as i64)
        );
    }

    // Surplus defaults to the first company in the data when none was chosen,
    // matching the dashboard's preselected dropdown.
    let target = surplus_company.or_else(|| {
        let mut companies: Vec<&str> = lines.iter().map(|l| l.company.as_str()).collect();
        companies.sort();
        companies.first().map(|c| c.to_string())
    });
    let lines = match target {
        Some(ref target) => {
            let selections =
                selections.unwrap_or_else(|| surplus::default_selections(&catalog));
            println!("Unassigned licenses attributed to: {}\n", target);
            surplus::inject(lines, &selections, &catalog, target)
        }
        None => lines,
    };

    println!("Generating reports...");
    println!("Outputs saved to individual files...\n");

    let summary = reports::summarize(&lines);

    let costs = reports::cost_pivot(&summary);
    let file1 = "report1_cost_by_company.csv";
    if let Err(e) = output::write_pivot_csv(file1, &costs, 2) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 1: Custos por Empresa e Tipo de Licença\n");
    output::preview_pivot(&costs, 2);
    println!("(Full table exported to {})\n", file1);

    let quantities = reports::quantity_pivot(&summary);
    let file2 = "report2_license_quantities.csv";
    if let Err(e) = output::write_pivot_csv(file2, &quantities, 0) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 2: Quantidade de Licenças por Empresa e Tipo\n");
    output::preview_pivot(&quantities, 0);
    println!("(Full table exported to {})\n", file2);

    let averages = reports::average_cost_report(&lines);
    let file3 = "report3_average_cost.csv";
    if let Err(e) = output::write_csv(file3, &averages) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 3: Custo Médio por Colaborador\n");
    output::preview_table(&averages, 10);
    println!("(Full table exported to {})\n", file3);

    println!("Distribuição de Custos por Tipo de Licença\n");
    output::preview_table(&reports::cost_by_license(&summary), 15);
    println!("Distribuição de Custos por Empresa\n");
    output::preview_table(&reports::cost_by_company(&summary), 15);

    if let Some(first) = costs.columns.first() {
        println!("Licenses: {}", costs.columns.join(", "));
        let chosen = match prompt(&format!("License for per-company drill-down [{}]: ", first)) {
            ref s if s.is_empty() => first.clone(),
            s => s,
        };
        println!("\nCusto por Empresa para a Licença '{}'\n", chosen);
        output::preview_table(&reports::cost_of_license_by_company(&summary, &chosen), 15);
    }

    let mut companies: Vec<String> = costs.rows.iter().map(|r| r.label.clone()).collect();
    companies.sort();
    if let Some(first) = companies.first() {
        println!("Companies: {}", companies.join(", "));
        let chosen = match prompt(&format!("Company for percentage breakdown [{}]: ", first)) {
            ref s if s.is_empty() => first.clone(),
            s => s,
        };
        let breakdown = reports::percentage_breakdown(&summary, &chosen);
        println!("\nPercentagem do Custo por Licença — {}\n", chosen);
        output::preview_table(&breakdown, 15);
    }

    let stats = reports::generate_summary(&lines);
    if let Err(e) = output::write_json("summary.json", &stats) {
        eprintln!("Write error: {}", e);
    }
    println!("Summary Stats (summary.json):");
    println!(
        "  Empresas: {} | Licenças: {}/{} | Colaboradores: {}",
        stats.total_companies,
        util::format_int(stats.assigned_licenses as i64),
        util::format_int(stats.total_licenses as i64),
        util::format_int(stats.unique_employees as i64)
    );
    println!(
        "  Custo total mensal: {} | Custo médio por colaborador: {}\n",
        util::format_euros(stats.total_cost),
        util::format_euros(stats.avg_cost_per_employee)
    );
}

fn main() {
    loop {
        println!("Microsoft Licensing Report");
        println!("[1] Load the assignment CSV");
        println!("[2] Edit license costs");
        println!("[3] Unassigned licenses");
        println!("[4] Generate reports\n");
        match read_choice().as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                handle_edit_costs();
            }
            "3" => {
                handle_surplus();
            }
            "4" => {
                println!("");
                handle_generate_reports();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1, 2, 3 or 4.\n");
            }
        }
    }
}
