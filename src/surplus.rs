// Purchased-but-unassigned licenses.
//
// These exist on the subscription without an owner, so they are injected as
// synthetic lines attributed to the accounting mailbox and a chosen company.
// Selections live only for the current run; nothing here is persisted.
use crate::catalog::CostCatalog;
use crate::types::CostedLine;
use std::collections::BTreeMap;

/// Identity that carries surplus lines in every aggregate. Filtered out of
/// per-employee metrics.
pub const PLACEHOLDER_EMAIL: &str = "contabilistico@tecnovia.pt";

/// Initial quantity per license code: zero for everything in the catalog,
/// overlaid with the handful of known standing surpluses.
pub fn default_selections(catalog: &CostCatalog) -> BTreeMap<String, u32> {
    let mut selections: BTreeMap<String, u32> =
        catalog.codes().map(|code| (code.to_string(), 0)).collect();
    let defaults = [
        ("ATP_ENTERPRISE", 3),
        ("EMS", 1),
        ("SPE_E3", 3),
        ("STANDARDPACK", 1),
        ("PROJECTPROFESSIONAL", 1),
        ("POWER_BI_PRO", 1),
        ("Win10_VDA_E3", 1),
    ];
    for (code, qty) in defaults {
        if let Some(entry) = selections.get_mut(code) {
            *entry = qty;
        }
    }
    selections
}

/// Append `qty` synthetic lines per selected license, attributed to
/// `target_company`, with cost looked up at injection time.
///
/// Purely additive: existing lines are returned untouched, quantity zero
/// contributes nothing, and codes missing from the catalog are skipped.
pub fn inject(
    lines: Vec<CostedLine>,
    selections: &BTreeMap<String, u32>,
    catalog: &CostCatalog,
    target_company: &str,
) -> Vec<CostedLine> {
    let mut out = lines;
    for (code, qty) in selections {
        if *qty == 0 {
            continue;
        }
        let Some(cost) = catalog.cost_of(code) else {
            continue;
        };
        for _ in 0..*qty {
            out.push(CostedLine {
                email: PLACEHOLDER_EMAIL.to_string(),
                company: target_company.to_string(),
                license: code.clone(),
                cost,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selections_cover_every_catalog_code() {
        let cat = CostCatalog::default();
        let sel = default_selections(&cat);
        assert_eq!(sel.len(), cat.len());
        assert_eq!(sel["ATP_ENTERPRISE"], 3);
        assert_eq!(sel["SPE_E3"], 3);
        assert_eq!(sel["VISIOCLIENT"], 0);
        assert_eq!(sel["Microsoft_Teams_Rooms_Pro"], 0);
    }

    #[test]
    fn inject_is_purely_additive() {
        let cat = CostCatalog::default();
        let existing = vec![CostedLine {
            email: "e1@x".to_string(),
            company: "Continente".to_string(),
            license: "EMS".to_string(),
            cost: 8.34,
        }];
        let mut selections = BTreeMap::new();
        selections.insert("SPE_E3".to_string(), 2);
        let out = inject(existing.clone(), &selections, &cat, "Continente");
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], existing[0]);
        for line in &out[1..] {
            assert_eq!(line.email, PLACEHOLDER_EMAIL);
            assert_eq!(line.company, "Continente");
            assert_eq!(line.license, "SPE_E3");
            assert_eq!(line.cost, 31.76);
        }
    }

    #[test]
    fn normalized_alias_target_merges_with_canonical_company() {
        let cat = CostCatalog::default();
        let existing = vec![CostedLine {
            email: "e1@x".to_string(),
            company: "Tecnovia Madeira".to_string(),
            license: "EMS".to_string(),
            cost: 8.34,
        }];
        let mut selections = BTreeMap::new();
        selections.insert("EMS".to_string(), 1);
        let target = crate::company::normalize("Farrobo");
        let out = inject(existing, &selections, &cat, &target);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|l| l.company == "Tecnovia Madeira"));
    }

    #[test]
    fn zero_quantities_and_unknown_codes_add_nothing() {
        let cat = CostCatalog::default();
        let mut selections = BTreeMap::new();
        selections.insert("EMS".to_string(), 0);
        selections.insert("NOT_IN_CATALOG".to_string(), 5);
        let out = inject(Vec::new(), &selections, &cat, "Continente");
        assert!(out.is_empty());
    }
}
