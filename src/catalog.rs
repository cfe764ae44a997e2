// License cost catalog: license-code -> monthly unit cost in euros.
//
// Persisted as a flat JSON map. A missing or malformed store falls back to
// the built-in defaults so the report always has a usable catalog; saving is
// explicit and overwrites the whole file (last write wins).
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::Path;

pub const COSTS_FILE: &str = "license_costs.json";

/// Per-license monthly unit costs. `BTreeMap` keeps pivot columns and the
/// saved JSON in a stable order.
#[derive(Debug, Clone, PartialEq)]
pub struct CostCatalog {
    costs: BTreeMap<String, f64>,
}

impl Default for CostCatalog {
    fn default() -> Self {
        let costs = BTreeMap::from(
            [
                ("DESKLESSPACK", 3.12),
                ("ATP_ENTERPRISE", 1.59),
                ("SPE_E3", 31.76),
                ("EMS", 8.34),
                ("STANDARDPACK", 7.92),
                ("PROJECTPROFESSIONAL", 23.67),
                ("VISIOCLIENT", 11.80),
                ("POWER_BI_PRO", 7.92),
                ("Win10_VDA_E3", 5.56),
                ("Microsoft_Teams_Rooms_Pro", 33.62),
            ]
            .map(|(k, v)| (k.to_string(), v)),
        );
        CostCatalog { costs }
    }
}

impl CostCatalog {
    /// Load the persisted catalog, or the built-in defaults when the store
    /// is missing or does not parse as a flat code -> cost map.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return CostCatalog::default();
        }
        let parsed = fs::read_to_string(path)
            .ok()
            .and_then(|text| serde_json::from_str::<BTreeMap<String, f64>>(&text).ok());
        match parsed {
            Some(costs) => CostCatalog { costs },
            None => {
                eprintln!(
                    "Warning: could not parse {}; using default costs.",
                    path.display()
                );
                CostCatalog::default()
            }
        }
    }

    /// Persist the full current mapping. I/O errors propagate; there is no
    /// retry and no partial write handling.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
        let s = serde_json::to_string_pretty(&self.costs)?;
        fs::write(path, s)?;
        Ok(())
    }

    /// Unit cost for an exact license code, `None` if uncataloged.
    pub fn cost_of(&self, code: &str) -> Option<f64> {
        self.costs.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.costs.contains_key(code)
    }

    /// Update one code's cost. Negative costs are rejected here as well,
    /// even though the interactive layer already refuses them.
    pub fn set(&mut self, code: &str, cost: f64) -> Result<(), Box<dyn Error>> {
        if cost < 0.0 {
            return Err(format!("negative cost {} for license {}", cost, code).into());
        }
        self.costs.insert(code.to_string(), cost);
        Ok(())
    }

    /// License codes in stable (sorted) order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.costs.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.costs.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}
