use serde::ser::{Serialize, SerializeMap, Serializer};

use super::category::GarbageCategory;
use super::detection::round_to;
use super::record::stored_class_id;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CategoryShare {
    #[serde(rename = "itemName")]
    pub item_name: String,
    pub percent: f64,
}

/// Porcentaje de cada categoría sobre el total de registros clasificados.
///
/// Se serializa como `{"0": {...}, "1": {...}, "2": {...}, "total": n}`.
/// Cada porcentaje se redondea por separado, así que la suma puede no ser 100.0.
#[derive(Debug, Clone, PartialEq)]
pub struct GarbagePercent {
    pub shares: Vec<(GarbageCategory, CategoryShare)>,
    pub total: u64,
}

impl GarbagePercent {
    pub fn share(&self, category: GarbageCategory) -> Option<&CategoryShare> {
        self.shares.iter().find(|(c, _)| *c == category).map(|(_, s)| s)
    }
}

impl Serialize for GarbagePercent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.shares.len() + 1))?;
        for (category, share) in &self.shares {
            map.serialize_entry(&category.class_id().to_string(), share)?;
        }
        map.serialize_entry("total", &self.total)?;
        map.end()
    }
}

/// Cuenta los registros por categoría. Los ids desconocidos, nulos o no
/// enteros se ignoran y no cuentan para `total`.
pub fn garbage_percent(records: &[Value]) -> GarbagePercent {
    let mut counts = [0u64; GarbageCategory::ALL.len()];
    let mut total = 0u64;

    for rec in records {
        if let Some(cat) = stored_class_id(rec).and_then(GarbageCategory::from_class_id) {
            counts[cat.class_id() as usize] += 1;
            total += 1;
        }
    }

    let shares = GarbageCategory::ALL
        .iter()
        .map(|&cat| {
            let count = counts[cat.class_id() as usize];
            let percent = if total > 0 {
                round_to(count as f64 / total as f64 * 100.0, 1)
            } else {
                0.0
            };
            (cat, CategoryShare { item_name: cat.item_name().to_string(), percent })
        })
        .collect();

    GarbagePercent { shares, total }
}
