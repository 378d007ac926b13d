//! Aggregate inventory figures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use slabtrack_domain::InventoryRecord;

/// Materials with fewer in-stock slabs than this are flagged low.
pub const LOW_STOCK_THRESHOLD: usize = 2;

/// Counts and value figures over the whole record set.
///
/// Maps are keyed by the displayed string (status/kind machine names,
/// material/supplier text) and ordered for stable output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_records: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_kind: BTreeMap<String, usize>,
    pub by_material: BTreeMap<String, usize>,
    pub by_supplier: BTreeMap<String, usize>,
    pub total_value: f64,
    /// Mean cost over records that carry a cost; zero when none do.
    pub average_value: f64,
    /// Materials whose in-stock count is below [`LOW_STOCK_THRESHOLD`].
    pub low_stock_materials: Vec<String>,
}

impl InventorySummary {
    pub fn compute(records: &[InventoryRecord]) -> Self {
        let mut summary = InventorySummary {
            total_records: records.len(),
            ..InventorySummary::default()
        };

        let mut priced = 0usize;
        let mut in_stock_by_material: BTreeMap<String, usize> = BTreeMap::new();

        for record in records {
            *summary
                .by_status
                .entry(record.status.as_str().to_string())
                .or_default() += 1;
            *summary
                .by_kind
                .entry(record.kind.as_str().to_string())
                .or_default() += 1;
            *summary
                .by_material
                .entry(record.material.clone())
                .or_default() += 1;
            *summary
                .by_supplier
                .entry(record.supplier.clone())
                .or_default() += 1;

            let in_stock = in_stock_by_material
                .entry(record.material.clone())
                .or_default();
            if record.status.is_in_stock() {
                *in_stock += 1;
            }

            if let Some(cost) = record.cost {
                summary.total_value += cost;
                priced += 1;
            }
        }

        if priced > 0 {
            summary.average_value = summary.total_value / priced as f64;
        }

        summary.low_stock_materials = in_stock_by_material
            .into_iter()
            .filter(|(_, count)| *count < LOW_STOCK_THRESHOLD)
            .map(|(material, _)| material)
            .collect();

        summary
    }
}
