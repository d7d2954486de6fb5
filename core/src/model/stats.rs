use serde::{Deserialize, Serialize};

use crate::model::item::ItemId;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct ItemStats {
    pub total_quantity: f64,
    pub total_cost: f64,
}

impl ItemStats {
    pub fn add(&mut self, quantity: f64, cost: f64) {
        self.total_quantity += quantity;
        self.total_cost += cost;
    }
}

/// Per-item totals for a selection window.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ItemSummary {
    pub item_id: ItemId,
    pub name: String,
    /// None when the item no longer exists.
    pub unit: Option<String>,
    pub stats: ItemStats,
}
