use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

pub type ItemId = u64;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    pub name: String,
    pub unit: String,
    /// Cost per unit.
    pub rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Routine items show up on the dashboard.
    pub is_routine: bool,
    pub created_at: DateTime<Utc>,
}

impl Item {
    pub fn new(name: String, unit: String, rate: f64) -> Self {
        Self {
            id: None,
            name,
            unit,
            rate,
            provider: None,
            is_routine: true,
            created_at: Utc::now(),
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn cost_of(&self, quantity: f64) -> f64 {
        quantity * self.rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_defaults_to_routine() {
        let item = Item::new("Milk".to_string(), "liter".to_string(), 2.5);
        assert!(item.id.is_none());
        assert!(item.is_routine);
        assert_eq!(item.provider, None);
        assert_eq!(item.cost_of(2.0), 5.0);
    }
}
