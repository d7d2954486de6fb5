use chrono::{NaiveDate, NaiveTime};
use tracing::warn;

use crate::model::item::{Item, ItemId};
use crate::model::log::Log;
use crate::time::stamp;

#[derive(Debug, Clone, PartialEq)]
pub struct CartEntry {
    pub item: Item,
    pub quantity: u32,
}

impl CartEntry {
    pub fn cost(&self) -> f64 {
        self.item.cost_of(self.quantity as f64)
    }
}

/// Pending quantities staged from the dashboard before they are saved.
///
/// One entry per distinct item, kept in the order items were first added.
/// A staged quantity is always at least 1: decrementing the last unit drops
/// the entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, item: &Item) {
        if let Some(entry) = self.entries.iter_mut().find(|e| same_item(&e.item, item)) {
            entry.quantity += 1;
        } else {
            self.entries.push(CartEntry {
                item: item.clone(),
                quantity: 1,
            });
        }
    }

    pub fn decrement(&mut self, item: &Item) {
        let Some(pos) = self.entries.iter().position(|e| same_item(&e.item, item)) else {
            return;
        };
        if self.entries[pos].quantity <= 1 {
            self.entries.remove(pos);
        } else {
            self.entries[pos].quantity -= 1;
        }
    }

    pub fn quantity_of(&self, item_id: ItemId) -> u32 {
        self.entries
            .iter()
            .find(|e| e.item.id == Some(item_id))
            .map(|e| e.quantity)
            .unwrap_or(0)
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn total_cost(&self) -> f64 {
        self.entries.iter().map(|e| e.cost()).sum()
    }

    /// Drains the cart into unsaved logs for `date`.
    ///
    /// Every log carries `date` combined with `time_of_day`, so a backdated
    /// batch still sorts by the moment it was entered.
    pub fn checkout(&mut self, date: NaiveDate, time_of_day: NaiveTime) -> Vec<Log> {
        let timestamp = stamp(date, time_of_day);
        let note = format!("Added at {}", time_of_day.format("%H:%M:%S"));

        self.entries
            .drain(..)
            .filter_map(|entry| {
                let Some(item_id) = entry.item.id else {
                    warn!(name = %entry.item.name, "skipping unsaved item in cart");
                    return None;
                };
                Some(Log {
                    id: None,
                    item_id,
                    date,
                    timestamp,
                    quantity: entry.quantity as f64,
                    cost: entry.cost(),
                    provider: entry.item.provider.clone(),
                    note: Some(note.clone()),
                })
            })
            .collect()
    }
}

/// Saved items match by ID. An unsaved item only matches an identical copy of itself.
fn same_item(a: &Item, b: &Item) -> bool {
    match (a.id, b.id) {
        (Some(x), Some(y)) => x == y,
        (None, None) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: ItemId, name: &str, rate: f64) -> Item {
        let mut item = Item::new(name.to_string(), "liter".to_string(), rate);
        item.id = Some(id);
        item
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_increment_appends_then_counts() {
        let milk = item(1, "Milk", 2.5);
        let bread = item(2, "Bread", 3.0);
        let mut cart = Cart::new();

        cart.increment(&milk);
        cart.increment(&bread);
        cart.increment(&milk);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.entries()[0].item.name, "Milk");
        assert_eq!(cart.quantity_of(1), 2);
        assert_eq!(cart.quantity_of(2), 1);
        assert_eq!(cart.quantity_of(3), 0);
    }

    #[test]
    fn test_increment_then_decrement_restores_cart() {
        let milk = item(1, "Milk", 2.5);
        let bread = item(2, "Bread", 3.0);
        let mut cart = Cart::new();
        cart.increment(&bread);
        let before = cart.clone();

        cart.increment(&milk);
        cart.decrement(&milk);

        assert_eq!(cart, before);
    }

    #[test]
    fn test_decrement_removes_last_unit() {
        let milk = item(1, "Milk", 2.5);
        let mut cart = Cart::new();
        cart.increment(&milk);
        cart.increment(&milk);

        cart.decrement(&milk);
        assert_eq!(cart.quantity_of(1), 1);

        cart.decrement(&milk);
        assert!(cart.is_empty());
        assert!(cart.entries().iter().all(|e| e.quantity >= 1));

        // unknown item is a no-op
        cart.decrement(&milk);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_cost() {
        let milk = item(1, "Milk", 2.5);
        let mut cart = Cart::new();
        cart.increment(&milk);
        cart.increment(&milk);
        assert_eq!(cart.total_cost(), 5.0);
    }

    #[test]
    fn test_checkout_emits_one_log_per_entry() {
        let milk = item(1, "Milk", 2.5).with_provider("Local Dairy");
        let bread = item(2, "Bread", 3.0);
        let mut cart = Cart::new();
        cart.increment(&milk);
        cart.increment(&milk);
        cart.increment(&bread);

        let time = NaiveTime::from_hms_opt(8, 15, 0).unwrap();
        let logs = cart.checkout(day("2024-03-10"), time);

        assert!(cart.is_empty());
        assert_eq!(logs.len(), 2);

        let milk_log = &logs[0];
        assert_eq!(milk_log.item_id, 1);
        assert_eq!(milk_log.quantity, 2.0);
        assert_eq!(milk_log.cost, 5.0);
        assert_eq!(milk_log.date, day("2024-03-10"));
        assert_eq!(milk_log.provider.as_deref(), Some("Local Dairy"));
        assert_eq!(milk_log.note.as_deref(), Some("Added at 08:15:00"));
        assert_eq!(milk_log.timestamp, stamp(day("2024-03-10"), time));

        assert_eq!(logs[1].timestamp, milk_log.timestamp);
        assert_eq!(logs[1].provider, None);
    }

    #[test]
    fn test_checkout_empty_cart() {
        let mut cart = Cart::new();
        let logs = cart.checkout(day("2024-03-10"), NaiveTime::MIN);
        assert!(logs.is_empty());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_unsaved_items_keep_separate_entries() {
        let tea = Item::new("Tea".to_string(), "pack".to_string(), 4.0);
        let sugar = Item::new("Sugar".to_string(), "kg".to_string(), 1.5);
        let mut cart = Cart::new();

        cart.increment(&tea);
        cart.increment(&sugar);
        cart.increment(&tea);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.entries()[0].quantity, 2);
        assert_eq!(cart.entries()[1].item.name, "Sugar");
        assert_eq!(cart.total_cost(), 9.5);

        cart.decrement(&sugar);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.entries()[0].item.name, "Tea");

        // a saved item never matches an unsaved one
        let saved = item(1, "Tea", 4.0);
        cart.decrement(&saved);
        assert_eq!(cart.entries()[0].quantity, 2);
    }

    #[test]
    fn test_checkout_skips_unsaved_items() {
        let draft = Item::new("Draft".to_string(), "pc".to_string(), 1.0);
        let mut cart = Cart::new();
        cart.increment(&draft);

        let logs = cart.checkout(day("2024-03-10"), NaiveTime::MIN);
        assert!(logs.is_empty());
        assert!(cart.is_empty());
    }
}
