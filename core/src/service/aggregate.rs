//! Selection and totals over log collections.
//!
//! Two kinds of window exist and are kept apart on purpose: the billing
//! cycle compares exact timestamps, while day and range selections compare
//! calendar dates only.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::item::{Item, ItemId};
use crate::model::log::Log;
use crate::model::stats::{ItemStats, ItemSummary};

pub const UNKNOWN_ITEM: &str = "Unknown Item";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// `timestamp >= start`.
    Cycle(DateTime<Utc>),
    /// `date == day`.
    Day(NaiveDate),
    /// `start <= date <= end`; a missing bound is open.
    Range {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl Selection {
    pub fn matches(&self, log: &Log) -> bool {
        match *self {
            Selection::Cycle(start) => log.is_since(start),
            Selection::Day(day) => log.is_on(day),
            Selection::Range { start, end } => log.is_between(start, end),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Selection::Cycle(start) => {
                format!("Cycle since {}", start.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M"))
            }
            Selection::Day(day) => format!("{}", day.format("%Y-%m-%d")),
            Selection::Range { start, end } => {
                let fmt = |d: &Option<NaiveDate>| {
                    d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_else(|| "…".to_string())
                };
                format!("{} to {}", fmt(start), fmt(end))
            }
        }
    }
}

/// Keeps the logs inside `selection`, preserving order.
pub fn select(logs: &[Log], selection: &Selection) -> Vec<Log> {
    logs.iter().filter(|l| selection.matches(l)).cloned().collect()
}

/// Sums quantity and stored cost for one item. Unknown items yield zeros.
pub fn stats_for_item(logs: &[Log], item_id: ItemId) -> ItemStats {
    logs.iter()
        .filter(|l| l.item_id == item_id)
        .fold(ItemStats::default(), |mut acc, log| {
            acc.add(log.quantity, log.cost);
            acc
        })
}

pub fn total_cost(logs: &[Log]) -> f64 {
    logs.iter().map(|l| l.cost).sum()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DateGroup {
    pub date: NaiveDate,
    pub logs: Vec<Log>,
}

/// Buckets logs by calendar date.
///
/// Buckets appear in the order their date is first seen and each keeps the
/// input's relative order, so feeding newest-first logs gives a newest-first
/// history.
pub fn group_by_date(logs: &[Log]) -> Vec<DateGroup> {
    let mut groups: Vec<DateGroup> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for log in logs {
        match index.get(&log.date) {
            Some(&pos) => groups[pos].logs.push(log.clone()),
            None => {
                index.insert(log.date, groups.len());
                groups.push(DateGroup {
                    date: log.date,
                    logs: vec![log.clone()],
                });
            }
        }
    }

    groups
}

/// One row per item in `items` order, then one per orphaned item ID found in `logs`.
pub fn summarize(items: &[Item], logs: &[Log]) -> Vec<ItemSummary> {
    let mut rows: Vec<ItemSummary> = items
        .iter()
        .filter_map(|item| {
            let id = item.id?;
            Some(ItemSummary {
                item_id: id,
                name: item.name.clone(),
                unit: Some(item.unit.clone()),
                stats: stats_for_item(logs, id),
            })
        })
        .collect();

    let mut orphans: Vec<ItemId> = Vec::new();
    for log in logs {
        let known = items.iter().any(|i| i.id == Some(log.item_id));
        if !known && !orphans.contains(&log.item_id) {
            orphans.push(log.item_id);
        }
    }

    rows.extend(orphans.into_iter().map(|id| ItemSummary {
        item_id: id,
        name: UNKNOWN_ITEM.to_string(),
        unit: None,
        stats: stats_for_item(logs, id),
    }));

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn log_at(item_id: ItemId, date: &str, timestamp: DateTime<Utc>, quantity: f64, cost: f64) -> Log {
        Log {
            id: None,
            item_id,
            date: day(date),
            timestamp,
            quantity,
            cost,
            provider: None,
            note: None,
        }
    }

    fn log(item_id: ItemId, date: &str, quantity: f64, cost: f64) -> Log {
        let ts = Utc.from_utc_datetime(&day(date).and_hms_opt(12, 0, 0).unwrap());
        log_at(item_id, date, ts, quantity, cost)
    }

    #[test]
    fn test_stats_for_item_sums_stored_cost() {
        let logs = vec![
            log(1, "2024-03-10", 2.0, 5.0),
            log(2, "2024-03-10", 1.0, 3.0),
            // rate changed later; stored cost is what counts
            log(1, "2024-03-11", 1.0, 3.0),
        ];
        let stats = stats_for_item(&logs, 1);
        assert_eq!(stats.total_quantity, 3.0);
        assert_eq!(stats.total_cost, 8.0);
    }

    #[test]
    fn test_stats_for_unknown_item_is_zero() {
        let logs = vec![log(1, "2024-03-10", 2.0, 5.0)];
        assert_eq!(stats_for_item(&logs, 99), ItemStats::default());
        assert_eq!(stats_for_item(&[], 1), ItemStats::default());
    }

    #[test]
    fn test_cycle_boundary_is_inclusive() {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let before = log_at(1, "2024-03-01", t0 - Duration::milliseconds(1), 1.0, 2.5);
        let at = log_at(1, "2024-03-01", t0, 1.0, 2.5);

        let selection = Selection::Cycle(t0);
        assert!(!selection.matches(&before));
        assert!(selection.matches(&at));

        let selected = select(&[before, at.clone()], &selection);
        assert_eq!(selected, vec![at]);
        assert_eq!(stats_for_item(&selected, 1).total_cost, 2.5);
    }

    #[test]
    fn test_cycle_uses_timestamp_not_date() {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        // Same calendar day, earlier in the morning
        let early = log_at(1, "2024-03-01", t0 - Duration::hours(2), 1.0, 1.0);
        assert!(!Selection::Cycle(t0).matches(&early));
    }

    #[test]
    fn test_single_day() {
        let logs = vec![log(1, "2024-03-10", 1.0, 1.0), log(1, "2024-03-11", 1.0, 1.0)];
        let selected = select(&logs, &Selection::Day(day("2024-03-11")));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].date, day("2024-03-11"));
    }

    #[test]
    fn test_range_is_inclusive() {
        let selection = Selection::Range {
            start: Some(day("2024-01-01")),
            end: Some(day("2024-01-31")),
        };
        assert!(selection.matches(&log(1, "2024-01-31", 1.0, 1.0)));
        assert!(selection.matches(&log(1, "2024-01-01", 1.0, 1.0)));
        assert!(!selection.matches(&log(1, "2024-02-01", 1.0, 1.0)));
        assert!(!selection.matches(&log(1, "2023-12-31", 1.0, 1.0)));
    }

    #[test]
    fn test_range_open_bounds() {
        let open_start = Selection::Range { start: None, end: Some(day("2024-01-31")) };
        assert!(open_start.matches(&log(1, "1999-01-01", 1.0, 1.0)));
        assert!(!open_start.matches(&log(1, "2024-02-01", 1.0, 1.0)));

        let open_end = Selection::Range { start: Some(day("2024-01-01")), end: None };
        assert!(open_end.matches(&log(1, "2099-01-01", 1.0, 1.0)));

        let everything = Selection::Range { start: None, end: None };
        assert!(everything.matches(&log(1, "2024-01-01", 1.0, 1.0)));
    }

    #[test]
    fn test_group_by_date_keeps_order() {
        let logs = vec![
            log(1, "2024-03-11", 1.0, 1.0),
            log(2, "2024-03-10", 1.0, 1.0),
            log(3, "2024-03-11", 1.0, 1.0),
        ];
        let groups = group_by_date(&logs);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, day("2024-03-11"));
        assert_eq!(groups[0].logs.iter().map(|l| l.item_id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(groups[1].date, day("2024-03-10"));
        assert!(group_by_date(&[]).is_empty());
    }

    #[test]
    fn test_summarize_includes_orphans() {
        let mut milk = Item::new("Milk".to_string(), "liter".to_string(), 2.5);
        milk.id = Some(1);
        let logs = vec![
            log(1, "2024-03-10", 2.0, 5.0),
            log(7, "2024-03-10", 1.0, 4.0),
            log(7, "2024-03-11", 1.0, 4.0),
        ];

        let rows = summarize(&[milk], &logs);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Milk");
        assert_eq!(rows[0].stats.total_cost, 5.0);
        assert_eq!(rows[1].item_id, 7);
        assert_eq!(rows[1].name, UNKNOWN_ITEM);
        assert_eq!(rows[1].unit, None);
        assert_eq!(rows[1].stats.total_quantity, 2.0);
        assert_eq!(total_cost(&logs), 13.0);
    }

    fn arb_log() -> impl Strategy<Value = Log> {
        (1u64..5, 0i64..10, 0u32..100).prop_map(|(item_id, offset, qty)| {
            let date = day("2024-03-01") + Duration::days(offset);
            let ts = Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap());
            Log {
                id: None,
                item_id,
                date,
                timestamp: ts,
                quantity: qty as f64,
                cost: qty as f64 * 0.5,
                provider: None,
                note: None,
            }
        })
    }

    proptest! {
        #[test]
        fn prop_group_by_date_is_partition(logs in prop::collection::vec(arb_log(), 0..40)) {
            let groups = group_by_date(&logs);

            let mut seen = std::collections::HashSet::new();
            for group in &groups {
                prop_assert!(seen.insert(group.date), "date bucket repeated");
                prop_assert!(!group.logs.is_empty());
                prop_assert!(group.logs.iter().all(|l| l.date == group.date));
            }

            let total: usize = groups.iter().map(|g| g.logs.len()).sum();
            prop_assert_eq!(total, logs.len());

            // Each bucket is the input filtered to its date, in input order
            for group in &groups {
                let expected: Vec<Log> = logs.iter().filter(|l| l.date == group.date).cloned().collect();
                prop_assert_eq!(&group.logs, &expected);
            }
        }

        #[test]
        fn prop_stats_match_selected_costs(logs in prop::collection::vec(arb_log(), 0..40), item_id in 1u64..5) {
            let stats = stats_for_item(&logs, item_id);
            let expected: f64 = logs.iter().filter(|l| l.item_id == item_id).map(|l| l.cost).sum();
            prop_assert_eq!(stats.total_cost, expected);
        }
    }
}
