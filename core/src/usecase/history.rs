use std::collections::HashMap;

use anyhow::Result;

use crate::model::item::{Item, ItemId};
use crate::repository::{ItemRepository, LogRepository};
use crate::service::aggregate::{group_by_date, total_cost};
use crate::service::dto::{DailyHistory, LogDto};
use crate::service::item_service::ItemService;
use crate::service::log_service::LogService;

pub struct HistoryUseCase<'a, R: ItemRepository, L: LogRepository> {
    item_service: &'a ItemService<R>,
    log_service: &'a LogService<L>,
}

impl<'a, R: ItemRepository, L: LogRepository> HistoryUseCase<'a, R, L> {
    pub fn new(item_service: &'a ItemService<R>, log_service: &'a LogService<L>) -> Self {
        Self {
            item_service,
            log_service,
        }
    }

    /// All logs grouped by day, newest day first.
    pub fn get_daily_history(&self) -> Result<Vec<DailyHistory>> {
        let logs = self.log_service.history_logs()?;
        let items: HashMap<ItemId, Item> = self
            .item_service
            .list_items()?
            .into_iter()
            .filter_map(|item| item.id.map(|id| (id, item)))
            .collect();

        let history = group_by_date(&logs)
            .into_iter()
            .map(|group| {
                let total_cost = total_cost(&group.logs);
                DailyHistory {
                    date: group.date,
                    day_of_week: group.date.format("%a").to_string(),
                    entries: group
                        .logs
                        .into_iter()
                        .map(|log| {
                            let item = items.get(&log.item_id);
                            LogDto::from_entity(log, item)
                        })
                        .collect(),
                    total_cost,
                }
            })
            .collect();

        Ok(history)
    }
}
