use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::model::cart::Cart;
use crate::repository::{CycleStore, ItemRepository, LogRepository};
use crate::service::aggregate::{stats_for_item, total_cost, Selection};
use crate::service::cycle_service::CycleService;
use crate::service::dto::{Dashboard, DashboardRow};
use crate::service::item_service::ItemService;
use crate::service::log_service::LogService;

pub struct DashboardUseCase<'a, R: ItemRepository, L: LogRepository, S: CycleStore> {
    item_service: &'a ItemService<R>,
    log_service: &'a LogService<L>,
    cycle_service: &'a CycleService<S>,
}

impl<'a, R: ItemRepository, L: LogRepository, S: CycleStore> DashboardUseCase<'a, R, L, S> {
    pub fn new(
        item_service: &'a ItemService<R>,
        log_service: &'a LogService<L>,
        cycle_service: &'a CycleService<S>,
    ) -> Self {
        Self {
            item_service,
            log_service,
            cycle_service,
        }
    }

    pub fn build(&self, cart: &Cart) -> Result<Dashboard> {
        self.build_at(cart, Utc::now())
    }

    /// `now` only matters on the very first run, when it becomes the cycle start.
    pub fn build_at(&self, cart: &Cart, now: DateTime<Utc>) -> Result<Dashboard> {
        let cycle_start = self.cycle_service.current_or(now)?;
        let logs = self.log_service.logs_for(&Selection::Cycle(cycle_start))?;
        let items = self.item_service.list_routine_items()?;

        let rows = items
            .into_iter()
            .filter_map(|item| {
                let id = item.id?;
                Some(DashboardRow {
                    stats: stats_for_item(&logs, id),
                    in_cart: cart.quantity_of(id),
                    item,
                })
            })
            .collect();

        Ok(Dashboard {
            cycle_start,
            rows,
            cycle_total: total_cost(&logs),
            cart_items: cart.len(),
            cart_total: cart.total_cost(),
        })
    }
}
