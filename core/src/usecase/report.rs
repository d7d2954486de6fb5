use anyhow::Result;

use crate::repository::{ItemRepository, LogRepository};
use crate::service::aggregate::{summarize, total_cost, Selection};
use crate::service::dto::Report;
use crate::service::item_service::ItemService;
use crate::service::log_service::LogService;

/// Per-item totals for any window: a cycle, a single day or a date range.
pub struct ReportUseCase<'a, R: ItemRepository, L: LogRepository> {
    item_service: &'a ItemService<R>,
    log_service: &'a LogService<L>,
}

impl<'a, R: ItemRepository, L: LogRepository> ReportUseCase<'a, R, L> {
    pub fn new(item_service: &'a ItemService<R>, log_service: &'a LogService<L>) -> Self {
        Self {
            item_service,
            log_service,
        }
    }

    pub fn report(&self, selection: &Selection) -> Result<Report> {
        let logs = self.log_service.logs_for(selection)?;
        let items = self.item_service.list_items()?;

        Ok(Report {
            title: selection.describe(),
            rows: summarize(&items, &logs),
            total_cost: total_cost(&logs),
        })
    }
}
