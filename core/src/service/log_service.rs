use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info};

use crate::error::LedgerError;
use crate::model::cart::Cart;
use crate::model::item::{Item, ItemId};
use crate::model::log::{Log, LogId};
use crate::repository::LogRepository;
use crate::service::aggregate::Selection;
use crate::service::notify::{Notifier, StoreChange, Subscription};
use crate::time::{self, stamp};

/// A hand-entered log, as opposed to one coming out of the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualEntry {
    pub date: NaiveDate,
    pub time_of_day: NaiveTime,
    pub quantity: f64,
    /// Falls back to the item's provider.
    pub provider: Option<String>,
    pub note: Option<String>,
}

impl ManualEntry {
    pub fn new(date: NaiveDate, quantity: f64) -> Self {
        Self {
            date,
            time_of_day: time::time_of_day(),
            quantity,
            provider: None,
            note: None,
        }
    }
}

pub struct LogService<L: LogRepository> {
    repo: L,
    notifier: Notifier<StoreChange>,
}

impl<L: LogRepository> LogService<L> {
    pub fn new(repo: L) -> Self {
        Self {
            repo,
            notifier: Notifier::new(),
        }
    }

    /// Records one entry, pricing it at the item's current rate.
    pub fn add_log(&self, item: &Item, entry: ManualEntry) -> Result<Log> {
        let item_id = item
            .id
            .ok_or_else(|| anyhow!("Item '{}' has not been saved yet", item.name))?;
        if !entry.quantity.is_finite() || entry.quantity <= 0.0 {
            return Err(LedgerError::InvalidQuantity(entry.quantity).into());
        }

        let log = Log {
            id: None,
            item_id,
            date: entry.date,
            timestamp: stamp(entry.date, entry.time_of_day),
            quantity: entry.quantity,
            cost: item.cost_of(entry.quantity),
            provider: entry.provider.or_else(|| item.provider.clone()),
            note: entry.note.filter(|n| !n.trim().is_empty()),
        };

        let created = self.repo.create(log)?;
        info!(id = ?created.id, item_id, cost = created.cost, "log added");
        self.notifier.notify(StoreChange::Logs);
        Ok(created)
    }

    /// Writes one log per staged item for `date` and empties the cart.
    ///
    /// Writes happen one at a time; a failure part way leaves the earlier
    /// logs in place and the cart already cleared.
    pub fn checkout(&self, cart: &mut Cart, date: NaiveDate, time_of_day: NaiveTime) -> Result<Vec<Log>> {
        let pending = cart.checkout(date, time_of_day);
        if pending.is_empty() {
            return Ok(Vec::new());
        }

        let mut written = Vec::with_capacity(pending.len());
        let mut result = Ok(());
        for log in pending {
            match self.repo.create(log) {
                Ok(created) => written.push(created),
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }

        if !written.is_empty() {
            info!(count = written.len(), %date, "cart checked out");
            self.notifier.notify(StoreChange::Logs);
        }
        result.map(|_| written)
    }

    pub fn delete_log(&self, id: LogId) -> Result<()> {
        self.repo.delete(id)?;
        info!(id, "log deleted");
        self.notifier.notify(StoreChange::Logs);
        Ok(())
    }

    pub fn get_log(&self, id: LogId) -> Result<Log> {
        self.repo
            .get(id)?
            .ok_or_else(|| LedgerError::LogNotFound(id).into())
    }

    /// Every log referencing `item_id`, including ones for deleted items.
    pub fn logs_for_item(&self, item_id: ItemId) -> Result<Vec<Log>> {
        self.repo.list_for_item(item_id)
    }

    pub fn logs_for(&self, selection: &Selection) -> Result<Vec<Log>> {
        debug!(?selection, "querying logs");
        match *selection {
            Selection::Cycle(start) => self.repo.list_since(start),
            Selection::Day(day) => self.repo.list_on(day),
            Selection::Range { start, end } => self.repo.list_between(start, end),
        }
    }

    /// Every log, newest first. Logs sharing a timestamp come out newest ID first.
    pub fn history_logs(&self) -> Result<Vec<Log>> {
        let mut logs = self.repo.list()?;
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(logs)
    }

    pub fn subscribe(&self) -> Subscription<StoreChange> {
        self.notifier.subscribe()
    }
}
