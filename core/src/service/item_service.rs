use anyhow::{anyhow, Result};
use tracing::info;

use crate::error::LedgerError;
use crate::model::item::{Item, ItemId};
use crate::repository::ItemRepository;
use crate::service::notify::{Notifier, StoreChange, Subscription};

pub struct ItemService<R: ItemRepository> {
    repo: R,
    notifier: Notifier<StoreChange>,
}

impl<R: ItemRepository> ItemService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            notifier: Notifier::new(),
        }
    }

    pub fn create_item(&self, item: Item) -> Result<Item> {
        validate_item(&item)?;
        let created = self.repo.create(item)?;
        info!(id = ?created.id, name = %created.name, "item created");
        self.notifier.notify(StoreChange::Items);
        Ok(created)
    }

    pub fn update_item(&self, item: &Item) -> Result<()> {
        validate_item(item)?;
        if item.id.is_none() {
            return Err(anyhow!("Cannot update an item that was never saved"));
        }
        self.repo.update(item)?;
        info!(id = ?item.id, "item updated");
        self.notifier.notify(StoreChange::Items);
        Ok(())
    }

    /// Removes the item only. Its logs stay and show up as unknown.
    pub fn delete_item(&self, id: ItemId) -> Result<()> {
        self.repo.delete(id)?;
        info!(id, "item deleted");
        self.notifier.notify(StoreChange::Items);
        Ok(())
    }

    pub fn get_item(&self, id: ItemId) -> Result<Item> {
        self.repo
            .get(id)?
            .ok_or_else(|| LedgerError::ItemNotFound(id).into())
    }

    /// Resolves a numeric ID or, failing that, an item name.
    pub fn resolve(&self, key: &str) -> Result<Item> {
        if let Ok(id) = key.trim().parse::<ItemId>() {
            return self.get_item(id);
        }
        self.repo
            .find_by_name(key)?
            .ok_or_else(|| anyhow!("No item named '{}'", key))
    }

    pub fn list_items(&self) -> Result<Vec<Item>> {
        self.repo.list()
    }

    pub fn list_routine_items(&self) -> Result<Vec<Item>> {
        self.repo.list_routine()
    }

    pub fn subscribe(&self) -> Subscription<StoreChange> {
        self.notifier.subscribe()
    }
}

pub fn validate_item(item: &Item) -> Result<(), LedgerError> {
    if item.name.trim().is_empty() {
        return Err(LedgerError::EmptyName);
    }
    if !item.rate.is_finite() || item.rate < 0.0 {
        return Err(LedgerError::InvalidRate(item.rate));
    }
    Ok(())
}
