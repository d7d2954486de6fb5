use thiserror::Error;

use crate::model::item::ItemId;
use crate::model::log::LogId;

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("item name must not be empty")]
    EmptyName,
    #[error("rate must be a non-negative number, got {0}")]
    InvalidRate(f64),
    #[error("quantity must be a positive number, got {0}")]
    InvalidQuantity(f64),
    #[error("item with ID {0} not found")]
    ItemNotFound(ItemId),
    #[error("log with ID {0} not found")]
    LogNotFound(LogId),
}
