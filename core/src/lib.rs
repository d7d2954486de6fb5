pub mod config;
pub mod error;
pub mod model;
pub mod repository;
pub mod input;
pub mod time;
pub mod service;
pub mod usecase;

pub use config::{resolve_data_dir, Settings};
pub use error::LedgerError;
pub use model::cart::{Cart, CartEntry};
pub use model::item::{Item, ItemId};
pub use model::log::{Log, LogId};
pub use model::settings::Theme;
pub use model::stats::{ItemStats, ItemSummary};
pub use repository::{CycleStore, FileCycleStore, FileItemRepository, FileLogRepository, ItemRepository, LogRepository};
pub use input::{parse_args, parse_known_args, expand_key, normalize_metadata, ParsedInput};
pub use time::{parse_day, parse_range_bound};
pub use service::aggregate::{group_by_date, select, stats_for_item, summarize, DateGroup, Selection, UNKNOWN_ITEM};
pub use service::cycle_service::{CycleReset, CycleService};
pub use service::item_service::ItemService;
pub use service::log_service::{LogService, ManualEntry};
pub use service::notify::{Notifier, StoreChange, Subscription};
