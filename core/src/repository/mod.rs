pub mod cycle;
pub mod file;
pub mod table;
pub mod traits;

// Re-export
pub use cycle::FileCycleStore;
pub use file::{FileItemRepository, FileLogRepository};
pub use traits::{CycleStore, ItemRepository, LogRepository};
