pub mod aggregate;
pub mod cycle_service;
pub mod dto;
pub mod item_service;
pub mod log_service;
pub mod notify;
