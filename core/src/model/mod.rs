pub mod cart;
pub mod item;
pub mod log;
pub mod settings;
pub mod stats;
