pub mod dashboard;
pub mod history;
pub mod report;
