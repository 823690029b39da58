pub mod dashboard;
pub mod monitoring;
pub mod reports;
pub mod transactions;
