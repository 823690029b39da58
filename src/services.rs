pub mod aggregation;
pub mod dashboard_service;
pub mod enrichment;
pub mod name_cache;
pub mod refresher;
pub mod report_service;
