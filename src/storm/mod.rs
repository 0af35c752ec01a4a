pub mod manager;
pub mod paint;
pub mod schedule;
pub mod tuning;
