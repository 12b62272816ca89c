mod db;
mod monitoring;

pub use db::DatabaseConfig;
pub use monitoring::MonitoringConfig;
