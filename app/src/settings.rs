use config::{Config, ConfigError, Environment, File};
use infrastructure::{DatabaseConfig, MonitoringConfig};
use serde::Deserialize;

const DEFAULT_COLLECTION: &str = "datas";

/// Flat keys map one-to-one to environment variables, e.g. `MONGO_URL` to `mongo_url`.
#[derive(Debug, Deserialize)]
#[allow(unused)]
pub struct Settings {
    #[serde(default)]
    pub app_debug: bool,
    pub mongo_url: String,
    pub mongo_url_master: Option<String>,
    pub qc_report_api: Option<String>,
    pub store: StoreSettings,
    pub report: ReportSettings,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreSettings {
    pub database: Option<String>,
    #[serde(default = "default_collection")]
    pub collection: String,
    pub app_name: Option<String>,
    /// Serve the sample records from memory instead of connecting to MongoDB.
    #[serde(default)]
    pub offline: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportSettings {
    pub start: String,
    pub end: String,
    pub title_pattern: Option<String>,
    pub preset: Option<String>,
    #[serde(default)]
    pub seed_sample_data: bool,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_owned()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config.toml"))
            .add_source(Environment::default().ignore_empty(true).try_parsing(true));

        let s = builder.build()?;
        s.try_deserialize()
    }

    pub fn database(&self) -> DatabaseConfig {
        DatabaseConfig::new(&self.mongo_url, self.store.database.clone(), self.store.app_name.clone())
    }

    /// Writes go to the master connection when one is configured.
    pub fn master_database(&self) -> Option<DatabaseConfig> {
        self.mongo_url_master
            .as_ref()
            .map(|url| DatabaseConfig::new(url, self.store.database.clone(), self.store.app_name.clone()))
    }
}
