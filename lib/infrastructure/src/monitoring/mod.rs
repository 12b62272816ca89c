use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct MonitoringConfig {
    pub default_level: String,
    #[serde(default)]
    pub filters: Vec<String>,
    #[serde(default)]
    pub json: bool,
}

impl MonitoringConfig {
    fn env_filter(&self, debug: bool) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
        let default_level = if debug { "debug" } else { self.default_level.as_str() };

        EnvFilter::builder()
            .with_default_directive(default_level.parse()?)
            .parse(self.filters.join(","))
    }

    pub fn init(&self, debug: bool) -> anyhow::Result<()> {
        let filter = self.env_filter(debug)?;

        if self.json {
            tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer().json())
                .with(filter)
                .try_init()?;
        } else {
            tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer())
                .with(filter)
                .try_init()?;
        }

        Ok(())
    }
}
