use anyhow::Context as _;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use serde::Deserialize;

const FALLBACK_DATABASE: &str = "control_chart";

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    url: String,
    database: Option<String>,
    app_name: Option<String>,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>, database: Option<String>, app_name: Option<String>) -> Self {
        Self {
            url: url.into(),
            database,
            app_name,
        }
    }

    /// Opens a client and resolves the database to use: the configured name first, then the
    /// default database of the connection string.
    pub async fn connect(&self) -> anyhow::Result<mongodb::Database> {
        let mut options = ClientOptions::parse(&self.url)
            .await
            .with_context(|| format!("Error parsing connection string for {}", self.redacted_url()))?;
        options.app_name = self.app_name.clone();

        let client = mongodb::Client::with_options(options)
            .with_context(|| format!("Error creating client for {}", self.redacted_url()))?;

        let database = match &self.database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database(FALLBACK_DATABASE)),
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .with_context(|| format!("Error connecting to database {}", self.redacted_url()))?;

        tracing::info!("Connected to MongoDB database {}", database.name());

        Ok(database)
    }

    /// Connection string with the password replaced, safe for log output.
    pub fn redacted_url(&self) -> String {
        redact(&self.url)
    }
}

fn redact(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_owned();
    };

    let (authority, path) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };

    match authority.rsplit_once('@') {
        Some((credentials, host)) => {
            let user = credentials.split(':').next().unwrap_or_default();
            format!("{scheme}://{user}:***@{host}{path}")
        }
        None => url.to_owned(),
    }
}
