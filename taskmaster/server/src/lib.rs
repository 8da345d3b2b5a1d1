pub mod config {
    use anyhow::Context;
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct Config {
        /// Full connection string; takes precedence over the `pg_*` parts.
        #[serde(default)]
        pub database_url: Option<String>,
        #[serde(default)]
        pub pg_host: Option<String>,
        #[serde(default)]
        pub pg_user: Option<String>,
        #[serde(default)]
        pub pg_password: Option<String>,
        #[serde(default)]
        pub pg_database: Option<String>,
        #[serde(default = "default_pg_port")]
        pub pg_port: u16,
        /// `require` turns on TLS for the assembled connection string.
        #[serde(default)]
        pub pg_ssl: Option<String>,
        #[serde(default = "default_port")]
        pub port: u16,
        #[serde(default = "default_cors_origin")]
        pub cors_origin: String,
        #[serde(default = "default_log_level")]
        pub log_level: String,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(config::Environment::default())
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }

        /// Returns `database_url` or, failing that, a Postgres URL built from the `pg_*` parts.
        pub fn database_url(&self) -> anyhow::Result<String> {
            if let Some(url) = &self.database_url {
                return Ok(url.clone());
            }

            let host = self
                .pg_host
                .as_deref()
                .context("Either DATABASE_URL or PG_HOST must be set")?;
            let user = self.pg_user.as_deref().context("PG_USER must be set")?;
            let database = self
                .pg_database
                .as_deref()
                .context("PG_DATABASE must be set")?;
            let credentials = match self.pg_password.as_deref() {
                Some(password) => format!("{}:{}", user, password),
                None => user.to_string(),
            };

            let mut url = format!(
                "postgres://{}@{}:{}/{}",
                credentials, host, self.pg_port, database
            );
            if self.pg_ssl.as_deref() == Some("require") {
                url.push_str("?sslmode=require");
            }
            Ok(url)
        }
    }

    fn default_pg_port() -> u16 {
        5432
    }

    fn default_port() -> u16 {
        5000
    }

    fn default_cors_origin() -> String {
        "http://localhost:5173".to_string()
    }

    fn default_log_level() -> String {
        "info".to_string()
    }

}

pub mod entities;
pub mod note;
pub mod todo;
pub mod web;
