use std::net::SocketAddr;

use anyhow::Context;

use crate::sentiment::{PolarityScorer, RemoteScorer, VaderScorer};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: SocketAddr,
    pub max_connections: u32,
    pub session_inactivity: time::Duration,
    pub scorer_url: Option<String>,
}

impl Config {
    /// Reads the process environment, after loading `.env` if there is one.
    pub fn from_env() -> anyhow::Result<Config> {
        dotenv::dotenv().ok();
        Config::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let bind_address = lookup("BIND_ADDRESS")
            .unwrap_or_else(|| "0.0.0.0:5000".to_owned())
            .parse()
            .context("BIND_ADDRESS must be a socket address")?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value.parse().context("DATABASE_MAX_CONNECTIONS must be a number")?,
            None => 16,
        };

        let session_inactivity = match lookup("SESSION_INACTIVITY_MINUTES") {
            Some(value) => time::Duration::minutes(
                value.parse().context("SESSION_INACTIVITY_MINUTES must be a number")?,
            ),
            None => time::Duration::minutes(5),
        };

        let scorer_url = lookup("SCORER_URL").filter(|url| !url.trim().is_empty());

        Ok(Config {
            database_url,
            bind_address,
            max_connections,
            session_inactivity,
            scorer_url,
        })
    }

    pub fn scorer(&self) -> PolarityScorer {
        match &self.scorer_url {
            Some(url) => PolarityScorer::Remote(RemoteScorer::new(url.clone())),
            None => PolarityScorer::Vader(VaderScorer),
        }
    }
}
