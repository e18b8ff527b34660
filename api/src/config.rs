use std::env;
use std::str::FromStr;

use anyhow::{anyhow, Context};

use crate::app::review_config::DEFAULT_REVIEWS_PER_SUBMISSION;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Number of peers assigned to review each submission
    pub reviews_per_submission: usize,
    /// Interval of the deadline sweeper in seconds; 0 disables it
    pub deadline_sweep_secs: u64,
    /// Fixed seed for review assignment, for reproducible runs
    pub assignment_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;

        let reviews_per_submission =
            parse_or(&lookup, "REVIEWS_PER_SUBMISSION", DEFAULT_REVIEWS_PER_SUBMISSION)?;
        if reviews_per_submission == 0 {
            return Err(anyhow!("REVIEWS_PER_SUBMISSION must be at least 1"));
        }

        Ok(Self {
            database_url,
            port: parse_or(&lookup, "PORT", 8080)?,
            reviews_per_submission,
            deadline_sweep_secs: parse_or(&lookup, "DEADLINE_SWEEP_SECS", 300)?,
            assignment_seed: lookup("ASSIGNMENT_SEED")
                .map(|v| v.trim().parse::<u64>())
                .transpose()
                .context("ASSIGNMENT_SEED must be an unsigned integer")?,
        })
    }

    /// Check if the background deadline sweeper should run
    pub fn sweeper_enabled(&self) -> bool {
        self.deadline_sweep_secs > 0
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}
