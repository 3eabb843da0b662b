use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use salreg::SplitPolicy;

use crate::error::{Result, ServerError};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

/// Startup settings, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// CSV file to train on; the bundled salary data when unset.
    pub dataset: Option<PathBuf>,
    pub split: SplitPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            dataset: None,
            split: SplitPolicy::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key/value source, falling back to defaults
    /// for missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let split = SplitPolicy::new(
            parse(&lookup, "SALREG_TEST_SIZE", defaults.split.test_size)?,
            parse(&lookup, "SALREG_SEED", defaults.split.seed)?,
        );
        split
            .validate()
            .map_err(|e| ServerError::Config(format!("SALREG_TEST_SIZE: {e}")))?;

        Ok(Config {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse(&lookup, "PORT", defaults.port)?,
            dataset: lookup("SALREG_DATASET").map(PathBuf::from),
            split,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ServerError::Config(format!("{key}={raw:?}: {e}"))),
    }
}
