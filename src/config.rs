//! Runtime configuration, read from the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::bus::DEFAULT_CAPACITY;
use crate::error::{Error, Result};
use crate::lifecycle::TransitionPolicy;
use crate::planner::MissingPolicy;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    /// Upper bound on any single store-backed request.
    pub store_timeout_secs: u64,
    /// Events buffered per observer before a slow observer starts losing them.
    pub event_capacity: usize,
    pub missing_policy: MissingPolicy,
    pub transition_policy: TransitionPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 5000,
            store_timeout_secs: 5,
            event_capacity: DEFAULT_CAPACITY,
            missing_policy: MissingPolicy::Lenient,
            transition_policy: TransitionPolicy::Permissive,
        }
    }
}

impl Config {
    /// Defaults overridden by `BIND_ADDR`, `PORT`, `STORE_TIMEOUT_SECS`,
    /// `EVENT_CAPACITY`, `ROUTE_MISSING_POLICY` and `TRANSITION_POLICY`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            store_timeout_secs: parse_var(&lookup, "STORE_TIMEOUT_SECS")?
                .unwrap_or(defaults.store_timeout_secs),
            event_capacity: parse_var(&lookup, "EVENT_CAPACITY")?
                .unwrap_or(defaults.event_capacity),
            missing_policy: parse_var(&lookup, "ROUTE_MISSING_POLICY")?
                .unwrap_or(defaults.missing_policy),
            transition_policy: parse_var(&lookup, "TRANSITION_POLICY")?
                .unwrap_or(defaults.transition_policy),
        })
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs.max(1))
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::invalid(format!("{key}={raw:?} is not a valid value"))),
    }
}
