use dotenvy::dotenv;
use std::env;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store: StoreKind,
    pub database_url: Option<String>,
    pub seed_demo_tasks: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} missing, it is required")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv().is_ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let raw_port = lookup("PORT").ok_or(ConfigError::Missing("PORT"))?;
        let port = raw_port.parse().map_err(|_| ConfigError::Invalid {
            name: "PORT",
            value: raw_port.clone(),
        })?;

        let store = match lookup("TASK_STORE").as_deref().map(str::trim) {
            None | Some("") | Some("postgres") => StoreKind::Postgres,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "TASK_STORE",
                    value: other.to_string(),
                })
            }
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if store == StoreKind::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let seed_demo_tasks = match lookup("SEED_DEMO_TASKS") {
            None => false,
            Some(v) => match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "" | "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "SEED_DEMO_TASKS",
                        value: v,
                    })
                }
            },
        };

        Ok(Self {
            host,
            port,
            store,
            database_url,
            seed_demo_tasks,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
