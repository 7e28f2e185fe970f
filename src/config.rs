use crate::error::{BadEnvVarSnafu, ParseNumberSnafu, RosterResult, UnknownStoreKindSnafu};
use dotenvy::var;
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;
use std::sync::Arc;

const DEFAULT_SERVER_IP: &str = "127.0.0.1:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 15;

/// Reads an optional variable, falling back when it is unset.
fn var_or(name: &'static str, default: &str) -> String {
    var(name).unwrap_or_else(|_| default.to_string())
}

#[derive(Clone, Debug)]
pub enum StoreConfig {
    Postgres(Arc<DbConfig>),
    Memory,
}

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    server_ip: String,
    store: StoreConfig,
    seed_students: usize,
}

impl RuntimeConfiguration {
    pub fn new() -> RosterResult<Self> {
        let store = match var_or("ROSTER_STORE", "postgres").to_lowercase().as_str() {
            "postgres" => StoreConfig::Postgres(Arc::new(DbConfig::new()?)),
            "memory" => StoreConfig::Memory,
            other => return UnknownStoreKindSnafu { original: other }.fail(),
        };

        let seed_students = var_or("ROSTER_SEED_STUDENTS", "0")
            .parse()
            .context(ParseNumberSnafu {
                name: "ROSTER_SEED_STUDENTS",
            })?;

        Ok(Self {
            server_ip: var_or("ROSTER_SERVER_IP", DEFAULT_SERVER_IP),
            store,
            seed_students,
        })
    }

    pub fn server_ip(&self) -> &str {
        &self.server_ip
    }

    pub fn store(&self) -> &StoreConfig {
        &self.store
    }

    pub const fn seed_students(&self) -> usize {
        self.seed_students
    }
}

#[derive(Debug)]
pub struct DbConfig {
    user: String,
    password: SecretString,
    path: String,
    port: u16,
    database: String,
    max_connections: u32,
}

impl DbConfig {
    pub fn new() -> RosterResult<Self> {
        let get_env_var = |name| var(name).context(BadEnvVarSnafu { name });

        let max_connections = match var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse().context(ParseNumberSnafu {
                name: "DB_MAX_CONNECTIONS",
            })?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            user: get_env_var("DB_USER")?,
            password: SecretString::from(get_env_var("DB_PASSWORD")?),
            path: get_env_var("DB_PATH")?,
            port: get_env_var("DB_PORT")?
                .parse()
                .context(ParseNumberSnafu { name: "DB_PORT" })?,
            database: get_env_var("DB_NAME")?,
            max_connections,
        })
    }

    pub const fn max_connections(&self) -> u32 {
        self.max_connections
    }

    pub fn get_db_path(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user,
            self.password.expose_secret(),
            self.path,
            self.port,
            self.database
        )
    }
}
