use std::net::SocketAddr;

use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Identity of the single demo profile that every request acts on.
#[derive(Debug, Clone)]
pub struct DemoUserConfig {
    pub email: String,
    pub name: String,
    pub age: Option<i32>,
}

impl Default for DemoUserConfig {
    fn default() -> Self {
        Self {
            email: "demo@biorhyme.health".into(),
            name: "Demo User".into(),
            age: Some(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub demo_user: DemoUserConfig,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match lookup("STORE_BACKEND").as_deref().map(str::trim) {
            None | Some("") | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => anyhow::bail!("unknown STORE_BACKEND {other:?}"),
        };

        let database_url = lookup("DATABASE_URL").filter(|v| !v.is_empty());
        if store == StoreBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL is required when STORE_BACKEND=postgres");
        }

        let defaults = DemoUserConfig::default();
        let email = lookup("DEMO_USER_EMAIL")
            .map(|v| v.trim().to_lowercase())
            .unwrap_or(defaults.email);
        if !is_valid_email(&email) {
            anyhow::bail!("DEMO_USER_EMAIL {email:?} is not a valid email");
        }
        let demo_user = DemoUserConfig {
            email,
            name: lookup("DEMO_USER_NAME").unwrap_or(defaults.name),
            age: lookup("DEMO_USER_AGE")
                .and_then(|v| v.parse::<i32>().ok())
                .or(defaults.age),
        };

        Ok(Self {
            store,
            database_url,
            max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: lookup("APP_PORT")
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8080),
            demo_user,
        })
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn memory_backend_needs_no_database() {
        let cfg = config_from(&[("STORE_BACKEND", "memory")]).unwrap();
        assert_eq!(cfg.store, StoreBackend::Memory);
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.demo_user.email, "demo@biorhyme.health");
        assert_eq!(cfg.demo_user.age, Some(30));
    }

    #[test]
    fn postgres_backend_requires_database_url() {
        let err = config_from(&[]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        let cfg = config_from(&[("DATABASE_URL", "postgres://localhost/health")]).unwrap();
        assert_eq!(cfg.store, StoreBackend::Postgres);
    }

    #[test]
    fn unparsable_numbers_fall_back_to_defaults() {
        let cfg = config_from(&[
            ("STORE_BACKEND", "memory"),
            ("APP_PORT", "eighty"),
            ("DB_MAX_CONNECTIONS", "-1"),
            ("DEMO_USER_AGE", "old"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.demo_user.age, Some(30));
    }

    #[test]
    fn demo_email_is_normalized_and_validated() {
        let cfg = config_from(&[
            ("STORE_BACKEND", "memory"),
            ("DEMO_USER_EMAIL", "  Someone@Example.COM "),
        ])
        .unwrap();
        assert_eq!(cfg.demo_user.email, "someone@example.com");

        let err = config_from(&[("STORE_BACKEND", "memory"), ("DEMO_USER_EMAIL", "nope")])
            .unwrap_err();
        assert!(err.to_string().contains("not a valid email"));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(config_from(&[("STORE_BACKEND", "sqlite")]).is_err());
    }

    #[test]
    fn bind_addr_combines_host_and_port() {
        let cfg = config_from(&[
            ("STORE_BACKEND", "memory"),
            ("APP_HOST", "127.0.0.1"),
            ("APP_PORT", "9000"),
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr().unwrap().to_string(), "127.0.0.1:9000");
    }
}
