//! Server configuration read from the environment

use std::net::SocketAddr;

/// Environment variable holding the store connection URL
pub const DATABASE_URL_VAR: &str = "TODO_DATABASE_URL";

const DEFAULT_DATABASE_URL: &str = "sqlite://.todo-data/todos.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            // Bind to 0.0.0.0 for localhost/127.0.0.1 compatibility
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8081)),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(DATABASE_URL_VAR) {
            let url = url.trim();
            if !url.is_empty() {
                config.database_url = url.to_string();
            }
        }
        config
    }
}
