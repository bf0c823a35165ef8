//! Connection configuration for flushing batched updates.

use std::env;
use std::time::Duration;

use mongodb::options::ClientOptions;

use crate::error::{MongoError, MongoResult};

/// Environment variable holding the connection URI.
pub const ENV_URI: &str = "MONGOUTILS_URI";
/// Environment variable holding the database name.
pub const ENV_DATABASE: &str = "MONGOUTILS_DATABASE";
/// Environment variable holding the application name.
pub const ENV_APP_NAME: &str = "MONGOUTILS_APP_NAME";

const DEFAULT_URI: &str = "mongodb://localhost:27017";
const DEFAULT_APP_NAME: &str = "mongoutils";

/// MongoDB connection configuration.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// MongoDB connection URI.
    pub uri: String,
    /// Database name.
    pub database: String,
    /// Application name (shown in server logs).
    pub app_name: Option<String>,
    /// Maximum connection pool size.
    pub max_pool_size: Option<u32>,
    /// Connection timeout.
    pub connect_timeout: Option<Duration>,
    /// Server selection timeout.
    pub server_selection_timeout: Option<Duration>,
    /// Retry writes.
    pub retry_writes: Option<bool>,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            database: String::new(),
            app_name: Some(DEFAULT_APP_NAME.to_string()),
            max_pool_size: Some(10),
            connect_timeout: Some(Duration::from_secs(10)),
            server_selection_timeout: Some(Duration::from_secs(30)),
            retry_writes: Some(true),
        }
    }
}

impl MongoConfig {
    /// Create a new configuration from a MongoDB URI.
    pub fn from_uri(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    /// Create a builder for configuration.
    pub fn builder() -> MongoConfigBuilder {
        MongoConfigBuilder::new()
    }

    /// Read the configuration from `MONGOUTILS_*` environment variables.
    ///
    /// `MONGOUTILS_DATABASE` is required; the URI falls back to localhost.
    pub fn from_env() -> MongoResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> MongoResult<Self> {
        let mut builder = Self::builder();
        if let Some(uri) = lookup(ENV_URI) {
            builder = builder.uri(uri);
        }
        if let Some(database) = lookup(ENV_DATABASE) {
            builder = builder.database(database);
        }
        if let Some(app_name) = lookup(ENV_APP_NAME) {
            builder = builder.app_name(app_name);
        }
        builder.build()
    }

    /// Convert to MongoDB ClientOptions.
    pub async fn to_client_options(&self) -> MongoResult<ClientOptions> {
        let mut options = ClientOptions::parse(&self.uri)
            .await
            .map_err(|e| MongoError::config(format!("failed to parse URI: {}", e)))?;

        if let Some(ref app_name) = self.app_name {
            options.app_name = Some(app_name.clone());
        }

        if let Some(max_pool) = self.max_pool_size {
            options.max_pool_size = Some(max_pool);
        }

        if let Some(connect_timeout) = self.connect_timeout {
            options.connect_timeout = Some(connect_timeout);
        }

        if let Some(selection_timeout) = self.server_selection_timeout {
            options.server_selection_timeout = Some(selection_timeout);
        }

        if let Some(retry_writes) = self.retry_writes {
            options.retry_writes = Some(retry_writes);
        }

        Ok(options)
    }
}

/// Builder for MongoDB configuration.
#[derive(Debug, Default)]
pub struct MongoConfigBuilder {
    uri: Option<String>,
    database: Option<String>,
    app_name: Option<String>,
    max_pool_size: Option<u32>,
    connect_timeout: Option<Duration>,
    server_selection_timeout: Option<Duration>,
    retry_writes: Option<bool>,
}

impl MongoConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the MongoDB URI.
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Set the database name.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Set the application name.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Set the maximum pool size.
    pub fn max_pool_size(mut self, size: u32) -> Self {
        self.max_pool_size = Some(size);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Set the server selection timeout.
    pub fn server_selection_timeout(mut self, duration: Duration) -> Self {
        self.server_selection_timeout = Some(duration);
        self
    }

    /// Enable or disable retry writes.
    pub fn retry_writes(mut self, enabled: bool) -> Self {
        self.retry_writes = Some(enabled);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> MongoResult<MongoConfig> {
        let database = self
            .database
            .filter(|db| !db.is_empty())
            .ok_or_else(|| MongoError::config("database name is required"))?;

        Ok(MongoConfig {
            uri: self.uri.unwrap_or_else(|| DEFAULT_URI.to_string()),
            database,
            app_name: self.app_name.or(Some(DEFAULT_APP_NAME.to_string())),
            max_pool_size: self.max_pool_size.or(Some(10)),
            connect_timeout: self.connect_timeout.or(Some(Duration::from_secs(10))),
            server_selection_timeout: self
                .server_selection_timeout
                .or(Some(Duration::from_secs(30))),
            retry_writes: self.retry_writes.or(Some(true)),
        })
    }
}
