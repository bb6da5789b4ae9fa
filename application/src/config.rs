//! Layered server [`Config`].

use common::Currency;
use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use service::engine::window::DEFAULT_BUFFER_MONTHS;
use smart_default::SmartDefault;

/// Configuration of the rental management server.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// HTTP [`Server`] configuration.
    #[serde(default)]
    pub server: Server,

    /// Rental [`Service`] configuration.
    #[serde(default)]
    pub service: Service,

    /// [`Postgres`] connection configuration.
    #[serde(default)]
    pub postgres: Postgres,

    /// [`Log`] configuration.
    #[serde(default)]
    pub log: Log,
}

impl Config {
    /// Loads the [`Config`] from the provided file `path`, overridden by
    /// `CONF.`-prefixed environment variables (e.g. `CONF.SERVER.PORT`).
    ///
    /// The file is optional, and any missing value takes its default.
    ///
    /// # Errors
    ///
    /// If the file or an environment variable holds an invalid value.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// HTTP server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to listen on.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to listen on.
    #[default(8080)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// Origins the GraphQL API may be called from.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Rental service configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// [`Currency`] every product is priced and reported in.
    #[default(Currency::Usd)]
    pub currency: Currency,

    /// Number of months a calendar window is extended by on both sides.
    #[default(DEFAULT_BUFFER_MONTHS)]
    pub calendar_buffer_months: u8,
}

impl From<Service> for service::Config {
    fn from(value: Service) -> Self {
        let Service {
            currency,
            calendar_buffer_months,
        } = value;
        Self {
            currency,
            calendar_buffer_months,
        }
    }
}

/// Postgres configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Postgres {
    /// Host to connect to.
    #[default("127.0.0.1".to_owned())]
    pub host: String,

    /// Port to connect to.
    #[default(5432)]
    pub port: u16,

    /// User to connect as.
    #[default("postgres".to_owned())]
    pub user: String,

    /// Password to connect with.
    #[default("postgres".to_owned())]
    pub password: String,

    /// Database name to connect to.
    #[default("postgres".to_owned())]
    pub dbname: String,
}

impl From<Postgres> for service::infra::postgres::Config {
    fn from(value: Postgres) -> Self {
        let Postgres {
            host,
            port,
            user,
            password,
            dbname,
        } = value;

        Self {
            host: Some(host),
            port: Some(port),
            user: Some(user),
            password: Some(password),
            dbname: Some(dbname),
            ..Self::default()
        }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use common::Currency;

    use super::{Config, LogLevel};

    #[test]
    fn defaults_without_file() {
        let conf = Config::new("definitely/missing/config.toml").unwrap();

        assert_eq!(conf.server.port, 8080);
        assert_eq!(conf.server.cors.origins, ["*"]);
        assert_eq!(conf.service.currency, Currency::Usd);
        assert_eq!(conf.service.calendar_buffer_months, 1);
        assert_eq!(conf.postgres.port, 5432);
        assert!(matches!(conf.log.level, LogLevel::Info));
    }
}
