use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::{mysql::MySqlConnectOptions, ConnectOptions};

pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
}

#[derive(Clone, Deserialize)]
#[cfg_attr(test, derive(Debug))]
pub struct DatabaseSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
}

#[derive(Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let mut options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database);

        if let Some(password) = &self.password {
            options = options.password(password);
        }

        options.log_statements(log::LevelFilter::Trace);
        options
    }
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        ApplicationSettings {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

/// Read the settings from the `DB_*` environment variables.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let database = database_settings(database_environment())?;

    Ok(Settings {
        database,
        application: ApplicationSettings::default(),
    })
}

/// `DB_HOST` maps to `host`, `DB_PORT` to `port` and so on. Empty variables
/// count as unset.
fn database_environment() -> config::Environment {
    config::Environment::with_prefix("db").ignore_empty(true)
}

fn database_settings<S>(source: S) -> Result<DatabaseSettings, config::ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    config::Config::builder()
        .set_default("host", "mysql")?
        .set_default("user", "root")?
        .set_default("database", "maindb")?
        .set_default("port", 3306_i64)?
        .add_source(source)
        .build()?
        .try_deserialize()
}
