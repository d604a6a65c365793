use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use secrecy::SecretString;
use serde::Deserialize;
use serde_aux::field_attributes::{deserialize_bool_from_anything, deserialize_number_from_string};

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub catalog: CatalogSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    pub url: SecretString,
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub create_if_missing: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub questions_per_page: usize,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Settings {
    /// Defaults, then `trivia.{toml,json,yaml}` if present, then `TRIVIA_*` variables
    /// (`TRIVIA_SERVER__PORT=8080` sets `server.port`). A `.env` file is read first.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        defaults()?
            .add_source(File::with_name("trivia").required(false))
            .add_source(
                Environment::with_prefix("TRIVIA")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize::<Settings>()?
            .validated()
    }

    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize::<Settings>()?
            .validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.catalog.questions_per_page == 0 {
            return Err(ConfigError::Message(
                "catalog.questions_per_page must be positive".to_owned(),
            ));
        }
        Ok(self)
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5000)?
        .set_default("database.url", "sqlite:trivia.db")?
        .set_default("database.create_if_missing", true)?
        .set_default("catalog.questions_per_page", 10)
}
