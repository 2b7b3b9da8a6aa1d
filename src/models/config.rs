use serde::Deserialize;

/// Configuration options of the dashboard server.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub address: String,
    pub port: u16,
    /// Path of the SQLite database file.
    pub database_url: String,
    /// Secret used to sign session and flash cookies. At least 64 bytes.
    pub secret: String,
    /// Glob passed to tera when loading templates.
    pub templates_dir: String,
    /// Directory served under `/assets`.
    pub static_dir: String,
    pub asset_host: AssetHostConfig,
    pub identity: IdentityConfig,
}

/// Image hosting endpoint and credentials.
#[derive(Clone, Debug, Deserialize)]
pub struct AssetHostConfig {
    pub upload_url: String,
    pub client_id: String,
}

/// Password sign-in endpoint of the identity provider.
#[derive(Clone, Debug, Deserialize)]
pub struct IdentityConfig {
    pub sign_in_url: String,
    pub api_key: String,
}

#[cfg(feature = "server")]
impl ServerConfig {
    /// Loads `config/default.yaml`, then `config/{APP_ENV}.yaml` when
    /// `APP_ENV` is set, then `APP__*` environment variables
    /// (`APP__ASSET_HOST__CLIENT_ID` sets `asset_host.client_id`).
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        if let Ok(env) = std::env::var("APP_ENV") {
            builder =
                builder.add_source(config::File::with_name(&format!("config/{env}")).required(false));
        }

        builder
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }
}
