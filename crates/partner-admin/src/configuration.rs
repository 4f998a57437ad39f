use std::path::Path;

use partner_shared::const_config::service_layer::{DEFAULT_COMPANY_DB, DEFAULT_SERVICE_LAYER_URL};

#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Configuration {
    pub service_layer: ServiceLayerSettings,
}

/// Connection settings used to prefill the login form
#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ServiceLayerSettings {
    pub url: String,
    pub company_db: String,
}

impl Default for ServiceLayerSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVICE_LAYER_URL.to_string(),
            company_db: DEFAULT_COMPANY_DB.to_string(),
        }
    }
}

/// Loads the configuration from the `configuration` folder in the current
/// working directory
pub fn get_configuration() -> anyhow::Result<Configuration> {
    let base_path = std::env::current_dir()?;
    Ok(build_configuration(&base_path.join("configuration"))?)
}

/// Built in defaults, then `base.toml` in `configuration_directory` if it
/// exists, then environment variables
pub fn build_configuration(
    configuration_directory: &Path,
) -> Result<Configuration, config::ConfigError> {
    let settings = config::Config::builder()
        .set_default("service_layer.url", DEFAULT_SERVICE_LAYER_URL)?
        .set_default("service_layer.company_db", DEFAULT_COMPANY_DB)?
        .add_source(
            config::File::from(configuration_directory.join("base.toml")).required(false),
        )
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_SERVICE_LAYER__URL=https://sl:50000/b1s/v1` would set `Configuration.service_layer.url`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Configuration>()
}
