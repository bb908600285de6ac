use serde::{Deserialize, Serialize};

use crate::shared::DISCORD_ROOT_ENDPOINT;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub server_bind_point: String,
    pub port: u16,
    pub log_level: String,
    pub discord_api_root: String,
    #[serde(skip)]
    pub credentials: DiscordCredentials,
}

/// Secrets handed to the service by its host. Never written to the config file.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DiscordCredentials {
    pub token: String,
    pub public_key: String,
    pub application_id: String,
}

impl std::fmt::Debug for DiscordCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordCredentials")
            .field("token", &redact(&self.token))
            .field("public_key", &redact(&self.public_key))
            .field("application_id", &self.application_id)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new()
    }
}

impl Configuration {
    pub fn new() -> Self {
        Configuration {
            server_bind_point: "0.0.0.0".into(),
            port: 8080,
            log_level: "DEBUG".into(),
            discord_api_root: DISCORD_ROOT_ENDPOINT.into(),
            credentials: DiscordCredentials::default(),
        }
    }

    /// Defaults, then the optional config file, then the process environment.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Configuration::load_from_config_file()?;
        config.apply_environment(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from_config_file() -> anyhow::Result<Self> {
        let (Ok(config_directory_path), Ok(config_file_name)) = (
            std::env::var("CONFIG_DIRECTORY"),
            std::env::var("CONFIG_FILE_NAME"),
        ) else {
            return Ok(Configuration::new());
        };

        let config_directory = std::path::Path::new(&config_directory_path);
        if !config_directory.exists() {
            std::fs::create_dir_all(config_directory)?;
        }

        let configuration_path = config_directory.join(&config_file_name);
        if !configuration_path.exists() {
            let new_config = Configuration::new();
            let serialized = toml::to_string_pretty(&new_config)?;
            std::fs::write(configuration_path, serialized)?;
            Ok(new_config)
        } else {
            let raw_config = std::fs::read_to_string(configuration_path)?;
            Ok(toml::from_str(&raw_config)?)
        }
    }

    pub fn apply_environment<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind_point) = lookup("SERVER_BIND_POINT") {
            self.server_bind_point = bind_point;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid PORT value {port:?}: {e}"))?;
        }
        if let Some(log_level) = lookup("LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Some(api_root) = lookup("DISCORD_API_ROOT") {
            self.discord_api_root = api_root;
        }

        self.credentials = DiscordCredentials {
            token: lookup("DISCORD_TOKEN").unwrap_or_default(),
            public_key: lookup("DISCORD_PUBLIC_KEY").unwrap_or_default(),
            application_id: lookup("DISCORD_APPLICATION_ID").unwrap_or_default(),
        };

        Ok(())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_bind_point, self.port)
    }
}
