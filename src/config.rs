use std::collections::HashMap;

use config::{Config as ConfigLib, ConfigError, Environment, File};
use serde::Deserialize;

use crate::client::settings::{As2ClientSettings, DEFAULT_MDN_OPTIONS};
use crate::message::DEFAULT_MESSAGE_ID_FORMAT;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub client: As2ClientSettings,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_sources(None)
    }

    pub fn load_with_sources(
        env_vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigLib::builder()
            .set_default("client.signature_algorithm", "sha256")?
            .set_default("client.encryption_algorithm", "aes128")?
            .set_default("client.mdn_options", DEFAULT_MDN_OPTIONS)?
            .set_default("client.message_id_format", DEFAULT_MESSAGE_ID_FORMAT)?
            .set_default("client.partnership_name", "")?
            .add_source(File::with_name("config/settings").required(false));

        // If env_vars is provided, we use it instead of system environment
        // This is to avoid systems variables pollution across tests
        if let Some(vars) = env_vars {
            for (key, value) in vars {
                builder = builder.set_override(&key, value)?;
            }
        } else {
            // Use system environment variables
            // Should be in the format AS2_CLIENT__SENDER_AS2_ID
            builder = builder.add_source(
                Environment::with_prefix("AS2")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        builder.build()?.try_deserialize()
    }
}
