use crate::catalog::CatalogSource;
use crate::completion::{
    CredentialSource, OpenAiClient, COMPLETIONS_ENDPOINT, DEFAULT_CREDENTIAL_VAR, DEFAULT_MODEL,
};
use std::env;
use std::path::PathBuf;
use tracing::debug;

/// Catalog location used when `ROUTINE_CATALOG` is unset
pub const DEFAULT_CATALOG: &str = "products.json";

/// Runtime configuration
///
/// Read from the environment, optionally seeded by `~/.routine_builder.env`.
/// The API key is deliberately not part of it: [`CredentialSource::Env`] reads
/// the variable named by `credential_var` on each request.
#[derive(Debug, Clone)]
pub struct Config {
    pub catalog: CatalogSource,
    /// Store file; `None` when no home directory could be found
    pub store_path: Option<PathBuf>,
    pub api_url: String,
    pub model: String,
    pub credential_var: String,
}

impl Config {
    /// Load `~/.routine_builder.env` if present, then read the environment
    pub fn load() -> Self {
        if let Some(env_path) = dirs::home_dir().map(|home| home.join(".routine_builder.env")) {
            if env_path.exists() {
                match dotenv::from_path(&env_path) {
                    Ok(()) => debug!(path = %env_path.display(), "loaded env file"),
                    Err(e) => tracing::warn!("could not load {}: {}", env_path.display(), e),
                }
            }
        }
        Self::from_env()
    }

    /// Build the configuration from environment variables only
    pub fn from_env() -> Self {
        let catalog = env::var("ROUTINE_CATALOG").unwrap_or_else(|_| DEFAULT_CATALOG.to_string());
        let store_path = env::var_os("ROUTINE_STORE")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".routine_builder").join("store.json")));

        Self {
            catalog: CatalogSource::parse(&catalog),
            store_path,
            api_url: env::var("ROUTINE_API_URL").unwrap_or_else(|_| COMPLETIONS_ENDPOINT.to_string()),
            model: env::var("ROUTINE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            credential_var: env::var("ROUTINE_API_KEY_VAR")
                .unwrap_or_else(|_| DEFAULT_CREDENTIAL_VAR.to_string()),
        }
    }

    /// Completion client built from this configuration
    pub fn completion_client(&self) -> OpenAiClient {
        OpenAiClient::new(CredentialSource::Env(self.credential_var.clone()))
            .with_endpoint(self.api_url.clone())
            .with_model(self.model.clone())
    }
}
