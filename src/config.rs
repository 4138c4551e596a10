use derive_builder::Builder;

use crate::models::Credentials;
use crate::uri::RegistryUri;

/// Everything a registry client needs for the lifetime of the process.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct Config {
    /// Root of the registry v2 api
    registry: RegistryUri,
    /// Used only to authenticate against token realms
    #[builder(default)]
    credentials: Option<Credentials>,
}

impl Config {
    pub fn registry(&self) -> &RegistryUri {
        &self.registry
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }
}
