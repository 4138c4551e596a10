use clap::Args;
use docker_registry_client::config::{Config, ConfigBuilder};
use docker_registry_client::error;
use docker_registry_client::models::Credentials;
use docker_registry_client::registry::Registry;
use docker_registry_client::uri::RegistryUri;
use snafu::{OptionExt, ResultExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Flags shared by every subcommand
#[derive(Args, Debug)]
pub struct RegistryArgs {
    /// Registry base URL (eg. https://index.docker.io)
    #[arg(short, long, env = "REGISTRY", global = true)]
    registry: Option<RegistryUri>,
    /// Username
    #[arg(short, long, env = "REGISTRY_USERNAME", global = true)]
    username: Option<String>,
    /// Password
    #[arg(long, env = "REGISTRY_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,
}

impl RegistryArgs {
    fn config(&self) -> Result<Config, error::Error> {
        let registry = self
            .registry
            .clone()
            .context(error::MissingRegistrySnafu)?;
        let credentials = Credentials::new(
            self.username.as_deref().unwrap_or_default(),
            self.password.as_deref().unwrap_or_default(),
        );
        ConfigBuilder::default()
            .registry(registry)
            .credentials(credentials)
            .build()
            .context(error::ConfigSnafu)
    }
}

pub struct Ctx {
    config: Config,
}

impl Ctx {
    pub fn init(args: &RegistryArgs) -> anyhow::Result<Self> {
        // stdout is reserved for command output
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_filter(EnvFilter::from_default_env()),
            )
            .try_init()?;
        let config = args.config()?;
        debug!("using registry {}", config.registry());
        Ok(Self { config })
    }

    pub fn registry(&self) -> Registry {
        Registry::new(self.config.clone())
    }
}
