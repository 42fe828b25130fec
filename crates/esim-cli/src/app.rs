//! # Application State
//!
//! The storefront client plus the terminal navigator, built once per run.

use crate::cli::Cli;
use crate::navigator::TerminalNavigator;
use esim_client::{ClientConfig, SessionStorage, Storefront};
use std::sync::Arc;
use tracing::info;

pub struct App {
    pub storefront: Storefront,
    pub navigator: Arc<TerminalNavigator>,
    /// Print JSON instead of tables
    pub json: bool,
}

impl App {
    /// Resolve configuration from flags, config file and environment
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => ClientConfig::from_toml_file(path)?,
            None => ClientConfig::from_env()?,
        };
        if let Some(url) = &cli.api_url {
            config = config.with_api_base_url(url);
            config.validate()?;
        }

        info!("API: {}", config.api_base_url);
        let navigator = Arc::new(navigator_for(cli.json));
        let storefront = Storefront::with_file_session(config, navigator.clone())?;

        Ok(Self {
            storefront,
            navigator,
            json: cli.json,
        })
    }

    /// Build on explicit storage (used by tests)
    pub fn with_storage(
        config: ClientConfig,
        storage: Arc<dyn SessionStorage>,
        json: bool,
    ) -> anyhow::Result<Self> {
        let navigator = Arc::new(navigator_for(json));
        let storefront = Storefront::new(config, storage, navigator.clone())?;

        Ok(Self {
            storefront,
            navigator,
            json,
        })
    }
}

fn navigator_for(json: bool) -> TerminalNavigator {
    if json {
        TerminalNavigator::on_stderr()
    } else {
        TerminalNavigator::new()
    }
}
