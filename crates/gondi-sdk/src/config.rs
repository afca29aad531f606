//! Client Configuration
//!
//! Settings are layered: `.env`, an optional explicit file, `config/default`,
//! `config/local`, then `GONDI__*` environment variables.

use gondi_catalog::CatalogConfig;
use gondi_types::{Address, Deployments, ProtocolVersion, MAINNET_CHAIN_ID};
use serde::{Deserialize, Serialize};

/// Gondi client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GondiConfig {
    /// Chain the ledger client is connected to
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    /// MultiSourceLoan to act on; the newest deployment when unset
    #[serde(default)]
    pub multi_source_loan: Option<Address>,

    /// Remote catalog connection
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Explicit deployment table; derived from `chain_id` when unset
    #[serde(default)]
    pub deployments: Option<Deployments>,
}

fn default_chain_id() -> u64 {
    MAINNET_CHAIN_ID
}

impl Default for GondiConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            multi_source_loan: None,
            catalog: CatalogConfig::default(),
            deployments: None,
        }
    }
}

impl GondiConfig {
    /// Load configuration from files and environment
    pub fn load(config_path: Option<&str>) -> anyhow::Result<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let mut builder = config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        // GONDI__CHAIN_ID, GONDI__CATALOG__ENDPOINT, ...
        builder = builder.add_source(
            config::Environment::with_prefix("GONDI")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let gondi_config: GondiConfig = config.try_deserialize()?;

        tracing::debug!(
            chain_id = gondi_config.chain_id,
            catalog = %gondi_config.catalog.endpoint,
            "configuration loaded"
        );
        Ok(gondi_config)
    }

    /// Configuration for a local node with default catalog settings
    pub fn development() -> Self {
        Self {
            chain_id: gondi_types::ANVIL_CHAIN_ID,
            ..Default::default()
        }
    }

    pub fn deployments(&self) -> Deployments {
        self.deployments
            .clone()
            .unwrap_or_else(|| Deployments::for_chain(self.chain_id))
    }

    /// The MultiSourceLoan address the client acts on
    pub fn verifying_contract(&self) -> Address {
        self.multi_source_loan
            .unwrap_or_else(|| self.deployments().multi_source_loan(ProtocolVersion::V5_1))
    }
}
