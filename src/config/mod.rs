pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::ports::ClientConfig;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "antrian-kiosk")]
#[command(about = "Queue ticket kiosk for a service counter")]
pub struct KioskConfig {
    #[arg(long, default_value = "http://localhost:5000")]
    pub server_url: String,

    #[arg(long, default_value = "PELAYANAN UMUM")]
    pub service_type: String,

    #[arg(long, default_value = "./tickets")]
    pub download_dir: String,

    #[arg(
        long,
        default_value = "1000",
        help = "Delay before the PDF download is triggered (milliseconds)"
    )]
    pub settle_delay_ms: u64,

    #[arg(long, help = "Trigger a single scan immediately and exit")]
    pub scan: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ClientConfig for KioskConfig {
    fn server_url(&self) -> &str {
        &self.server_url
    }
}

#[cfg(feature = "cli")]
impl Validate for KioskConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("server_url", &self.server_url)?;
        validation::validate_non_empty_string("service_type", &self.service_type)?;
        validation::validate_path("download_dir", &self.download_dir)?;
        validation::validate_range("settle_delay_ms", self.settle_delay_ms, 0, 60_000)?;
        Ok(())
    }
}
