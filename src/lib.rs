pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::KioskConfig;

pub use config::cli::DownloadDir;
pub use config::toml_config::TomlConfig;
pub use crate::core::api::QueueApi;
pub use crate::core::display::{BoardTiming, DisplayBoard, DisplayBoardHandle};
pub use crate::core::panel::OperatorPanel;
pub use crate::core::ticket::{TicketKiosk, TicketOutcome};
pub use domain::model::{BoardState, DisplaySnapshot, QueueEntry, RequestCode, TicketIssued};
pub use utils::error::{AntrianError, Result};
