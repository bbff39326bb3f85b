use crate::domain::ports::TicketDelivery;
use crate::utils::error::{AntrianError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::fs;
use std::path::{Path, PathBuf};

/// Saves ticket PDFs into a local directory, the kiosk's download folder.
#[derive(Debug, Clone)]
pub struct DownloadDir {
    base_path: PathBuf,
    client: Client,
}

impl DownloadDir {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            client: Client::new(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait]
impl TicketDelivery for DownloadDir {
    async fn download(&self, pdf_url: &str, filename: &str) -> Result<()> {
        let response = self
            .client
            .get(pdf_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AntrianError::DownloadError {
                message: format!("fetch {}: {}", pdf_url, e),
            })?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AntrianError::DownloadError {
                message: format!("read document body: {}", e),
            })?;

        let full_path = self.base_path.join(filename);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full_path, &bytes)?;

        tracing::info!("Ticket saved to: {}", full_path.display());
        Ok(())
    }

    async fn open_fallback(&self, pdf_url: &str) -> Result<()> {
        // 無瀏覽器可自動開啟，交由現場人員
        println!("📄 Buka tiket Anda di: {}", pdf_url);
        Ok(())
    }
}
