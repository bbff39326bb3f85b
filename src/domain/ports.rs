use crate::domain::model::{QueueEntry, RequestCode};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings shared by everything that talks to the queue server.
pub trait ClientConfig: Send + Sync {
    fn server_url(&self) -> &str;

    fn connect_timeout(&self) -> Duration {
        DEFAULT_CONNECT_TIMEOUT
    }

    fn request_timeout(&self) -> Duration {
        DEFAULT_REQUEST_TIMEOUT
    }
}

/// Render surface of the kiosk: the request code area and modal alerts.
pub trait KioskView: Send + Sync {
    fn show_request_code(&self, code: &RequestCode);
    fn alert(&self, message: &str);
}

/// Render surface of the public board, one method per region. A region
/// that receives no call keeps whatever it showed before.
pub trait DisplayView: Send + Sync {
    fn show_timestamp(&self, stamp: &str);
    fn show_current_queue(&self, text: &str);
    fn show_status_line(&self, text: &str);
    fn show_call_count(&self, text: &str);
    fn show_waiting_count(&self, count: u32);
}

/// Render surface of the operator panel.
pub trait PanelView: Send + Sync {
    fn show_current_queue(&self, queue_number: Option<&str>);
    fn show_call_info(&self, text: &str);
    fn show_waiting_list(&self, entries: &[QueueEntry]);
    /// Voice announcement, already fully phrased.
    fn announce(&self, message: &str);
    fn show_status(&self, message: &str, is_error: bool);
}

/// Hands an issued ticket's PDF to the customer.
#[async_trait]
pub trait TicketDelivery: Send + Sync {
    /// Primary path: save the document under the suggested filename.
    async fn download(&self, pdf_url: &str, filename: &str) -> Result<()>;

    /// Fallback when the download cannot be triggered: open the document
    /// in an external context instead.
    async fn open_fallback(&self, pdf_url: &str) -> Result<()>;
}
