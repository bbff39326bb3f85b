use crate::core::api::QueueApi;
use crate::domain::model::{RequestCode, TicketIssued};
use crate::domain::ports::{KioskView, TicketDelivery};
use crate::utils::error::AntrianError;
use std::time::Duration;

/// Pause between ticket issue and download trigger, giving the server
/// time to finish writing the PDF.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// How one ticket interaction ended. The user already saw the matching
/// alert by the time a value is returned.
#[derive(Debug)]
pub enum TicketOutcome {
    /// PDF saved under `ticket_<queue_number>.pdf`.
    Delivered(TicketIssued),
    /// Download could not be triggered; the document was opened externally.
    OpenedExternally(TicketIssued),
    Failed(AntrianError),
}

/// Ticket counter front end: renders the request code and turns scans
/// into issued tickets.
pub struct TicketKiosk<V: KioskView, D: TicketDelivery> {
    api: QueueApi,
    view: V,
    delivery: D,
    service_type: String,
    settle_delay: Duration,
}

impl<V: KioskView, D: TicketDelivery> TicketKiosk<V, D> {
    pub fn new(api: QueueApi, view: V, delivery: D, service_type: impl Into<String>) -> Self {
        Self {
            api,
            view,
            delivery,
            service_type: service_type.into(),
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn service_type(&self) -> &str {
        &self.service_type
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn current_code(&self) -> RequestCode {
        RequestCode::new(self.service_type.clone())
    }

    /// Switch the offered service and re-render the request code.
    pub fn select_service(&mut self, service_type: &str) {
        self.service_type = service_type.to_string();
        self.view.show_request_code(&self.current_code());
        tracing::debug!("Request code now encodes service: {}", service_type);
    }

    /// What a scan of the rendered code triggers.
    pub async fn trigger_scan(&self) -> TicketOutcome {
        let service_type = self.service_type.clone();
        self.request_ticket(&service_type).await
    }

    /// One full ticket interaction: request a number, then deliver its PDF.
    pub async fn request_ticket(&self, service_type: &str) -> TicketOutcome {
        match self.api.generate_ticket(service_type).await {
            Ok(ticket) => self.deliver(ticket).await,
            Err(AntrianError::BusinessError { message }) => {
                self.view.alert(&format!("Gagal: {}", message));
                TicketOutcome::Failed(AntrianError::BusinessError { message })
            }
            Err(error) => {
                tracing::warn!("Ticket request failed: {}", error);
                self.view.alert(&format!(
                    "Terjadi kesalahan saat menghubungi server: {}",
                    error
                ));
                TicketOutcome::Failed(error)
            }
        }
    }

    async fn deliver(&self, ticket: TicketIssued) -> TicketOutcome {
        // 等待伺服器寫完 PDF
        tokio::time::sleep(self.settle_delay).await;

        let filename = format!("ticket_{}.pdf", ticket.queue_number);
        match self.delivery.download(&ticket.pdf_url, &filename).await {
            Ok(()) => {
                self.view.alert(&format!(
                    "Antrian {} berhasil dibuat! PDF sedang terdownload.",
                    ticket.queue_number
                ));
                TicketOutcome::Delivered(ticket)
            }
            Err(error) => {
                tracing::warn!("Download trigger failed ({}), opening externally", error);
                if let Err(fallback_error) = self.delivery.open_fallback(&ticket.pdf_url).await {
                    tracing::warn!("External open failed as well: {}", fallback_error);
                }
                self.view.alert(&format!(
                    "Antrian {} berhasil dibuat! PDF akan terbuka di tab baru.",
                    ticket.queue_number
                ));
                TicketOutcome::OpenedExternally(ticket)
            }
        }
    }
}
