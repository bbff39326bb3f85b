use serde::{Deserialize, Serialize};
use url::Url;

/// Endpoint of the external code image renderer.
pub const CODE_IMAGE_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/";
/// Rendered image size in pixels, `WIDTHxHEIGHT`.
pub const CODE_IMAGE_SIZE: &str = "250x250";

const PAYLOAD_PREFIX: &str = "GENERATE_QUEUE:";

/// JSON body sent to the ticket generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRequest {
    pub service_type: String,
}

/// A ticket the server has issued: the printed queue number plus the
/// location of its PDF slip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketIssued {
    pub queue_number: String,
    pub pdf_url: String,
}

/// Scannable request code shown on the kiosk. The payload carries the
/// service type; scanning it is equivalent to pressing the ticket button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestCode {
    service_type: String,
}

impl RequestCode {
    pub fn new(service_type: impl Into<String>) -> Self {
        Self {
            service_type: service_type.into(),
        }
    }

    pub fn service_type(&self) -> &str {
        &self.service_type
    }

    /// Plain-text payload encoded into the code image.
    pub fn payload(&self) -> String {
        format!("{}{}", PAYLOAD_PREFIX, self.service_type)
    }

    /// Full URL of the rendered code image, payload URL-encoded.
    pub fn image_url(&self) -> String {
        // 靜態端點必定合法
        Url::parse_with_params(
            CODE_IMAGE_ENDPOINT,
            &[("data", self.payload().as_str()), ("size", CODE_IMAGE_SIZE)],
        )
        .unwrap()
        .to_string()
    }

    /// Recover the encoded payload from an image URL.
    pub fn parse_payload(image_url: &str) -> Option<String> {
        let url = Url::parse(image_url).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "data")
            .map(|(_, value)| value.into_owned())
    }

    /// Extract the service type from a scanned payload.
    pub fn service_from_payload(payload: &str) -> Option<&str> {
        payload.strip_prefix(PAYLOAD_PREFIX)
    }
}

/// Current queue state as reported by the display endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySnapshot {
    pub current_queue: Option<String>,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub call_count: u32,
    #[serde(default)]
    pub waiting_count: u32,
}

/// One row of the full queue listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub queue_number: String,
    pub service_type: String,
    pub status: String,
}

/// What the public board shows for one polling tick.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardState {
    /// A queue number is currently being called to a counter.
    Active {
        queue_number: String,
        service_type: String,
        call_count: u32,
        waiting_count: u32,
    },
    /// No active call; waiting for the next ticket.
    Idle { waiting_count: u32 },
    /// The last poll failed; stale counters are kept as-is.
    ConnectionLost,
}

impl BoardState {
    pub fn from_snapshot(snapshot: DisplaySnapshot) -> Self {
        match snapshot.current_queue {
            Some(queue_number) => BoardState::Active {
                queue_number,
                service_type: snapshot.service_type,
                call_count: snapshot.call_count,
                waiting_count: snapshot.waiting_count,
            },
            None => BoardState::Idle {
                waiting_count: snapshot.waiting_count,
            },
        }
    }

    /// Large queue number region of the board.
    pub fn queue_text(&self) -> &str {
        match self {
            BoardState::Active { queue_number, .. } => queue_number,
            BoardState::Idle { .. } => "-",
            BoardState::ConnectionLost => "ERROR",
        }
    }

    /// Status line under the queue number.
    pub fn status_line(&self) -> String {
        match self {
            BoardState::Active {
                service_type,
                call_count,
                ..
            } => format!("Layanan {} - Panggilan ke {}", service_type, call_count),
            BoardState::Idle { .. } => "Menunggu antrian baru".to_string(),
            BoardState::ConnectionLost => "Koneksi terputus".to_string(),
        }
    }

    /// Call counter text, `None` when the region must keep its last value.
    pub fn call_count_text(&self) -> Option<String> {
        match self {
            BoardState::Active { call_count, .. } => Some(call_count.to_string()),
            BoardState::Idle { .. } => Some("0".to_string()),
            BoardState::ConnectionLost => None,
        }
    }

    /// Waiting counter, `None` when the region must keep its last value.
    pub fn waiting_count(&self) -> Option<u32> {
        match self {
            BoardState::Active { waiting_count, .. } | BoardState::Idle { waiting_count } => {
                Some(*waiting_count)
            }
            BoardState::ConnectionLost => None,
        }
    }
}
