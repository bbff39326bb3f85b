use crate::domain::model::{DisplaySnapshot, QueueEntry, TicketIssued, TicketRequest};
use crate::domain::ports::{ClientConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
use crate::utils::error::{AntrianError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    success: bool,
    queue_number: Option<String>,
    pdf_url: Option<String>,
    #[serde(alias = "message")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    success: bool,
    current_queue: Option<String>,
    service_type: Option<String>,
    call_count: Option<u32>,
    waiting_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ServicesResponse {
    success: bool,
    services: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct CommandResponse {
    success: bool,
    queue_number: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueuesResponse {
    success: bool,
    queues: Option<Vec<QueueEntry>>,
}

#[derive(Debug, Serialize)]
struct QueueNumberBody<'a> {
    queue_number: &'a str,
}

/// HTTP client for the queue server API.
pub struct QueueApi {
    base_url: String,
    client: Client,
}

impl QueueApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeouts(base_url, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn from_config(config: &impl ClientConfig) -> Self {
        Self::with_timeouts(
            config.server_url(),
            config.connect_timeout(),
            config.request_timeout(),
        )
    }

    fn with_timeouts(
        base_url: impl Into<String>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request a new queue ticket for the given service type.
    pub async fn generate_ticket(&self, service_type: &str) -> Result<TicketIssued> {
        let url = self.endpoint("/api/queue/generate");
        tracing::debug!("Requesting new ticket from: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&TicketRequest {
                service_type: service_type.to_string(),
            })
            .send()
            .await?
            .error_for_status()?;

        let body: GenerateResponse = response.json().await?;

        if !body.success {
            return Err(AntrianError::BusinessError {
                message: body
                    .error
                    .unwrap_or_else(|| "Unknown server error".to_string()),
            });
        }

        match (body.queue_number, body.pdf_url) {
            (Some(queue_number), Some(pdf_url)) => {
                tracing::debug!("Ticket issued: {}", queue_number);
                Ok(TicketIssued {
                    queue_number,
                    pdf_url,
                })
            }
            _ => Err(AntrianError::ProcessingError {
                message: "Generate response is missing queue_number or pdf_url".to_string(),
            }),
        }
    }

    /// Fetch the state the public board should show right now.
    pub async fn current_display(&self) -> Result<DisplaySnapshot> {
        let url = self.endpoint("/api/display/current");
        let response = self.client.get(&url).send().await?.error_for_status()?;

        let body: CurrentResponse = response.json().await?;
        if !body.success {
            return Err(AntrianError::BusinessError {
                message: "Display endpoint reported failure".to_string(),
            });
        }

        Ok(DisplaySnapshot {
            current_queue: body.current_queue,
            service_type: body.service_type.unwrap_or_default(),
            call_count: body.call_count.unwrap_or(0),
            waiting_count: body.waiting_count.unwrap_or(0),
        })
    }

    /// List the service types the server currently offers.
    pub async fn list_services(&self) -> Result<Vec<String>> {
        let url = self.endpoint("/api/services");
        let response = self.client.get(&url).send().await?.error_for_status()?;

        let body: ServicesResponse = response.json().await?;
        if !body.success {
            return Err(AntrianError::BusinessError {
                message: "Service listing reported failure".to_string(),
            });
        }

        Ok(body.services.unwrap_or_default())
    }

    /// Call the next waiting number for a service. Returns the called number.
    pub async fn call_next(&self, service_type: &str) -> Result<String> {
        let url = self.endpoint("/api/queue/call");
        tracing::debug!("Calling next queue for service: {}", service_type);

        let response = self
            .client
            .post(&url)
            .query(&[("service", service_type)])
            .send()
            .await?;

        let body = Self::decode_command(response).await?;
        body.queue_number
            .ok_or_else(|| AntrianError::ProcessingError {
                message: "Call response is missing queue_number".to_string(),
            })
    }

    /// Mark a called number as skipped.
    pub async fn skip_queue(&self, queue_number: &str) -> Result<()> {
        let url = self.endpoint("/api/queue/skip");
        let response = self
            .client
            .post(&url)
            .json(&QueueNumberBody { queue_number })
            .send()
            .await?;

        Self::decode_command(response).await?;
        Ok(())
    }

    /// Mark a called number as served.
    pub async fn complete_queue(&self, queue_number: &str) -> Result<()> {
        let url = self.endpoint("/api/queue/complete");
        let response = self
            .client
            .post(&url)
            .json(&QueueNumberBody { queue_number })
            .send()
            .await?;

        Self::decode_command(response).await?;
        Ok(())
    }

    /// Full queue listing across all services.
    pub async fn all_queues(&self) -> Result<Vec<QueueEntry>> {
        let url = self.endpoint("/api/queues");
        let response = self.client.get(&url).send().await?.error_for_status()?;

        let body: QueuesResponse = response.json().await?;
        if !body.success {
            return Err(AntrianError::BusinessError {
                message: "Queue listing reported failure".to_string(),
            });
        }

        Ok(body.queues.unwrap_or_default())
    }

    // 操作指令的共用解碼：非 2xx 也可能帶有伺服器的拒絕訊息
    async fn decode_command(response: reqwest::Response) -> Result<CommandResponse> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            if let Ok(body) = serde_json::from_str::<CommandResponse>(&text) {
                if let Some(message) = body.message {
                    return Err(AntrianError::BusinessError { message });
                }
            }
            return Err(AntrianError::StatusError {
                status: status.as_u16(),
            });
        }

        let body: CommandResponse = serde_json::from_str(&text)?;
        if !body.success {
            return Err(AntrianError::BusinessError {
                message: body
                    .message
                    .unwrap_or_else(|| "Server rejected the command".to_string()),
            });
        }

        Ok(body)
    }
}
