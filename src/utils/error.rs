use thiserror::Error;

#[derive(Error, Debug)]
pub enum AntrianError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Server returned HTTP status {status}")]
    StatusError { status: u16 },

    #[error("Request rejected by server: {message}")]
    BusinessError { message: String },

    #[error("Ticket download failed: {message}")]
    DownloadError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Invalid config value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// 錯誤嚴重程度，決定 CLI 的退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Business,
    Delivery,
    Config,
    Processing,
    System,
}

impl AntrianError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 伺服器明確拒絕或已有備援路徑
            AntrianError::BusinessError { .. } | AntrianError::DownloadError { .. } => {
                ErrorSeverity::Low
            }
            // 網路錯誤可重試
            AntrianError::ApiError(_) | AntrianError::StatusError { .. } => ErrorSeverity::Medium,
            AntrianError::SerializationError(_)
            | AntrianError::ConfigError { .. }
            | AntrianError::ProcessingError { .. }
            | AntrianError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            AntrianError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AntrianError::ApiError(_) | AntrianError::StatusError { .. } => ErrorCategory::Network,
            AntrianError::BusinessError { .. } => ErrorCategory::Business,
            AntrianError::DownloadError { .. } => ErrorCategory::Delivery,
            AntrianError::ConfigError { .. } | AntrianError::InvalidConfigValueError { .. } => {
                ErrorCategory::Config
            }
            AntrianError::SerializationError(_) | AntrianError::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
            AntrianError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AntrianError::ApiError(_) => {
                "Check that the queue server is running and the URL is reachable"
            }
            AntrianError::StatusError { .. } => "Check the server logs for the failing endpoint",
            AntrianError::BusinessError { .. } => {
                "Review the server message, the request itself was understood"
            }
            AntrianError::DownloadError { .. } => "Open the ticket PDF URL manually",
            AntrianError::IoError(_) => "Check file permissions and available disk space",
            AntrianError::SerializationError(_) => {
                "Verify the server version matches this client"
            }
            AntrianError::ConfigError { .. } => {
                "Check the configuration file syntax and referenced environment variables"
            }
            AntrianError::ProcessingError { .. } => {
                "Retry the request and check the server response format"
            }
            AntrianError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and restart"
            }
        }
    }

    /// 給現場人員看的訊息，不含技術細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            AntrianError::ApiError(_) => "Tidak dapat terhubung ke server antrian.".to_string(),
            AntrianError::StatusError { status } => {
                format!("Server antrian merespon dengan error {}.", status)
            }
            AntrianError::BusinessError { message } => {
                format!("Permintaan ditolak: {}", message)
            }
            AntrianError::DownloadError { .. } => "PDF tiket tidak dapat diunduh.".to_string(),
            AntrianError::IoError(_) => "Terjadi masalah pada penyimpanan lokal.".to_string(),
            AntrianError::SerializationError(_) => {
                "Server mengirim data yang tidak dikenali.".to_string()
            }
            AntrianError::ConfigError { message } => {
                format!("Konfigurasi tidak valid: {}", message)
            }
            AntrianError::ProcessingError { message } => {
                format!("Data dari server tidak lengkap: {}", message)
            }
            AntrianError::InvalidConfigValueError { field, reason, .. } => {
                format!("Nilai konfigurasi '{}' tidak valid: {}", field, reason)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AntrianError>;
