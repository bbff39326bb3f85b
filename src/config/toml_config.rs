use crate::core::display::BoardTiming;
use crate::domain::ports::{ClientConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
use crate::utils::error::{AntrianError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: ServerSection,
    pub board: Option<BoardSection>,
    pub monitoring: Option<MonitoringSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    pub url: String,
    pub timeout_seconds: Option<u64>,
    pub connect_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSection {
    pub clock_interval_ms: Option<u64>,
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringSection {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AntrianError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AntrianError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${QUEUE_SERVER_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        // 使用正規表達式匹配 ${VAR_NAME} 格式
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 本機預設配置，未帶設定檔時使用
    pub fn local() -> Self {
        Self {
            server: ServerSection {
                url: "http://localhost:5000".to_string(),
                timeout_seconds: None,
                connect_timeout_seconds: None,
            },
            board: None,
            monitoring: None,
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        // 驗證伺服器端點
        crate::utils::validation::validate_url("server.url", &self.server.url)?;

        if let Some(seconds) = self.server.timeout_seconds {
            crate::utils::validation::validate_range("server.timeout_seconds", seconds, 1, 120)?;
        }

        // 驗證輪詢節奏
        if let Some(board) = &self.board {
            if let Some(ms) = board.clock_interval_ms {
                crate::utils::validation::validate_range("board.clock_interval_ms", ms, 100, 60_000)?;
            }
            if let Some(ms) = board.poll_interval_ms {
                crate::utils::validation::validate_range("board.poll_interval_ms", ms, 500, 300_000)?;
            }
        }

        Ok(())
    }

    /// 取得看板的兩個輪詢間隔
    pub fn timing(&self) -> BoardTiming {
        let defaults = BoardTiming::default();
        match &self.board {
            Some(board) => BoardTiming {
                clock_interval: board
                    .clock_interval_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.clock_interval),
                poll_interval: board
                    .poll_interval_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.poll_interval),
            },
            None => defaults,
        }
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ClientConfig for TomlConfig {
    fn server_url(&self) -> &str {
        &self.server.url
    }

    fn connect_timeout(&self) -> Duration {
        self.server
            .connect_timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT)
    }

    fn request_timeout(&self) -> Duration {
        self.server
            .timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
