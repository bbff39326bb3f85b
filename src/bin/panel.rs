use antrian_kiosk::adapters::console::ConsolePanelView;
use antrian_kiosk::core::panel::DEFAULT_REFRESH_INTERVAL;
use antrian_kiosk::utils::error::Result as AntrianResult;
use antrian_kiosk::utils::logger;
use antrian_kiosk::utils::validation::{self, Validate};
use antrian_kiosk::{OperatorPanel, QueueApi};
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "antrian-panel")]
#[command(about = "Operator panel for calling queue numbers")]
struct Args {
    /// Queue server base URL
    #[arg(long, default_value = "http://localhost:5000")]
    server_url: String,

    /// Service counter handled by this panel
    #[arg(long, default_value = "PELAYANAN UMUM")]
    service_type: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Validate for Args {
    fn validate(&self) -> AntrianResult<()> {
        validation::validate_url("server_url", &self.server_url)?;
        validation::validate_non_empty_string("service_type", &self.service_type)?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting operator panel for: {}", args.service_type);

    // 驗證配置
    if let Err(e) = args.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let api = QueueApi::new(&args.server_url);
    let view = Arc::new(ConsolePanelView);
    let panel = Arc::new(OperatorPanel::new(api, view, args.service_type.clone()));

    // 自動刷新等待名單
    let refresh = OperatorPanel::spawn_refresh(Arc::clone(&panel), DEFAULT_REFRESH_INTERVAL);

    println!("🚀 Panel operator: {}", args.service_type);
    println!("💡 Perintah: c=panggil, r=ulangi, s=lewati, d=selesai, l=daftar, q=keluar");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "c" => {
                // 錯誤已顯示在狀態列
                let _ = panel.call_next().await;
            }
            "r" => panel.repeat_call(),
            "s" => {
                let _ = panel.skip_current().await;
            }
            "d" => {
                let _ = panel.complete_current().await;
            }
            "l" => panel.refresh_waiting_list().await,
            "q" => break,
            "" => continue,
            other => println!("❓ Perintah tidak dikenal: '{}'", other),
        }
    }

    refresh.abort();
    tracing::info!("🛑 Panel closed");

    Ok(())
}
