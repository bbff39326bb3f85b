use antrian_kiosk::adapters::console::ConsoleDisplayView;
use antrian_kiosk::utils::monitor::SystemMonitor;
use antrian_kiosk::utils::{logger, validation::Validate};
use antrian_kiosk::{DisplayBoard, QueueApi, TomlConfig};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "antrian-display")]
#[command(about = "Public queue display board")]
struct Args {
    /// Path to TOML configuration file (defaults to the local server)
    #[arg(short, long)]
    config: Option<String>,

    /// Server base URL, overrides the config file
    #[arg(long)]
    server_url: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting queue display board");

    // 載入 TOML 配置
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            }
        }
        None => TomlConfig::local(),
    };

    // 應用命令列覆蓋設定
    if let Some(server_url) = args.server_url {
        tracing::info!("🔧 Server URL overridden to: {}", server_url);
        config.server.url = server_url;
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    // 顯示配置摘要
    display_config_summary(&config);

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }
    let monitor = Arc::new(SystemMonitor::new(monitor_enabled));

    let timing = config.timing();
    let api = QueueApi::from_config(&config);
    let view = Arc::new(ConsoleDisplayView);
    let board = DisplayBoard::new(api, view, timing);
    let handle = board.spawn();

    let stats_task = monitor.is_enabled().then(|| {
        let monitor = Arc::clone(&monitor);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(60));
            loop {
                ticker.tick().await;
                monitor.log_stats("Display board");
            }
        })
    });

    println!("✅ Papan antrian berjalan. Tekan Ctrl+C untuk berhenti.");
    tokio::signal::ctrl_c().await?;

    tracing::info!("🛑 Shutting down display board");
    handle.stop();
    if let Some(task) = stats_task {
        task.abort();
    }
    monitor.log_final_stats();

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    let timing = config.timing();

    println!("📋 Configuration Summary:");
    println!("  Server: {}", config.server.url);
    println!("  Clock interval: {:?}", timing.clock_interval);
    println!("  Poll interval: {:?}", timing.poll_interval);
    println!("  Monitoring: {}", config.monitoring_enabled());
    println!();
}
