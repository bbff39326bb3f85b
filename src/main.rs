use antrian_kiosk::adapters::console::ConsoleKioskView;
use antrian_kiosk::utils::{logger, validation::Validate};
use antrian_kiosk::{DownloadDir, KioskConfig, QueueApi, TicketKiosk, TicketOutcome};
use clap::Parser;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = KioskConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting antrian-kiosk");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let api = QueueApi::from_config(&config);

    // 伺服器可用時先確認服務類型存在
    match api.list_services().await {
        Ok(services) if !services.is_empty() => {
            if !services.iter().any(|s| s == &config.service_type) {
                tracing::error!("❌ Unknown service type: {}", config.service_type);
                eprintln!(
                    "❌ Layanan '{}' tidak tersedia. Pilihan: {}",
                    config.service_type,
                    services.join(", ")
                );
                std::process::exit(1);
            }
            tracing::info!("✅ Service type confirmed: {}", config.service_type);
        }
        Ok(_) => tracing::warn!("⚠️ Server returned no services, continuing unvalidated"),
        Err(e) => {
            tracing::warn!("⚠️ Could not fetch service list ({}), continuing unvalidated", e)
        }
    }

    let delivery = DownloadDir::new(&config.download_dir);
    let mut kiosk = TicketKiosk::new(api, ConsoleKioskView, delivery, &config.service_type)
        .with_settle_delay(Duration::from_millis(config.settle_delay_ms));

    // 開機先渲染請求碼
    kiosk.select_service(&config.service_type);

    if config.scan {
        match kiosk.trigger_scan().await {
            TicketOutcome::Delivered(ticket) => {
                tracing::info!("✅ Ticket issued: {}", ticket.queue_number);
                println!(
                    "✅ Tiket {} tersimpan di {}",
                    ticket.queue_number, config.download_dir
                );
            }
            TicketOutcome::OpenedExternally(ticket) => {
                tracing::info!("✅ Ticket issued: {}, PDF opened externally", ticket.queue_number);
            }
            TicketOutcome::Failed(e) => {
                // 記錄詳細錯誤信息
                tracing::error!(
                    "❌ Ticket request failed: {} (Category: {:?}, Severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                );
                tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

                // 輸出用戶友好的錯誤信息
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 建議: {}", e.recovery_suggestion());

                // 根據錯誤嚴重程度決定退出碼
                let exit_code = match e.severity() {
                    antrian_kiosk::utils::error::ErrorSeverity::Low => 0,
                    antrian_kiosk::utils::error::ErrorSeverity::Medium => 2,
                    antrian_kiosk::utils::error::ErrorSeverity::High => 1,
                    antrian_kiosk::utils::error::ErrorSeverity::Critical => 3,
                };

                if exit_code > 0 {
                    std::process::exit(exit_code);
                }
            }
        }
        return Ok(());
    }

    println!("🚀 Kiosk siap.");
    println!("💡 Perintah: [Enter] pindai, 's <layanan>' ganti layanan, 'q' keluar");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input == "q" {
            break;
        }
        if let Some(service) = input.strip_prefix("s ") {
            kiosk.select_service(service.trim());
            continue;
        }

        match kiosk.trigger_scan().await {
            TicketOutcome::Delivered(ticket) => {
                tracing::info!("✅ Ticket {} saved", ticket.queue_number);
            }
            TicketOutcome::OpenedExternally(ticket) => {
                tracing::info!("📄 Ticket {} opened externally", ticket.queue_number);
            }
            TicketOutcome::Failed(e) => {
                tracing::error!("❌ Scan failed: {} (Category: {:?})", e, e.category());
            }
        }
    }

    tracing::info!("🛑 Kiosk closed");
    Ok(())
}
