use crate::domain::model::{QueueEntry, RequestCode};
use crate::domain::ports::{DisplayView, KioskView, PanelView};

/// Kiosk surface on a plain terminal.
#[derive(Debug, Default)]
pub struct ConsoleKioskView;

impl KioskView for ConsoleKioskView {
    fn show_request_code(&self, code: &RequestCode) {
        println!("🎫 Layanan: {}", code.service_type());
        println!("   Scan kode untuk mengambil nomor antrian");
        println!("   Data: {}", code.payload());
        println!("   Gambar: {}", code.image_url());
    }

    fn alert(&self, message: &str) {
        println!("🔔 {}", message);
    }
}

/// Public board surface on a plain terminal, one line per region update.
#[derive(Debug, Default)]
pub struct ConsoleDisplayView;

impl DisplayView for ConsoleDisplayView {
    fn show_timestamp(&self, stamp: &str) {
        println!("🕐 {}", stamp);
    }

    fn show_current_queue(&self, text: &str) {
        println!("🔢 Nomor antrian: {}", text);
    }

    fn show_status_line(&self, text: &str) {
        println!("ℹ️  {}", text);
    }

    fn show_call_count(&self, text: &str) {
        println!("📣 Panggilan ke: {}", text);
    }

    fn show_waiting_count(&self, count: u32) {
        println!("⏳ Menunggu: {}", count);
    }
}

/// Operator panel surface on a plain terminal.
#[derive(Debug, Default)]
pub struct ConsolePanelView;

impl PanelView for ConsolePanelView {
    fn show_current_queue(&self, queue_number: Option<&str>) {
        println!("🎫 Antrian aktif: {}", queue_number.unwrap_or("-"));
    }

    fn show_call_info(&self, text: &str) {
        println!("📢 {}", text);
    }

    fn show_waiting_list(&self, entries: &[QueueEntry]) {
        if entries.is_empty() {
            println!("📋 Tidak ada antrian.");
            return;
        }
        println!("📋 Antrian menunggu:");
        for (index, entry) in entries.iter().enumerate() {
            println!("  {}.   {}", index + 1, entry.queue_number);
        }
    }

    fn announce(&self, message: &str) {
        println!("🔊 {}", message);
    }

    fn show_status(&self, message: &str, is_error: bool) {
        if is_error {
            eprintln!("⚠️  {}", message);
        } else {
            println!("ℹ️  {}", message);
        }
    }
}
