use crate::core::api::QueueApi;
use crate::domain::model::QueueEntry;
use crate::domain::ports::PanelView;
use crate::utils::error::{AntrianError, Result};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Cadence of the waiting-list auto refresh.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Call-info text while no number is active.
pub const IDLE_CALL_INFO: &str = "Tekan 'Panggil' untuk memulai";

const CONNECTION_STATUS: &str =
    "Gagal terhubung ke server. Periksa jaringan dan pastikan server berjalan.";

/// Operator controls for one service counter: call, repeat, skip and
/// complete, plus the waiting list.
pub struct OperatorPanel<V: PanelView> {
    api: QueueApi,
    view: Arc<V>,
    service_type: String,
    current_queue: Mutex<Option<String>>,
}

impl<V: PanelView> OperatorPanel<V> {
    pub fn new(api: QueueApi, view: Arc<V>, service_type: impl Into<String>) -> Self {
        Self {
            api,
            view,
            service_type: service_type.into(),
            current_queue: Mutex::new(None),
        }
    }

    pub fn service_type(&self) -> &str {
        &self.service_type
    }

    pub fn current_queue(&self) -> Option<String> {
        self.current_queue.lock().ok().and_then(|guard| guard.clone())
    }

    /// Whether a number is currently being called at this counter.
    pub fn is_calling(&self) -> bool {
        self.current_queue().is_some()
    }

    /// Spoken text for a queue call: the number is spelled out character
    /// by character, dashes read as a pause.
    pub fn announcement(queue_number: &str, service_type: &str) -> String {
        let spelled = spell_out(queue_number);
        format!(
            "Nomor antrian, {}, silakan menuju loket, {}",
            spelled, service_type
        )
    }

    /// Call the next waiting number and announce it.
    pub async fn call_next(&self) -> Result<String> {
        match self.api.call_next(&self.service_type).await {
            Ok(queue_number) => {
                self.set_current(Some(queue_number.clone()));
                self.view.show_call_info("Memanggil...");
                self.view
                    .announce(&Self::announcement(&queue_number, &self.service_type));
                self.view
                    .show_status(&format!("Antrian {} dipanggil.", queue_number), false);
                self.refresh_waiting_list().await;
                Ok(queue_number)
            }
            Err(error) => {
                self.report(&error);
                Err(error)
            }
        }
    }

    /// Announce the active number again. No server round trip.
    pub fn repeat_call(&self) {
        match self.current_queue() {
            Some(queue_number) => {
                self.view.show_call_info("Panggilan diulangi");
                self.view
                    .announce(&Self::announcement(&queue_number, &self.service_type));
                self.view
                    .show_status(&format!("Panggilan untuk {} diulangi.", queue_number), false);
            }
            None => {
                self.view
                    .show_status("Tidak ada antrian aktif untuk diulangi.", false);
            }
        }
    }

    /// Mark the active number as skipped and free the counter.
    pub async fn skip_current(&self) -> Result<()> {
        let Some(queue_number) = self.current_queue() else {
            return Ok(());
        };

        match self.api.skip_queue(&queue_number).await {
            Ok(()) => {
                self.set_current(None);
                self.view
                    .show_status(&format!("Antrian {} dilewati.", queue_number), false);
                self.refresh_waiting_list().await;
                Ok(())
            }
            Err(error) => {
                self.report(&error);
                Err(error)
            }
        }
    }

    /// Mark the active number as served and free the counter.
    pub async fn complete_current(&self) -> Result<()> {
        let Some(queue_number) = self.current_queue() else {
            return Ok(());
        };

        match self.api.complete_queue(&queue_number).await {
            Ok(()) => {
                self.set_current(None);
                self.view
                    .show_status(&format!("Antrian {} selesai.", queue_number), false);
                self.refresh_waiting_list().await;
                Ok(())
            }
            Err(error) => {
                self.report(&error);
                Err(error)
            }
        }
    }

    /// Reload the waiting list for this counter's service. Transport
    /// failures leave the previous list on screen.
    pub async fn refresh_waiting_list(&self) {
        match self.api.all_queues().await {
            Ok(queues) => {
                let waiting: Vec<QueueEntry> = queues
                    .into_iter()
                    .filter(|entry| {
                        entry.service_type == self.service_type && entry.status == "waiting"
                    })
                    .collect();

                let status = if waiting.is_empty() {
                    "Tidak ada antrian menunggu.".to_string()
                } else {
                    format!("{} antrian menunggu.", waiting.len())
                };
                self.view.show_waiting_list(&waiting);
                self.view.show_status(&status, false);
            }
            Err(error) => {
                tracing::warn!("Waiting list refresh failed: {}", error);
                self.report(&error);
            }
        }
    }

    fn set_current(&self, queue_number: Option<String>) {
        if let Ok(mut guard) = self.current_queue.lock() {
            *guard = queue_number;
        }
        match self.current_queue() {
            Some(queue_number) => self.view.show_current_queue(Some(&queue_number)),
            None => {
                self.view.show_current_queue(None);
                self.view.show_call_info(IDLE_CALL_INFO);
            }
        }
    }

    fn report(&self, error: &AntrianError) {
        match error {
            AntrianError::BusinessError { message } => self.view.show_status(message, true),
            AntrianError::StatusError { status } => self
                .view
                .show_status(&format!("Server merespon dengan error {}.", status), true),
            _ => self.view.show_status(CONNECTION_STATUS, true),
        }
    }
}

impl<V: PanelView + 'static> OperatorPanel<V> {
    /// Start the auto refresh loop; the first refresh happens right away.
    /// Abort the returned handle to stop it.
    pub fn spawn_refresh(panel: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                panel.refresh_waiting_list().await;
            }
        })
    }
}

fn spell_out(queue_number: &str) -> String {
    queue_number
        .replace('-', " ")
        .chars()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[derive(Default)]
    struct RecordingPanelView {
        currents: Mutex<Vec<Option<String>>>,
        call_infos: Mutex<Vec<String>>,
        lists: Mutex<Vec<Vec<QueueEntry>>>,
        announcements: Mutex<Vec<String>>,
        statuses: Mutex<Vec<(String, bool)>>,
    }

    impl PanelView for RecordingPanelView {
        fn show_current_queue(&self, queue_number: Option<&str>) {
            self.currents
                .lock()
                .unwrap()
                .push(queue_number.map(str::to_string));
        }

        fn show_call_info(&self, text: &str) {
            self.call_infos.lock().unwrap().push(text.to_string());
        }

        fn show_waiting_list(&self, entries: &[QueueEntry]) {
            self.lists.lock().unwrap().push(entries.to_vec());
        }

        fn announce(&self, message: &str) {
            self.announcements.lock().unwrap().push(message.to_string());
        }

        fn show_status(&self, message: &str, is_error: bool) {
            self.statuses
                .lock()
                .unwrap()
                .push((message.to_string(), is_error));
        }
    }

    fn panel_with(server: &MockServer) -> (OperatorPanel<RecordingPanelView>, Arc<RecordingPanelView>) {
        let view = Arc::new(RecordingPanelView::default());
        let panel = OperatorPanel::new(
            QueueApi::new(server.base_url()),
            Arc::clone(&view),
            "PELAYANAN UMUM",
        );
        (panel, view)
    }

    fn mock_empty_queues(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET).path("/api/queues");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"success": true, "queues": []}));
        });
    }

    #[test]
    fn test_announcement_spells_out_queue_number() {
        let announcement = OperatorPanel::<RecordingPanelView>::announcement(
            "PU-001",
            "PELAYANAN UMUM",
        );
        assert_eq!(
            announcement,
            "Nomor antrian, P U   0 0 1, silakan menuju loket, PELAYANAN UMUM"
        );
    }

    #[test]
    fn test_spell_out_reads_dash_as_pause() {
        assert_eq!(spell_out("BT-012"), "B T   0 1 2");
        assert_eq!(spell_out("A1"), "A 1");
    }

    #[tokio::test]
    async fn test_call_next_announces_and_refreshes() {
        let server = MockServer::start();
        let call_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/queue/call")
                .query_param("service", "PELAYANAN UMUM");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"success": true, "queue_number": "PU-001"}));
        });
        let queues_mock = server.mock(|when, then| {
            when.method(GET).path("/api/queues");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"success": true, "queues": []}));
        });

        let (panel, view) = panel_with(&server);
        let queue_number = panel.call_next().await.unwrap();

        call_mock.assert();
        queues_mock.assert();
        assert_eq!(queue_number, "PU-001");
        assert!(panel.is_calling());
        assert_eq!(panel.current_queue().as_deref(), Some("PU-001"));

        assert_eq!(
            view.currents.lock().unwrap().as_slice(),
            [Some("PU-001".to_string())]
        );
        assert_eq!(view.call_infos.lock().unwrap().as_slice(), ["Memanggil..."]);
        assert_eq!(
            view.announcements.lock().unwrap().as_slice(),
            ["Nomor antrian, P U   0 0 1, silakan menuju loket, PELAYANAN UMUM"]
        );

        let statuses = view.statuses.lock().unwrap();
        assert_eq!(statuses[0], ("Antrian PU-001 dipanggil.".to_string(), false));
    }

    #[tokio::test]
    async fn test_call_next_rejection_keeps_counter_free() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/queue/call");
            then.status(404)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "success": false,
                    "message": "Tidak ada antrian menunggu untuk PELAYANAN UMUM"
                }));
        });

        let (panel, view) = panel_with(&server);
        let error = panel.call_next().await.unwrap_err();

        assert!(matches!(error, AntrianError::BusinessError { .. }));
        assert!(!panel.is_calling());
        assert!(view.announcements.lock().unwrap().is_empty());

        let statuses = view.statuses.lock().unwrap();
        assert_eq!(statuses.len(), 1);
        assert!(statuses[0].0.contains("Tidak ada antrian menunggu"));
        assert!(statuses[0].1);
    }

    #[tokio::test]
    async fn test_repeat_without_active_call() {
        let server = MockServer::start();
        let (panel, view) = panel_with(&server);

        panel.repeat_call();

        assert!(view.announcements.lock().unwrap().is_empty());
        let statuses = view.statuses.lock().unwrap();
        assert_eq!(
            statuses.as_slice(),
            [("Tidak ada antrian aktif untuk diulangi.".to_string(), false)]
        );
    }

    #[tokio::test]
    async fn test_repeat_announces_same_number_again() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/queue/call");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"success": true, "queue_number": "PU-007"}));
        });
        mock_empty_queues(&server);

        let (panel, view) = panel_with(&server);
        panel.call_next().await.unwrap();
        panel.repeat_call();

        let announcements = view.announcements.lock().unwrap();
        assert_eq!(announcements.len(), 2);
        assert_eq!(announcements[0], announcements[1]);
        assert_eq!(
            view.call_infos.lock().unwrap().as_slice(),
            ["Memanggil...", "Panggilan diulangi"]
        );
    }

    #[tokio::test]
    async fn test_skip_clears_current_number() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/queue/call");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"success": true, "queue_number": "PU-002"}));
        });
        let skip_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/queue/skip")
                .json_body(serde_json::json!({"queue_number": "PU-002"}));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"success": true}));
        });
        mock_empty_queues(&server);

        let (panel, view) = panel_with(&server);
        panel.call_next().await.unwrap();
        panel.skip_current().await.unwrap();

        skip_mock.assert();
        assert!(!panel.is_calling());

        let currents = view.currents.lock().unwrap();
        assert_eq!(currents.last().unwrap(), &None);
        assert_eq!(
            view.call_infos.lock().unwrap().last().map(String::as_str),
            Some(IDLE_CALL_INFO)
        );
    }

    #[tokio::test]
    async fn test_skip_without_active_call_is_a_noop() {
        let server = MockServer::start();
        let (panel, view) = panel_with(&server);

        panel.skip_current().await.unwrap();

        assert!(view.statuses.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_complete_clears_current_number() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/queue/call");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"success": true, "queue_number": "PU-003"}));
        });
        let complete_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/queue/complete")
                .json_body(serde_json::json!({"queue_number": "PU-003"}));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"success": true}));
        });
        mock_empty_queues(&server);

        let (panel, view) = panel_with(&server);
        panel.call_next().await.unwrap();
        panel.complete_current().await.unwrap();

        complete_mock.assert();
        assert!(!panel.is_calling());
        let statuses = view.statuses.lock().unwrap();
        assert!(statuses
            .iter()
            .any(|(message, _)| message == "Antrian PU-003 selesai."));
    }

    #[tokio::test]
    async fn test_refresh_filters_service_and_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/queues");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "success": true,
                    "queues": [
                        {"queue_number": "PU-001", "service_type": "PELAYANAN UMUM", "status": "waiting"},
                        {"queue_number": "PU-002", "service_type": "PELAYANAN UMUM", "status": "called"},
                        {"queue_number": "BT-001", "service_type": "BUKU TANAH", "status": "waiting"},
                        {"queue_number": "PU-003", "service_type": "PELAYANAN UMUM", "status": "waiting"}
                    ]
                }));
        });

        let (panel, view) = panel_with(&server);
        panel.refresh_waiting_list().await;

        let lists = view.lists.lock().unwrap();
        assert_eq!(lists.len(), 1);
        let numbers: Vec<&str> = lists[0]
            .iter()
            .map(|entry| entry.queue_number.as_str())
            .collect();
        assert_eq!(numbers, ["PU-001", "PU-003"]);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_list() {
        let server = MockServer::start();
        let (panel, view) = panel_with(&server);

        panel.refresh_waiting_list().await;

        assert!(view.lists.lock().unwrap().is_empty());
        let statuses = view.statuses.lock().unwrap();
        assert_eq!(statuses.len(), 1);
        assert!(statuses[0].1);
    }
}
