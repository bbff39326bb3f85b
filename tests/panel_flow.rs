use anyhow::Result;
use antrian_kiosk::core::panel::{OperatorPanel, IDLE_CALL_INFO};
use antrian_kiosk::domain::model::QueueEntry;
use antrian_kiosk::domain::ports::PanelView;
use antrian_kiosk::{AntrianError, QueueApi};
use httpmock::prelude::*;
use std::sync::{Arc, Mutex};

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

fn panel_for(server: &MockServer) -> (Arc<OperatorPanel<RecordingPanelView>>, Arc<RecordingPanelView>) {
    let view = Arc::new(RecordingPanelView::default());
    let panel = Arc::new(OperatorPanel::new(
        QueueApi::new(server.base_url()),
        Arc::clone(&view),
        "PELAYANAN UMUM",
    ));
    (panel, view)
}

#[tokio::test]
async fn test_operator_session_call_repeat_complete() -> Result<()> {
    let server = MockServer::start();

    let call_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/queue/call")
            .query_param("service", "PELAYANAN UMUM");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"success": true, "queue_number": "PU-001"}));
    });
    let complete_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/queue/complete")
            .json_body(serde_json::json!({"queue_number": "PU-001"}));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"success": true, "message": "Antrian PU-001 selesai."}));
    });
    let queues_mock = server.mock(|when, then| {
        when.method(GET).path("/api/queues");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "success": true,
                "queues": [
                    {"queue_number": "PU-002", "service_type": "PELAYANAN UMUM", "status": "waiting"}
                ]
            }));
    });

    let (panel, view) = panel_for(&server);

    // 完整的櫃檯流程：叫號 → 重播 → 完成
    let queue_number = panel.call_next().await?;
    assert_eq!(queue_number, "PU-001");
    assert!(panel.is_calling());

    panel.repeat_call();
    panel.complete_current().await?;

    call_mock.assert();
    complete_mock.assert();
    assert_eq!(queues_mock.hits(), 2); // 叫號後與完成後各刷新一次
    assert!(!panel.is_calling());

    // 同一個號碼播報兩次
    let announcements = view.announcements.lock().unwrap();
    assert_eq!(announcements.len(), 2);
    assert_eq!(
        announcements[0],
        "Nomor antrian, P U   0 0 1, silakan menuju loket, PELAYANAN UMUM"
    );
    assert_eq!(announcements[0], announcements[1]);
    drop(announcements);

    // 完成後回到待機文案
    assert_eq!(
        view.call_infos.lock().unwrap().last().map(String::as_str),
        Some(IDLE_CALL_INFO)
    );
    assert_eq!(view.currents.lock().unwrap().last().unwrap(), &None);

    let statuses = view.statuses.lock().unwrap();
    assert!(statuses
        .iter()
        .any(|(message, _)| message == "Antrian PU-001 dipanggil."));
    assert!(statuses
        .iter()
        .any(|(message, _)| message == "Antrian PU-001 selesai."));

    println!("✅ Operator session completed");
    Ok(())
}

#[tokio::test]
async fn test_skip_frees_counter_for_next_call() -> Result<()> {
    let server = MockServer::start();

    let mut call_mock = server.mock(|when, then| {
        when.method(POST).path("/api/queue/call");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"success": true, "queue_number": "PU-001"}));
    });
    let skip_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/queue/skip")
            .json_body(serde_json::json!({"queue_number": "PU-001"}));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"success": true, "message": "Antrian PU-001 dilewati."}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/queues");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"success": true, "queues": []}));
    });

    let (panel, view) = panel_for(&server);

    panel.call_next().await?;
    panel.skip_current().await?;
    skip_mock.assert();
    assert!(!panel.is_calling());

    // 剛被釋放的櫃檯可以直接叫下一號
    call_mock.delete();
    server.mock(|when, then| {
        when.method(POST).path("/api/queue/call");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"success": true, "queue_number": "PU-002"}));
    });

    let next = panel.call_next().await?;
    assert_eq!(next, "PU-002");
    assert_eq!(panel.current_queue().as_deref(), Some("PU-002"));

    let statuses = view.statuses.lock().unwrap();
    assert!(statuses
        .iter()
        .any(|(message, _)| message == "Antrian PU-001 dilewati."));
    assert!(statuses
        .iter()
        .any(|(message, _)| message == "Antrian PU-002 dipanggil."));

    Ok(())
}

#[tokio::test]
async fn test_rejection_leaves_panel_usable() -> Result<()> {
    let server = MockServer::start();

    let mut empty_mock = server.mock(|when, then| {
        when.method(POST).path("/api/queue/call");
        then.status(404)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "success": false,
                "message": "Tidak ada antrian menunggu untuk PELAYANAN UMUM"
            }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/queues");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"success": true, "queues": []}));
    });

    let (panel, view) = panel_for(&server);

    // 沒人排隊：拒絕顯示為錯誤狀態，櫃檯保持空閒
    let error = panel.call_next().await.unwrap_err();
    assert!(matches!(error, AntrianError::BusinessError { .. }));
    assert!(!panel.is_calling());
    assert!(view.announcements.lock().unwrap().is_empty());

    let statuses = view.statuses.lock().unwrap();
    assert_eq!(statuses.len(), 1);
    assert!(statuses[0].0.contains("Tidak ada antrian menunggu"));
    assert!(statuses[0].1);
    drop(statuses);

    // 有人取號後，同一個面板照常工作
    empty_mock.delete();
    server.mock(|when, then| {
        when.method(POST).path("/api/queue/call");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"success": true, "queue_number": "PU-001"}));
    });

    let queue_number = panel.call_next().await?;
    assert_eq!(queue_number, "PU-001");
    assert!(panel.is_calling());
    assert_eq!(view.announcements.lock().unwrap().len(), 1);

    Ok(())
}
