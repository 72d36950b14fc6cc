#![allow(dead_code)]

use equipflow::application::gateway::RequestGateway;
use equipflow::application::service::EquipmentService;
use equipflow::config::AppConfig;
use equipflow::domain::ports::BadgeScannerBox;
use equipflow::infrastructure::activity::MemoryActivityLog;
use equipflow::infrastructure::in_memory::InMemoryRemote;
use equipflow::infrastructure::scanner::ScriptedScanner;
use serde_json::json;
use std::sync::Arc;

pub struct Harness {
    pub remote: InMemoryRemote,
    pub log: Arc<MemoryActivityLog>,
    pub service: Arc<EquipmentService>,
}

pub fn config() -> AppConfig {
    AppConfig {
        base_url: "http://booking.test/ords/api".into(),
        retry_backoff_ms: 0,
        ..AppConfig::default()
    }
}

/// Employee 12 with one open booking (99, item 5) and a free ladder (item 6).
pub fn seeded_remote() -> InMemoryRemote {
    let remote = InMemoryRemote::new();
    remote.add_employee(
        "12",
        json!({"FIRST_NAME": "Ada", "LAST_NAME": "Lovelace", "DEPARTMENT": "Field Ops"}),
    );
    remote.set_inventory(json!({"items": [
        {"ITEM_ID": 5, "ITEM_NAME": "Drill", "CATEGORY": "Tools", "QUANTITY": 1, "STATUS": "CheckedOut"},
        {"item_id": 6, "item_name": "Ladder", "category": "Access", "quantity": 2, "status": "Available"}
    ]}));
    remote.set_history(
        "12",
        json!({"items": [
            {"BOOKING_ID": 99, "ITEM_ID": 5, "ITEM_NAME": "Drill", "CATEGORY": "Tools",
             "DATE_BOOKED": "2024-05-30", "DATE_RETURNED": null, "STATUS": "Checked Out"}
        ]}),
    );
    remote
}

pub fn harness_with_scanner(remote: InMemoryRemote, scanner: BadgeScannerBox) -> Harness {
    let log = Arc::new(MemoryActivityLog::default());
    let gateway = RequestGateway::new(Box::new(remote.clone()), &config());
    let service = Arc::new(EquipmentService::new(gateway, scanner, log.clone()));
    Harness {
        remote,
        log,
        service,
    }
}

pub fn harness(remote: InMemoryRemote, captures: &[Option<&str>]) -> Harness {
    let scanner = ScriptedScanner::new(captures.iter().copied());
    harness_with_scanner(remote, Box::new(scanner))
}
