mod common;

use async_trait::async_trait;
use common::{harness, harness_with_scanner, seeded_remote};
use equipflow::application::gateway::IDEMPOTENCY_HEADER;
use equipflow::application::orchestrator::{CheckoutRequest, ReturnRequest};
use equipflow::application::outcome::{Outcome, Rejection};
use equipflow::domain::ports::BadgeScanner;
use equipflow::domain::record::Field;
use equipflow::error::{EquipError, IdentityRejection, NetworkErrorKind};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Notify;

fn return_booking(id: &str) -> ReturnRequest {
    ReturnRequest {
        booking_id: id.into(),
        notes: "back in one piece".into(),
        is_damaged: false,
    }
}

#[tokio::test]
async fn test_return_closes_open_booking() {
    let h = harness(seeded_remote(), &[Some("EMP12"), Some("EMP12")]);

    h.service.login().await.unwrap();
    let open = h.service.list_open_checkouts().await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].booking_id, "99");
    assert_eq!(open[0].item_id, "5");

    let outcome = h.service.return_item(return_booking("99")).await.unwrap();
    assert!(matches!(outcome, Outcome::Success(_)));

    let open = h.service.list_open_checkouts().await.unwrap();
    assert!(open.is_empty());

    let history = h.remote.history("12");
    assert_eq!(history[0].field(Field::ReturnNotes), "back in one piece");
    assert!(h.log.lines().contains(&"✅ Equipment returned successfully!".to_string()));
}

#[tokio::test]
async fn test_checkout_opens_booking_and_takes_item_off_the_shelf() {
    let h = harness(seeded_remote(), &[Some("EMP12"), Some("EMP12")]);

    h.service.login().await.unwrap();
    let available = h.service.list_available().await;
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].name, "Ladder");

    let outcome = h
        .service
        .checkout(CheckoutRequest {
            item_id: available[0].item_id.clone(),
            notes: "roof inspection".into(),
            is_damaged: false,
        })
        .await
        .unwrap();
    assert!(outcome.is_success());

    assert!(h.service.list_available().await.is_empty());
    let open: Vec<String> = h
        .service
        .list_open_checkouts()
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.item_name)
        .collect();
    assert_eq!(open, vec!["Drill", "Ladder"]);
}

#[tokio::test]
async fn test_other_employees_badge_cannot_act_for_session() {
    let h = harness(seeded_remote(), &[Some("EMP12"), Some("EMP13")]);

    h.service.login().await.unwrap();
    let calls_before = h.remote.calls();

    let err = h.service.return_item(return_booking("99")).await.unwrap_err();

    assert!(matches!(
        err,
        EquipError::IdentityRejected(IdentityRejection::Mismatched)
    ));
    assert_eq!(h.remote.calls(), calls_before);
}

#[tokio::test]
async fn test_actions_require_login() {
    let h = harness(seeded_remote(), &[Some("EMP12")]);

    let err = h.service.return_item(return_booking("99")).await.unwrap_err();

    assert!(matches!(err, EquipError::NotAuthenticated));
    assert_eq!(h.remote.calls(), 0);
}

#[tokio::test]
async fn test_remote_refusal_is_surfaced() {
    let h = harness(seeded_remote(), &[Some("EMP12"), Some("EMP12"), Some("EMP12")]);
    h.service.login().await.unwrap();

    h.service.return_item(return_booking("99")).await.unwrap();
    let again = h.service.return_item(return_booking("99")).await.unwrap();

    assert_eq!(
        again,
        Outcome::Rejected(Rejection::Remote {
            status: 409,
            message: "Booking already returned".into()
        })
    );
    let err = again.into_result().unwrap_err();
    assert_eq!(err.to_string(), "HTTP 409: Booking already returned");
}

#[tokio::test]
async fn test_lost_submission_is_reported_as_network_failure() {
    let h = harness(seeded_remote(), &[Some("EMP12"), Some("EMP12")]);
    h.service.login().await.unwrap();
    h.remote.fail_next(NetworkErrorKind::Timeout);

    let outcome = h.service.return_item(return_booking("99")).await.unwrap();

    let sent = h
        .remote
        .requests()
        .into_iter()
        .find(|r| r.url.ends_with("/return"))
        .unwrap();
    let (_, key) = sent
        .headers
        .iter()
        .find(|(name, _)| name == IDEMPOTENCY_HEADER)
        .unwrap();
    assert_eq!(
        outcome,
        Outcome::NetworkFailure {
            kind: NetworkErrorKind::Timeout,
            idempotency_key: key.clone(),
        }
    );
    assert_eq!(outcome.idempotency_key(), Some(key.as_str()));
    assert!(
        h.log
            .lines()
            .iter()
            .any(|l| l.starts_with("❌ Return request failed") && l.contains(key.as_str()))
    );
}

#[tokio::test]
async fn test_history_failure_degrades_with_log_line() {
    let h = harness(seeded_remote(), &[Some("EMP12")]);
    h.service.login().await.unwrap();
    h.remote.fail_next(NetworkErrorKind::ConnectionFailed);

    let history = h.service.list_history().await.unwrap();

    assert!(history.is_empty());
    assert!(
        h.log
            .lines()
            .iter()
            .any(|l| l.contains("Failed to fetch history"))
    );
}

#[tokio::test]
async fn test_read_retries_once_after_timeout() {
    let remote = seeded_remote();
    remote.fail_next(NetworkErrorKind::Timeout);
    let h = harness(remote, &[]);

    let items = h.service.fetch_available().await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(h.remote.calls(), 2);
}

#[tokio::test]
async fn test_profile_with_unusual_envelope() {
    let remote = seeded_remote();
    remote.add_employee("21", json!({"FirstName": "Grace", "lastName": "Hopper"}));
    let h = harness(remote, &[Some("EMP21")]);

    let session = h.service.login().await.unwrap();

    assert_eq!(session.profile().unwrap().display_name(), "Grace Hopper");
}

/// Blocks inside `capture` until released, so an action stays in flight.
struct GatedScanner {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl BadgeScanner for GatedScanner {
    async fn capture(&self) -> Option<String> {
        self.entered.notify_one();
        self.release.notified().await;
        Some("EMP12".into())
    }
}

#[tokio::test]
async fn test_second_action_while_pending_is_rejected() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let scanner = GatedScanner {
        entered: entered.clone(),
        release: release.clone(),
    };
    let h = harness_with_scanner(seeded_remote(), Box::new(scanner));

    let service = h.service.clone();
    let login = tokio::spawn(async move { service.login().await });
    entered.notified().await;

    let err = h.service.return_item(return_booking("99")).await.unwrap_err();
    assert!(matches!(err, EquipError::Busy));

    release.notify_one();
    let session = login.await.unwrap().unwrap();
    assert_eq!(session.employee_id().unwrap().as_str(), "12");
}
