use super::gateway::RequestGateway;
use super::outcome::{Action, Outcome, Receipt, Rejection};
use crate::domain::employee::EmployeeId;
use crate::domain::identity::{IdentityChallenge, Verified};
use crate::domain::ports::{ActivityLog, BadgeScanner};
use crate::domain::session::SessionContext;
use crate::domain::submission::{CheckoutSubmission, ReturnSubmission};
use crate::error::{EquipError, IdentityRejection, Result};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

/// What the user picked for a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub item_id: String,
    pub notes: String,
    pub is_damaged: bool,
}

/// What the user picked for a return. `booking_id` comes from the open checkouts listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnRequest {
    pub booking_id: String,
    pub notes: String,
    pub is_damaged: bool,
}

/// Collaborators shared by both state-changing workflows.
#[derive(Clone, Copy)]
pub struct Workflow<'a> {
    pub gateway: &'a RequestGateway,
    pub scanner: &'a dyn BadgeScanner,
    pub log: &'a dyn ActivityLog,
}

impl Workflow<'_> {
    /// Session employee plus the numeric id the endpoints expect.
    fn authenticated(&self, session: &SessionContext) -> Result<(EmployeeId, i64)> {
        let employee_id = session
            .employee_id()
            .cloned()
            .ok_or(EquipError::NotAuthenticated)?;
        let number = employee_id.as_number().ok_or_else(|| {
            EquipError::InvalidInput(format!("employee id '{}' is not numeric", employee_id))
        })?;
        Ok((employee_id, number))
    }

    /// Re-confirms the session employee. Nothing is sent unless this succeeds.
    async fn confirm(&self, employee_id: EmployeeId, action: Action) -> Result<Verified> {
        self.log.record(format!(
            "📷 Scan your employee badge to confirm {}...",
            action.to_string().to_lowercase()
        ));
        IdentityChallenge::confirm(employee_id)
            .run(self.scanner)
            .await
            .map_err(|rejection| {
                warn!(%action, ?rejection, "identity challenge rejected");
                self.log.record(match rejection {
                    IdentityRejection::CaptureFailed => "❌ Scan failed".to_string(),
                    IdentityRejection::Mismatched | IdentityRejection::InvalidFormat => {
                        "❌ Badge does not match your Employee ID".to_string()
                    }
                });
                EquipError::IdentityRejected(rejection)
            })
    }

    /// Sends one submission and classifies the answer.
    async fn submit<T: Serialize>(&self, action: Action, path: &str, submission: &T) -> Result<Outcome> {
        let payload = serde_json::to_value(submission)?;
        let idempotency_key = Uuid::new_v4().to_string();

        self.log.record(format!(
            "🔄 Processing {}...",
            action.to_string().to_lowercase()
        ));
        let outcome = match self.gateway.post(path, payload, &idempotency_key).await {
            Ok(response) if response.is_ok() => Outcome::Success(Receipt {
                action,
                idempotency_key,
            }),
            Ok(response) => Outcome::Rejected(Rejection::from_response(&response)),
            Err(err) => Outcome::NetworkFailure {
                kind: err.kind,
                idempotency_key,
            },
        };

        let message = outcome.message(action);
        match &outcome {
            Outcome::Success(receipt) => {
                info!(%action, key = %receipt.idempotency_key, "submission accepted");
                self.log.record(format!("✅ {}", message));
            }
            Outcome::Rejected(rejection) => {
                warn!(%action, status = rejection.status(), "submission rejected");
                self.log.record(format!("❌ {}", message));
            }
            Outcome::NetworkFailure {
                kind,
                idempotency_key,
            } => {
                warn!(%action, %kind, key = %idempotency_key, "submission outcome unknown");
                self.log.record(format!("❌ {}", message));
            }
        }
        Ok(outcome)
    }
}

/// Borrowing an item: confirm identity, then `POST /checkout`.
pub struct CheckoutOrchestrator<'a> {
    workflow: Workflow<'a>,
}

impl<'a> CheckoutOrchestrator<'a> {
    pub fn new(workflow: Workflow<'a>) -> Self {
        Self { workflow }
    }

    pub async fn execute(&self, session: &SessionContext, request: CheckoutRequest) -> Result<Outcome> {
        let (employee_id, employee_number) = self.workflow.authenticated(session)?;
        if request.item_id.trim().is_empty() || request.item_id == "N/A" {
            return Err(EquipError::InvalidInput("please select equipment".into()));
        }

        let verified = self.workflow.confirm(employee_id, Action::Checkout).await?;
        let submission = CheckoutSubmission {
            item_id: request.item_id,
            employee_id: employee_number,
            qr_code: verified.badge_code,
            is_damaged: request.is_damaged,
            checkout_notes: request.notes,
        };
        self.workflow
            .submit(Action::Checkout, "checkout", &submission)
            .await
    }
}

/// Closing an open booking: confirm identity, then `POST /return`.
///
/// Ownership of the booking is left to the remote service.
pub struct ReturnOrchestrator<'a> {
    workflow: Workflow<'a>,
}

impl<'a> ReturnOrchestrator<'a> {
    pub fn new(workflow: Workflow<'a>) -> Self {
        Self { workflow }
    }

    pub async fn execute(&self, session: &SessionContext, request: ReturnRequest) -> Result<Outcome> {
        let (employee_id, employee_number) = self.workflow.authenticated(session)?;
        let booking_id: i64 = request.booking_id.trim().parse().map_err(|_| {
            EquipError::InvalidInput(format!(
                "booking id '{}' is not a valid booking",
                request.booking_id
            ))
        })?;

        let verified = self.workflow.confirm(employee_id, Action::Return).await?;
        let submission = ReturnSubmission {
            booking_id,
            employee_id: employee_number,
            qr_code: verified.badge_code,
            return_notes: request.notes,
            is_damaged: request.is_damaged,
        };
        self.workflow
            .submit(Action::Return, "return", &submission)
            .await
    }
}
