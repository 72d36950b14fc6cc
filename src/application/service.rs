use super::gateway::RequestGateway;
use super::orchestrator::{
    CheckoutOrchestrator, CheckoutRequest, ReturnOrchestrator, ReturnRequest, Workflow,
};
use super::outcome::Outcome;
use super::queries::{HistoryQuery, InventoryQuery};
use crate::domain::booking::Booking;
use crate::domain::employee::{Employee, EmployeeId};
use crate::domain::identity::IdentityChallenge;
use crate::domain::inventory::InventoryItem;
use crate::domain::ports::{ActivityLogHandle, BadgeScannerBox};
use crate::domain::record;
use crate::domain::session::SessionContext;
use crate::error::{EquipError, IdentityRejection, Result};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Presentation-agnostic entry point of the equipment workflow.
///
/// Front-ends translate user input into these calls and render the returned
/// values plus the lines written to the activity log.
pub struct EquipmentService {
    gateway: RequestGateway,
    scanner: BadgeScannerBox,
    log: ActivityLogHandle,
    session: RwLock<SessionContext>,
    /// Held for the duration of login, checkout and return.
    action_guard: Mutex<()>,
}

impl EquipmentService {
    pub fn new(gateway: RequestGateway, scanner: BadgeScannerBox, log: ActivityLogHandle) -> Self {
        Self {
            gateway,
            scanner,
            log,
            session: RwLock::new(SessionContext::new()),
            action_guard: Mutex::new(()),
        }
    }

    pub fn activity(&self) -> &ActivityLogHandle {
        &self.log
    }

    /// Checks the remote service answers `GET /employees` with 200.
    pub async fn probe(&self) -> bool {
        match self.gateway.probe("employees").await {
            Ok(response) if response.is_ok() => {
                self.log.record("✅ API connection successful!".into());
                true
            }
            Ok(response) => {
                self.log
                    .record(format!("❌ API returned status: {}", response.status));
                false
            }
            Err(err) => {
                self.log.record(format!("❌ Connection test failed: {}", err));
                false
            }
        }
    }

    /// Scans a badge and opens a session for the employee it names.
    ///
    /// A missing profile does not fail the login.
    pub async fn login(&self) -> Result<SessionContext> {
        let _guard = self.action_guard.try_lock().map_err(|_| EquipError::Busy)?;

        self.log
            .record("📷 Scan your employee badge to login...".into());
        let verified = match IdentityChallenge::login().run(self.scanner.as_ref()).await {
            Ok(verified) => verified,
            Err(rejection) => {
                self.log.record(match rejection {
                    IdentityRejection::CaptureFailed => "❌ Login failed.".to_string(),
                    _ => "❌ Invalid badge format".to_string(),
                });
                return Err(rejection.into());
            }
        };

        let employee_id = verified.employee_id;
        self.log
            .record(format!("✅ Logged in as Employee ID: {}", employee_id));
        if employee_id.as_number().is_none() {
            warn!(employee = %employee_id, "badge id is not numeric");
            self.log.record(format!(
                "⚠️ Employee ID {} is not numeric; checkout and return are unavailable for this session",
                employee_id
            ));
        }
        let profile = self.fetch_profile(&employee_id).await;
        if let Some(profile) = &profile {
            self.log
                .record(format!("👋 Welcome, {}!", profile.display_name()));
            self.log
                .record(format!("   Department: {}", profile.department));
        }

        let mut session = self.session.write().await;
        session.begin(employee_id.clone(), profile);
        info!(employee = %employee_id, "session started");
        Ok(session.clone())
    }

    async fn fetch_profile(&self, employee_id: &EmployeeId) -> Option<Employee> {
        let path = format!("employee/{}", employee_id);
        let result = match self.gateway.get(&path).await {
            Ok(response) if response.is_ok() => response
                .json()
                .map(|body| {
                    record::single(body).map(|r| Employee::from_record(employee_id.clone(), &r))
                })
                .map_err(EquipError::from),
            Ok(response) => {
                debug!(status = response.status, "profile not available");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        };

        result.unwrap_or_else(|err| {
            warn!(error = %err, "profile fetch failed");
            self.log
                .record(format!("❌ Error getting employee info: {}", err));
            None
        })
    }

    pub async fn logout(&self) {
        let mut session = self.session.write().await;
        if let Some(id) = session.employee_id() {
            info!(employee = %id, "session ended");
            self.log.record(format!("👋 Logged out Employee ID: {}", id));
        }
        session.clear();
    }

    pub async fn session(&self) -> SessionContext {
        self.session.read().await.clone()
    }

    async fn current_employee(&self) -> Result<EmployeeId> {
        self.session
            .read()
            .await
            .employee_id()
            .cloned()
            .ok_or(EquipError::NotAuthenticated)
    }

    pub async fn list_available(&self) -> Vec<InventoryItem> {
        InventoryQuery::new(&self.gateway, self.log.as_ref())
            .list_available()
            .await
    }

    /// Like [`Self::list_available`] but reports failures instead of degrading.
    pub async fn fetch_available(&self) -> Result<Vec<InventoryItem>> {
        InventoryQuery::new(&self.gateway, self.log.as_ref())
            .fetch_available()
            .await
    }

    /// History of the logged-in employee.
    pub async fn list_history(&self) -> Result<Vec<Booking>> {
        let employee_id = self.current_employee().await?;
        Ok(HistoryQuery::new(&self.gateway, self.log.as_ref())
            .list_history(&employee_id)
            .await)
    }

    /// Open checkouts of the logged-in employee.
    pub async fn list_open_checkouts(&self) -> Result<Vec<Booking>> {
        let employee_id = self.current_employee().await?;
        Ok(HistoryQuery::new(&self.gateway, self.log.as_ref())
            .list_open_checkouts(&employee_id)
            .await)
    }

    /// History of any employee, reporting failures. Used by one-shot reports.
    pub async fn fetch_history(&self, employee_id: &EmployeeId) -> Result<Vec<Booking>> {
        HistoryQuery::new(&self.gateway, self.log.as_ref())
            .fetch_history(employee_id)
            .await
    }

    pub async fn checkout(&self, request: CheckoutRequest) -> Result<Outcome> {
        let _guard = self.action_guard.try_lock().map_err(|_| EquipError::Busy)?;
        let session = self.session().await;
        CheckoutOrchestrator::new(self.workflow())
            .execute(&session, request)
            .await
    }

    pub async fn return_item(&self, request: ReturnRequest) -> Result<Outcome> {
        let _guard = self.action_guard.try_lock().map_err(|_| EquipError::Busy)?;
        let session = self.session().await;
        ReturnOrchestrator::new(self.workflow())
            .execute(&session, request)
            .await
    }

    fn workflow(&self) -> Workflow<'_> {
        Workflow {
            gateway: &self.gateway,
            scanner: self.scanner.as_ref(),
            log: self.log.as_ref(),
        }
    }
}
