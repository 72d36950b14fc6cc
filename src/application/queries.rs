use super::gateway::RequestGateway;
use super::outcome::Rejection;
use crate::domain::booking::Booking;
use crate::domain::employee::EmployeeId;
use crate::domain::inventory::InventoryItem;
use crate::domain::ports::ActivityLog;
use crate::domain::record::{self, Record};
use crate::error::{EquipError, Result};
use tracing::warn;

/// Fetches a remote collection and unwraps its envelope.
async fn fetch_records(gateway: &RequestGateway, path: &str) -> Result<Vec<Record>> {
    let response = gateway.get(path).await?;
    if !response.is_ok() {
        return Err(Rejection::from_response(&response).into());
    }
    Ok(record::collection(response.json()?))
}

/// Read-only view over the remote inventory.
pub struct InventoryQuery<'a> {
    gateway: &'a RequestGateway,
    log: &'a dyn ActivityLog,
}

impl<'a> InventoryQuery<'a> {
    pub fn new(gateway: &'a RequestGateway, log: &'a dyn ActivityLog) -> Self {
        Self { gateway, log }
    }

    /// Items offered for checkout, propagating any failure.
    pub async fn fetch_available(&self) -> Result<Vec<InventoryItem>> {
        let records = fetch_records(self.gateway, "inventory").await?;
        Ok(records
            .iter()
            .map(InventoryItem::from_record)
            .filter(InventoryItem::is_available)
            .collect())
    }

    /// Items with status `Available`. Failures yield an empty list and a log line.
    pub async fn list_available(&self) -> Vec<InventoryItem> {
        self.fetch_available().await.unwrap_or_else(|err| {
            degrade(self.log, "Failed to fetch inventory", &err);
            Vec::new()
        })
    }
}

/// Read-only view over an employee's booking history.
pub struct HistoryQuery<'a> {
    gateway: &'a RequestGateway,
    log: &'a dyn ActivityLog,
}

impl<'a> HistoryQuery<'a> {
    pub fn new(gateway: &'a RequestGateway, log: &'a dyn ActivityLog) -> Self {
        Self { gateway, log }
    }

    /// Full history in remote order, propagating any failure.
    pub async fn fetch_history(&self, employee_id: &EmployeeId) -> Result<Vec<Booking>> {
        let path = format!("history/{}", employee_id);
        let records = fetch_records(self.gateway, &path).await?;
        Ok(records.iter().map(Booking::from_record).collect())
    }

    pub async fn list_history(&self, employee_id: &EmployeeId) -> Vec<Booking> {
        self.fetch_history(employee_id).await.unwrap_or_else(|err| {
            degrade(self.log, "Failed to fetch history", &err);
            Vec::new()
        })
    }

    /// Bookings without a return date.
    pub async fn list_open_checkouts(&self, employee_id: &EmployeeId) -> Vec<Booking> {
        match self.fetch_history(employee_id).await {
            Ok(history) => history.into_iter().filter(Booking::is_open).collect(),
            Err(err) => {
                degrade(self.log, "Failed to fetch current checkouts", &err);
                Vec::new()
            }
        }
    }
}

fn degrade(log: &dyn ActivityLog, context: &str, err: &EquipError) {
    warn!(error = %err, "{}", context);
    log.record(format!("❌ {}: {}", context, err));
}
