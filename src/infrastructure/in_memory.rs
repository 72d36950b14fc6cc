use crate::domain::ports::{HttpRequest, HttpResponse, HttpTransport, Method};
use crate::domain::record::{self, Field, Record};
use crate::error::NetworkErrorKind;
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

const BOOKED_ON: &str = "2024-06-01";
const RETURNED_ON: &str = "2024-06-02";

#[derive(Default)]
struct RemoteState {
    employees: HashMap<String, Value>,
    inventory: Vec<Map<String, Value>>,
    histories: HashMap<String, Vec<Map<String, Value>>>,
    next_booking: i64,
    /// Answers already given per idempotency key.
    replays: HashMap<String, HttpResponse>,
    injected: VecDeque<Result<HttpResponse, NetworkErrorKind>>,
    requests: Vec<HttpRequest>,
}

/// In-process stand-in for the remote booking service.
///
/// Serves the same REST surface as the real service, keeps inventory and
/// booking state in memory and can inject canned responses or transport
/// failures ahead of normal handling. Cloning shares the state.
#[derive(Clone)]
pub struct InMemoryRemote {
    state: Arc<Mutex<RemoteState>>,
}

impl Default for InMemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(RemoteState {
                next_booking: 100,
                ..RemoteState::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RemoteState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers an employee profile; the employee starts with an empty history.
    pub fn add_employee(&self, id: &str, profile: Value) {
        let mut state = self.lock();
        state.employees.insert(id.to_string(), profile);
        state.histories.entry(id.to_string()).or_default();
    }

    /// Replaces the inventory with the records of `body` (bare or enveloped).
    pub fn set_inventory(&self, body: Value) {
        self.lock().inventory = records(body);
    }

    /// Replaces an employee's booking history with the records of `body`.
    pub fn set_history(&self, employee_id: &str, body: Value) {
        self.lock()
            .histories
            .insert(employee_id.to_string(), records(body));
    }

    /// Makes the next request fail at the transport level.
    pub fn fail_next(&self, kind: NetworkErrorKind) {
        self.lock().injected.push_back(Err(kind));
    }

    /// Makes the next request receive `response` verbatim.
    pub fn respond_next(&self, response: HttpResponse) {
        self.lock().injected.push_back(Ok(response));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    pub fn calls(&self) -> usize {
        self.lock().requests.len()
    }

    pub fn history(&self, employee_id: &str) -> Vec<Record> {
        self.lock()
            .histories
            .get(employee_id)
            .map(|h| h.iter().cloned().map(Record::new).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl HttpTransport for InMemoryRemote {
    async fn send(
        &self,
        request: &HttpRequest,
        _timeout: Duration,
    ) -> Result<HttpResponse, NetworkErrorKind> {
        let mut state = self.lock();
        state.requests.push(request.clone());
        if let Some(injected) = state.injected.pop_front() {
            return injected;
        }
        Ok(state.handle(request))
    }
}

impl RemoteState {
    fn handle(&mut self, request: &HttpRequest) -> HttpResponse {
        let segments: Vec<&str> = request
            .url
            .trim_end_matches('/')
            .rsplitn(3, '/')
            .collect();

        match (request.method, segments.as_slice()) {
            (Method::Get, ["employees", ..]) => {
                let items: Vec<Value> = self.employees.values().cloned().collect();
                ok(json!({ "items": items }))
            }
            (Method::Get, [id, "employee", ..]) => match self.employees.get(*id) {
                Some(profile) => ok(json!({ "items": [profile] })),
                None => not_found("Employee not found"),
            },
            (Method::Get, [id, "history", ..]) => match self.histories.get(*id) {
                Some(history) => ok(json!({ "items": history })),
                None => not_found("Employee not found"),
            },
            (Method::Get, ["inventory", ..]) => ok(json!({ "items": self.inventory })),
            (Method::Post, ["checkout", ..]) => self.idempotent(request, Self::checkout),
            (Method::Post, ["return", ..]) => self.idempotent(request, Self::close_booking),
            _ => not_found("No such endpoint"),
        }
    }

    fn idempotent(
        &mut self,
        request: &HttpRequest,
        handler: fn(&mut Self, &Map<String, Value>) -> HttpResponse,
    ) -> HttpResponse {
        let key = request
            .headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("idempotency-key"))
            .map(|(_, value)| value.clone());
        if let Some(previous) = key.as_ref().and_then(|k| self.replays.get(k)) {
            return previous.clone();
        }

        let response = match &request.body {
            Some(Value::Object(body)) => handler(self, body),
            _ => bad_request("Request body must be a JSON object"),
        };
        if let Some(key) = key {
            self.replays.insert(key, response.clone());
        }
        response
    }

    fn checkout(&mut self, body: &Map<String, Value>) -> HttpResponse {
        let Some(employee_id) = verified_employee(body) else {
            return forbidden("QR code does not match employee");
        };
        let item_id = body.get("item_id").map(text).unwrap_or_default();

        let Some(item) = self
            .inventory
            .iter_mut()
            .find(|item| Record::new((*item).clone()).field(Field::ItemId) == item_id)
        else {
            return not_found("Item not found");
        };
        let current = Record::new(item.clone());
        if current.field(Field::Status) != "Available" {
            return conflict("Item is not available");
        }
        set_field(item, Field::Status, json!("CheckedOut"));

        let booking_id = self.next_booking;
        self.next_booking += 1;
        let booking = json!({
            "booking_id": booking_id,
            "item_id": current.field(Field::ItemId),
            "item_name": current.field(Field::ItemName),
            "category": current.field(Field::Category),
            "employee_id": employee_id,
            "date_booked": BOOKED_ON,
            "date_returned": null,
            "status": "Checked Out",
            "notes": body.get("checkout_notes").cloned().unwrap_or(Value::Null),
        });
        if let Value::Object(booking) = booking {
            self.histories
                .entry(employee_id.to_string())
                .or_default()
                .push(booking);
        }
        ok(json!({ "booking_id": booking_id }))
    }

    fn close_booking(&mut self, body: &Map<String, Value>) -> HttpResponse {
        if verified_employee(body).is_none() {
            return forbidden("QR code does not match employee");
        }
        let booking_id = body.get("booking_id").map(text).unwrap_or_default();

        let Some(booking) = self
            .histories
            .values_mut()
            .flatten()
            .find(|b| Record::new((*b).clone()).field(Field::BookingId) == booking_id)
        else {
            return not_found("Booking not found");
        };
        let current = Record::new(booking.clone());
        if current.has(Field::DateReturned) {
            return conflict("Booking already returned");
        }
        set_field(booking, Field::DateReturned, json!(RETURNED_ON));
        set_field(booking, Field::Status, json!("Returned"));
        set_field(
            booking,
            Field::ReturnNotes,
            body.get("return_notes").cloned().unwrap_or(Value::Null),
        );

        let item_id = current.field(Field::ItemId);
        if let Some(item) = self
            .inventory
            .iter_mut()
            .find(|item| Record::new((*item).clone()).field(Field::ItemId) == item_id)
        {
            set_field(item, Field::Status, json!("Available"));
        }
        ok(json!({ "status": "returned" }))
    }
}

/// Employee number of a submission whose `qr_code` is that employee's badge.
fn verified_employee(body: &Map<String, Value>) -> Option<i64> {
    let employee_id = body.get("employee_id")?.as_i64()?;
    let qr_code = body.get("qr_code")?.as_str()?;
    (qr_code == format!("EMP{}", employee_id)).then_some(employee_id)
}

/// Overwrites `field` under whichever spelling the record already uses.
fn set_field(record: &mut Map<String, Value>, field: Field, value: Value) {
    let key = field
        .candidates()
        .into_iter()
        .find(|key| record.contains_key(key))
        .unwrap_or_else(|| field.canonical().to_string());
    record.insert(key, value);
}

fn records(body: Value) -> Vec<Map<String, Value>> {
    record::collection(body)
        .into_iter()
        .map(Record::into_inner)
        .collect()
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn ok(body: Value) -> HttpResponse {
    HttpResponse::new(200, body.to_string())
}

fn error(status: u16, message: &str) -> HttpResponse {
    HttpResponse::new(status, json!({ "error": message }).to_string())
}

fn bad_request(message: &str) -> HttpResponse {
    error(400, message)
}

fn forbidden(message: &str) -> HttpResponse {
    error(403, message)
}

fn not_found(message: &str) -> HttpResponse {
    error(404, message)
}

fn conflict(message: &str) -> HttpResponse {
    error(409, message)
}
