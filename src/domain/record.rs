use serde_json::{Map, Value};

/// Canonical names of every field the client reads from remote records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ItemId,
    ItemName,
    Category,
    Quantity,
    Location,
    Status,
    BookingId,
    EmployeeId,
    DateBooked,
    DateReturned,
    ReturnNotes,
    FirstName,
    LastName,
    Department,
}

impl Field {
    /// Snake-case form of the field name.
    pub fn canonical(self) -> &'static str {
        match self {
            Self::ItemId => "item_id",
            Self::ItemName => "item_name",
            Self::Category => "category",
            Self::Quantity => "quantity",
            Self::Location => "location",
            Self::Status => "status",
            Self::BookingId => "booking_id",
            Self::EmployeeId => "employee_id",
            Self::DateBooked => "date_booked",
            Self::DateReturned => "date_returned",
            Self::ReturnNotes => "return_notes",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Department => "department",
        }
    }

    /// Display value used when the record does not carry the field.
    ///
    /// Optional fields (`DateReturned`, `ReturnNotes`) have no default.
    pub fn default_text(self) -> Option<&'static str> {
        match self {
            Self::ItemName => Some("Unknown Item"),
            Self::Category => Some("Unknown Category"),
            Self::Location => Some("Unknown Location"),
            Self::Status => Some("Unknown Status"),
            Self::DateBooked => Some("Unknown Date"),
            Self::FirstName => Some("User"),
            Self::LastName => Some(""),
            Self::Department => Some("Unknown Department"),
            Self::ItemId | Self::BookingId | Self::EmployeeId => Some("N/A"),
            Self::Quantity => Some("0"),
            Self::DateReturned | Self::ReturnNotes => None,
        }
    }

    /// Key spellings to probe, in order.
    pub fn candidates(self) -> [String; 4] {
        let snake = self.canonical();
        let pascal: String = snake
            .split('_')
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect();
        let mut camel = pascal.clone();
        if let Some(first) = camel.get_mut(0..1) {
            first.make_ascii_lowercase();
        }
        [snake.to_ascii_uppercase(), snake.to_string(), pascal, camel]
    }
}

/// A loosely-shaped JSON object returned by the remote service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// First present value for `field`, probing every accepted spelling.
    ///
    /// Null and empty-string values count as absent.
    pub fn raw(&self, field: Field) -> Option<&Value> {
        field
            .candidates()
            .iter()
            .filter_map(|key| self.0.get(key))
            .find(|value| !is_blank(value))
    }

    /// Textual value for `field`, if present.
    pub fn text(&self, field: Field) -> Option<String> {
        self.raw(field).map(value_to_text)
    }

    /// Textual value for `field`, falling back to the field's documented default.
    pub fn field(&self, field: Field) -> String {
        self.text(field)
            .or_else(|| field.default_text().map(str::to_string))
            .unwrap_or_default()
    }

    /// Numeric value for `field`, `0` when absent or unparseable.
    pub fn quantity(&self, field: Field) -> i64 {
        match self.raw(field) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    pub fn has(&self, field: Field) -> bool {
        self.raw(field).is_some()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Unwraps the `{"items": [...]}` envelope into a sequence of records.
///
/// A bare array is used as-is, a bare object becomes a one-element sequence,
/// and non-object elements are skipped.
pub fn collection(body: Value) -> Vec<Record> {
    let items = match body {
        Value::Object(mut map) if map.contains_key("items") => {
            map.remove("items").unwrap_or(Value::Null)
        }
        other => other,
    };

    match items {
        Value::Array(values) => values
            .into_iter()
            .filter_map(|value| match value {
                Value::Object(map) => Some(Record(map)),
                _ => None,
            })
            .collect(),
        Value::Object(map) => vec![Record(map)],
        _ => Vec::new(),
    }
}

/// Unwraps a single-record body: the first element of a non-empty `items`
/// sequence, otherwise the body itself when it is an object.
pub fn single(body: Value) -> Option<Record> {
    match body {
        Value::Object(mut map) => match map.get_mut("items") {
            Some(Value::Array(items)) if !items.is_empty() => match items.swap_remove(0) {
                Value::Object(first) => Some(Record(first)),
                _ => None,
            },
            _ => Some(Record(map)),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => Record::new(map),
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_candidate_spellings() {
        let [upper, lower, pascal, camel] = Field::DateReturned.candidates();
        assert_eq!(upper, "DATE_RETURNED");
        assert_eq!(lower, "date_returned");
        assert_eq!(pascal, "DateReturned");
        assert_eq!(camel, "dateReturned");
    }

    #[test]
    fn test_upper_and_lower_keys_normalize_identically() {
        let upper = record(json!({"ITEM_NAME": "Drill"}));
        let lower = record(json!({"item_name": "Drill"}));
        assert_eq!(upper.field(Field::ItemName), lower.field(Field::ItemName));
        assert_eq!(upper.field(Field::ItemName), "Drill");
    }

    #[test]
    fn test_probe_order_prefers_uppercase() {
        let r = record(json!({"item_name": "lower", "ITEM_NAME": "upper", "ItemName": "pascal"}));
        assert_eq!(r.field(Field::ItemName), "upper");
    }

    #[test]
    fn test_null_and_empty_fall_through() {
        let r = record(json!({"ITEM_NAME": null, "item_name": "", "ItemName": "Ladder"}));
        assert_eq!(r.field(Field::ItemName), "Ladder");
    }

    #[test]
    fn test_defaults() {
        let r = Record::default();
        assert_eq!(r.field(Field::ItemName), "Unknown Item");
        assert_eq!(r.field(Field::BookingId), "N/A");
        assert_eq!(r.quantity(Field::Quantity), 0);
        assert_eq!(r.text(Field::DateReturned), None);
    }

    #[test]
    fn test_numbers_render_as_text() {
        let r = record(json!({"BOOKING_ID": 99, "QUANTITY": "3"}));
        assert_eq!(r.field(Field::BookingId), "99");
        assert_eq!(r.quantity(Field::Quantity), 3);
    }

    #[test]
    fn test_collection_unwraps_envelope() {
        let body = json!({"items": [{"a": 1}, {"b": 2}], "count": 2});
        assert_eq!(collection(body).len(), 2);

        let bare = json!([{"a": 1}]);
        assert_eq!(collection(bare).len(), 1);

        assert!(collection(json!("nonsense")).is_empty());
    }

    #[test]
    fn test_single_takes_first_item() {
        let body = json!({"items": [{"first_name": "Ada"}, {"first_name": "Bob"}]});
        let r = single(body).unwrap();
        assert_eq!(r.field(Field::FirstName), "Ada");

        let bare = json!({"FIRST_NAME": "Grace"});
        assert_eq!(single(bare).unwrap().field(Field::FirstName), "Grace");

        let empty = json!({"items": []});
        assert!(single(empty).is_some());
    }
}
