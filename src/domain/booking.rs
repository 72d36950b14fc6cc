use super::record::{Field, Record};
use serde::Serialize;

/// One checkout-to-return lifecycle of an item for an employee.
///
/// `date_returned == None` means the item is still checked out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booking {
    pub booking_id: String,
    pub item_id: String,
    pub item_name: String,
    pub category: String,
    pub employee_id: String,
    pub date_booked: String,
    pub date_returned: Option<String>,
    pub status: String,
    pub return_notes: Option<String>,
}

impl Booking {
    pub fn from_record(record: &Record) -> Self {
        Self {
            booking_id: record.field(Field::BookingId),
            item_id: record.field(Field::ItemId),
            item_name: record.field(Field::ItemName),
            category: record.field(Field::Category),
            employee_id: record.field(Field::EmployeeId),
            date_booked: record.field(Field::DateBooked),
            date_returned: record.text(Field::DateReturned),
            status: record.field(Field::Status),
            return_notes: record.text(Field::ReturnNotes),
        }
    }

    pub fn is_open(&self) -> bool {
        self.date_returned.is_none()
    }

    pub fn label(&self) -> String {
        format!(
            "{} • Booking {} • Booked {}",
            self.item_name, self.booking_id, self.date_booked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::collection;
    use serde_json::json;

    #[test]
    fn test_open_and_closed_bookings() {
        let records = collection(json!({"items": [
            {"BOOKING_ID": 1, "DATE_RETURNED": null},
            {"booking_id": 2, "date_returned": "2024-05-02"},
            {"BookingId": 3, "DateReturned": ""},
            {"bookingId": 4}
        ]}));
        let open: Vec<String> = records
            .iter()
            .map(Booking::from_record)
            .filter(Booking::is_open)
            .map(|b| b.booking_id)
            .collect();

        assert_eq!(open, vec!["1", "3", "4"]);
    }

    #[test]
    fn test_missing_booking_id_defaults() {
        let b = Booking::from_record(&Record::default());
        assert_eq!(b.booking_id, "N/A");
        assert!(b.is_open());
    }
}
