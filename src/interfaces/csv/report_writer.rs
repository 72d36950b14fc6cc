use crate::domain::booking::Booking;
use crate::domain::inventory::InventoryItem;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

const ITEM_HEADER: [&str; 6] = ["item_id", "name", "category", "quantity", "location", "status"];

const BOOKING_HEADER: [&str; 8] = [
    "booking_id",
    "item_id",
    "item_name",
    "category",
    "date_booked",
    "date_returned",
    "status",
    "return_notes",
];

/// Writes inventory and booking listings as CSV.
///
/// The header row is written even when there are no rows.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

#[derive(Serialize)]
struct ItemRow<'a> {
    item_id: &'a str,
    name: &'a str,
    category: &'a str,
    quantity: i64,
    location: &'a str,
    status: String,
}

#[derive(Serialize)]
struct BookingRow<'a> {
    booking_id: &'a str,
    item_id: &'a str,
    item_name: &'a str,
    category: &'a str,
    date_booked: &'a str,
    date_returned: Option<&'a str>,
    status: &'a str,
    return_notes: Option<&'a str>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(destination: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(destination),
        }
    }

    pub fn write_items(&mut self, items: &[InventoryItem]) -> Result<()> {
        if items.is_empty() {
            self.writer.write_record(ITEM_HEADER)?;
        }
        for item in items {
            self.writer.serialize(ItemRow {
                item_id: &item.item_id,
                name: &item.name,
                category: &item.category,
                quantity: item.quantity,
                location: &item.location,
                status: item.status.to_string(),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_bookings(&mut self, bookings: &[Booking]) -> Result<()> {
        if bookings.is_empty() {
            self.writer.write_record(BOOKING_HEADER)?;
        }
        for booking in bookings {
            self.writer.serialize(BookingRow {
                booking_id: &booking.booking_id,
                item_id: &booking.item_id,
                item_name: &booking.item_name,
                category: &booking.category,
                date_booked: &booking.date_booked,
                date_returned: booking.date_returned.as_deref(),
                status: &booking.status,
                return_notes: booking.return_notes.as_deref(),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
