use super::record::{Field, Record};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ItemStatus {
    Available,
    CheckedOut,
    Other(String),
}

impl ItemStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Available" => Self::Available,
            "CheckedOut" | "Checked Out" => Self::CheckedOut,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => f.write_str("Available"),
            Self::CheckedOut => f.write_str("Checked Out"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// A tracked piece of equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryItem {
    pub item_id: String,
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub location: String,
    pub status: ItemStatus,
}

impl InventoryItem {
    pub fn from_record(record: &Record) -> Self {
        Self {
            item_id: record.field(Field::ItemId),
            name: record.field(Field::ItemName),
            category: record.field(Field::Category),
            quantity: record.quantity(Field::Quantity),
            location: record.field(Field::Location),
            status: ItemStatus::parse(&record.field(Field::Status)),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == ItemStatus::Available
    }

    pub fn label(&self) -> String {
        format!("{} (ID: {}, Qty: {})", self.name, self.item_id, self.quantity)
    }
}
