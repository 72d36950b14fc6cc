use equipflow::domain::booking::Booking;
use equipflow::domain::inventory::InventoryItem;
use equipflow::domain::record::{Field, collection};
use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::{Map, Value, json};

/// Picks one of the accepted spellings of `field` at random.
fn spelling(rng: &mut impl Rng, field: Field) -> String {
    field.candidates().choose(rng).unwrap().clone()
}

#[test]
fn test_available_subset_regardless_of_casing() {
    let mut rng = rand::thread_rng();
    let statuses = ["Available", "CheckedOut", "Retired", "Available"];

    for _ in 0..50 {
        let mut expected = Vec::new();
        let mut items = Vec::new();
        for id in 0..20 {
            let status = statuses[rng.gen_range(0..statuses.len())];
            if status == "Available" {
                expected.push(id.to_string());
            }
            let mut item = Map::new();
            item.insert(spelling(&mut rng, Field::ItemId), json!(id));
            item.insert(spelling(&mut rng, Field::Status), json!(status));
            items.push(Value::Object(item));
        }

        let available: Vec<String> = collection(json!({ "items": items }))
            .iter()
            .map(InventoryItem::from_record)
            .filter(InventoryItem::is_available)
            .map(|item| item.item_id)
            .collect();

        assert_eq!(available, expected);
    }
}

#[test]
fn test_open_checkouts_are_exactly_unreturned_records() {
    let mut rng = rand::thread_rng();

    for _ in 0..50 {
        let mut expected = Vec::new();
        let mut records = Vec::new();
        for id in 0..20 {
            let mut record = Map::new();
            record.insert(spelling(&mut rng, Field::BookingId), json!(id));
            match rng.gen_range(0..3) {
                0 => {
                    expected.push(id.to_string());
                }
                1 => {
                    expected.push(id.to_string());
                    record.insert(spelling(&mut rng, Field::DateReturned), Value::Null);
                }
                _ => {
                    record.insert(spelling(&mut rng, Field::DateReturned), json!("2024-06-02"));
                }
            }
            records.push(Value::Object(record));
        }

        let open: Vec<String> = collection(Value::Array(records))
            .iter()
            .map(Booking::from_record)
            .filter(Booking::is_open)
            .map(|b| b.booking_id)
            .collect();

        assert_eq!(open, expected);
    }
}

#[test]
fn test_every_spelling_extracts_the_same_value() {
    for key in Field::ItemName.candidates() {
        let mut record = Map::new();
        record.insert(key, json!("Oscilloscope"));
        let records = collection(Value::Array(vec![Value::Object(record)]));
        assert_eq!(records[0].field(Field::ItemName), "Oscilloscope");
    }
}
