use serde::{Serialize, Serializer};

/// Body of `POST /checkout`. Built only after a matched identity challenge.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct CheckoutSubmission {
    pub item_id: String,
    pub employee_id: i64,
    pub qr_code: String,
    #[serde(serialize_with = "serialize_flag")]
    pub is_damaged: bool,
    pub checkout_notes: String,
}

/// Body of `POST /return`. Sent once; never retried automatically.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct ReturnSubmission {
    pub booking_id: i64,
    pub employee_id: i64,
    pub qr_code: String,
    pub return_notes: String,
    #[serde(serialize_with = "serialize_flag")]
    pub is_damaged: bool,
}

/// The remote expects damage as a `"Y"`/`"N"` flag.
fn serialize_flag<S>(damaged: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(if *damaged { "Y" } else { "N" })
}
