use crate::domain::ports::HttpResponse;
use crate::error::{EquipError, NetworkErrorKind, Result};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Checkout,
    Return,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkout => f.write_str("Checkout"),
            Self::Return => f.write_str("Return"),
        }
    }
}

/// Acknowledgement of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub action: Action,
    /// Key sent with the submission, for reconciling a lost answer.
    pub idempotency_key: String,
}

/// Why the remote refused a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Non-2xx with a parseable `error` field.
    Remote { status: u16, message: String },
    /// Non-2xx whose body carried no readable reason.
    Opaque { status: u16, raw_text: String },
}

impl Rejection {
    /// Classifies a non-success response by its body.
    pub fn from_response(response: &HttpResponse) -> Self {
        let reason = response.json().ok().and_then(|body| match body {
            Value::Object(map) => match map.get("error") {
                Some(Value::String(message)) if !message.trim().is_empty() => {
                    Some(message.clone())
                }
                _ => None,
            },
            _ => None,
        });

        match reason {
            Some(message) => Self::Remote {
                status: response.status,
                message,
            },
            None => {
                let raw_text = if response.body.trim().is_empty() {
                    "empty response body".to_string()
                } else {
                    response.body.clone()
                };
                Self::Opaque {
                    status: response.status,
                    raw_text,
                }
            }
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Remote { status, .. } | Self::Opaque { status, .. } => *status,
        }
    }
}

impl From<Rejection> for EquipError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::Remote { status, message } => Self::RemoteRejected { status, message },
            Rejection::Opaque { status, raw_text } => Self::RemoteOpaqueFailure { status, raw_text },
        }
    }
}

/// Classified result of a dispatched checkout or return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(Receipt),
    Rejected(Rejection),
    /// No answer arrived; the remote may or may not have applied the submission.
    NetworkFailure {
        kind: NetworkErrorKind,
        /// Key sent with the lost submission, for reconciling it with the remote.
        idempotency_key: String,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Key of the submission when its fate is known only to the remote.
    pub fn idempotency_key(&self) -> Option<&str> {
        match self {
            Self::Success(receipt) => Some(&receipt.idempotency_key),
            Self::NetworkFailure {
                idempotency_key, ..
            } => Some(idempotency_key),
            Self::Rejected(_) => None,
        }
    }

    /// One human-readable line describing the outcome.
    pub fn message(&self, action: Action) -> String {
        match self {
            Self::Success(_) => match action {
                Action::Checkout => "Equipment checked out successfully!".to_string(),
                Action::Return => "Equipment returned successfully!".to_string(),
            },
            Self::Rejected(rejection) => {
                format!("{} failed: {}", action, EquipError::from(rejection.clone()))
            }
            Self::NetworkFailure {
                kind,
                idempotency_key,
            } => format!(
                "{} request failed: {} (idempotency key {})",
                action, kind, idempotency_key
            ),
        }
    }

    pub fn into_result(self) -> Result<Receipt> {
        match self {
            Self::Success(receipt) => Ok(receipt),
            Self::Rejected(rejection) => Err(rejection.into()),
            Self::NetworkFailure { kind, .. } => Err(kind.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_field_is_preferred() {
        let response = HttpResponse::new(409, r#"{"error": "Item already checked out"}"#);
        assert_eq!(
            Rejection::from_response(&response),
            Rejection::Remote {
                status: 409,
                message: "Item already checked out".into()
            }
        );
    }

    #[test]
    fn test_unparseable_body_falls_back_to_raw_text() {
        let response = HttpResponse::new(502, "Bad Gateway");
        assert_eq!(
            Rejection::from_response(&response),
            Rejection::Opaque {
                status: 502,
                raw_text: "Bad Gateway".into()
            }
        );
    }

    #[test]
    fn test_json_without_error_field_is_opaque() {
        let response = HttpResponse::new(400, r#"{"detail": "nope"}"#);
        assert!(matches!(
            Rejection::from_response(&response),
            Rejection::Opaque { status: 400, .. }
        ));
    }

    #[test]
    fn test_messages_reduce_to_one_line() {
        let rejected = Outcome::Rejected(Rejection::Remote {
            status: 409,
            message: "Item not available".into(),
        });
        assert_eq!(
            rejected.message(Action::Checkout),
            "Checkout failed: HTTP 409: Item not available"
        );

        let lost = Outcome::NetworkFailure {
            kind: NetworkErrorKind::Timeout,
            idempotency_key: "k-1".into(),
        };
        assert_eq!(
            lost.message(Action::Return),
            "Return request failed: Request timed out - server may be busy (idempotency key k-1)"
        );
        assert_eq!(lost.idempotency_key(), Some("k-1"));
        assert_eq!(rejected.idempotency_key(), None);
    }
}
