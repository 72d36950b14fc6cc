use super::record::{Field, Record};
use serde::Serialize;
use std::fmt;

/// Identifier of an employee as carried by the badge suffix (`EMP<id>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The badge code this employee is expected to present.
    pub fn badge_code(&self) -> String {
        format!("{}{}", super::identity::BADGE_PREFIX, self.0)
    }

    /// Numeric form required by the submission endpoints.
    pub fn as_number(&self) -> Option<i64> {
        self.0.trim().parse().ok()
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Profile of the logged-in employee. Fetched per session, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
}

impl Employee {
    pub fn from_record(id: EmployeeId, record: &Record) -> Self {
        Self {
            id,
            first_name: record.field(Field::FirstName),
            last_name: record.field(Field::LastName),
            department: record.field(Field::Department),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
