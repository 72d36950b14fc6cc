use super::employee::{Employee, EmployeeId};

/// The authenticated employee of this client instance.
///
/// Written only by login and logout; every other component reads it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    employee_id: Option<EmployeeId>,
    profile: Option<Employee>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn employee_id(&self) -> Option<&EmployeeId> {
        self.employee_id.as_ref()
    }

    pub fn profile(&self) -> Option<&Employee> {
        self.profile.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.employee_id.is_some()
    }

    pub fn begin(&mut self, employee_id: EmployeeId, profile: Option<Employee>) {
        self.employee_id = Some(employee_id);
        self.profile = profile;
    }

    pub fn clear(&mut self) {
        self.employee_id = None;
        self.profile = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_and_clear() {
        let mut session = SessionContext::new();
        assert!(!session.is_authenticated());

        session.begin(EmployeeId::new("7"), None);
        assert_eq!(session.employee_id().map(EmployeeId::as_str), Some("7"));

        session.clear();
        assert!(!session.is_authenticated());
        assert!(session.profile().is_none());
    }
}
