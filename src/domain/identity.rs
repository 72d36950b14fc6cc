use super::employee::EmployeeId;
use super::ports::BadgeScanner;
use crate::error::IdentityRejection;

/// Literal prefix every employee badge code starts with.
pub const BADGE_PREFIX: &str = "EMP";

/// What a captured badge is compared against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// Any well-formed badge; its suffix becomes the session employee.
    Login,
    /// Exactly the badge of the currently logged-in employee.
    Confirm(EmployeeId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeState {
    AwaitingCapture,
    Captured(String),
    Matched(Verified),
    Mismatched(IdentityRejection),
    CaptureFailed,
}

impl ChallengeState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Matched(_) | Self::Mismatched(_) | Self::CaptureFailed
        )
    }
}

/// Proof that a live capture matched the expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified {
    pub employee_id: EmployeeId,
    /// The badge code exactly as captured, forwarded as `qr_code`.
    pub badge_code: String,
}

/// One-shot identity confirmation. A failed challenge is never retried;
/// the caller starts a new one.
#[derive(Debug)]
pub struct IdentityChallenge {
    expectation: Expectation,
    state: ChallengeState,
}

impl IdentityChallenge {
    pub fn login() -> Self {
        Self::new(Expectation::Login)
    }

    pub fn confirm(expected: EmployeeId) -> Self {
        Self::new(Expectation::Confirm(expected))
    }

    fn new(expectation: Expectation) -> Self {
        Self {
            expectation,
            state: ChallengeState::AwaitingCapture,
        }
    }

    pub fn state(&self) -> &ChallengeState {
        &self.state
    }

    /// Feeds the capture result. Ignored unless the challenge is still awaiting one.
    pub fn capture(&mut self, captured: Option<String>) {
        if self.state != ChallengeState::AwaitingCapture {
            return;
        }
        self.state = match captured.map(|code| code.trim().to_string()) {
            Some(code) if !code.is_empty() => ChallengeState::Captured(code),
            _ => ChallengeState::CaptureFailed,
        };
    }

    /// Compares a captured badge against the expectation.
    pub fn evaluate(&mut self) {
        let ChallengeState::Captured(code) = &self.state else {
            return;
        };

        self.state = match (code.strip_prefix(BADGE_PREFIX), &self.expectation) {
            (None, _) => ChallengeState::Mismatched(IdentityRejection::InvalidFormat),
            (Some(""), Expectation::Login) => {
                ChallengeState::Mismatched(IdentityRejection::InvalidFormat)
            }
            (Some(suffix), Expectation::Login) => ChallengeState::Matched(Verified {
                employee_id: EmployeeId::new(suffix),
                badge_code: code.clone(),
            }),
            (Some(_), Expectation::Confirm(expected)) if *code == expected.badge_code() => {
                ChallengeState::Matched(Verified {
                    employee_id: expected.clone(),
                    badge_code: code.clone(),
                })
            }
            (Some(_), Expectation::Confirm(_)) => {
                ChallengeState::Mismatched(IdentityRejection::Mismatched)
            }
        };
    }

    /// Runs the whole challenge against a scanner and returns its terminal outcome.
    pub async fn run(mut self, scanner: &dyn BadgeScanner) -> Result<Verified, IdentityRejection> {
        let captured = scanner.capture().await;
        self.capture(captured);
        self.evaluate();
        self.outcome()
    }

    /// Terminal outcome. A challenge that has not finished counts as a failed capture.
    pub fn outcome(self) -> Result<Verified, IdentityRejection> {
        match self.state {
            ChallengeState::Matched(verified) => Ok(verified),
            ChallengeState::Mismatched(reason) => Err(reason),
            ChallengeState::AwaitingCapture
            | ChallengeState::Captured(_)
            | ChallengeState::CaptureFailed => Err(IdentityRejection::CaptureFailed),
        }
    }
}
