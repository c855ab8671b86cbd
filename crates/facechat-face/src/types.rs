//! Outcomes of the face flows.

/// Where a failed flow stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Rejected locally; no request was issued.
    Validation,
    /// The backend answered with a non-success status.
    Backend,
    /// Transport error, non-2xx status or unparseable response.
    Server,
}

/// Result of one registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Success { name: String },
    Failure { kind: FailureKind, reason: String },
}

impl RegistrationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RegistrationOutcome::Success { .. })
    }
}

/// Result of one recognition attempt.
///
/// The client keeps the most recent one; each call replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionResult {
    /// Names in the order the backend returned them.
    Success { names: Vec<String> },
    Failure { kind: FailureKind, reason: String },
}

impl RecognitionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, RecognitionResult::Success { .. })
    }

    /// Recognized names; empty for a failure.
    pub fn names(&self) -> &[String] {
        match self {
            RecognitionResult::Success { names } => names,
            RecognitionResult::Failure { .. } => &[],
        }
    }
}
