use serde::Serialize;

/// Verdict returned by the validator for one generated question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Accepted { reasons: Vec<String> },
    Rejected { reasons: Vec<String> },
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted { .. })
    }

    pub fn reasons(&self) -> &[String] {
        match self {
            ValidationOutcome::Accepted { reasons } | ValidationOutcome::Rejected { reasons } => {
                reasons
            }
        }
    }
}
