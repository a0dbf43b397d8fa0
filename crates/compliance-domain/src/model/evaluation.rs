use serde::{Deserialize, Serialize};

use super::ComplianceRule;

/// Overall verdict for one driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "Pass",
            Verdict::Fail => "Fail",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one driver against every rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub is_pass: bool,
    /// Failed rules, in rule order
    pub failed_rules: Vec<ComplianceRule>,
    /// Failure messages, parallel to `failed_rules`
    pub reasons: Vec<String>,
}

impl EvaluationResult {
    pub fn from_failures(failed_rules: Vec<ComplianceRule>) -> Self {
        let reasons = failed_rules.iter().map(|r| r.message().to_string()).collect();
        Self {
            is_pass: failed_rules.is_empty(),
            failed_rules,
            reasons,
        }
    }

    pub fn verdict(&self) -> Verdict {
        if self.is_pass {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    /// Text for the `Result` column: `Pass`, or the reasons joined by a space.
    pub fn result_text(&self) -> String {
        if self.is_pass {
            Verdict::Pass.as_str().to_string()
        } else {
            self.reasons.join(" ")
        }
    }
}
