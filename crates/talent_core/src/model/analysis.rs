//! Analysis ingestion input.
//!
//! An [`AnalysisResult`] is what the scoring pipeline hands over for one
//! GitHub profile. The repository turns it into a new or updated
//! [`Candidate`](super::candidate::Candidate).

use super::candidate::CommitMetrics;
use serde::{Deserialize, Serialize};

/// Profile fields known about the analysed GitHub user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub github_username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl CandidateProfile {
    pub fn new(github_username: impl Into<String>) -> Self {
        Self {
            github_username: github_username.into(),
            ..Self::default()
        }
    }

    /// Display name, falling back to the username when blank or absent.
    pub fn display_name(&self) -> String {
        non_blank(self.name.as_deref())
            .unwrap_or(self.github_username.as_str())
            .to_string()
    }

    /// Contact email, falling back to `<username>@example.com`.
    pub fn contact_email(&self) -> String {
        match non_blank(self.email.as_deref()) {
            Some(email) => email.to_string(),
            None => format!("{}@example.com", self.github_username),
        }
    }
}

/// One scored analysis of a GitHub profile against a benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub profile: CandidateProfile,
    pub metrics: CommitMetrics,
    pub match_score: f64,
    /// Benchmark label; stored as the candidate `position`.
    pub benchmark: String,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
