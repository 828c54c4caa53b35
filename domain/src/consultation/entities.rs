//! Consultation domain entities

use crate::core::error::DomainError;
use crate::transcript::turn::Turn;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum accepted length (in characters) of an initial problem description.
pub const MAX_PROBLEM_LEN: usize = 10_000;

/// Opaque consultation identity assigned by the backend (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsultationId(String);

impl ConsultationId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() || trimmed.contains('/') {
            return Err(DomainError::InvalidConsultationId(id));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConsultationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ConsultationId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Server-side lifecycle of a consultation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationStatus {
    /// Initial assessment before the panel convenes
    Triage,
    /// Doctors are taking turns to speak
    Discussing,
    /// The panel evaluates and eliminates candidates
    Voting,
    /// The final summary is being written
    Summarizing,
    Completed,
    Failed,
}

impl ConsultationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Triage => "triage",
            Self::Discussing => "discussing",
            Self::Voting => "voting",
            Self::Summarizing => "summarizing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether the backend will refuse to advance this consultation further.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for ConsultationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConsultationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "triage" => Ok(Self::Triage),
            "discussing" => Ok(Self::Discussing),
            "voting" => Ok(Self::Voting),
            "summarizing" => Ok(Self::Summarizing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

/// Final verdict written by the panel once deliberation is over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultationSummary {
    pub id: String,
    pub content: String,
    /// Name of the doctor the panel judged most accurate
    pub best_doctor_name: Option<String>,
    /// Backend-defined vote breakdown, kept opaque
    pub voting_details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Cached copy of a consultation header (Entity)
///
/// The backend owns the authoritative record; this is what the client last saw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultation {
    pub id: ConsultationId,
    pub status: ConsultationStatus,
    pub patient_profile_id: Option<String>,
    /// Severity level from 1 (mild) to 5 (critical)
    pub triage_level: u8,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub summary: Option<ConsultationSummary>,
    /// Panel configuration as returned by the backend, kept opaque
    #[serde(default)]
    pub doctors: Vec<serde_json::Value>,
}

impl Consultation {
    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }
}

/// A consultation together with its ordered history
#[derive(Debug, Clone, PartialEq)]
pub struct ConsultationRecord {
    pub consultation: Consultation,
    pub turns: Vec<Turn>,
}

/// Request to open a new consultation (Value Object)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewConsultation {
    initial_problem: String,
    patient_profile_id: Option<String>,
    /// Optional panel override; the backend default panel is used when empty
    doctors: Option<Vec<serde_json::Value>>,
}

impl NewConsultation {
    /// Validate and build a request from the patient's problem description.
    pub fn new(initial_problem: impl Into<String>) -> Result<Self, DomainError> {
        let initial_problem = validate_problem(initial_problem.into())?;
        Ok(Self {
            initial_problem,
            patient_profile_id: None,
            doctors: None,
        })
    }

    pub fn with_patient_profile(mut self, profile_id: impl Into<String>) -> Self {
        self.patient_profile_id = Some(profile_id.into());
        self
    }

    pub fn with_doctors(mut self, doctors: Vec<serde_json::Value>) -> Self {
        self.doctors = Some(doctors);
        self
    }

    pub fn initial_problem(&self) -> &str {
        &self.initial_problem
    }

    pub fn patient_profile_id(&self) -> Option<&str> {
        self.patient_profile_id.as_deref()
    }

    pub fn doctors(&self) -> Option<&[serde_json::Value]> {
        self.doctors.as_deref()
    }
}

/// Shared rule for anything the patient submits as a problem description.
pub fn validate_problem(problem: String) -> Result<String, DomainError> {
    if problem.trim().is_empty() {
        return Err(DomainError::InvalidProblem(
            "problem description cannot be empty".to_string(),
        ));
    }
    let len = problem.chars().count();
    if len > MAX_PROBLEM_LEN {
        return Err(DomainError::InvalidProblem(format!(
            "problem description is {} characters (max: {})",
            len, MAX_PROBLEM_LEN
        )));
    }
    Ok(problem)
}
