//! Transcript turn entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a turn within one consultation's transcript (Value Object)
///
/// Server ids come from persisted history. Local ids are handed out by a
/// monotonically increasing counter while a run is live, so a local id can
/// never equal a server id or another local id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum TurnId {
    Server(String),
    Local(u64),
}

impl TurnId {
    pub fn server(id: impl Into<String>) -> Self {
        Self::Server(id.into())
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Server(id) => f.write_str(id),
            Self::Local(n) => write!(f, "local-{}", n),
        }
    }
}

impl From<TurnId> for String {
    fn from(id: TurnId) -> Self {
        id.to_string()
    }
}

impl From<String> for TurnId {
    fn from(s: String) -> Self {
        match s.strip_prefix("local-").and_then(|n| n.parse().ok()) {
            Some(n) => Self::Local(n),
            None => Self::Server(s),
        }
    }
}

/// Who produced a turn
///
/// Doctor identity is only representable on doctor turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "sender_type", rename_all = "lowercase")]
pub enum Sender {
    Patient,
    Doctor {
        doctor_id: String,
        doctor_name: String,
    },
    System,
}

/// Discriminant of [`Sender`], without the doctor payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SenderType {
    Patient,
    Doctor,
    System,
}

impl SenderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for SenderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SenderType {
    type Err = crate::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(Self::Patient),
            "doctor" => Ok(Self::Doctor),
            "system" => Ok(Self::System),
            other => Err(crate::DomainError::UnknownSenderType(other.to_string())),
        }
    }
}

/// One entry in a consultation transcript (Entity)
///
/// Turns are immutable once built; the transcript only ever appends them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    id: TurnId,
    #[serde(flatten)]
    sender: Sender,
    content: String,
    created_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(
        id: TurnId,
        sender: Sender,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            sender,
            content: content.into(),
            created_at,
        }
    }

    pub fn patient(id: TurnId, content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self::new(id, Sender::Patient, content, created_at)
    }

    pub fn doctor(
        id: TurnId,
        doctor_id: impl Into<String>,
        doctor_name: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let sender = Sender::Doctor {
            doctor_id: doctor_id.into(),
            doctor_name: doctor_name.into(),
        };
        Self::new(id, sender, content, created_at)
    }

    pub fn system(id: TurnId, content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self::new(id, Sender::System, content, created_at)
    }

    pub fn id(&self) -> &TurnId {
        &self.id
    }

    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    pub fn sender_type(&self) -> SenderType {
        match self.sender {
            Sender::Patient => SenderType::Patient,
            Sender::Doctor { .. } => SenderType::Doctor,
            Sender::System => SenderType::System,
        }
    }

    pub fn doctor_id(&self) -> Option<&str> {
        match &self.sender {
            Sender::Doctor { doctor_id, .. } => Some(doctor_id),
            _ => None,
        }
    }

    pub fn doctor_name(&self) -> Option<&str> {
        match &self.sender {
            Sender::Doctor { doctor_name, .. } => Some(doctor_name),
            _ => None,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
