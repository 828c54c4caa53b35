//! Wire shapes of the consultation backend
//!
//! These mirror the JSON the backend actually sends and convert into domain
//! types at the boundary. Timestamps may arrive without an offset (naive
//! UTC), so they are parsed leniently.

use super::error::{HttpError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use consult_domain::{
    Consultation, ConsultationId, ConsultationRecord, ConsultationStatus, ConsultationSummary,
    SenderType, StepResult, Turn, TurnId,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ==================== Advance Step ====================

/// Body of `POST /{id}/step`
///
/// The backend either sets `error`, or sets `status` to one of
/// `completed` / `success` / `transition`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct StepResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub doctor_id: Option<Value>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StepResponse {
    pub(crate) fn into_step_result(self) -> StepResult {
        if let Some(error) = self.error {
            return StepResult::failure(error);
        }
        match self.status.as_deref() {
            Some("completed") => StepResult::Completed,
            Some("success") => {
                match (value_to_string(self.doctor_id), self.doctor_name, self.message) {
                    (Some(doctor_id), Some(doctor_name), Some(message)) => {
                        StepResult::doctor_spoke(doctor_id, doctor_name, message)
                    }
                    _ => StepResult::failure(
                        "Malformed step response: doctor turn without doctor_id, doctor_name or message",
                    ),
                }
            }
            Some("transition") => match self.message {
                Some(message) => StepResult::transition(message),
                None => StepResult::failure("Malformed step response: transition without message"),
            },
            Some(other) => StepResult::failure(format!("Unexpected step status '{}'", other)),
            None => StepResult::failure("Malformed step response: no status or error field"),
        }
    }
}

// ==================== Consultation Records ====================

#[derive(Debug, Deserialize)]
pub(crate) struct MessageDto {
    pub id: Value,
    pub sender_type: String,
    pub content: String,
    #[serde(default)]
    pub doctor_id: Option<Value>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(deserialize_with = "de_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl MessageDto {
    fn into_turn(self) -> Result<Turn> {
        let id = value_to_string(Some(self.id))
            .map(TurnId::server)
            .ok_or_else(|| HttpError::UnexpectedResponse("message without id".to_string()))?;
        let sender_type: SenderType = self
            .sender_type
            .parse()
            .map_err(|e: consult_domain::DomainError| HttpError::UnexpectedResponse(e.to_string()))?;
        Ok(match sender_type {
            SenderType::Patient => Turn::patient(id, self.content, self.created_at),
            SenderType::System => Turn::system(id, self.content, self.created_at),
            SenderType::Doctor => Turn::doctor(
                id,
                value_to_string(self.doctor_id).unwrap_or_default(),
                self.doctor_name.unwrap_or_else(|| "Doctor".to_string()),
                self.content,
                self.created_at,
            ),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryDto {
    pub id: Value,
    pub content: String,
    #[serde(default)]
    pub voting_details: Option<Value>,
    #[serde(default)]
    pub best_doctor_name: Option<String>,
    #[serde(deserialize_with = "de_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl From<SummaryDto> for ConsultationSummary {
    fn from(dto: SummaryDto) -> Self {
        Self {
            id: value_to_string(Some(dto.id)).unwrap_or_default(),
            content: dto.content,
            best_doctor_name: dto.best_doctor_name,
            voting_details: dto.voting_details,
            created_at: dto.created_at,
        }
    }
}

/// Consultation header, optionally with history (`GET /{id}` only)
#[derive(Debug, Deserialize)]
pub(crate) struct ConsultationDto {
    pub id: String,
    pub status: ConsultationStatus,
    #[serde(default)]
    pub patient_profile_id: Option<String>,
    #[serde(default = "default_triage_level")]
    pub triage_level: u8,
    #[serde(deserialize_with = "de_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub messages: Vec<MessageDto>,
    #[serde(default)]
    pub summary: Option<SummaryDto>,
    #[serde(default)]
    pub doctors_config: Option<Vec<Value>>,
}

fn default_triage_level() -> u8 {
    3
}

impl ConsultationDto {
    pub(crate) fn into_consultation(self) -> Result<Consultation> {
        Ok(self.into_record()?.consultation)
    }

    pub(crate) fn into_record(self) -> Result<ConsultationRecord> {
        let id = ConsultationId::new(self.id)
            .map_err(|e| HttpError::UnexpectedResponse(e.to_string()))?;
        let turns = self
            .messages
            .into_iter()
            .map(MessageDto::into_turn)
            .collect::<Result<Vec<_>>>()?;
        let consultation = Consultation {
            id,
            status: self.status,
            patient_profile_id: self.patient_profile_id,
            triage_level: self.triage_level,
            created_at: self.created_at,
            completed_at: self.completed_at,
            summary: self.summary.map(ConsultationSummary::from),
            doctors: self.doctors_config.unwrap_or_default(),
        };
        Ok(ConsultationRecord {
            consultation,
            turns,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TriageRequest<'a> {
    pub initial_problem: &'a str,
}

// ==================== Helpers ====================

/// Pull a human-readable description out of an error body.
///
/// The backend reports errors as `{"detail": "..."}`; validation errors put
/// a list under `detail` instead.
pub(crate) fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Ids may be strings or numbers depending on the panel configuration.
fn value_to_string(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn parse_timestamp(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    s.parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp '{}': {}", s, e))
}

fn de_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

fn de_opt_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_timestamp(&raw).map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn step(value: Value) -> StepResult {
        serde_json::from_value::<StepResponse>(value)
            .unwrap()
            .into_step_result()
    }

    #[test]
    fn test_step_success_is_doctor_spoke() {
        let result = step(json!({
            "status": "success",
            "message": "I suspect a migraine.",
            "doctor_name": "Dr. Chen",
            "doctor_id": "doc_1"
        }));
        assert_eq!(
            result,
            StepResult::doctor_spoke("doc_1", "Dr. Chen", "I suspect a migraine.")
        );
    }

    #[test]
    fn test_step_numeric_doctor_id() {
        let result = step(json!({
            "status": "success",
            "message": "ok",
            "doctor_name": "Dr. Two",
            "doctor_id": 2
        }));
        assert_eq!(result, StepResult::doctor_spoke("2", "Dr. Two", "ok"));
    }

    #[test]
    fn test_step_transition() {
        let result = step(json!({
            "status": "transition",
            "new_phase": "voting",
            "message": "All doctors have spoken. Entering evaluation phase."
        }));
        assert_eq!(
            result,
            StepResult::transition("All doctors have spoken. Entering evaluation phase.")
        );
    }

    #[test]
    fn test_step_completed_ignores_extra_fields() {
        let result = step(json!({
            "status": "completed",
            "summary": "Final verdict",
            "doctor_name": "Dr. Chen"
        }));
        assert_eq!(result, StepResult::Completed);
    }

    #[test]
    fn test_step_error_field_wins() {
        let result = step(json!({"error": "Consultation already finished or not found"}));
        assert_eq!(
            result,
            StepResult::failure("Consultation already finished or not found")
        );
    }

    #[test]
    fn test_step_bare_phase_status_is_failure() {
        let result = step(json!({"status": "voting"}));
        assert!(matches!(
            result,
            StepResult::Failure { description } if description.contains("'voting'")
        ));
    }

    #[test]
    fn test_step_success_missing_fields_is_failure() {
        let result = step(json!({"status": "success", "message": "orphan"}));
        assert!(result.is_terminal());
        assert!(matches!(result, StepResult::Failure { .. }));
    }

    #[test]
    fn test_full_record_conversion() {
        let dto: ConsultationDto = serde_json::from_value(json!({
            "id": "7f1c",
            "user_id": "u1",
            "status": "completed",
            "patient_profile_id": null,
            "triage_level": 2,
            "created_at": "2025-03-01T10:00:00.123456",
            "completed_at": "2025-03-01T10:05:00Z",
            "messages": [
                {"id": "m1", "sender_type": "patient", "content": "Headache",
                 "doctor_id": null, "doctor_name": null, "created_at": "2025-03-01T10:00:01"},
                {"id": "m2", "sender_type": "doctor", "content": "Hydrate",
                 "doctor_id": "doc_1", "doctor_name": "Dr. Chen", "created_at": "2025-03-01T10:00:02"},
                {"id": "m3", "sender_type": "system", "content": "Entering vote",
                 "created_at": "2025-03-01T10:00:03+00:00"}
            ],
            "summary": {"id": "s1", "content": "Tension headache", "best_doctor_name": "Dr. Chen",
                        "voting_details": null, "created_at": "2025-03-01T10:05:00"},
            "doctors_config": [{"id": "doc_1", "name": "Dr. Chen", "status": "active"}]
        }))
        .unwrap();

        let record = dto.into_record().unwrap();

        assert_eq!(record.consultation.id.as_str(), "7f1c");
        assert_eq!(record.consultation.status, ConsultationStatus::Completed);
        assert_eq!(record.consultation.triage_level, 2);
        assert!(record.consultation.completed_at.is_some());
        assert_eq!(record.consultation.doctors.len(), 1);
        assert_eq!(
            record.consultation.summary.as_ref().map(|s| s.content.as_str()),
            Some("Tension headache")
        );

        let kinds: Vec<_> = record.turns.iter().map(|t| t.sender_type()).collect();
        assert_eq!(
            kinds,
            vec![SenderType::Patient, SenderType::Doctor, SenderType::System]
        );
        assert_eq!(record.turns[1].doctor_name(), Some("Dr. Chen"));
        assert_eq!(record.turns[1].id(), &TurnId::server("m2"));
    }

    #[test]
    fn test_header_without_messages() {
        let dto: ConsultationDto = serde_json::from_value(json!({
            "id": "abc",
            "status": "triage",
            "created_at": "2025-03-01T10:00:00"
        }))
        .unwrap();
        let consultation = dto.into_consultation().unwrap();
        assert_eq!(consultation.triage_level, 3);
        assert!(consultation.summary.is_none());
    }

    #[test]
    fn test_unknown_sender_type_is_rejected() {
        let dto: ConsultationDto = serde_json::from_value(json!({
            "id": "abc",
            "status": "discussing",
            "created_at": "2025-03-01T10:00:00",
            "messages": [{"id": "m1", "sender_type": "nurse", "content": "hi",
                          "created_at": "2025-03-01T10:00:00"}]
        }))
        .unwrap();
        assert!(matches!(
            dto.into_record(),
            Err(HttpError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_error_detail_extraction() {
        assert_eq!(
            error_detail(r#"{"detail": "Not authorized"}"#),
            Some("Not authorized".to_string())
        );
        assert!(error_detail(r#"{"detail": [{"msg": "field required"}]}"#)
            .unwrap()
            .contains("field required"));
        assert_eq!(error_detail("<html>Bad Gateway</html>"), None);
    }

    #[test]
    fn test_parse_timestamp_variants() {
        assert!(parse_timestamp("2025-03-01T10:00:00Z").is_ok());
        assert!(parse_timestamp("2025-03-01T10:00:00.5").is_ok());
        assert!(parse_timestamp("2025-03-01T10:00:00+08:00").is_ok());
        assert!(parse_timestamp("yesterday").is_err());
    }
}
