//! Triage and emergency guidance value objects
//!
//! These are plain request/response payloads: they carry no orchestration
//! state and are never part of a transcript.

use serde::{Deserialize, Serialize};

/// Pre-consultation severity assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageAssessment {
    /// 1 (mild) to 5 (critical)
    pub severity: u8,
    /// Recommended department
    pub department: String,
    pub is_emergency: bool,
    pub emergency_advice: Option<String>,
    #[serde(default)]
    pub risks: Vec<String>,
    pub summary: String,
}

impl TriageAssessment {
    /// Severity clamped to the documented 1..=5 range.
    pub fn severity_level(&self) -> u8 {
        self.severity.clamp(1, 5)
    }
}

/// One action in an emergency guide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyStep {
    pub index: u32,
    pub action: String,
    pub detail: String,
}

/// First-aid guidance generated for a specific consultation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyGuide {
    pub title: String,
    pub steps: Vec<EmergencyStep>,
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Things the patient must not do
    #[serde(default)]
    pub prohibited: Vec<String>,
}

impl EmergencyGuide {
    /// Steps sorted by their declared index.
    pub fn ordered_steps(&self) -> Vec<&EmergencyStep> {
        let mut steps: Vec<_> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.index);
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triage_deserialize_defaults() {
        let json = r#"{
            "severity": 4,
            "department": "Cardiology",
            "is_emergency": true,
            "summary": "Chest pain with radiation"
        }"#;
        let triage: TriageAssessment = serde_json::from_str(json).unwrap();
        assert_eq!(triage.severity_level(), 4);
        assert!(triage.risks.is_empty());
        assert!(triage.emergency_advice.is_none());
    }

    #[test]
    fn test_severity_is_clamped() {
        let triage = TriageAssessment {
            severity: 9,
            department: "ER".to_string(),
            is_emergency: true,
            emergency_advice: None,
            risks: vec![],
            summary: String::new(),
        };
        assert_eq!(triage.severity_level(), 5);
    }

    #[test]
    fn test_emergency_steps_ordered() {
        let guide = EmergencyGuide {
            title: "Burn care".to_string(),
            steps: vec![
                EmergencyStep {
                    index: 2,
                    action: "Cover".to_string(),
                    detail: "Use a clean cloth".to_string(),
                },
                EmergencyStep {
                    index: 1,
                    action: "Cool".to_string(),
                    detail: "Run cool water for 20 minutes".to_string(),
                },
            ],
            warnings: vec![],
            prohibited: vec!["Do not apply ice".to_string()],
        };
        let actions: Vec<_> = guide.ordered_steps().iter().map(|s| s.action.as_str()).collect();
        assert_eq!(actions, vec!["Cool", "Cover"]);
    }
}
