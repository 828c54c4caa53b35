//! Console output formatter for consultations

use colored::Colorize;
use consult_application::RunOutcome;
use consult_domain::{
    Consultation, ConsultationSummary, EmergencyGuide, Sender, TriageAssessment, Turn,
    core::text::preview,
};
use serde::Serialize;

/// Characters of the problem shown per row in `history`
const HISTORY_PREVIEW: usize = 60;

/// Formats consultations, transcripts and backend replies for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete consultation: header, transcript, outcome, summary
    pub fn format(
        consultation: Option<&Consultation>,
        turns: &[Turn],
        outcome: Option<&RunOutcome>,
    ) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Panel Consultation"));
        output.push('\n');

        if let Some(c) = consultation {
            output.push_str(&format!("{} {}\n", "Consultation:".cyan().bold(), c.id));
            output.push_str(&format!(
                "{} {}  {} {}\n",
                "Status:".cyan().bold(),
                c.status,
                "Triage level:".cyan().bold(),
                c.triage_level
            ));
        }

        output.push_str(&Self::section_header("Transcript"));
        output.push_str(&Self::format_transcript(turns));

        if let Some(outcome) = outcome {
            output.push_str(&Self::format_outcome(outcome));
        }

        if let Some(summary) = consultation.and_then(|c| c.summary.as_ref()) {
            output.push_str(&Self::section_header("Panel Summary"));
            output.push_str(&Self::format_summary(summary));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(
        consultation: Option<&Consultation>,
        turns: &[Turn],
        outcome: Option<&RunOutcome>,
    ) -> String {
        let value = serde_json::json!({
            "consultation": consultation,
            "turns": turns,
            "outcome": outcome,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Pretty JSON for any backend reply (triage, guide, history)
    pub fn format_value_json<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the transcript only, one block per turn
    pub fn format_transcript(turns: &[Turn]) -> String {
        if turns.is_empty() {
            return format!("{}\n", "(no messages yet)".dimmed());
        }
        turns
            .iter()
            .map(|turn| format!("\n{}\n", Self::format_turn(turn)))
            .collect()
    }

    /// Format a single turn
    pub fn format_turn(turn: &Turn) -> String {
        match turn.sender() {
            Sender::Patient => format!(
                "{}\n{}",
                "── Patient ──".green().bold(),
                Self::indent(turn.content(), "  ")
            ),
            Sender::Doctor { doctor_name, .. } => format!(
                "{}\n{}",
                format!("── {} ──", doctor_name).yellow().bold(),
                Self::indent(turn.content(), "  ")
            ),
            Sender::System => format!("{} {}", "»".cyan(), turn.content().cyan().italic()),
        }
    }

    pub fn format_outcome(outcome: &RunOutcome) -> String {
        match outcome {
            RunOutcome::Completed => format!("\n{}\n", "Consultation completed.".green().bold()),
            RunOutcome::Failed(error) => {
                format!("\n{} {}\n", "Consultation stopped:".red().bold(), error)
            }
            RunOutcome::Cancelled => format!("\n{}\n", "Cancelled.".yellow().bold()),
            RunOutcome::AlreadyRunning => format!(
                "\n{}\n",
                "A run is already in progress for this session.".yellow()
            ),
        }
    }

    pub fn format_summary(summary: &ConsultationSummary) -> String {
        let mut output = String::new();
        if let Some(best) = &summary.best_doctor_name {
            output.push_str(&format!("{} {}\n\n", "Most helpful:".cyan().bold(), best));
        }
        output.push_str(&summary.content);
        output.push('\n');
        output
    }

    pub fn format_triage(triage: &TriageAssessment) -> String {
        let mut output = String::new();
        let level = triage.severity_level();
        let severity = format!("{}/5", level);
        let severity = match level {
            4..=5 => severity.red().bold(),
            3 => severity.yellow().bold(),
            _ => severity.green().bold(),
        };

        output.push_str(&Self::header("Triage"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Severity:".cyan().bold(), severity));
        output.push_str(&format!(
            "{} {}\n",
            "Department:".cyan().bold(),
            triage.department
        ));

        if triage.is_emergency {
            output.push_str(&format!("\n{}\n", "EMERGENCY".red().bold().reversed()));
            if let Some(advice) = &triage.emergency_advice {
                output.push_str(&format!("{}\n", advice.red()));
            }
        }

        output.push_str(&format!("\n{}\n", triage.summary));

        if !triage.risks.is_empty() {
            output.push_str(&format!("\n{}\n", "Risks:".yellow().bold()));
            for risk in &triage.risks {
                output.push_str(&format!("  * {}\n", risk));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    pub fn format_emergency_guide(guide: &EmergencyGuide) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&guide.title));
        output.push('\n');

        for step in guide.ordered_steps() {
            output.push_str(&format!(
                "\n{} {}\n{}\n",
                format!("{}.", step.index).cyan().bold(),
                step.action.bold(),
                Self::indent(&step.detail, "   ")
            ));
        }

        if !guide.warnings.is_empty() {
            output.push_str(&format!("\n{}\n", "Warnings:".yellow().bold()));
            for warning in &guide.warnings {
                output.push_str(&format!("  ! {}\n", warning));
            }
        }

        if !guide.prohibited.is_empty() {
            output.push_str(&format!("\n{}\n", "Do NOT:".red().bold()));
            for item in &guide.prohibited {
                output.push_str(&format!("  x {}\n", item));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// One line per consultation, newest first
    pub fn format_history(consultations: &[Consultation]) -> String {
        if consultations.is_empty() {
            return format!("{}\n", "No consultations yet.".dimmed());
        }

        let mut sorted: Vec<&Consultation> = consultations.iter().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        sorted
            .into_iter()
            .map(|c| {
                let status = if c.status.is_finished() {
                    c.status.as_str().green()
                } else {
                    c.status.as_str().yellow()
                };
                let summary = c
                    .summary
                    .as_ref()
                    .map(|s| preview(&s.content, HISTORY_PREVIEW))
                    .unwrap_or_default();
                format!(
                    "{}  {:<11} {}  {}\n",
                    c.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
                    status,
                    c.id,
                    summary
                )
            })
            .collect()
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
