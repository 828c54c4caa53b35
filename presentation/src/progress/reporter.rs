//! Progress reporting for consultation runs

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use consult_application::{RunObserver, RunOutcome};
use consult_domain::{ConsultationId, Sender, Turn};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Reports progress with a spinner; turns are printed above it as they arrive
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
    turns: AtomicUsize,
    hidden: bool,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            turns: AtomicUsize::new(0),
            hidden: false,
        }
    }

    /// Reporter that tracks state but draws nothing
    pub fn hidden() -> Self {
        Self {
            hidden: true,
            ..Self::new()
        }
    }

    /// Turns seen during the current (or last) run
    pub fn turn_count(&self) -> usize {
        self.turns.load(Ordering::Relaxed)
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn waiting_message(turn: &Turn) -> String {
        match turn.sender() {
            Sender::Doctor { doctor_name, .. } => format!("{} finished, waiting for the panel", doctor_name),
            Sender::System => "Panel is changing phase".to_string(),
            Sender::Patient => "Waiting for the panel".to_string(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RunObserver for ProgressReporter {
    fn on_run_started(&self, consultation_id: &ConsultationId) {
        self.turns.store(0, Ordering::Relaxed);

        let pb = if self.hidden {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
        } else {
            ProgressBar::new_spinner()
        };
        pb.set_style(Self::spinner_style());
        pb.set_prefix(consultation_id.to_string());
        pb.set_message("Waiting for the panel");
        pb.enable_steady_tick(Duration::from_millis(120));

        *self.spinner.lock().unwrap_or_else(PoisonError::into_inner) = Some(pb);
    }

    fn on_turn_appended(&self, turn: &Turn) {
        let count = self.turns.fetch_add(1, Ordering::Relaxed) + 1;
        let guard = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(pb) => {
                pb.println(format!("\n{}", ConsoleFormatter::format_turn(turn)));
                pb.set_message(format!("{} ({} turns)", Self::waiting_message(turn), count));
            }
            None => println!("\n{}", ConsoleFormatter::format_turn(turn)),
        }
    }

    fn on_run_settled(&self, _consultation_id: &ConsultationId, outcome: &RunOutcome) {
        if let Some(pb) = self
            .spinner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            let message = match outcome {
                RunOutcome::Completed => "Panel finished".green().to_string(),
                RunOutcome::Failed(_) => "Stopped on error".red().to_string(),
                RunOutcome::Cancelled => "Cancelled".yellow().to_string(),
                RunOutcome::AlreadyRunning => "Already running".yellow().to_string(),
            };
            pb.finish_with_message(message);
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl RunObserver for SimpleProgress {
    fn on_run_started(&self, consultation_id: &ConsultationId) {
        println!(
            "{} {} {}",
            "->".cyan(),
            "Consultation".bold(),
            consultation_id
        );
    }

    fn on_turn_appended(&self, turn: &Turn) {
        println!("\n{}", ConsoleFormatter::format_turn(turn));
    }

    fn on_run_settled(&self, _consultation_id: &ConsultationId, outcome: &RunOutcome) {
        print!("{}", ConsoleFormatter::format_outcome(outcome));
    }
}
