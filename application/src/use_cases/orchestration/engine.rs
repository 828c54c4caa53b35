//! Consultation Orchestration Engine
//!
//! Drives one consultation at a time by calling the step client in a loop,
//! appending each doctor speech or phase announcement to the transcript
//! until the backend reports completion or failure, or the caller cancels.
//!
//! The loop is a sequence of suspend points: one per step call and one per
//! pacing pause. Transcript writes happen between suspend points under a
//! short lock, so readers always see whole turns.

use super::state::{EngineStatus, RunOutcome, RunState};
use crate::config::EngineConfig;
use crate::ports::consultation_gateway::{ConsultationGateway, GatewayError};
use crate::ports::pacer::{Pacer, TokioPacer};
use crate::ports::run_observer::{NoRunObserver, RunObserver};
use crate::ports::step_client::StepClient;
use crate::ports::transcript_logger::{NoTranscriptLogger, TranscriptEvent, TranscriptLogger};
use chrono::Utc;
use consult_domain::core::text::preview;
use consult_domain::{
    Consultation, ConsultationId, ConsultationRecord, ConsultationSummary, StepResult, Transcript,
    Turn, TurnId,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors from engine operations other than `run`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("A consultation run is already in progress for {0}")]
    RunInProgress(ConsultationId),
}

/// Data the engine caches for the consultation it is bound to
#[derive(Debug, Default)]
struct BoundRecord {
    consultation_id: Option<ConsultationId>,
    consultation: Option<Consultation>,
    transcript: Transcript,
}

impl BoundRecord {
    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Orchestration engine for a single active consultation
///
/// Share it behind an `Arc`: `run` borrows `&self`, so another task can
/// read the transcript or call `cancel` while a run is in flight.
pub struct ConsultationEngine<S: StepClient + 'static, G: ConsultationGateway + 'static> {
    step_client: Arc<S>,
    gateway: Arc<G>,
    pacer: Arc<dyn Pacer>,
    observer: Arc<dyn RunObserver>,
    transcript_logger: Arc<dyn TranscriptLogger>,
    config: EngineConfig,
    state: Mutex<RunState>,
    record: RwLock<BoundRecord>,
    next_local_id: AtomicU64,
}

impl<S: StepClient + 'static, G: ConsultationGateway + 'static> ConsultationEngine<S, G> {
    pub fn new(step_client: Arc<S>, gateway: Arc<G>) -> Self {
        Self {
            step_client,
            gateway,
            pacer: Arc::new(TokioPacer),
            observer: Arc::new(NoRunObserver),
            transcript_logger: Arc::new(NoTranscriptLogger),
            config: EngineConfig::default(),
            state: Mutex::new(RunState::default()),
            record: RwLock::new(BoundRecord::default()),
            next_local_id: AtomicU64::new(1),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_transcript_logger(mut self, logger: Arc<dyn TranscriptLogger>) -> Self {
        self.transcript_logger = logger;
        self
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ==================== Read Side ====================

    pub fn status(&self) -> EngineStatus {
        lock(&self.state).status()
    }

    pub fn is_running(&self) -> bool {
        lock(&self.state).is_running()
    }

    /// Description carried by the last `Failure`, if the last run failed.
    pub fn last_error(&self) -> Option<String> {
        lock(&self.state).last_error().map(str::to_string)
    }

    /// Ordered copy of the transcript. Safe to call mid-run.
    pub fn transcript(&self) -> Vec<Turn> {
        read(&self.record).transcript.snapshot()
    }

    pub fn transcript_len(&self) -> usize {
        read(&self.record).transcript.len()
    }

    pub fn consultation(&self) -> Option<Consultation> {
        read(&self.record).consultation.clone()
    }

    pub fn consultation_id(&self) -> Option<ConsultationId> {
        read(&self.record).consultation_id.clone()
    }

    pub fn summary(&self) -> Option<ConsultationSummary> {
        read(&self.record)
            .consultation
            .as_ref()
            .and_then(|c| c.summary.clone())
    }

    // ==================== Record Installation ====================

    /// Bind to a freshly created consultation, seeding the transcript with
    /// the patient's opening problem.
    pub fn begin_consultation(
        &self,
        consultation: Consultation,
        initial_problem: &str,
    ) -> Result<Turn, EngineError> {
        let mut state = lock(&self.state);
        if let Some(id) = running_id(&state) {
            return Err(EngineError::RunInProgress(id));
        }
        state.rebind(&consultation.id);
        let opening = Turn::patient(self.next_turn_id(), initial_problem, Utc::now());
        let mut record = write(&self.record);
        record.consultation_id = Some(consultation.id.clone());
        record.consultation = Some(consultation);
        record.transcript.replace_all(vec![opening.clone()]);
        Ok(opening)
    }

    /// Initial wholesale load of a persisted consultation.
    pub fn load_record(&self, loaded: ConsultationRecord) -> Result<(), EngineError> {
        let mut state = lock(&self.state);
        if let Some(id) = running_id(&state) {
            return Err(EngineError::RunInProgress(id));
        }
        state.rebind(&loaded.consultation.id);
        self.install(loaded);
        Ok(())
    }

    /// Explicit terminal → Idle reset that also forgets the bound record.
    ///
    /// Returns `false` (and changes nothing) while a run is in progress.
    pub fn reset(&self) -> bool {
        let mut state = lock(&self.state);
        if !state.reset() {
            return false;
        }
        write(&self.record).clear();
        true
    }

    // ==================== Run Loop ====================

    /// Request cooperative cancellation of the active run.
    ///
    /// The in-flight step call is allowed to finish; the loop stops after
    /// processing its result. Returns whether a run was signalled.
    pub fn cancel(&self) -> bool {
        let signalled = lock(&self.state).cancel();
        if signalled {
            info!("Cancellation requested");
        }
        signalled
    }

    /// Drive the consultation until a terminal step result or cancellation.
    ///
    /// Single-flight: while a run is active, further calls return
    /// [`RunOutcome::AlreadyRunning`] without touching any state.
    pub async fn run(&self, consultation_id: &ConsultationId) -> RunOutcome {
        let Some(cancel) = self.begin_run(consultation_id) else {
            debug!(consultation_id = %consultation_id, "Run already in progress, ignoring");
            return RunOutcome::AlreadyRunning;
        };
        let mut guard = SettleOnDrop::new(self, consultation_id);

        info!(consultation_id = %consultation_id, "Consultation run started");
        self.observer.on_run_started(consultation_id);

        let outcome = self.drive(consultation_id, &cancel).await;

        self.settle(consultation_id, &outcome);
        guard.disarm();
        outcome
    }

    fn begin_run(&self, consultation_id: &ConsultationId) -> Option<CancellationToken> {
        let mut state = lock(&self.state);
        if state.status().is_terminal() {
            debug!(previous = %state.status(), "Resetting engine to idle before new run");
        }
        let cancel = state.begin(consultation_id)?;

        let mut record = write(&self.record);
        if record
            .consultation_id
            .as_ref()
            .is_some_and(|bound| bound != consultation_id)
        {
            debug!(consultation_id = %consultation_id, "Switching consultation, clearing transcript");
            record.clear();
        }
        record.consultation_id = Some(consultation_id.clone());
        Some(cancel)
    }

    async fn drive(&self, consultation_id: &ConsultationId, cancel: &CancellationToken) -> RunOutcome {
        let mut step: u64 = 0;
        loop {
            step += 1;
            let result = self.step_client.advance_step(consultation_id).await;
            debug!(consultation_id = %consultation_id, step, kind = result.kind(), "Step returned");

            match result {
                StepResult::Completed => return self.reload(consultation_id).await,
                StepResult::Failure { description } => {
                    warn!(consultation_id = %consultation_id, step, "Step failed: {}", description);
                    return RunOutcome::Failed(description);
                }
                StepResult::DoctorSpoke {
                    doctor_id,
                    doctor_name,
                    message,
                } => {
                    let turn = Turn::doctor(
                        self.next_turn_id(),
                        doctor_id,
                        doctor_name,
                        message,
                        Utc::now(),
                    );
                    self.append(consultation_id, turn);
                }
                StepResult::PhaseTransition { announcement } => {
                    let turn = Turn::system(self.next_turn_id(), announcement, Utc::now());
                    self.append(consultation_id, turn);
                }
            }

            if cancel.is_cancelled() {
                return RunOutcome::Cancelled;
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return RunOutcome::Cancelled,
                _ = self.pacer.pause(self.config.pacing) => {}
            }
        }
    }

    fn append(&self, consultation_id: &ConsultationId, turn: Turn) {
        write(&self.record).transcript.append(turn.clone());

        debug!(
            turn = %turn.id(),
            sender = %turn.sender_type(),
            "Turn appended: {}",
            preview(turn.content(), 80)
        );
        self.observer.on_turn_appended(&turn);
        self.transcript_logger.log(TranscriptEvent::new(
            "turn_appended",
            serde_json::json!({
                "consultation_id": consultation_id,
                "turn": turn,
            }),
        ));
    }

    /// Authoritative reload after the backend reports completion.
    async fn reload(&self, consultation_id: &ConsultationId) -> RunOutcome {
        match self.gateway.load_consultation(consultation_id).await {
            Ok(loaded) => {
                let turns = loaded.turns.clone();
                self.install(loaded);
                info!(
                    consultation_id = %consultation_id,
                    turns = turns.len(),
                    "Consultation completed, transcript reloaded"
                );
                self.observer.on_transcript_reloaded(&turns);
                self.transcript_logger.log(TranscriptEvent::new(
                    "transcript_reloaded",
                    serde_json::json!({
                        "consultation_id": consultation_id,
                        "turns": turns,
                    }),
                ));
                RunOutcome::Completed
            }
            Err(e) => {
                warn!(consultation_id = %consultation_id, "Reload after completion failed: {}", e);
                RunOutcome::Failed(reload_error(&e))
            }
        }
    }

    fn install(&self, loaded: ConsultationRecord) {
        let mut record = write(&self.record);
        record.consultation_id = Some(loaded.consultation.id.clone());
        record.consultation = Some(loaded.consultation);
        record.transcript.replace_all(loaded.turns);
    }

    fn settle(&self, consultation_id: &ConsultationId, outcome: &RunOutcome) {
        lock(&self.state).settle(outcome);

        info!(
            consultation_id = %consultation_id,
            outcome = ?outcome,
            turns = self.transcript_len(),
            "Consultation run settled"
        );
        self.transcript_logger.log(TranscriptEvent::new(
            "run_settled",
            serde_json::json!({
                "consultation_id": consultation_id,
                "result": outcome,
            }),
        ));
        self.observer.on_run_settled(consultation_id, outcome);
    }

    fn next_turn_id(&self) -> TurnId {
        TurnId::Local(self.next_local_id.fetch_add(1, Ordering::Relaxed))
    }
}

fn reload_error(e: &GatewayError) -> String {
    format!("Failed to reload consultation: {}", e)
}

fn running_id(state: &RunState) -> Option<ConsultationId> {
    if state.is_running() {
        state.consultation_id().cloned()
    } else {
        None
    }
}

/// Settles the run as `Cancelled` if its future is dropped mid-loop, so an
/// abandoned run never leaves the engine stuck in `Running`. Observers and
/// the transcript log see the settlement like any other.
struct SettleOnDrop<'a, S: StepClient + 'static, G: ConsultationGateway + 'static> {
    engine: &'a ConsultationEngine<S, G>,
    consultation_id: &'a ConsultationId,
    armed: bool,
}

impl<'a, S: StepClient + 'static, G: ConsultationGateway + 'static> SettleOnDrop<'a, S, G> {
    fn new(engine: &'a ConsultationEngine<S, G>, consultation_id: &'a ConsultationId) -> Self {
        Self {
            engine,
            consultation_id,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<S: StepClient + 'static, G: ConsultationGateway + 'static> Drop for SettleOnDrop<'_, S, G> {
    fn drop(&mut self) {
        if self.armed {
            debug!(consultation_id = %self.consultation_id, "Run dropped before settling");
            self.engine.settle(self.consultation_id, &RunOutcome::Cancelled);
        }
    }
}

// Poisoning only happens if an observer panicked mid-callback; the guarded
// data is still consistent because every write is a single push or swap.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
