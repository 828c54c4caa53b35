//! Per-consultation JSONL transcript files.
//!
//! Every event whose payload names a `consultation_id` is appended to
//! `<dir>/<consultation id>.transcript.jsonl`, so each consultation keeps
//! one log across runs and process restarts.

use consult_application::{TranscriptEvent, TranscriptLogger};
use consult_domain::ConsultationId;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Transcript logger writing one JSONL file per consultation.
///
/// Files are created lazily on the first event for a consultation and stay
/// open until the logger is dropped.
pub struct JsonlTranscriptLogger {
    dir: PathBuf,
    files: Mutex<HashMap<ConsultationId, BufWriter<File>>>,
}

impl JsonlTranscriptLogger {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<consultation id>.transcript.jsonl`
    pub fn path_for(&self, consultation_id: &ConsultationId) -> PathBuf {
        self.dir.join(format!("{}.transcript.jsonl", consultation_id))
    }

    fn open(&self, consultation_id: &ConsultationId) -> io::Result<BufWriter<File>> {
        std::fs::create_dir_all(&self.dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_for(consultation_id))?;
        Ok(BufWriter::new(file))
    }
}

/// The payload's `consultation_id`, when it is a valid id.
fn routing_id(payload: &Value) -> Option<ConsultationId> {
    payload
        .get("consultation_id")
        .and_then(Value::as_str)
        .and_then(|s| ConsultationId::new(s).ok())
}

/// One JSON line: the payload fields plus `type` and `timestamp`.
fn to_record(event: TranscriptEvent) -> Value {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    let mut record = match event.payload {
        Value::Object(map) => map,
        other => Map::from_iter([("data".to_string(), other)]),
    };
    record.insert("type".to_string(), Value::from(event.event_type));
    record.insert("timestamp".to_string(), Value::from(timestamp));
    Value::Object(record)
}

impl TranscriptLogger for JsonlTranscriptLogger {
    fn log(&self, event: TranscriptEvent) {
        let Some(consultation_id) = routing_id(&event.payload) else {
            debug!(event = event.event_type, "Transcript event without consultation id, skipped");
            return;
        };
        let Ok(line) = serde_json::to_string(&to_record(event)) else {
            return;
        };

        let Ok(mut files) = self.files.lock() else {
            return;
        };
        if !files.contains_key(&consultation_id) {
            match self.open(&consultation_id) {
                Ok(writer) => {
                    files.insert(consultation_id.clone(), writer);
                }
                Err(e) => {
                    warn!(
                        consultation_id = %consultation_id,
                        "Could not open transcript log in {}: {}",
                        self.dir.display(),
                        e
                    );
                    return;
                }
            }
        }

        if let Some(writer) = files.get_mut(&consultation_id)
            && let Err(e) = writeln!(writer, "{}", line).and_then(|()| writer.flush())
        {
            warn!(consultation_id = %consultation_id, "Transcript log write failed: {}", e);
        }
    }
}

impl Drop for JsonlTranscriptLogger {
    fn drop(&mut self) {
        if let Ok(files) = self.files.get_mut() {
            for writer in files.values_mut() {
                let _ = writer.flush();
            }
        }
    }
}
