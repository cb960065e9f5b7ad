use crate::phase::Phase;
use chrono::{DateTime, Local};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Most recent answers kept for review; older records are dropped.
pub const MAX_RECORDS: usize = 500;

/// One answered (or skipped) question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: String,
    pub zone: String,
    pub phase: Phase,
    /// Index of the chosen option, or -1 for a timeout/skip.
    pub selected: i32,
    pub correct: bool,
    pub elapsed_ms: u64,
    pub timestamp: DateTime<Local>,
    /// How many trap tags the learner flagged correctly, when the question
    /// carries them.
    pub trap_tags_correct: Option<u32>,
}

/// Per-phase answer aggregates for the review screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseSummary {
    pub phase: Phase,
    pub attempts: usize,
    pub correct: usize,
    pub accuracy_pct: f64,
    pub mean_elapsed_ms: f64,
    pub elapsed_std_dev_ms: f64,
}

/// Bounded append-only answer history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerLedger {
    records: Vec<AnswerRecord>,
}

fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

fn std_dev(data: &[f64]) -> Option<f64> {
    let m = mean(data)?;
    let variance = data.iter().map(|v| (m - v) * (m - v)).sum::<f64>() / data.len() as f64;
    Some(variance.sqrt())
}

impl AnswerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<AnswerRecord>) -> Self {
        let mut ledger = Self { records };
        ledger.truncate_oldest();
        ledger
    }

    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append one record, dropping the oldest entries beyond the cap.
    pub fn record(&mut self, record: AnswerRecord) {
        self.records.push(record);
        self.truncate_oldest();
    }

    fn truncate_oldest(&mut self) {
        if self.records.len() > MAX_RECORDS {
            let overflow = self.records.len() - MAX_RECORDS;
            self.records.drain(..overflow);
        }
    }

    /// Overall accuracy percent across the retained window, None when empty.
    pub fn accuracy(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let correct = self.records.iter().filter(|r| r.correct).count();
        Some(correct as f64 / self.records.len() as f64 * 100.0)
    }

    /// Aggregates per phase, ordered by the fixed phase ordering.
    pub fn phase_summary(&self) -> Vec<PhaseSummary> {
        self.records
            .iter()
            .map(|r| (r.phase, r))
            .into_group_map()
            .into_iter()
            .map(|(phase, records)| {
                let attempts = records.len();
                let correct = records.iter().filter(|r| r.correct).count();
                let times: Vec<f64> = records.iter().map(|r| r.elapsed_ms as f64).collect();
                PhaseSummary {
                    phase,
                    attempts,
                    correct,
                    accuracy_pct: correct as f64 / attempts as f64 * 100.0,
                    mean_elapsed_ms: mean(&times).unwrap_or(0.0),
                    elapsed_std_dev_ms: std_dev(&times).unwrap_or(0.0),
                }
            })
            .sorted_by_key(|s| s.phase.index())
            .collect()
    }

    /// Write the retained window as CSV, newest last.
    pub fn export_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record([
            "timestamp",
            "zone",
            "phase",
            "question_id",
            "selected",
            "correct",
            "elapsed_ms",
            "trap_tags_correct",
        ])?;
        for r in &self.records {
            wtr.write_record([
                r.timestamp.to_rfc3339(),
                r.zone.clone(),
                r.phase.to_string(),
                r.question_id.clone(),
                r.selected.to_string(),
                r.correct.to_string(),
                r.elapsed_ms.to_string(),
                r.trap_tags_correct.map_or(String::new(), |n| n.to_string()),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}
