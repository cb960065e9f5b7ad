use crate::config::GameConfig;
use crate::ledger::{AnswerLedger, AnswerRecord};
use crate::persist::{Snapshot, SnapshotStore};
use crate::phase::Phase;
use crate::progress::{PhaseProgress, ProgressError, ProgressionGraph, UserStats, ZoneProgress};
use crate::scoring::ScoringEngine;
use crate::streak::SessionStreak;
use crate::zones::ZoneDescriptor;
use chrono::Local;

/// One submitted answer as reported by the host UI.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerEvent {
    pub question_id: String,
    pub zone: String,
    pub phase: Phase,
    /// Index of the chosen option, or -1 for a timeout/skip.
    pub selected: i32,
    pub correct: bool,
    pub elapsed_ms: u64,
    pub trap_tags_correct: Option<u32>,
}

/// Rewards granted for one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub xp: u32,
    pub coins: u32,
    /// Session multiplier in effect when the answer was scored.
    pub multiplier: u32,
}

/// Owning aggregate over scoring, progression, the answer ledger, and the
/// session streak. Constructed exactly where the host wants it and passed
/// by reference; configuration is required up front, so no operation can
/// run unconfigured.
///
/// Every mutation ends with a best-effort snapshot save: a failed write is
/// dropped on the floor rather than interrupting play.
pub struct GameStore {
    scoring: ScoringEngine,
    progress: ProgressionGraph,
    ledger: AnswerLedger,
    session: SessionStreak,
    snapshots: Box<dyn SnapshotStore>,
}

impl GameStore {
    /// Restore from the injected snapshot store when a snapshot exists,
    /// otherwise initialize fresh state from the config and zone catalog.
    /// The session streak always starts at zero.
    pub fn new(
        config: GameConfig,
        catalog: &[ZoneDescriptor],
        snapshots: Box<dyn SnapshotStore>,
    ) -> Self {
        let session = SessionStreak::new(config.streak_tiers.clone());
        let (progress, ledger) = match snapshots.load() {
            Some(snapshot) => (
                ProgressionGraph::restore(
                    config.clone(),
                    catalog,
                    snapshot.stats,
                    snapshot.zones,
                ),
                AnswerLedger::from_records(snapshot.answers),
            ),
            None => (
                ProgressionGraph::new(config.clone(), catalog),
                AnswerLedger::new(),
            ),
        };
        Self {
            scoring: ScoringEngine::new(config),
            progress,
            ledger,
            session,
            snapshots,
        }
    }

    pub fn scoring(&self) -> &ScoringEngine {
        &self.scoring
    }

    pub fn stats(&self) -> &UserStats {
        self.progress.stats()
    }

    pub fn zones(&self) -> &[ZoneProgress] {
        self.progress.zones()
    }

    pub fn zone_progress(&self, slug: &str) -> Result<&ZoneProgress, ProgressError> {
        self.progress.zone_progress(slug)
    }

    pub fn phase_progress(&self, slug: &str, phase: Phase) -> Result<&PhaseProgress, ProgressError> {
        self.progress.phase_progress(slug, phase)
    }

    pub fn ledger(&self) -> &AnswerLedger {
        &self.ledger
    }

    pub fn session_streak(&self) -> &SessionStreak {
        &self.session
    }

    /// Score one answer and apply its rewards: bump or break the session
    /// streak, credit XP and coins, append to the ledger.
    pub fn submit_answer(&mut self, event: AnswerEvent) -> AnswerOutcome {
        if event.correct {
            self.session.increment();
        } else {
            self.session.reset();
        }
        let multiplier = self.session.multiplier();
        let xp = self
            .scoring
            .xp(event.phase, event.correct, multiplier, Some(event.elapsed_ms));
        let coins = self.scoring.coins(event.phase, event.correct);

        self.progress.add_xp(xp);
        self.progress.add_coins(coins);
        self.ledger.record(AnswerRecord {
            question_id: event.question_id,
            zone: event.zone,
            phase: event.phase,
            selected: event.selected,
            correct: event.correct,
            elapsed_ms: event.elapsed_ms,
            timestamp: Local::now(),
            trap_tags_correct: event.trap_tags_correct,
        });
        self.persist();

        AnswerOutcome {
            xp,
            coins,
            multiplier,
        }
    }

    /// Append a pre-built record to the ledger without scoring it, for
    /// callers that computed rewards themselves.
    pub fn record_answer(&mut self, record: AnswerRecord) {
        self.ledger.record(record);
        self.persist();
    }

    pub fn start_phase(&mut self, slug: &str, phase: Phase) -> Result<(), ProgressError> {
        self.progress.start_phase(slug, phase)?;
        self.persist();
        Ok(())
    }

    pub fn complete_phase(
        &mut self,
        slug: &str,
        phase: Phase,
        score_percent: u32,
    ) -> Result<PhaseProgress, ProgressError> {
        let result = self.progress.complete_phase(slug, phase, score_percent)?;
        self.persist();
        Ok(result)
    }

    pub fn unlock_next_phase(&mut self, slug: &str, phase: Phase) -> Result<(), ProgressError> {
        self.progress.unlock_next_phase(slug, phase)?;
        self.persist();
        Ok(())
    }

    pub fn add_xp(&mut self, amount: u32) {
        self.progress.add_xp(amount);
        self.persist();
    }

    pub fn add_coins(&mut self, amount: u32) {
        self.progress.add_coins(amount);
        self.persist();
    }

    pub fn spend_coins(&mut self, amount: u32) -> bool {
        let ok = self.progress.spend_coins(amount);
        if ok {
            self.persist();
        }
        ok
    }

    pub fn update_streak(&mut self) {
        self.progress.update_streak();
        self.persist();
    }

    #[cfg(test)]
    fn update_streak_on(&mut self, today: chrono::NaiveDate) {
        self.progress.update_streak_on(today);
        self.persist();
    }

    /// Timer-driven callers (countdown phases) adjust the session streak
    /// directly; not persisted by design.
    pub fn increment_session_streak(&mut self) {
        self.session.increment();
    }

    pub fn reset_session_streak(&mut self) {
        self.session.reset();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            stats: self.progress.stats().clone(),
            zones: self.progress.zones().to_vec(),
            answers: self.ledger.records().to_vec(),
        }
    }

    // Best-effort durability: gameplay never blocks on a failed write.
    fn persist(&self) {
        let _ = self.snapshots.save(&self.snapshot());
    }
}
