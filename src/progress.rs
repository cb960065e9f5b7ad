use crate::config::GameConfig;
use crate::phase::{Phase, PhaseStatus, PHASE_ORDER};
use crate::scoring::stars_for;
use crate::zones::ZoneDescriptor;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Recoverable lookup failure; callers treat an unknown slug as a stale
/// reference (render as locked), not a fault to propagate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("unknown zone: {0}")]
    ZoneNotFound(String),
}

/// Persistent per-user economy and calendar streak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_xp: u64,
    pub coins: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub level_title: String,
    pub last_active: Option<NaiveDate>,
}

/// Unlock state of one phase within a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseProgress {
    pub phase: Phase,
    pub status: PhaseStatus,
    pub stars: u8,
    pub best_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneProgress {
    pub slug: String,
    pub phases: Vec<PhaseProgress>,
}

impl ZoneProgress {
    /// Fresh zone: phase 0 available when the zone is unlocked, everything
    /// else locked.
    fn seed(descriptor: &ZoneDescriptor) -> Self {
        let phases = PHASE_ORDER
            .iter()
            .enumerate()
            .map(|(i, &phase)| PhaseProgress {
                phase,
                status: if i == 0 && !descriptor.locked {
                    PhaseStatus::Available
                } else {
                    PhaseStatus::Locked
                },
                stars: 0,
                best_score: 0,
            })
            .collect();
        Self {
            slug: descriptor.slug.clone(),
            phases,
        }
    }

    pub fn phase(&self, phase: Phase) -> &PhaseProgress {
        &self.phases[phase.index()]
    }

    fn phase_mut(&mut self, phase: Phase) -> &mut PhaseProgress {
        &mut self.phases[phase.index()]
    }
}

/// The zone/phase unlock state machine plus the user economy it guards.
#[derive(Debug, Clone)]
pub struct ProgressionGraph {
    config: GameConfig,
    stats: UserStats,
    zones: Vec<ZoneProgress>,
}

impl ProgressionGraph {
    /// Seed fresh progression state from the configured zone catalog.
    pub fn new(config: GameConfig, catalog: &[ZoneDescriptor]) -> Self {
        let zones = catalog.iter().map(ZoneProgress::seed).collect();
        let stats = UserStats {
            total_xp: 0,
            coins: config.starting_coins,
            current_streak: 0,
            longest_streak: 0,
            level_title: title_for(&config, 0),
            last_active: None,
        };
        Self {
            config,
            stats,
            zones,
        }
    }

    /// Rebuild from a restored snapshot. The catalog order wins: zones the
    /// snapshot knows keep their progress, newly added zones seed fresh,
    /// and zones gone from the catalog are dropped.
    pub fn restore(
        config: GameConfig,
        catalog: &[ZoneDescriptor],
        stats: UserStats,
        saved_zones: Vec<ZoneProgress>,
    ) -> Self {
        let zones = catalog
            .iter()
            .map(|descriptor| {
                saved_zones
                    .iter()
                    .find(|z| z.slug == descriptor.slug)
                    .cloned()
                    .unwrap_or_else(|| ZoneProgress::seed(descriptor))
            })
            .collect();
        Self {
            config,
            stats,
            zones,
        }
    }

    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    pub fn zones(&self) -> &[ZoneProgress] {
        &self.zones
    }

    pub fn zone_progress(&self, slug: &str) -> Result<&ZoneProgress, ProgressError> {
        self.zones
            .iter()
            .find(|z| z.slug == slug)
            .ok_or_else(|| ProgressError::ZoneNotFound(slug.to_string()))
    }

    fn zone_progress_mut(&mut self, slug: &str) -> Result<&mut ZoneProgress, ProgressError> {
        self.zones
            .iter_mut()
            .find(|z| z.slug == slug)
            .ok_or_else(|| ProgressError::ZoneNotFound(slug.to_string()))
    }

    pub fn phase_progress(&self, slug: &str, phase: Phase) -> Result<&PhaseProgress, ProgressError> {
        Ok(self.zone_progress(slug)?.phase(phase))
    }

    /// Mark a phase completed and merge the new result. Safe to call any
    /// number of times: status becomes Completed unconditionally and stars
    /// and best score never regress.
    pub fn complete_phase(
        &mut self,
        slug: &str,
        phase: Phase,
        score_percent: u32,
    ) -> Result<PhaseProgress, ProgressError> {
        let stars = stars_for(score_percent, self.config.star_thresholds);
        let entry = self.zone_progress_mut(slug)?.phase_mut(phase);
        entry.status = PhaseStatus::Completed;
        entry.stars = entry.stars.max(stars);
        entry.best_score = entry.best_score.max(score_percent.min(100));
        Ok(*entry)
    }

    /// Flip the phase after `completed_phase` from Locked to Available.
    /// No-op on the last phase, and never downgrades a phase that is
    /// already available, in progress, or completed.
    pub fn unlock_next_phase(
        &mut self,
        slug: &str,
        completed_phase: Phase,
    ) -> Result<(), ProgressError> {
        let zone = self.zone_progress_mut(slug)?;
        if let Some(next) = completed_phase.next() {
            let entry = zone.phase_mut(next);
            if entry.status == PhaseStatus::Locked {
                entry.status = PhaseStatus::Available;
            }
        }
        Ok(())
    }

    /// Mark a phase as being played; only an available phase transitions.
    pub fn start_phase(&mut self, slug: &str, phase: Phase) -> Result<(), ProgressError> {
        let entry = self.zone_progress_mut(slug)?.phase_mut(phase);
        if entry.status == PhaseStatus::Available {
            entry.status = PhaseStatus::InProgress;
        }
        Ok(())
    }

    pub fn add_xp(&mut self, amount: u32) {
        self.stats.total_xp += amount as u64;
        self.stats.level_title = title_for(&self.config, self.stats.total_xp);
    }

    pub fn add_coins(&mut self, amount: u32) {
        self.stats.coins += amount;
    }

    /// Deduct `amount` if the balance covers it. Returns false and leaves
    /// the balance untouched otherwise; the balance can never go negative.
    pub fn spend_coins(&mut self, amount: u32) -> bool {
        if self.stats.coins >= amount {
            self.stats.coins -= amount;
            true
        } else {
            false
        }
    }

    /// Daily login streak for the local calendar day.
    pub fn update_streak(&mut self) {
        self.update_streak_on(Local::now().date_naive());
    }

    /// Same as [`update_streak`](Self::update_streak) with an explicit
    /// "today", so tests control the calendar.
    pub fn update_streak_on(&mut self, today: NaiveDate) {
        match self.stats.last_active {
            Some(last) if last == today => return,
            Some(last) if Some(last) == today.pred_opt() => {
                self.stats.current_streak += 1;
            }
            _ => self.stats.current_streak = 1,
        }
        self.stats.longest_streak = self.stats.longest_streak.max(self.stats.current_streak);
        self.stats.last_active = Some(today);
    }
}

fn title_for(config: &GameConfig, xp: u64) -> String {
    config
        .level_tiers
        .iter()
        .rev()
        .find(|t| xp >= t.min_xp)
        .map(|t| t.title.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::default_zones;
    use assert_matches::assert_matches;

    fn graph() -> ProgressionGraph {
        ProgressionGraph::new(GameConfig::default(), &default_zones())
    }

    fn statuses(g: &ProgressionGraph, slug: &str) -> Vec<PhaseStatus> {
        g.zone_progress(slug)
            .unwrap()
            .phases
            .iter()
            .map(|p| p.status)
            .collect()
    }

    #[test]
    fn test_unlocked_zone_seeds_first_phase_available() {
        let g = graph();
        assert_eq!(
            statuses(&g, "foundations"),
            vec![
                PhaseStatus::Available,
                PhaseStatus::Locked,
                PhaseStatus::Locked,
                PhaseStatus::Locked,
                PhaseStatus::Locked,
                PhaseStatus::Locked,
            ]
        );
    }

    #[test]
    fn test_locked_zone_seeds_all_locked() {
        let g = graph();
        assert!(statuses(&g, "mastery")
            .iter()
            .all(|s| *s == PhaseStatus::Locked));
    }

    #[test]
    fn test_unknown_zone_is_typed_not_found() {
        let g = graph();
        assert_matches!(
            g.zone_progress("atlantis"),
            Err(ProgressError::ZoneNotFound(slug)) if slug == "atlantis"
        );
        assert_matches!(
            g.phase_progress("atlantis", Phase::Boss),
            Err(ProgressError::ZoneNotFound(_))
        );
    }

    #[test]
    fn test_complete_then_unlock_sequence() {
        let mut g = graph();
        g.complete_phase("foundations", Phase::Absorb, 80).unwrap();
        g.unlock_next_phase("foundations", Phase::Absorb).unwrap();
        assert_eq!(
            statuses(&g, "foundations"),
            vec![
                PhaseStatus::Completed,
                PhaseStatus::Available,
                PhaseStatus::Locked,
                PhaseStatus::Locked,
                PhaseStatus::Locked,
                PhaseStatus::Locked,
            ]
        );
    }

    #[test]
    fn test_complete_phase_merges_by_max() {
        let mut g = graph();
        let p = g.complete_phase("foundations", Phase::Absorb, 92).unwrap();
        assert_eq!(p.stars, 3);
        assert_eq!(p.best_score, 92);

        // a worse retry never regresses the recorded best
        let p = g.complete_phase("foundations", Phase::Absorb, 40).unwrap();
        assert_eq!(p.status, PhaseStatus::Completed);
        assert_eq!(p.stars, 3);
        assert_eq!(p.best_score, 92);

        let p = g.complete_phase("foundations", Phase::Absorb, 95).unwrap();
        assert_eq!(p.best_score, 95);
    }

    #[test]
    fn test_complete_phase_clamps_score() {
        let mut g = graph();
        let p = g.complete_phase("foundations", Phase::Absorb, 250).unwrap();
        assert_eq!(p.best_score, 100);
    }

    #[test]
    fn test_unlock_never_downgrades() {
        let mut g = graph();
        g.complete_phase("foundations", Phase::Absorb, 80).unwrap();
        g.unlock_next_phase("foundations", Phase::Absorb).unwrap();
        g.start_phase("foundations", Phase::Build).unwrap();
        assert_eq!(
            g.phase_progress("foundations", Phase::Build).unwrap().status,
            PhaseStatus::InProgress
        );

        // unlocking again must not touch an in-progress phase
        g.unlock_next_phase("foundations", Phase::Absorb).unwrap();
        assert_eq!(
            g.phase_progress("foundations", Phase::Build).unwrap().status,
            PhaseStatus::InProgress
        );

        g.complete_phase("foundations", Phase::Build, 70).unwrap();
        g.unlock_next_phase("foundations", Phase::Absorb).unwrap();
        assert_eq!(
            g.phase_progress("foundations", Phase::Build).unwrap().status,
            PhaseStatus::Completed
        );
    }

    #[test]
    fn test_unlock_after_last_phase_is_noop() {
        let mut g = graph();
        g.unlock_next_phase("foundations", Phase::Boss).unwrap();
        let statuses = statuses(&g, "foundations");
        assert_eq!(statuses[5], PhaseStatus::Locked);
    }

    #[test]
    fn test_start_phase_only_from_available() {
        let mut g = graph();
        g.start_phase("foundations", Phase::Boss).unwrap();
        assert_eq!(
            g.phase_progress("foundations", Phase::Boss).unwrap().status,
            PhaseStatus::Locked
        );
        g.start_phase("foundations", Phase::Absorb).unwrap();
        assert_eq!(
            g.phase_progress("foundations", Phase::Absorb).unwrap().status,
            PhaseStatus::InProgress
        );
    }

    #[test]
    fn test_add_xp_recomputes_title() {
        let mut g = graph();
        assert_eq!(g.stats().level_title, "Novice");
        g.add_xp(120);
        assert_eq!(g.stats().total_xp, 120);
        assert_eq!(g.stats().level_title, "Apprentice");
        g.add_xp(200);
        assert_eq!(g.stats().level_title, "Scholar");
    }

    #[test]
    fn test_coin_economy() {
        let mut g = graph();
        assert_eq!(g.stats().coins, 50);
        g.add_coins(30);
        assert_eq!(g.stats().coins, 80);

        assert!(g.spend_coins(80));
        assert_eq!(g.stats().coins, 0);

        // insufficient balance: false, untouched, never negative
        assert!(!g.spend_coins(1));
        assert_eq!(g.stats().coins, 0);
    }

    #[test]
    fn test_daily_streak() {
        let mut g = graph();
        let day1 = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let day2 = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();
        let day5 = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();

        g.update_streak_on(day1);
        assert_eq!(g.stats().current_streak, 1);

        // same day is a no-op
        g.update_streak_on(day1);
        assert_eq!(g.stats().current_streak, 1);

        // consecutive day increments
        g.update_streak_on(day2);
        assert_eq!(g.stats().current_streak, 2);
        assert_eq!(g.stats().longest_streak, 2);

        // a gap resets to 1 but keeps the longest
        g.update_streak_on(day5);
        assert_eq!(g.stats().current_streak, 1);
        assert_eq!(g.stats().longest_streak, 2);
        assert_eq!(g.stats().last_active, Some(day5));
    }

    #[test]
    fn test_restore_merges_catalog() {
        let mut g = graph();
        g.complete_phase("foundations", Phase::Absorb, 90).unwrap();
        g.add_xp(150);
        let stats = g.stats().clone();
        let saved = g.zones().to_vec();

        // new catalog: one zone removed, one added
        let catalog = vec![
            ZoneDescriptor::new("foundations", "Foundations", false),
            ZoneDescriptor::new("new-frontier", "New Frontier", false),
        ];
        let restored = ProgressionGraph::restore(GameConfig::default(), &catalog, stats, saved);

        assert_eq!(restored.zones().len(), 2);
        assert_eq!(
            restored
                .phase_progress("foundations", Phase::Absorb)
                .unwrap()
                .status,
            PhaseStatus::Completed
        );
        assert_eq!(
            restored
                .phase_progress("new-frontier", Phase::Absorb)
                .unwrap()
                .status,
            PhaseStatus::Available
        );
        assert_matches!(
            restored.zone_progress("core-concepts"),
            Err(ProgressError::ZoneNotFound(_))
        );
        assert_eq!(restored.stats().level_title, "Apprentice");
    }
}
