use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The six learning phases of a zone, in unlock order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Absorb,
    Build,
    Recognize,
    Apply,
    Search,
    Boss,
}

/// Fixed phase ordering; zones always contain exactly these, in this order.
pub const PHASE_ORDER: [Phase; 6] = [
    Phase::Absorb,
    Phase::Build,
    Phase::Recognize,
    Phase::Apply,
    Phase::Search,
    Phase::Boss,
];

impl Phase {
    /// Position of this phase in the fixed ordering.
    pub fn index(self) -> usize {
        PHASE_ORDER.iter().position(|p| *p == self).unwrap_or(0)
    }

    /// The phase that unlocks after this one, or None for the last phase.
    pub fn next(self) -> Option<Phase> {
        PHASE_ORDER.get(self.index() + 1).copied()
    }
}

/// Unlock state of a single phase within a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PhaseStatus {
    Locked,
    Available,
    InProgress,
    Completed,
}

/// One value per phase; used for the base-XP and coin-earn tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseValues {
    pub absorb: u32,
    pub build: u32,
    pub recognize: u32,
    pub apply: u32,
    pub search: u32,
    pub boss: u32,
}

impl PhaseValues {
    pub fn get(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Absorb => self.absorb,
            Phase::Build => self.build,
            Phase::Recognize => self.recognize,
            Phase::Apply => self.apply,
            Phase::Search => self.search,
            Phase::Boss => self.boss,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order_is_complete() {
        assert_eq!(PHASE_ORDER.len(), 6);
        assert_eq!(PHASE_ORDER[0], Phase::Absorb);
        assert_eq!(PHASE_ORDER[5], Phase::Boss);
    }

    #[test]
    fn test_next_phase() {
        assert_eq!(Phase::Absorb.next(), Some(Phase::Build));
        assert_eq!(Phase::Search.next(), Some(Phase::Boss));
        assert_eq!(Phase::Boss.next(), None);
    }

    #[test]
    fn test_index_matches_order() {
        for (i, p) in PHASE_ORDER.iter().enumerate() {
            assert_eq!(p.index(), i);
        }
    }

    #[test]
    fn test_display_lowercase() {
        assert_eq!(Phase::Boss.to_string(), "boss");
        assert_eq!(PhaseStatus::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn test_phase_values_lookup() {
        let v = PhaseValues {
            absorb: 1,
            build: 2,
            recognize: 3,
            apply: 4,
            search: 5,
            boss: 6,
        };
        assert_eq!(v.get(Phase::Absorb), 1);
        assert_eq!(v.get(Phase::Boss), 6);
    }
}
