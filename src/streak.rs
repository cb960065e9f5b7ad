use crate::config::StreakTier;

/// Consecutive-correct counter for the current play session. Rewards
/// focused sessions: this state is never persisted and resets on reload.
#[derive(Debug, Clone)]
pub struct SessionStreak {
    tiers: Vec<StreakTier>,
    count: u32,
    multiplier: u32,
}

impl SessionStreak {
    pub fn new(tiers: Vec<StreakTier>) -> Self {
        Self {
            tiers,
            count: 0,
            multiplier: 1,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// One more correct answer; keeps the highest tier whose threshold the
    /// new count meets.
    pub fn increment(&mut self) {
        self.count += 1;
        self.multiplier = self
            .tiers
            .iter()
            .filter(|t| self.count >= t.count)
            .map(|t| t.multiplier)
            .last()
            .unwrap_or(1);
    }

    /// Wrong answer (or session restart): back to zero, multiplier 1.
    pub fn reset(&mut self) {
        self.count = 0;
        self.multiplier = 1;
    }
}
