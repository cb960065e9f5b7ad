use crate::config::GameConfig;
use crate::phase::Phase;
use serde::{Deserialize, Serialize};

// Open-book factor weights and decay windows. These are scoring policy,
// not user-tunable configuration.
const OPEN_BOOK_CORRECT_POINTS: f64 = 50.0;
const OPEN_BOOK_TIME_POINTS: f64 = 25.0;
const OPEN_BOOK_TIME_FULL_MS: u64 = 15_000;
const OPEN_BOOK_TIME_ZERO_MS: u64 = 90_000;
const OPEN_BOOK_SEARCH_POINTS: f64 = 15.0;
const OPEN_BOOK_SEARCH_FULL: u32 = 1;
const OPEN_BOOK_SEARCH_ZERO: u32 = 3;
const OPEN_BOOK_CITATION_POINTS: u32 = 10;

// Speedrun thresholds as fractions of the per-difficulty baseline.
const SPEEDRUN_FAST_FRACTION: f64 = 0.40;
const SPEEDRUN_AVERAGE_FRACTION: f64 = 0.75;

/// One open-book (search phase) attempt as reported by the UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenBookAttempt {
    pub correct: bool,
    pub elapsed_ms: u64,
    pub search_count: u32,
    pub sections_viewed: u32,
    pub viewed_target_section: bool,
}

/// Itemized open-book factor scores; already rounded per term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenBookBreakdown {
    pub correctness: u32,
    pub time: u32,
    pub search: u32,
    pub citation: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenBookScore {
    pub total: u32,
    pub breakdown: OpenBookBreakdown,
}

/// Speedrun difficulty tier; each has its own time baseline in the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SpeedrunDifficulty {
    Easy,
    Medium,
    Hard,
}

impl SpeedrunDifficulty {
    fn index(self) -> usize {
        match self {
            SpeedrunDifficulty::Easy => 0,
            SpeedrunDifficulty::Medium => 1,
            SpeedrunDifficulty::Hard => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedrunAttempt {
    pub correct: bool,
    pub elapsed_ms: u64,
    pub difficulty: SpeedrunDifficulty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SpeedrunRating {
    Fast,
    Average,
    Slow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedrunScore {
    pub score: u32,
    pub rating: SpeedrunRating,
}

/// XP bracket position for the level progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    /// Lower bound of the current bracket (or current XP when maxed).
    pub current: u64,
    /// Upper bound of the current bracket (or current XP when maxed).
    pub next: u64,
    /// Percent progress within the bracket, 0..=100.
    pub progress: u32,
}

/// Compute a star count from a 0..=100 score percent, checking the
/// highest threshold first. `thresholds` is ascending [one, two, three].
pub fn stars_for(score_percent: u32, thresholds: [u32; 3]) -> u8 {
    if score_percent >= thresholds[2] {
        3
    } else if score_percent >= thresholds[1] {
        2
    } else if score_percent >= thresholds[0] {
        1
    } else {
        0
    }
}

/// Stateless scoring functions over an explicit configuration. Multiple
/// engines with different configs can coexist (useful in tests).
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: GameConfig,
}

impl ScoringEngine {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// XP for one answered question. Zero when incorrect; otherwise base XP
    /// for the phase, an optional speed bonus when answered under the
    /// configured threshold, then the session streak multiplier.
    pub fn xp(
        &self,
        phase: Phase,
        correct: bool,
        streak_multiplier: u32,
        elapsed_ms: Option<u64>,
    ) -> u32 {
        if !correct {
            return 0;
        }
        let mut amount = self.config.base_xp.get(phase);
        if let Some(ms) = elapsed_ms {
            if ms < self.config.speed_bonus_threshold_ms {
                amount = (amount as f64 * self.config.speed_bonus_multiplier).round() as u32;
            }
        }
        amount * streak_multiplier
    }

    /// Coins earned for one answered question; zero when incorrect or when
    /// the phase has no coin reward configured.
    pub fn coins(&self, phase: Phase, correct: bool) -> u32 {
        if !correct {
            return 0;
        }
        self.config.coin_earn.get(phase)
    }

    pub fn stars(&self, score_percent: u32) -> u8 {
        stars_for(score_percent, self.config.star_thresholds)
    }

    /// Weighted four-factor score for open-book (search) questions, out of
    /// 100. Every factor is zero when the answer is wrong. Each factor is
    /// rounded to the nearest integer before summing; the itemized
    /// breakdown therefore always sums to the total.
    pub fn open_book_score(&self, attempt: &OpenBookAttempt) -> OpenBookScore {
        if !attempt.correct {
            return OpenBookScore {
                total: 0,
                breakdown: OpenBookBreakdown {
                    correctness: 0,
                    time: 0,
                    search: 0,
                    citation: 0,
                },
            };
        }

        let correctness = OPEN_BOOK_CORRECT_POINTS as u32;

        let time = if attempt.elapsed_ms <= OPEN_BOOK_TIME_FULL_MS {
            OPEN_BOOK_TIME_POINTS as u32
        } else if attempt.elapsed_ms >= OPEN_BOOK_TIME_ZERO_MS {
            0
        } else {
            let span = (OPEN_BOOK_TIME_ZERO_MS - OPEN_BOOK_TIME_FULL_MS) as f64;
            let left = (OPEN_BOOK_TIME_ZERO_MS - attempt.elapsed_ms) as f64;
            (OPEN_BOOK_TIME_POINTS * left / span).round() as u32
        };

        let search = if attempt.search_count <= OPEN_BOOK_SEARCH_FULL {
            OPEN_BOOK_SEARCH_POINTS as u32
        } else if attempt.search_count >= OPEN_BOOK_SEARCH_ZERO {
            0
        } else {
            let span = (OPEN_BOOK_SEARCH_ZERO - OPEN_BOOK_SEARCH_FULL) as f64;
            let left = (OPEN_BOOK_SEARCH_ZERO - attempt.search_count) as f64;
            (OPEN_BOOK_SEARCH_POINTS * left / span).round() as u32
        };

        let citation = if attempt.viewed_target_section {
            OPEN_BOOK_CITATION_POINTS
        } else {
            0
        };

        OpenBookScore {
            total: correctness + time + search + citation,
            breakdown: OpenBookBreakdown {
                correctness,
                time,
                search,
                citation,
            },
        }
    }

    /// Time-attack score against the per-difficulty baseline. Wrong answers
    /// always score `{0, slow}` regardless of time.
    pub fn speedrun_score(&self, attempt: &SpeedrunAttempt) -> SpeedrunScore {
        if !attempt.correct {
            return SpeedrunScore {
                score: 0,
                rating: SpeedrunRating::Slow,
            };
        }
        let baseline = self.config.speedrun_baselines_ms[attempt.difficulty.index()];
        let fast = (baseline as f64 * SPEEDRUN_FAST_FRACTION) as u64;
        let average = (baseline as f64 * SPEEDRUN_AVERAGE_FRACTION) as u64;

        if attempt.elapsed_ms <= fast {
            SpeedrunScore {
                score: 100,
                rating: SpeedrunRating::Fast,
            }
        } else if attempt.elapsed_ms <= average {
            SpeedrunScore {
                score: 75,
                rating: SpeedrunRating::Average,
            }
        } else if attempt.elapsed_ms <= baseline {
            SpeedrunScore {
                score: 50,
                rating: SpeedrunRating::Average,
            }
        } else {
            SpeedrunScore {
                score: 25,
                rating: SpeedrunRating::Slow,
            }
        }
    }

    /// Position of `current_xp` within the configured level brackets. At or
    /// beyond the top tier the result saturates to 100% instead of dividing
    /// by a zero-width bracket.
    pub fn next_level_xp(&self, current_xp: u64) -> LevelProgress {
        let tiers = &self.config.level_tiers;
        for pair in tiers.windows(2) {
            let (lower, upper) = (pair[0].min_xp, pair[1].min_xp);
            if current_xp >= lower && current_xp < upper {
                let progress = ((current_xp - lower) * 100 / (upper - lower)) as u32;
                return LevelProgress {
                    current: lower,
                    next: upper,
                    progress,
                };
            }
        }
        LevelProgress {
            current: current_xp,
            next: current_xp,
            progress: 100,
        }
    }

    /// Title of the highest level tier reached by `xp`.
    pub fn level_title(&self, xp: u64) -> &str {
        self.config
            .level_tiers
            .iter()
            .rev()
            .find(|t| xp >= t.min_xp)
            .map(|t| t.title.as_str())
            .unwrap_or("")
    }
}
