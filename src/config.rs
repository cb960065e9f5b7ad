use crate::phase::PhaseValues;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A session-streak tier: reaching `count` consecutive correct answers
/// earns `multiplier` on all XP until the streak breaks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreakTier {
    pub count: u32,
    pub multiplier: u32,
}

/// A level-title bracket; tiers are kept ascending by `min_xp`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LevelTier {
    pub title: String,
    pub min_xp: u64,
}

/// All tunable constants of the progression economy. Set once at startup;
/// the engine never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    pub base_xp: PhaseValues,
    pub coin_earn: PhaseValues,
    /// Star thresholds in ascending order: [one, two, three] star percent.
    pub star_thresholds: [u32; 3],
    pub speed_bonus_threshold_ms: u64,
    pub speed_bonus_multiplier: f64,
    /// Ascending by `count`; the highest tier met wins.
    pub streak_tiers: Vec<StreakTier>,
    pub starting_coins: u32,
    /// Ascending by `min_xp`; first tier should start at 0.
    pub level_tiers: Vec<LevelTier>,
    /// Speedrun time baselines in ms, one per difficulty tier (1..=3).
    pub speedrun_baselines_ms: [u64; 3],
    /// Name of the persisted snapshot blob.
    pub storage_key: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_xp: PhaseValues {
                absorb: 10,
                build: 15,
                recognize: 15,
                apply: 20,
                search: 25,
                boss: 30,
            },
            coin_earn: PhaseValues {
                absorb: 0,
                build: 5,
                recognize: 5,
                apply: 10,
                search: 10,
                boss: 25,
            },
            star_thresholds: [60, 75, 90],
            speed_bonus_threshold_ms: 10_000,
            speed_bonus_multiplier: 1.5,
            streak_tiers: vec![
                StreakTier {
                    count: 5,
                    multiplier: 2,
                },
                StreakTier {
                    count: 10,
                    multiplier: 3,
                },
                StreakTier {
                    count: 20,
                    multiplier: 5,
                },
            ],
            starting_coins: 50,
            level_tiers: vec![
                LevelTier {
                    title: "Novice".to_string(),
                    min_xp: 0,
                },
                LevelTier {
                    title: "Apprentice".to_string(),
                    min_xp: 100,
                },
                LevelTier {
                    title: "Scholar".to_string(),
                    min_xp: 300,
                },
                LevelTier {
                    title: "Expert".to_string(),
                    min_xp: 700,
                },
                LevelTier {
                    title: "Master".to_string(),
                    min_xp: 1500,
                },
                LevelTier {
                    title: "Grandmaster".to_string(),
                    min_xp: 3000,
                },
            ],
            speedrun_baselines_ms: [10_000, 20_000, 30_000],
            storage_key: "examquest".to_string(),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> GameConfig;
    fn save(&self, cfg: &GameConfig) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "examquest") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("examquest_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> GameConfig {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<GameConfig>(&bytes) {
                return cfg;
            }
        }
        GameConfig::default()
    }

    fn save(&self, cfg: &GameConfig) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
