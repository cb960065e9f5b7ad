use clap::{Parser, Subcommand};
use examquest::config::{ConfigStore, FileConfigStore};
use examquest::persist::FileSnapshotStore;
use examquest::phase::Phase;
use examquest::progress::ProgressError;
use examquest::scoring::{OpenBookAttempt, SpeedrunAttempt, SpeedrunDifficulty};
use examquest::store::{AnswerEvent, GameStore};
use examquest::zones::default_zones;
use std::error::Error;
use std::io;
use std::path::PathBuf;

/// gamified exam-study progression engine
#[derive(Parser, Debug)]
#[clap(
    version,
    about,
    long_about = "Headless driver for the examquest progression engine: inspect zone/phase \
unlock state, simulate answers and phase completions, and manage the saved snapshot."
)]
struct Cli {
    /// directory holding config.json and the snapshot (defaults to the
    /// platform config/state dirs)
    #[clap(long, global = true)]
    data_dir: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// show user stats and per-zone progress
    Status,
    /// list zones and their phase unlock states
    Zones,
    /// submit one answer and show the rewards
    Answer {
        #[clap(long)]
        zone: String,
        #[clap(long, value_enum)]
        phase: Phase,
        #[clap(long)]
        question: String,
        /// whether the answer was correct
        #[clap(long)]
        correct: bool,
        /// time taken in milliseconds
        #[clap(long, default_value_t = 15_000)]
        elapsed_ms: u64,
    },
    /// score an open-book attempt (does not mutate state)
    OpenBook {
        #[clap(long)]
        correct: bool,
        #[clap(long)]
        elapsed_ms: u64,
        #[clap(long, default_value_t = 0)]
        searches: u32,
        #[clap(long)]
        cited: bool,
    },
    /// score a speedrun attempt (does not mutate state)
    Speedrun {
        #[clap(long)]
        correct: bool,
        #[clap(long)]
        elapsed_ms: u64,
        #[clap(long, value_enum, default_value_t = SpeedrunDifficulty::Medium)]
        difficulty: SpeedrunDifficulty,
    },
    /// record a phase completion and unlock the next phase
    Complete {
        #[clap(long)]
        zone: String,
        #[clap(long, value_enum)]
        phase: Phase,
        /// score percent, 0..=100
        #[clap(long)]
        score: u32,
    },
    /// spend coins from the balance
    Spend {
        #[clap(long)]
        amount: u32,
    },
    /// register today's login for the daily streak
    Daily,
    /// dump the answer history as CSV to stdout
    Export,
    /// delete the saved snapshot and start over
    Reset,
}

fn open_store(cli: &Cli) -> (GameStore, PathBuf) {
    let config = match &cli.data_dir {
        Some(dir) => FileConfigStore::with_path(dir.join("config.json")).load(),
        None => FileConfigStore::new().load(),
    };
    let snapshots = match &cli.data_dir {
        Some(dir) => FileSnapshotStore::with_path(dir.join(format!("{}.json", config.storage_key))),
        None => FileSnapshotStore::new(&config.storage_key),
    };
    let snapshot_path = snapshots.path().to_path_buf();
    let store = GameStore::new(config, &default_zones(), Box::new(snapshots));
    (store, snapshot_path)
}

fn print_status(store: &GameStore) {
    let stats = store.stats();
    let level = store.scoring().next_level_xp(stats.total_xp);
    println!(
        "{} | {} xp ({}% to next level) | {} coins",
        stats.level_title, stats.total_xp, level.progress, stats.coins
    );
    println!(
        "daily streak: {} (longest {}) | session streak: {} (x{})",
        stats.current_streak,
        stats.longest_streak,
        store.session_streak().count(),
        store.session_streak().multiplier()
    );
    if let Some(accuracy) = store.ledger().accuracy() {
        println!(
            "answers: {} recorded, {:.1}% correct",
            store.ledger().len(),
            accuracy
        );
    }
}

fn print_zones(store: &GameStore) {
    for zone in store.zones() {
        println!("{}", zone.slug);
        for p in &zone.phases {
            let stars = "*".repeat(p.stars as usize);
            println!(
                "  {:<10} {:<12} best {:>3} {}",
                p.phase.to_string(),
                p.status.to_string(),
                p.best_score,
                stars
            );
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let (mut store, snapshot_path) = open_store(&cli);

    match cli.command {
        Command::Status => print_status(&store),
        Command::Zones => print_zones(&store),
        Command::Answer {
            zone,
            phase,
            question,
            correct,
            elapsed_ms,
        } => {
            let outcome = store.submit_answer(AnswerEvent {
                question_id: question,
                zone,
                phase,
                selected: if correct { 0 } else { -1 },
                correct,
                elapsed_ms,
                trap_tags_correct: None,
            });
            println!(
                "+{} xp (x{}) +{} coins",
                outcome.xp, outcome.multiplier, outcome.coins
            );
        }
        Command::OpenBook {
            correct,
            elapsed_ms,
            searches,
            cited,
        } => {
            let score = store.scoring().open_book_score(&OpenBookAttempt {
                correct,
                elapsed_ms,
                search_count: searches,
                sections_viewed: searches,
                viewed_target_section: cited,
            });
            let b = score.breakdown;
            println!(
                "total {} (correctness {} + time {} + search {} + citation {})",
                score.total, b.correctness, b.time, b.search, b.citation
            );
        }
        Command::Speedrun {
            correct,
            elapsed_ms,
            difficulty,
        } => {
            let result = store.scoring().speedrun_score(&SpeedrunAttempt {
                correct,
                elapsed_ms,
                difficulty,
            });
            println!("{} ({})", result.score, result.rating);
        }
        Command::Complete { zone, phase, score } => {
            match store.complete_phase(&zone, phase, score) {
                Ok(p) => {
                    store.unlock_next_phase(&zone, phase)?;
                    println!(
                        "{}/{} completed: best {} stars {}",
                        zone, phase, p.best_score, p.stars
                    );
                }
                Err(ProgressError::ZoneNotFound(slug)) => {
                    eprintln!("no such zone: {slug}");
                    std::process::exit(1);
                }
            }
        }
        Command::Spend { amount } => {
            if store.spend_coins(amount) {
                println!("spent {} coins, {} left", amount, store.stats().coins);
            } else {
                println!(
                    "not enough coins: have {}, need {}",
                    store.stats().coins,
                    amount
                );
            }
        }
        Command::Daily => {
            store.update_streak();
            println!(
                "daily streak: {} (longest {})",
                store.stats().current_streak,
                store.stats().longest_streak
            );
        }
        Command::Export => store.ledger().export_csv(io::stdout())?,
        Command::Reset => {
            if snapshot_path.exists() {
                std::fs::remove_file(&snapshot_path)?;
            }
            println!("snapshot cleared");
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    run(Cli::parse())
}
