//! PagerTron - headless native runner
//!
//! Plays one autopilot session (optionally in real time), records the result
//! on the leaderboard and prints it. Handy for soak-testing tuning files.
//!
//! ```text
//! pagertron [--tuning FILE] [--settings FILE] [--scores FILE]
//!           [--seed N] [--seconds N] [--name AAA] [--realtime]
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use pagertron::consts::SIM_DT;
use pagertron::driver::TickDriver;
use pagertron::highscores::JsonFileStore;
use pagertron::sim::{GameEvent, GamePhase};
use pagertron::{Error, GameCore, HighScoreStore, HighScores, Settings, Tuning};

#[derive(Parser, Debug)]
#[command(name = "pagertron")]
#[command(about = "Play a headless PagerTron autopilot session and record the score")]
struct Args {
    /// JSON file overriding any subset of the gameplay tuning
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Player preferences file
    #[arg(long, default_value = "pagertron-settings.json")]
    settings: PathBuf,

    /// Leaderboard file
    #[arg(long, default_value = "pagertron-scores.json")]
    scores: PathBuf,

    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Give up after this many simulated (or real) seconds
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,

    /// Initials recorded on the leaderboard
    #[arg(long, default_value = "CPU")]
    name: String,

    /// Pace the session against the wall clock
    #[arg(long)]
    realtime: bool,
}

fn log_events(core: &mut GameCore) {
    for event in core.drain_events() {
        match event {
            GameEvent::LevelStarted { level, pagers } => {
                log::info!("Level {level}: {pagers} pagers")
            }
            GameEvent::InterstitialShown { level, stats } => log::info!(
                "After level {level}: {} shots, {} pagers, {} bugs, {:.1}% hit rate",
                stats.shots_fired,
                stats.pagers_killed,
                stats.bugs_killed,
                stats.hit_rate()
            ),
            GameEvent::GameOver { score, level } => {
                log::info!("Game over at level {level} with {score} points")
            }
            other => log::trace!("{other:?}"),
        }
    }
    for command in core.drain_audio() {
        log::debug!("Audio: {command:?}");
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let args = Args::parse();
    log::info!("PagerTron (headless) starting...");

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let settings = Settings::load(&args.settings);

    let mut store: Box<dyn HighScoreStore> = match JsonFileStore::open(&args.scores) {
        Ok(store) => Box::new(store),
        Err(err) => {
            log::warn!(
                "Leaderboard {} unavailable ({err}); keeping scores in memory",
                args.scores.display()
            );
            Box::new(HighScores::new())
        }
    };

    let mut core = match args.seed {
        Some(seed) => GameCore::new(seed, tuning, settings)?,
        None => GameCore::with_entropy(tuning, settings)?,
    };
    core.set_autopilot(true);
    core.start_game();

    if args.realtime {
        let mut driver = TickDriver::new();
        driver.run_blocking(&mut core, Duration::from_secs_f32(args.seconds), |core| {
            log_events(core);
            core.phase() == GamePhase::HighScoreCapture
        });
    } else {
        let max_steps = (args.seconds / SIM_DT).ceil() as u64;
        for _ in 0..max_steps {
            core.tick(SIM_DT);
            log_events(&mut core);
            if core.phase() == GamePhase::HighScoreCapture {
                break;
            }
        }
    }

    if core.phase() != GamePhase::HighScoreCapture {
        println!(
            "Session still running after {:.0}s: level {}, score {}",
            args.seconds,
            core.level(),
            core.score()
        );
        core.stop();
        return Ok(());
    }

    let final_score = core.score();
    let final_level = core.level();
    let ranking = core.submit_high_score(store.as_mut(), &args.name)?;
    core.acknowledge_high_score()?;

    println!("Final score {final_score} (level {final_level})");
    println!("{:>4}  {:<4} {:>8} {:>6}", "RANK", "NAME", "SCORE", "LEVEL");
    for (i, entry) in ranking.iter().enumerate() {
        println!(
            "{:>4}  {:<4} {:>8} {:>6}",
            i + 1,
            entry.player_name,
            entry.score,
            entry.level
        );
    }
    Ok(())
}
