//! Quantum Echo entry point
//!
//! Headless runner: loads a campaign, drives it with a seeded autopilot and
//! records finished runs on the ranking board.
//!
//! Usage: quantum-echo [--tuning FILE] [--seed N] [--training N] [LEVEL.json ...]

use std::path::PathBuf;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use quantum_echo::sim::{GameEvent, GameSession, TickInput, tick};
use quantum_echo::{
    Campaign, CampaignStep, QuantumError, Ranking, Tuning, cooldown_secs, frames_to_secs,
};

const DEFAULT_LEVELS: [&str; 2] = ["levels/level1.json", "levels/level2.json"];
const RANKING_FILE: &str = "ranking.json";
/// Give up on an attempt after five minutes of simulated time
const MAX_ATTEMPT_FRAMES: u64 = 60 * 60 * 5;
const MAX_RESTARTS: u32 = 3;
/// HUD line every 5 seconds
const HUD_INTERVAL: u64 = 300;

struct Options {
    levels: Vec<PathBuf>,
    tuning: Option<PathBuf>,
    seed: u64,
    training: Option<usize>,
}

fn parse_args() -> Options {
    let mut options = Options {
        levels: Vec::new(),
        tuning: None,
        seed: 0x5eed,
        training: None,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--tuning" => options.tuning = args.next().map(PathBuf::from),
            "--seed" => match args.next().map(|s| s.parse()) {
                Some(Ok(seed)) => options.seed = seed,
                _ => log::warn!("--seed needs a number, keeping {}", options.seed),
            },
            "--training" => match args.next().map(|s| s.parse()) {
                Some(Ok(index)) => options.training = Some(index),
                _ => log::warn!("--training needs a level index"),
            },
            _ => options.levels.push(PathBuf::from(arg)),
        }
    }

    if options.levels.is_empty() {
        options.levels = DEFAULT_LEVELS.iter().map(PathBuf::from).collect();
    }
    options
}

/// Mostly runs right, hops now and then, swaps when it can
struct Autopilot {
    rng: Pcg32,
}

impl Autopilot {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn next_input(&mut self, session: &GameSession) -> TickInput {
        let back_off = self.rng.random_bool(0.15);
        TickInput {
            move_left: back_off,
            move_right: !back_off,
            jump: self.rng.random_bool(0.05),
            swap: session.swap_ready()
                && session.second_life_available()
                && self.rng.random_bool(0.01),
        }
    }
}

/// Play one attempt to the end (or the frame cap)
fn play(session: &mut GameSession, pilot: &mut Autopilot) -> bool {
    while session.level_time() < MAX_ATTEMPT_FRAMES {
        let input = pilot.next_input(session);
        tick(session, &input);

        for event in session.events() {
            match event {
                GameEvent::SecondLifeTriggered { at } => {
                    log::info!("Echo takes over at ({:.0}, {:.0})", at.x, at.y)
                }
                GameEvent::ExitUnlocked => log::info!("Exit is open"),
                GameEvent::Swapped => log::debug!("Swap #{}", session.swap_count()),
                _ => {}
            }
        }

        if session.level_time() % HUD_INTERVAL == 0 {
            log::info!(
                "t={}s score={} gems={} exit={} swap={} second_life={}",
                frames_to_secs(session.level_time()),
                session.score(),
                session.gems_left(),
                if session.exit_locked() { "locked" } else { "open" },
                match cooldown_secs(session.swap_cooldown()) {
                    0 => "ready".to_string(),
                    secs => format!("{secs}s"),
                },
                session.second_life_available()
            );
        }

        if session.summary().is_some() {
            return true;
        }
    }
    false
}

fn run(options: Options) -> Result<(), QuantumError> {
    let tuning = match &options.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let mut campaign = Campaign::load(options.levels.as_slice(), tuning)?;
    let mut pilot = Autopilot::new(options.seed);

    let mut session = match options.training {
        Some(index) => campaign.start_training(index)?,
        None => campaign.start()?,
    };
    let mut restarts = 0;

    loop {
        log::info!(
            "Level {}/{}{}",
            campaign.current_level() + 1,
            campaign.level_count(),
            if campaign.is_training() { " (training)" } else { "" }
        );

        if !play(&mut session, &mut pilot) {
            log::warn!(
                "Attempt ran past {}s without finishing, stopping",
                frames_to_secs(MAX_ATTEMPT_FRAMES)
            );
            return Ok(());
        }
        let Some(summary) = session.summary().cloned() else {
            return Ok(());
        };

        match campaign.record(&summary) {
            CampaignStep::GameOver { level } => {
                if restarts >= MAX_RESTARTS {
                    log::info!("Out of retries on level {}", level + 1);
                    return Ok(());
                }
                restarts += 1;
                session = campaign.restart()?;
            }
            CampaignStep::LevelComplete { next } => {
                log::info!("On to level {}", next + 1);
                session = campaign.advance()?;
            }
            CampaignStep::TrainingComplete => {
                log::info!("Training level cleared in {}s", frames_to_secs(summary.frames));
                return Ok(());
            }
            CampaignStep::GameComplete => break,
        }
    }

    let score = campaign.final_score();
    log::info!(
        "Final score {} ({} deaths, {} swaps, {}s played)",
        score,
        campaign.deaths(),
        campaign.total_swaps(),
        frames_to_secs(campaign.total_frames())
    );

    let mut ranking = Ranking::load(RANKING_FILE);
    match ranking.add("autopilot", score) {
        Some(rank) => {
            log::info!("Ranked #{rank}");
            ranking.save(RANKING_FILE)?;
        }
        None => log::info!("Score did not make the board"),
    }
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Quantum Echo (headless) starting...");

    if let Err(e) = run(parse_args()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
