//! Level progression across a run
//!
//! The campaign owns the ordered level list and the run totals. Each level
//! attempt is a fresh `GameSession`; when it ends, its `AttemptSummary` is
//! folded in here and the campaign says what comes next.

use std::path::Path;

use crate::sim::{AttemptOutcome, AttemptSummary, GameSession, Level, LevelData};
use crate::{QuantumError, Tuning};

/// What the surrounding application should offer after an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignStep {
    /// Died: the player may restart the same level (with a penalty)
    GameOver { level: usize },
    /// Level done, another one follows
    LevelComplete { next: usize },
    /// Last level done: the run is over, final score can be ranked
    GameComplete,
    /// Single-level practice finished
    TrainingComplete,
}

/// Run state across levels
#[derive(Debug, Clone)]
pub struct Campaign {
    levels: Vec<LevelData>,
    tuning: Tuning,
    current: usize,
    training: bool,
    score: u64,
    deaths: u32,
    restart_penalty: u64,
    total_swaps: u32,
    total_frames: u64,
}

impl Campaign {
    pub fn new(levels: Vec<LevelData>, tuning: Tuning) -> Self {
        Self {
            levels,
            tuning,
            current: 0,
            training: false,
            score: 0,
            deaths: 0,
            restart_penalty: 0,
            total_swaps: 0,
            total_frames: 0,
        }
    }

    /// Read level files in play order
    pub fn load<P: AsRef<Path>>(paths: &[P], tuning: Tuning) -> Result<Self, QuantumError> {
        let mut levels = Vec::with_capacity(paths.len());
        for path in paths {
            let json = std::fs::read_to_string(path.as_ref())?;
            levels.push(serde_json::from_str::<LevelData>(&json)?);
        }
        log::info!("Campaign loaded with {} levels", levels.len());
        Ok(Self::new(levels, tuning))
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn current_level(&self) -> usize {
        self.current
    }

    pub fn is_training(&self) -> bool {
        self.training
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn deaths(&self) -> u32 {
        self.deaths
    }

    pub fn restart_penalty(&self) -> u64 {
        self.restart_penalty
    }

    pub fn total_swaps(&self) -> u32 {
        self.total_swaps
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Score that goes on the ranking
    pub fn final_score(&self) -> i64 {
        self.score as i64 - self.restart_penalty as i64
    }

    /// New run from the first level, totals cleared
    pub fn start(&mut self) -> Result<GameSession, QuantumError> {
        self.training = false;
        self.current = 0;
        self.score = 0;
        self.deaths = 0;
        self.restart_penalty = 0;
        self.total_swaps = 0;
        self.total_frames = 0;
        self.session_for(0)
    }

    /// Practice a single level: nothing is scored or counted
    pub fn start_training(&mut self, index: usize) -> Result<GameSession, QuantumError> {
        let session = self.session_for_mode(index, true)?;
        self.training = true;
        self.current = index;
        Ok(session)
    }

    /// Try the current level again after a game over
    pub fn restart(&mut self) -> Result<GameSession, QuantumError> {
        if !self.training {
            self.restart_penalty += self.tuning.restart_penalty;
        }
        log::info!(
            "Restarting level {} (penalty now {})",
            self.current + 1,
            self.restart_penalty
        );
        self.session_for(self.current)
    }

    /// Move on after `LevelComplete`
    pub fn advance(&mut self) -> Result<GameSession, QuantumError> {
        let next = self.current + 1;
        let session = self.session_for(next)?;
        self.current = next;
        Ok(session)
    }

    /// Fold a finished attempt into the run totals
    pub fn record(&mut self, summary: &AttemptSummary) -> CampaignStep {
        self.total_frames += summary.frames;
        if !self.training {
            self.score += summary.score;
            self.deaths += summary.deaths;
        }

        match summary.outcome {
            AttemptOutcome::Failed => CampaignStep::GameOver {
                level: self.current,
            },
            AttemptOutcome::Cleared => {
                if self.training {
                    return CampaignStep::TrainingComplete;
                }
                self.total_swaps += summary.swaps;
                if self.current + 1 < self.levels.len() {
                    CampaignStep::LevelComplete {
                        next: self.current + 1,
                    }
                } else {
                    log::info!(
                        "Run complete: score {} (penalty {}), deaths {}, swaps {}",
                        self.score,
                        self.restart_penalty,
                        self.deaths,
                        self.total_swaps
                    );
                    CampaignStep::GameComplete
                }
            }
        }
    }

    fn session_for(&self, index: usize) -> Result<GameSession, QuantumError> {
        self.session_for_mode(index, self.training)
    }

    fn session_for_mode(&self, index: usize, training: bool) -> Result<GameSession, QuantumError> {
        let data = self
            .levels
            .get(index)
            .ok_or(QuantumError::UnknownLevel { index })?;
        let level = Level::from_data(data, &self.tuning)?;
        Ok(GameSession::new(level, self.tuning.clone()).with_training(training))
    }
}
