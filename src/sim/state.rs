//! Game session state and the second-life state machine
//!
//! Everything that changes during a level attempt lives in `GameSession`;
//! `tick` is the only thing that advances it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, Role};
use super::history::{EchoReplayer, HistoryBuffer};
use super::level::{Level, PickupKind};
use super::swap::{SwapController, SwapRejection};
use crate::Tuning;

/// Where the attempt stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifePhase {
    /// Live actor plus echo; second life still available
    Normal,
    /// The echo took over; no echo left, swapping disabled
    OnSecondLife,
    /// Died on the second life (terminal)
    Failed,
    /// Reached the open exit (terminal)
    Cleared,
}

impl LifePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifePhase::Failed | LifePhase::Cleared)
    }
}

/// Something that happened this frame (for scoring, sound and effects)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Jumped { double: bool },
    Pickup(PickupKind),
    Hit,
    Fell,
    ObjectiveCollected,
    ExitUnlocked,
    Swapped,
    /// Flash at one end of a swap (two per swap)
    SwapFlash { at: Vec2 },
    SwapRejected(SwapRejection),
    /// The echo took over; `at` is where the old live actor died
    SecondLifeTriggered { at: Vec2 },
    Failed { at: Vec2 },
    LevelCleared { at: Vec2 },
}

/// How an attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptOutcome {
    Failed,
    Cleared,
}

/// Result of a finished attempt, handed to progression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptSummary {
    pub outcome: AttemptOutcome,
    pub score: u64,
    /// Frames played
    pub frames: u64,
    pub deaths: u32,
    pub swaps: u32,
    pub training: bool,
}

/// One level attempt
#[derive(Debug, Clone)]
pub struct GameSession {
    pub(crate) tuning: Tuning,
    pub(crate) level: Level,
    pub(crate) live: Actor,
    pub(crate) echo: Option<Actor>,
    pub(crate) history: HistoryBuffer,
    pub(crate) replayer: EchoReplayer,
    pub(crate) swap: SwapController,
    pub(crate) phase: LifePhase,
    /// Frames simulated since the attempt started
    pub(crate) level_time: u64,
    pub(crate) score: u64,
    /// Training runs neither score nor count deaths
    pub(crate) training: bool,
    /// Events from the most recent tick
    pub(crate) events: Vec<GameEvent>,
    pub(crate) summary: Option<AttemptSummary>,
}

impl GameSession {
    /// Start an attempt: live actor and echo both at the level's spawn point
    pub fn new(level: Level, tuning: Tuning) -> Self {
        let spawn = level.start;
        let size = tuning.actor_size;
        log::info!("Level attempt starting at ({}, {})", spawn.x, spawn.y);
        Self {
            live: Actor::new(Role::Live, spawn, size),
            echo: Some(Actor::new(Role::Echo, spawn, size)),
            history: HistoryBuffer::new(tuning.effective_history_capacity()),
            replayer: EchoReplayer::new(tuning.echo_delay),
            swap: SwapController::new(tuning.swap_cooldown),
            phase: LifePhase::Normal,
            level_time: 0,
            score: 0,
            training: false,
            events: Vec::new(),
            summary: None,
            tuning,
            level,
        }
    }

    pub fn with_training(mut self, training: bool) -> Self {
        self.training = training;
        self
    }

    /// Throw the attempt away and start over on a fresh copy of the level.
    /// History, counters and actors are all replaced in one step.
    pub fn restart(&mut self, level: Level) {
        let training = self.training;
        *self = Self::new(level, self.tuning.clone()).with_training(training);
    }

    // === Read access for HUD / rendering ===

    pub fn live(&self) -> &Actor {
        &self.live
    }

    /// The echo, absent once the second life is in use
    pub fn echo(&self) -> Option<&Actor> {
        self.echo.as_ref()
    }

    pub fn phase(&self) -> LifePhase {
        self.phase
    }

    pub fn second_life_available(&self) -> bool {
        self.phase == LifePhase::Normal
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn level_time(&self) -> u64 {
        self.level_time
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn swap_cooldown(&self) -> u32 {
        self.swap.cooldown()
    }

    /// Cooldown elapsed (an echo is still needed to actually swap)
    pub fn swap_ready(&self) -> bool {
        self.swap.ready()
    }

    pub fn swap_count(&self) -> u32 {
        self.swap.count()
    }

    pub fn gems_left(&self) -> usize {
        self.level.gems_left()
    }

    pub fn exit_locked(&self) -> bool {
        self.level.exit_locked()
    }

    pub fn is_training(&self) -> bool {
        self.training
    }

    /// Set once the attempt reaches a terminal phase
    pub fn summary(&self) -> Option<&AttemptSummary> {
        self.summary.as_ref()
    }

    // === Transitions ===

    pub(crate) fn add_score(&mut self, points: u64) {
        if !self.training {
            self.score += points;
        }
    }

    /// A hit or fall: spend the second life, or end the attempt
    pub(crate) fn on_failure(&mut self) {
        match self.phase {
            LifePhase::Normal => self.promote_echo(),
            LifePhase::OnSecondLife => self.fail(),
            LifePhase::Failed | LifePhase::Cleared => {}
        }
    }

    /// Hand control to the echo. The failing live actor is dropped; the echo
    /// keeps its own position and inherits the power-ups.
    pub(crate) fn promote_echo(&mut self) {
        let Some(mut promoted) = self.echo.take() else {
            // No echo to take over: nothing left to lose
            self.fail();
            return;
        };

        let at = self.live.rect().center();
        promoted.inherit_powers(&self.live);
        promoted.role = Role::Live;
        self.live = promoted;
        self.phase = LifePhase::OnSecondLife;
        self.events.push(GameEvent::SecondLifeTriggered { at });

        log::info!(
            "Second life used at frame {}: echo takes over at ({}, {})",
            self.level_time,
            self.live.pos.x,
            self.live.pos.y
        );
    }

    pub(crate) fn fail(&mut self) {
        self.phase = LifePhase::Failed;
        self.events.push(GameEvent::Failed {
            at: self.live.rect().center(),
        });
        self.summary = Some(self.make_summary(AttemptOutcome::Failed));
        self.history.clear();
        log::info!(
            "Attempt failed after {} frames (score {}, swaps {})",
            self.level_time,
            self.score,
            self.swap.count()
        );
    }

    pub(crate) fn clear(&mut self) {
        self.add_score(self.tuning.clear_score);
        self.phase = LifePhase::Cleared;
        self.events.push(GameEvent::LevelCleared {
            at: self.live.rect().center(),
        });
        self.summary = Some(self.make_summary(AttemptOutcome::Cleared));
        self.history.clear();
        log::info!(
            "Level cleared in {} frames (score {}, swaps {})",
            self.level_time,
            self.score,
            self.swap.count()
        );
    }

    fn make_summary(&self, outcome: AttemptOutcome) -> AttemptSummary {
        AttemptSummary {
            outcome,
            score: self.score,
            frames: self.level_time,
            deaths: match outcome {
                AttemptOutcome::Failed if !self.training => 1,
                _ => 0,
            },
            swaps: self.swap.count(),
            training: self.training,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;

    fn session() -> GameSession {
        let level = Level::empty(Vec2::new(100.0, 100.0), Rect::new(900.0, 0.0, 80.0, 80.0));
        GameSession::new(level, Tuning::default())
    }

    #[test]
    fn test_new_session_spawns_both_actors() {
        let s = session();
        assert_eq!(s.phase(), LifePhase::Normal);
        assert_eq!(s.live().role, Role::Live);
        let echo = s.echo().unwrap();
        assert_eq!(echo.role, Role::Echo);
        assert_eq!(echo.pos, s.live().pos);
        assert!(s.second_life_available());
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_promotion_inherits_powers() {
        let mut s = session();
        s.live.powers.double_jump = true;
        s.live.powers.double_jump_used = true;
        s.live.powers.invincible_frames = 42;
        s.echo.as_mut().unwrap().pos = Vec2::new(10.0, 20.0);

        s.on_failure();

        assert_eq!(s.phase(), LifePhase::OnSecondLife);
        assert!(s.echo().is_none());
        assert_eq!(s.live().role, Role::Live);
        assert_eq!(s.live().pos, Vec2::new(10.0, 20.0));
        assert!(s.live().powers.double_jump);
        assert!(!s.live().powers.double_jump_used);
        assert_eq!(s.live().powers.invincible_frames, 42);
        assert!(matches!(
            s.events(),
            [GameEvent::SecondLifeTriggered { .. }]
        ));
    }

    #[test]
    fn test_second_failure_is_terminal() {
        let mut s = session();
        s.on_failure();
        s.on_failure();
        assert_eq!(s.phase(), LifePhase::Failed);
        let summary = s.summary().unwrap();
        assert_eq!(summary.outcome, AttemptOutcome::Failed);
        assert_eq!(summary.deaths, 1);

        // Nothing moves a terminal session
        s.on_failure();
        assert_eq!(s.phase(), LifePhase::Failed);
    }

    #[test]
    fn test_terminal_transition_discards_history() {
        let mut s = session();
        for i in 0..5 {
            s.history.record(Vec2::new(i as f32, 0.0));
        }
        s.on_failure();
        // Second life keeps the path
        assert_eq!(s.history().len(), 5);

        s.on_failure();
        assert_eq!(s.phase(), LifePhase::Failed);
        assert!(s.history().is_empty());

        let mut s = session();
        s.history.record(Vec2::ONE);
        s.clear();
        assert!(s.history().is_empty());
        assert_eq!(s.summary().unwrap().outcome, AttemptOutcome::Cleared);
    }

    #[test]
    fn test_promotion_without_echo_fails() {
        let mut s = session();
        s.echo = None;
        s.promote_echo();
        assert_eq!(s.phase(), LifePhase::Failed);
    }

    #[test]
    fn test_training_skips_score_and_deaths() {
        let mut s = session().with_training(true);
        s.add_score(100);
        assert_eq!(s.score(), 0);
        s.on_failure();
        s.on_failure();
        let summary = s.summary().unwrap();
        assert_eq!(summary.deaths, 0);
        assert!(summary.training);
    }

    #[test]
    fn test_clear_adds_bonus() {
        let mut s = session();
        s.add_score(100);
        s.clear();
        assert_eq!(s.phase(), LifePhase::Cleared);
        assert_eq!(s.score(), 1100);
        assert_eq!(s.summary().unwrap().outcome, AttemptOutcome::Cleared);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut s = session().with_training(true);
        s.level_time = 500;
        s.history.record(Vec2::ONE);
        s.on_failure();

        let level = Level::empty(Vec2::new(5.0, 5.0), Rect::new(900.0, 0.0, 80.0, 80.0));
        s.restart(level);

        assert_eq!(s.phase(), LifePhase::Normal);
        assert_eq!(s.level_time(), 0);
        assert!(s.history().is_empty());
        assert!(s.echo().is_some());
        assert_eq!(s.live().pos, Vec2::new(5.0, 5.0));
        assert!(s.is_training());
        assert!(s.summary().is_none());
    }
}
