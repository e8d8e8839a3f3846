//! Quantum Echo - a platformer where your past self follows you
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actor physics, echo replay, swap, second life)
//! - `tuning`: Data-driven game balance
//! - `campaign`: Level progression and run totals
//! - `ranking`: Persisted leaderboard

pub mod campaign;
pub mod error;
pub mod ranking;
pub mod sim;
pub mod tuning;

pub use campaign::{Campaign, CampaignStep};
pub use error::QuantumError;
pub use ranking::Ranking;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (one logic update per display frame)
    pub const FPS: u32 = 60;

    /// World dimensions (pixels, y grows downward)
    pub const WORLD_WIDTH: f32 = 1024.0;
    pub const WORLD_HEIGHT: f32 = 768.0;

    /// Actor physics (per frame)
    pub const GRAVITY: f32 = 0.8;
    pub const MOVE_SPEED: f32 = 5.0;
    pub const JUMP_IMPULSE: f32 = -15.0;
    /// Second jump is a bit weaker than the first
    pub const DOUBLE_JUMP_FACTOR: f32 = 0.8;
    pub const MAX_FALL_SPEED: f32 = 20.0;
    /// Actors are square
    pub const ACTOR_SIZE: f32 = 40.0;

    /// Echo follows the live actor 10 seconds behind
    pub const ECHO_DELAY_FRAMES: usize = 600;
    /// 3 seconds between swaps
    pub const SWAP_COOLDOWN_FRAMES: u32 = 180;
    /// Shield pickup lasts 10 seconds
    pub const SHIELD_FRAMES: u32 = 600;
    /// Ten minutes of history per attempt
    pub const HISTORY_CAPACITY: usize = 60 * 60 * 10;

    /// Level geometry
    pub const PICKUP_SIZE: f32 = 30.0;
    pub const KEY_SIZE: f32 = 40.0;
    pub const EXIT_SIZE: f32 = 80.0;
    pub const MOVING_PLATFORM_SPEED: f32 = 2.0;
    pub const DEFAULT_MOVE_RANGE: f32 = 100.0;
    pub const TEMPORAL_SOLID_FRAMES: u32 = 180;
    pub const TEMPORAL_PHASED_FRAMES: u32 = 120;

    /// Scoring
    pub const GEM_SCORE: u64 = 100;
    pub const DOUBLE_JUMP_SCORE: u64 = 50;
    pub const CLEAR_SCORE: u64 = 1000;
    pub const RESTART_PENALTY: u64 = 50;
}

/// Convert a frame count to whole seconds (HUD display)
#[inline]
pub fn frames_to_secs(frames: u64) -> u64 {
    frames / consts::FPS as u64
}

/// Seconds left on a frame countdown, rounded up so "0s" only shows at zero
#[inline]
pub fn cooldown_secs(frames: u32) -> u32 {
    frames.div_ceil(consts::FPS)
}
