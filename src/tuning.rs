//! Data-driven game balance
//!
//! Every number the simulation reads lives here so a run can be replayed
//! under a different balance without recompiling. Missing JSON fields fall
//! back to the defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::QuantumError;
use crate::consts::*;

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Actor physics ===
    pub gravity: f32,
    pub move_speed: f32,
    /// Negative: up is -y
    pub jump_impulse: f32,
    pub double_jump_factor: f32,
    pub max_fall_speed: f32,
    pub actor_size: f32,

    // === World ===
    pub world_width: f32,
    pub world_height: f32,

    // === Echo ===
    /// Frames between the live actor passing a point and the echo reaching it
    pub echo_delay: usize,
    /// Recorded frames kept per attempt (raised to `echo_delay + 1` if lower)
    pub history_capacity: usize,
    pub swap_cooldown: u32,

    // === Pickups ===
    pub shield_frames: u32,

    // === Level geometry ===
    pub temporal_solid_frames: u32,
    pub temporal_phased_frames: u32,
    pub moving_platform_speed: f32,

    // === Scoring ===
    pub gem_score: u64,
    pub double_jump_score: u64,
    pub clear_score: u64,
    pub restart_penalty: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            move_speed: MOVE_SPEED,
            jump_impulse: JUMP_IMPULSE,
            double_jump_factor: DOUBLE_JUMP_FACTOR,
            max_fall_speed: MAX_FALL_SPEED,
            actor_size: ACTOR_SIZE,

            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,

            echo_delay: ECHO_DELAY_FRAMES,
            history_capacity: HISTORY_CAPACITY,
            swap_cooldown: SWAP_COOLDOWN_FRAMES,

            shield_frames: SHIELD_FRAMES,

            temporal_solid_frames: TEMPORAL_SOLID_FRAMES,
            temporal_phased_frames: TEMPORAL_PHASED_FRAMES,
            moving_platform_speed: MOVING_PLATFORM_SPEED,

            gem_score: GEM_SCORE,
            double_jump_score: DOUBLE_JUMP_SCORE,
            clear_score: CLEAR_SCORE,
            restart_penalty: RESTART_PENALTY,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON document
    pub fn from_json(json: &str) -> Result<Self, QuantumError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the physics step cannot run with
    pub fn validate(&self) -> Result<(), QuantumError> {
        let invalid = |detail: String| Err(QuantumError::InvalidTuning { detail });

        let positive = [
            ("actor_size", self.actor_size),
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("move_speed", self.move_speed),
            ("max_fall_speed", self.max_fall_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return invalid(format!("{name} must be positive, got {value}"));
            }
        }

        let finite = [
            ("gravity", self.gravity),
            ("jump_impulse", self.jump_impulse),
            ("double_jump_factor", self.double_jump_factor),
            ("moving_platform_speed", self.moving_platform_speed),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return invalid(format!("{name} must be finite, got {value}"));
        }

        if self.world_width < self.actor_size {
            return invalid(format!(
                "world_width {} is narrower than actor_size {}",
                self.world_width, self.actor_size
            ));
        }

        if self.echo_delay.checked_add(1).is_none() {
            return invalid(format!("echo_delay {} is out of range", self.echo_delay));
        }

        Ok(())
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, QuantumError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// History capacity actually used: always enough to reach the echo delay
    pub fn effective_history_capacity(&self) -> usize {
        self.history_capacity.max(self.echo_delay.saturating_add(1))
    }

    /// Impulse of the mid-air jump
    pub fn double_jump_impulse(&self) -> f32 {
        self.jump_impulse * self.double_jump_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let tuning = Tuning::default();
        assert_eq!(tuning.echo_delay, 600);
        assert_eq!(tuning.swap_cooldown, 180);
        assert_eq!(tuning.shield_frames, 600);
        assert!((tuning.double_jump_impulse() - (-12.0)).abs() < 1e-5);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "echo_delay": 120, "gravity": 1.0 }"#).unwrap();
        assert_eq!(tuning.echo_delay, 120);
        assert_eq!(tuning.gravity, 1.0);
        assert_eq!(tuning.move_speed, MOVE_SPEED);
        assert_eq!(tuning.swap_cooldown, SWAP_COOLDOWN_FRAMES);
    }

    #[test]
    fn test_history_capacity_covers_delay() {
        let tuning = Tuning {
            echo_delay: 900,
            history_capacity: 10,
            ..Default::default()
        };
        assert_eq!(tuning.effective_history_capacity(), 901);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            Tuning::from_json("{ echo_delay: }"),
            Err(QuantumError::Json(_))
        ));
    }

    #[test]
    fn test_world_narrower_than_actor_is_rejected() {
        assert!(matches!(
            Tuning::from_json(r#"{ "world_width": 30.0 }"#),
            Err(QuantumError::InvalidTuning { .. })
        ));
        assert!(Tuning::from_json(r#"{ "world_width": 40.0 }"#).is_ok());
    }

    #[test]
    fn test_non_positive_sizes_and_speeds_rejected() {
        for json in [
            r#"{ "actor_size": 0.0 }"#,
            r#"{ "move_speed": -5.0 }"#,
            r#"{ "world_height": 0.0 }"#,
            r#"{ "max_fall_speed": 0.0 }"#,
        ] {
            assert!(
                matches!(Tuning::from_json(json), Err(QuantumError::InvalidTuning { .. })),
                "{json}"
            );
        }
    }

    #[test]
    fn test_echo_delay_overflow_rejected() {
        let tuning = Tuning {
            echo_delay: usize::MAX,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(QuantumError::InvalidTuning { .. })
        ));
        assert!(Tuning::default().validate().is_ok());
    }
}
