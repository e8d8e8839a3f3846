//! Actors and their fixed-step physics
//!
//! Only the live actor is ever stepped. The echo is repositioned from
//! recorded history and never touches physics or collision.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::Tuning;

/// Who drives an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Driven by input and physics
    Live,
    /// Driven by delayed replay of the live actor's history
    Echo,
}

/// Power-ups carried by an actor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerUps {
    pub double_jump: bool,
    /// Mid-air jump spent during the current airborne period
    pub double_jump_used: bool,
    /// Remaining invincibility frames (0 = not invincible)
    pub invincible_frames: u32,
}

impl PowerUps {
    #[inline]
    pub fn invincible(&self) -> bool {
        self.invincible_frames > 0
    }

    /// Count down the shield; clears itself at zero
    pub fn tick(&mut self) {
        self.invincible_frames = self.invincible_frames.saturating_sub(1);
    }
}

/// A controllable body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub role: Role,
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub grounded: bool,
    pub powers: PowerUps,
}

impl Actor {
    pub fn new(role: Role, pos: Vec2, size: f32) -> Self {
        Self {
            role,
            pos,
            vel: Vec2::ZERO,
            size,
            grounded: false,
            powers: PowerUps::default(),
        }
    }

    pub fn is_echo(&self) -> bool {
        self.role == Role::Echo
    }

    /// Collision box at the current position
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, Vec2::splat(self.size))
    }

    /// Set horizontal velocity from held directions (right wins if both held)
    pub fn steer(&mut self, left: bool, right: bool, speed: f32) {
        self.vel.x = if right {
            speed
        } else if left {
            -speed
        } else {
            0.0
        };
    }

    /// Jump if grounded, otherwise spend the double jump if one is available.
    /// Returns false when no jump happened.
    pub fn jump(&mut self, tuning: &Tuning) -> bool {
        if self.grounded {
            self.vel.y = tuning.jump_impulse;
            self.grounded = false;
            self.powers.double_jump_used = false;
            true
        } else if self.powers.double_jump && !self.powers.double_jump_used {
            self.vel.y = tuning.double_jump_impulse();
            self.powers.double_jump_used = true;
            true
        } else {
            false
        }
    }

    /// Advance one frame against the solid platforms.
    ///
    /// Axes are resolved separately: horizontal first (push out on the side
    /// we moved from), then gravity and vertical (land on top or bump the
    /// underside). Horizontal position is finally clamped to the world.
    pub fn step(&mut self, solids: &[Rect], tuning: &Tuning) {
        // --- HORIZONTAL ---
        self.pos.x += self.vel.x;
        for platform in solids {
            if !self.rect().overlaps(platform) {
                continue;
            }
            if self.vel.x > 0.0 {
                self.pos.x = platform.left() - self.size;
            } else if self.vel.x < 0.0 {
                self.pos.x = platform.right();
            }
        }

        // --- VERTICAL ---
        self.vel.y = (self.vel.y + tuning.gravity).min(tuning.max_fall_speed);
        self.pos.y += self.vel.y;
        self.grounded = false;

        for platform in solids {
            if !self.rect().overlaps(platform) {
                continue;
            }
            if self.vel.y > 0.0 {
                self.pos.y = platform.top() - self.size;
                self.grounded = true;
                self.vel.y = 0.0;
            } else if self.vel.y < 0.0 {
                self.pos.y = platform.bottom();
                self.vel.y = 0.0;
            }
        }

        let max_x = (tuning.world_width - self.size).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);
    }

    /// Copy over what survives a second-life hand-off
    pub fn inherit_powers(&mut self, from: &Actor) {
        self.powers.double_jump = from.powers.double_jump;
        self.powers.invincible_frames = from.powers.invincible_frames;
    }
}
