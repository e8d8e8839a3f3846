//! Quantum swap: trade places with the echo
//!
//! Only positions change hands. Roles, velocities and power-ups stay with
//! their actors, and which actor is live never changes here.

use glam::Vec2;

use super::actor::Actor;

/// Why a swap command was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapRejection {
    /// Still cooling down (frames left)
    Cooldown(u32),
    /// Second life in use: there is no echo left to swap with
    NoEcho,
}

/// Result of a swap command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwapResult {
    /// Positions exchanged; where each actor now stands
    Swapped { live_at: Vec2, echo_at: Vec2 },
    Rejected(SwapRejection),
}

/// Cooldown-gated position exchange between the live actor and the echo
#[derive(Debug, Clone, Default)]
pub struct SwapController {
    cooldown: u32,
    /// Frames the cooldown resets to after a swap
    duration: u32,
    /// Swaps performed this level attempt
    count: u32,
}

impl SwapController {
    pub fn new(duration: u32) -> Self {
        Self {
            cooldown: 0,
            duration,
            count: 0,
        }
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn ready(&self) -> bool {
        self.cooldown == 0
    }

    /// Count the cooldown down by one frame
    pub fn tick(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }

    /// Exchange positions if the cooldown has elapsed and an echo exists.
    ///
    /// A rejected swap changes nothing.
    pub fn try_swap(&mut self, live: &mut Actor, echo: Option<&mut Actor>) -> SwapResult {
        if !self.ready() {
            return SwapResult::Rejected(SwapRejection::Cooldown(self.cooldown));
        }
        let Some(echo) = echo else {
            return SwapResult::Rejected(SwapRejection::NoEcho);
        };

        std::mem::swap(&mut live.pos, &mut echo.pos);
        self.cooldown = self.duration;
        self.count += 1;

        SwapResult::Swapped {
            live_at: live.pos,
            echo_at: echo.pos,
        }
    }
}
