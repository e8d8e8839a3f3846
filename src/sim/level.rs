//! Level geometry: platforms, hazards, pickups, keys and the exit gate
//!
//! Levels are authored as JSON (`LevelData`) and turned into a runtime
//! `Level`. The simulation only reads the geometry, except for pickups and
//! keys which it takes out of the level on contact.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::{DEFAULT_MOVE_RANGE, EXIT_SIZE, KEY_SIZE, PICKUP_SIZE};
use crate::{QuantumError, Tuning};

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    /// Worth points, no effect
    #[default]
    Gem,
    /// Unlocks one mid-air jump per airborne period
    DoubleJump,
    /// Timed invincibility against hazards
    Shield,
}

/// Solid or pass-through state of a temporal platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseState {
    #[default]
    Solid,
    Phased,
}

// === Authored data ===

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointData {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformData {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub moving: bool,
    #[serde(default = "default_move_range")]
    pub move_range: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalPlatformData {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub initial_state: PhaseState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardData {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(rename = "type", default = "default_hazard_kind")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectibleData {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "type", default)]
    pub kind: PickupKind,
}

/// A complete level as authored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub start: PointData,
    #[serde(default = "default_exit")]
    pub end: PointData,
    #[serde(default)]
    pub platforms: Vec<PlatformData>,
    #[serde(default)]
    pub temporal_platforms: Vec<TemporalPlatformData>,
    #[serde(default)]
    pub hazards: Vec<HazardData>,
    #[serde(default)]
    pub collectibles: Vec<CollectibleData>,
    /// Keys that unlock the exit (called buttons in older level files)
    #[serde(default, alias = "keys")]
    pub buttons: Vec<PointData>,
}

fn default_move_range() -> f32 {
    DEFAULT_MOVE_RANGE
}

fn default_hazard_kind() -> String {
    "spike".to_string()
}

fn default_exit() -> PointData {
    PointData { x: 900.0, y: 100.0 }
}

// === Runtime geometry ===

/// A static or horizontally sliding platform
#[derive(Debug, Clone)]
pub struct Platform {
    pub rect: Rect,
    pub moving: bool,
    origin_x: f32,
    move_range: f32,
    direction: f32,
}

impl Platform {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            moving: false,
            origin_x: rect.left(),
            move_range: DEFAULT_MOVE_RANGE,
            direction: 1.0,
        }
    }

    pub fn sliding(rect: Rect, move_range: f32) -> Self {
        Self {
            moving: true,
            move_range,
            ..Self::new(rect)
        }
    }

    /// Slide one frame, turning around once past the move range
    pub fn update(&mut self, speed: f32) {
        if !self.moving {
            return;
        }
        self.rect.pos.x += speed * self.direction;
        if (self.rect.left() - self.origin_x).abs() > self.move_range {
            self.direction = -self.direction;
        }
    }
}

/// A platform that alternates between solid and phased on frame timers
#[derive(Debug, Clone)]
pub struct TemporalPlatform {
    pub rect: Rect,
    pub state: PhaseState,
    /// Frames spent in the current state
    pub timer: u32,
    solid_frames: u32,
    phased_frames: u32,
}

impl TemporalPlatform {
    pub fn new(rect: Rect, state: PhaseState, solid_frames: u32, phased_frames: u32) -> Self {
        Self {
            rect,
            state,
            timer: 0,
            solid_frames,
            phased_frames,
        }
    }

    pub fn is_solid(&self) -> bool {
        self.state == PhaseState::Solid
    }

    pub fn update(&mut self) {
        self.timer += 1;
        let limit = match self.state {
            PhaseState::Solid => self.solid_frames,
            PhaseState::Phased => self.phased_frames,
        };
        if self.timer > limit {
            self.state = match self.state {
                PhaseState::Solid => PhaseState::Phased,
                PhaseState::Phased => PhaseState::Solid,
            };
            self.timer = 0;
        }
    }
}

#[derive(Debug, Clone)]
pub struct Hazard {
    pub rect: Rect,
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub rect: Rect,
}

/// Objective item; all keys must be collected to open the exit
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    pub id: u32,
    pub rect: Rect,
}

/// Level exit, locked while keys remain
#[derive(Debug, Clone)]
pub struct ExitGate {
    pub rect: Rect,
    locked: bool,
}

impl ExitGate {
    pub fn new(rect: Rect, locked: bool) -> Self {
        Self { rect, locked }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Unlock once no keys remain. Returns true only on the frame it opens;
    /// an open gate never locks again.
    pub fn refresh(&mut self, keys_left: usize) -> bool {
        if self.locked && keys_left == 0 {
            self.locked = false;
            return true;
        }
        false
    }
}

/// Runtime level state
#[derive(Debug, Clone)]
pub struct Level {
    /// Spawn point (top-left of both actors)
    pub start: Vec2,
    pub platforms: Vec<Platform>,
    pub temporal_platforms: Vec<TemporalPlatform>,
    pub hazards: Vec<Hazard>,
    pub pickups: Vec<Pickup>,
    pub keys: Vec<Key>,
    pub exit: ExitGate,
    moving_platform_speed: f32,
    next_id: u32,
}

impl Level {
    /// An empty level with an unlocked exit
    pub fn empty(start: Vec2, exit: Rect) -> Self {
        Self {
            start,
            platforms: Vec::new(),
            temporal_platforms: Vec::new(),
            hazards: Vec::new(),
            pickups: Vec::new(),
            keys: Vec::new(),
            exit: ExitGate::new(exit, false),
            moving_platform_speed: crate::consts::MOVING_PLATFORM_SPEED,
            next_id: 1,
        }
    }

    /// Build a runtime level from authored data
    pub fn from_data(data: &LevelData, tuning: &Tuning) -> Result<Self, QuantumError> {
        validate(data)?;

        let exit = Rect::new(data.end.x, data.end.y, EXIT_SIZE, EXIT_SIZE);
        let mut level = Self::empty(Vec2::new(data.start.x, data.start.y), exit);
        level.moving_platform_speed = tuning.moving_platform_speed;

        for p in &data.platforms {
            let rect = Rect::new(p.x, p.y, p.width, p.height);
            level.platforms.push(if p.moving {
                Platform::sliding(rect, p.move_range)
            } else {
                Platform::new(rect)
            });
        }

        for p in &data.temporal_platforms {
            level.temporal_platforms.push(TemporalPlatform::new(
                Rect::new(p.x, p.y, p.width, p.height),
                p.initial_state,
                tuning.temporal_solid_frames,
                tuning.temporal_phased_frames,
            ));
        }

        for h in &data.hazards {
            level.hazards.push(Hazard {
                rect: Rect::new(h.x, h.y, h.width, h.height),
                kind: h.kind.clone(),
            });
        }

        for c in &data.collectibles {
            level.add_pickup(c.kind, Vec2::new(c.x, c.y));
        }

        for k in &data.buttons {
            level.add_key(Vec2::new(k.x, k.y));
        }

        level.exit = ExitGate::new(exit, !level.keys.is_empty());

        log::info!(
            "Level built: {} platforms, {} temporal, {} hazards, {} pickups, {} keys",
            level.platforms.len(),
            level.temporal_platforms.len(),
            level.hazards.len(),
            level.pickups.len(),
            level.keys.len()
        );

        Ok(level)
    }

    /// Parse and build a level from JSON
    pub fn from_json(json: &str, tuning: &Tuning) -> Result<Self, QuantumError> {
        let data: LevelData = serde_json::from_str(json)?;
        Self::from_data(&data, tuning)
    }

    /// Load a level file
    pub fn load(path: impl AsRef<Path>, tuning: &Tuning) -> Result<Self, QuantumError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json, tuning)
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place a pickup with its top-left at `pos`
    pub fn add_pickup(&mut self, kind: PickupKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.pickups.push(Pickup {
            id,
            kind,
            rect: Rect::from_pos_size(pos, Vec2::splat(PICKUP_SIZE)),
        });
        id
    }

    /// Place a key with its top-left at `pos`
    pub fn add_key(&mut self, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.keys.push(Key {
            id,
            rect: Rect::from_pos_size(pos, Vec2::splat(KEY_SIZE)),
        });
        id
    }

    /// Rectangles that block movement this frame (phased platforms excluded)
    pub fn solid_platforms(&self) -> Vec<Rect> {
        self.platforms
            .iter()
            .map(|p| p.rect)
            .chain(
                self.temporal_platforms
                    .iter()
                    .filter(|p| p.is_solid())
                    .map(|p| p.rect),
            )
            .collect()
    }

    pub fn touches_hazard(&self, body: &Rect) -> bool {
        self.hazards.iter().any(|h| h.rect.overlaps(body))
    }

    /// Remove and return the first pickup overlapping `body`
    pub fn take_pickup(&mut self, body: &Rect) -> Option<Pickup> {
        let idx = self.pickups.iter().position(|p| p.rect.overlaps(body))?;
        Some(self.pickups.remove(idx))
    }

    /// Remove and return the first key overlapping `body`
    pub fn take_key(&mut self, body: &Rect) -> Option<Key> {
        let idx = self.keys.iter().position(|k| k.rect.overlaps(body))?;
        Some(self.keys.remove(idx))
    }

    pub fn gems_left(&self) -> usize {
        self.pickups
            .iter()
            .filter(|p| p.kind == PickupKind::Gem)
            .count()
    }

    pub fn keys_left(&self) -> usize {
        self.keys.len()
    }

    pub fn exit_locked(&self) -> bool {
        self.exit.is_locked()
    }

    /// Advance moving and temporal platforms one frame and re-check the exit.
    /// Returns true on the frame the exit unlocks.
    pub fn update(&mut self) -> bool {
        for platform in &mut self.platforms {
            platform.update(self.moving_platform_speed);
        }
        for platform in &mut self.temporal_platforms {
            platform.update();
        }
        self.exit.refresh(self.keys.len())
    }
}

fn validate(data: &LevelData) -> Result<(), QuantumError> {
    let sizes = data
        .platforms
        .iter()
        .map(|p| ("platform", p.width, p.height))
        .chain(
            data.temporal_platforms
                .iter()
                .map(|p| ("temporal platform", p.width, p.height)),
        )
        .chain(data.hazards.iter().map(|h| ("hazard", h.width, h.height)));

    for (i, (what, width, height)) in sizes.enumerate() {
        if !(width > 0.0 && height > 0.0) {
            return Err(QuantumError::InvalidLevel {
                detail: format!("{what} (entry {i}) has non-positive size {width}x{height}"),
            });
        }
    }

    let finite = [data.start.x, data.start.y, data.end.x, data.end.y]
        .iter()
        .all(|v| v.is_finite());
    if !finite {
        return Err(QuantumError::InvalidLevel {
            detail: "start or end position is not finite".to_string(),
        });
    }

    Ok(())
}
