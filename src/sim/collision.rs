//! Collision and pickup queries for the live actor
//!
//! Runs after physics has settled the actor for the frame. At most one
//! outcome is reported per frame, checked in a fixed priority order:
//! hazard, pickup, key, falling out of the world.

use super::actor::Actor;
use super::level::{Level, PickupKind};
use crate::Tuning;

/// What touching the level did to the live actor this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Touched a hazard without a shield
    Hit,
    /// Dropped below the bottom of the world
    Fell,
    /// Took a pickup (already removed from the level, effect applied)
    Pickup(PickupKind),
    /// Took a key (already removed from the level)
    ObjectiveCollected,
}

impl Outcome {
    /// Outcomes that cost a life
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Hit | Outcome::Fell)
    }
}

/// Check the live actor against hazards, pickups, keys and the world floor.
///
/// Pickups and keys are removed from the level on first contact, so the
/// same item can never be consumed twice.
pub fn check_outcome(actor: &mut Actor, level: &mut Level, tuning: &Tuning) -> Option<Outcome> {
    debug_assert!(!actor.is_echo(), "echo actors never collide");
    let body = actor.rect();

    if !actor.powers.invincible() && level.touches_hazard(&body) {
        return Some(Outcome::Hit);
    }

    if let Some(pickup) = level.take_pickup(&body) {
        apply_pickup(actor, pickup.kind, tuning);
        return Some(Outcome::Pickup(pickup.kind));
    }

    if level.take_key(&body).is_some() {
        return Some(Outcome::ObjectiveCollected);
    }

    if actor.pos.y > tuning.world_height {
        return Some(Outcome::Fell);
    }

    None
}

fn apply_pickup(actor: &mut Actor, kind: PickupKind, tuning: &Tuning) {
    match kind {
        PickupKind::Gem => {}
        PickupKind::DoubleJump => actor.powers.double_jump = true,
        PickupKind::Shield => actor.powers.invincible_frames = tuning.shield_frames,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::actor::Role;
    use crate::sim::level::Hazard;
    use crate::sim::rect::Rect;
    use glam::Vec2;

    fn level() -> Level {
        Level::empty(Vec2::ZERO, Rect::new(900.0, 0.0, 80.0, 80.0))
    }

    fn actor_at(x: f32, y: f32) -> Actor {
        Actor::new(Role::Live, Vec2::new(x, y), 40.0)
    }

    fn spike(x: f32, y: f32) -> Hazard {
        Hazard {
            rect: Rect::new(x, y, 40.0, 20.0),
            kind: "spike".into(),
        }
    }

    #[test]
    fn test_hazard_hits_unless_shielded() {
        let tuning = Tuning::default();
        let mut level = level();
        level.hazards.push(spike(110.0, 110.0));

        let mut actor = actor_at(100.0, 100.0);
        assert_eq!(check_outcome(&mut actor, &mut level, &tuning), Some(Outcome::Hit));

        actor.powers.invincible_frames = 10;
        assert_eq!(check_outcome(&mut actor, &mut level, &tuning), None);
    }

    #[test]
    fn test_hazard_outranks_pickup() {
        let tuning = Tuning::default();
        let mut level = level();
        level.hazards.push(spike(110.0, 110.0));
        level.add_pickup(PickupKind::Gem, Vec2::new(100.0, 100.0));

        let mut actor = actor_at(100.0, 100.0);
        assert_eq!(check_outcome(&mut actor, &mut level, &tuning), Some(Outcome::Hit));
        // The gem is still there
        assert_eq!(level.pickups.len(), 1);
    }

    #[test]
    fn test_pickup_effects() {
        let tuning = Tuning::default();
        let mut level = level();
        level.add_pickup(PickupKind::DoubleJump, Vec2::new(100.0, 100.0));
        level.add_pickup(PickupKind::Shield, Vec2::new(300.0, 100.0));

        let mut actor = actor_at(100.0, 100.0);
        assert_eq!(
            check_outcome(&mut actor, &mut level, &tuning),
            Some(Outcome::Pickup(PickupKind::DoubleJump))
        );
        assert!(actor.powers.double_jump);
        // Still overlapping the spot, but the pickup is gone
        assert_eq!(check_outcome(&mut actor, &mut level, &tuning), None);

        actor.pos = Vec2::new(300.0, 100.0);
        assert_eq!(
            check_outcome(&mut actor, &mut level, &tuning),
            Some(Outcome::Pickup(PickupKind::Shield))
        );
        assert_eq!(actor.powers.invincible_frames, tuning.shield_frames);
    }

    #[test]
    fn test_key_collected() {
        let tuning = Tuning::default();
        let mut level = level();
        level.add_key(Vec2::new(100.0, 100.0));

        let mut actor = actor_at(120.0, 100.0);
        assert_eq!(
            check_outcome(&mut actor, &mut level, &tuning),
            Some(Outcome::ObjectiveCollected)
        );
        assert_eq!(level.keys_left(), 0);
    }

    #[test]
    fn test_fell_out_of_world() {
        let tuning = Tuning::default();
        let mut level = level();

        let mut actor = actor_at(100.0, tuning.world_height);
        assert_eq!(check_outcome(&mut actor, &mut level, &tuning), None);

        actor.pos.y = tuning.world_height + 1.0;
        assert_eq!(check_outcome(&mut actor, &mut level, &tuning), Some(Outcome::Fell));
        assert!(Outcome::Fell.is_failure());
        assert!(!Outcome::ObjectiveCollected.is_failure());
    }
}
