//! Fixed timestep simulation tick
//!
//! One call advances a level attempt by exactly one frame. The order of the
//! steps below is part of the game's behavior: physics settles before
//! collisions are checked, the settled position is recorded before anything
//! can move the live actor, the echo reads history only after this frame's
//! entry exists, and a swap lands last so it never shifts the replay by a
//! frame. A swapped actor is collision-checked on the next frame.

use super::collision::{self, Outcome};
use super::state::{GameEvent, GameSession};
use super::swap::SwapResult;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held
    pub move_left: bool,
    /// Held
    pub move_right: bool,
    /// Pressed this frame
    pub jump: bool,
    /// Pressed this frame
    pub swap: bool,
}

/// Advance the session by one frame
pub fn tick(session: &mut GameSession, input: &TickInput) {
    session.events.clear();

    // Terminal attempts are frozen until restarted
    if session.phase.is_terminal() {
        return;
    }

    session.level_time += 1;
    session.swap.tick();

    // Input
    let tuning = &session.tuning;
    session
        .live
        .steer(input.move_left, input.move_right, tuning.move_speed);
    if input.jump {
        let airborne = !session.live.grounded;
        if session.live.jump(tuning) {
            session.events.push(GameEvent::Jumped { double: airborne });
        }
    }

    // Physics, then collisions against the settled position
    let solids = session.level.solid_platforms();
    session.live.step(&solids, tuning);
    let outcome = collision::check_outcome(&mut session.live, &mut session.level, tuning);
    session.live.powers.tick();

    // Record the live actor (whoever that is now) every frame
    session.history.record(session.live.pos);
    debug_assert_eq!(session.history.recorded() as u64, session.level_time);

    if let Some(outcome) = outcome {
        handle_outcome(session, outcome);
        if session.phase.is_terminal() {
            return;
        }
    }

    if session.level.update() {
        log::info!("Exit unlocked at frame {}", session.level_time);
        session.events.push(GameEvent::ExitUnlocked);
    }

    // Echo follows the recorded path
    if let Some(echo) = session.echo.as_mut() {
        let frame = session.level_time as usize;
        session.replayer.apply(&session.history, frame, echo);
    }

    if !session.level.exit_locked() && session.live.rect().overlaps(&session.level.exit.rect) {
        session.clear();
        return;
    }

    if input.swap {
        apply_swap(session);
    }
}

fn handle_outcome(session: &mut GameSession, outcome: Outcome) {
    use super::level::PickupKind;

    let event = match outcome {
        Outcome::Hit => GameEvent::Hit,
        Outcome::Fell => GameEvent::Fell,
        Outcome::Pickup(kind) => {
            let points = match kind {
                PickupKind::Gem => session.tuning.gem_score,
                PickupKind::DoubleJump => session.tuning.double_jump_score,
                PickupKind::Shield => 0,
            };
            session.add_score(points);
            log::debug!("Picked up {:?} at frame {}", kind, session.level_time);
            GameEvent::Pickup(kind)
        }
        Outcome::ObjectiveCollected => {
            log::debug!(
                "Key collected at frame {} ({} left)",
                session.level_time,
                session.level.keys_left()
            );
            GameEvent::ObjectiveCollected
        }
    };
    session.events.push(event);

    if outcome.is_failure() {
        session.on_failure();
    }
}

fn apply_swap(session: &mut GameSession) {
    let size = session.live.size;
    match session.swap.try_swap(&mut session.live, session.echo.as_mut()) {
        SwapResult::Swapped { live_at, echo_at } => {
            let half = glam::Vec2::splat(size * 0.5);
            session.events.push(GameEvent::Swapped);
            session.events.push(GameEvent::SwapFlash { at: live_at + half });
            session.events.push(GameEvent::SwapFlash { at: echo_at + half });
            log::debug!(
                "Swap #{} at frame {}",
                session.swap.count(),
                session.level_time
            );
        }
        SwapResult::Rejected(reason) => {
            session.events.push(GameEvent::SwapRejected(reason));
            log::trace!("Swap rejected: {:?}", reason);
        }
    }
}
