//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per frame)
//! - No wall-clock time, no randomness
//! - Stable iteration order (level collections keep authoring order)
//! - No rendering or platform dependencies

pub mod actor;
pub mod collision;
pub mod history;
pub mod level;
pub mod rect;
pub mod state;
pub mod swap;
pub mod tick;

pub use actor::{Actor, PowerUps, Role};
pub use collision::{Outcome, check_outcome};
pub use history::{EchoReplayer, HistoryBuffer};
pub use level::{ExitGate, Level, LevelData, PhaseState, PickupKind};
pub use rect::Rect;
pub use state::{AttemptOutcome, AttemptSummary, GameEvent, GameSession, LifePhase};
pub use swap::{SwapController, SwapRejection, SwapResult};
pub use tick::{TickInput, tick};
