//! Deterministic simulation module
//!
//! The whole round lives here and must stay pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! Sensor input, countdown ticks, and externally reported contacts enter
//! through `Round` methods; threaded hosts funnel them via `crate::driver`.

pub mod contact;
pub mod spawn;
pub mod state;
pub mod tick;

pub use contact::{
    BALL_CATEGORY, BodyRect, Contact, ContactKind, HAZARD_CATEGORY, PAD_CATEGORY, classify,
    circle_rect_overlap,
};
pub use spawn::{bucket, despawn_expired, spawn_obstacle};
pub use state::{Ball, Obstacle, ObstacleVariant, Round, RoundPhase, Side, SimEvent};
pub use tick::{TickInput, tick};
