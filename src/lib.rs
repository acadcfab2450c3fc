//! Tiltfall - a tilt-controlled falling-ball survival game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (round state machine, spawner, contacts)
//! - `sensor`: Accelerometer tilt smoothing
//! - `timer`: Cancellable 1 Hz countdown tick sources
//! - `driver`: Single-consumer event funnel for threaded hosts
//! - `outcome`: Round outcome hand-off and result-URL payload
//! - `tuning`: Data-driven game balance

pub mod driver;
pub mod outcome;
pub mod sensor;
pub mod sim;
pub mod timer;
pub mod tuning;

pub use outcome::{OutcomeHandler, ResultUrls};
pub use sensor::TiltFilter;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Survival time needed to win, in seconds
    pub const WIN_TIME_SECS: i32 = 30;

    /// World scroll speed: how fast obstacles traverse the playfield
    pub const FALL_SPEED: f32 = 200.0;
    /// Extra travel past the playfield edge before an obstacle despawns
    pub const TRAVEL_OFFSET: f32 = 25.0;

    /// Default playfield dimensions (portrait phone aspect)
    pub const PLAYFIELD_WIDTH: f32 = 390.0;
    pub const PLAYFIELD_HEIGHT: f32 = 844.0;
    /// Hard boundary margin the ball is clamped to after every step
    pub const EDGE_MARGIN: f32 = 10.0;

    /// Ball geometry
    pub const BALL_SIZE: f32 = 50.0;
    pub const BALL_RADIUS: f32 = BALL_SIZE / 2.0;

    /// Horizontal velocity per unit of smoothed tilt
    pub const TILT_GAIN: f32 = 1000.0;
    /// Tilt smoothing factor: new = SMOOTHING * raw + (1 - SMOOTHING) * old
    pub const TILT_SMOOTHING: f32 = 0.75;
    /// Sensor sampling cadence in seconds (~5 Hz)
    pub const SENSOR_INTERVAL_SECS: f32 = 0.2;

    /// Pad height; pad width spans the playfield minus a ball-sized gap
    pub const PAD_HEIGHT: f32 = 30.0;
    /// Gap between a pad's free edge and the far wall, beyond the ball itself
    pub const PAD_GAP_EXTRA: f32 = 20.0;
    /// Hazard body inset from the pad's free edge
    pub const HAZARD_INSET: f32 = 40.0;
    /// Hazard body dimensions (half the flame sprite, which is cosmetic)
    pub const HAZARD_WIDTH: f32 = 32.0;
    pub const HAZARD_HEIGHT: f32 = 26.0;

    /// Spawner cadence in seconds
    pub const SPAWN_INTERVAL_SECS: f32 = 1.0;
    /// Upper bound (inclusive) of the spawner's uniform roll
    pub const SPAWN_ROLL_MAX: u32 = 300;

    /// Moving pads advance by one ball width plus the gap extra
    pub const OSCILLATION_DISTANCE: f32 = BALL_SIZE + PAD_GAP_EXTRA;
    /// Oscillation timing: advance 1 s, pause 1.5 s, retreat 1 s, pause 1.5 s
    pub const OSCILLATION_MOVE_SECS: f32 = 1.0;
    pub const OSCILLATION_PAUSE_SECS: f32 = 1.5;

    /// Fire sequence length: 8 frames at 0.1 s per frame
    pub const FIRE_SEQUENCE_SECS: f32 = 0.8;

    /// Downward gravity applied to the ball between velocity overrides
    pub const GRAVITY: f32 = -9.8;
}

/// Seconds to simulation ticks at the fixed timestep, rounded to nearest
#[inline]
pub fn secs_to_ticks(secs: f32) -> u32 {
    (secs / consts::SIM_DT).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secs_to_ticks() {
        assert_eq!(secs_to_ticks(1.0), 60);
        assert_eq!(secs_to_ticks(0.8), 48);
        assert_eq!(secs_to_ticks(1.5), 90);
    }
}
