//! Round state and core simulation types
//!
//! Everything a round owns lives here: phase, countdown, smoothed tilt, the
//! ball, and the live obstacles. A round is never reset in place; restart
//! always constructs a fresh instance so no stale obstacle or timer state can
//! leak across rounds.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::contact::{BodyRect, Contact, ContactKind};
use crate::consts::*;
use crate::secs_to_ticks;
use crate::timer::SecondTimer;
use crate::tuning::Tuning;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for start input; physics paused, spawner already running
    Idle,
    /// Countdown running, physics advancing
    Playing,
    /// Ball touched a hazard; fire sequence playing out, loss is inevitable
    OnFire,
    /// Terminal. A new round requires a fresh `Round` instance.
    Finished { won: bool },
}

/// Which wall an obstacle is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// Obstacle flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleVariant {
    /// Static pad the ball can land on
    Plain,
    /// Pad carrying a hazard body; touching the hazard ends the round
    Hazardous,
    /// Pad that oscillates toward the center and back
    Moving,
}

/// Oscillation cycle for moving pads: advance, pause, retreat, pause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OscPhase {
    Advance,
    PauseOut,
    Retreat,
    PauseIn,
}

/// A falling-relative pad obstacle
///
/// Obstacles enter at the bottom edge and scroll upward at the world fall
/// speed; they are despawned after their traversal lifetime elapses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub variant: ObstacleVariant,
    pub side: Side,
    /// Tick the obstacle was created on
    pub spawn_tick: u64,
    /// Bottom edge of the pad, in playfield coordinates
    pub y: f32,
    /// Horizontal oscillation offset from the anchored position (signed)
    pub osc_offset: f32,
    pub osc_phase: OscPhase,
    /// Seconds elapsed within the current oscillation phase
    pub osc_elapsed: f32,
}

impl Obstacle {
    /// Pad width leaves a ball-sized gap plus margin against the far wall
    pub fn pad_width(field_width: f32) -> f32 {
        field_width - BALL_SIZE - PAD_GAP_EXTRA
    }

    /// Signed direction toward the playfield center
    fn inward(&self) -> f32 {
        match self.side {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    /// The pad's collision rectangle
    pub fn pad_rect(&self, field_width: f32) -> BodyRect {
        let width = Self::pad_width(field_width);
        let x = match self.side {
            Side::Left => self.osc_offset,
            Side::Right => field_width - width + self.osc_offset,
        };
        BodyRect::new(Vec2::new(x, self.y), Vec2::new(width, PAD_HEIGHT))
    }

    /// The child hazard body, present only on hazardous pads.
    ///
    /// Sits on top of the pad, inset from the anchored wall edge.
    pub fn hazard_rect(&self, field_width: f32) -> Option<BodyRect> {
        if self.variant != ObstacleVariant::Hazardous {
            return None;
        }
        let pad = self.pad_rect(field_width);
        let center_x = match self.side {
            Side::Left => pad.min.x + HAZARD_INSET,
            Side::Right => pad.max().x - HAZARD_INSET,
        };
        Some(BodyRect::new(
            Vec2::new(center_x - HAZARD_WIDTH / 2.0, pad.min.y + PAD_HEIGHT),
            Vec2::new(HAZARD_WIDTH, HAZARD_HEIGHT),
        ))
    }

    /// Advance scroll and oscillation by one timestep
    pub fn advance(&mut self, dt: f32, fall_speed: f32) {
        self.y += fall_speed * dt;

        if self.variant != ObstacleVariant::Moving {
            return;
        }
        self.osc_elapsed += dt;
        let osc_speed = OSCILLATION_DISTANCE / OSCILLATION_MOVE_SECS;
        match self.osc_phase {
            OscPhase::Advance => {
                self.osc_offset += self.inward() * osc_speed * dt;
                if self.osc_elapsed >= OSCILLATION_MOVE_SECS {
                    self.osc_offset = self.inward() * OSCILLATION_DISTANCE;
                    self.enter_osc_phase(OscPhase::PauseOut);
                }
            }
            OscPhase::PauseOut => {
                if self.osc_elapsed >= OSCILLATION_PAUSE_SECS {
                    self.enter_osc_phase(OscPhase::Retreat);
                }
            }
            OscPhase::Retreat => {
                self.osc_offset -= self.inward() * osc_speed * dt;
                if self.osc_elapsed >= OSCILLATION_MOVE_SECS {
                    self.osc_offset = 0.0;
                    self.enter_osc_phase(OscPhase::PauseIn);
                }
            }
            OscPhase::PauseIn => {
                if self.osc_elapsed >= OSCILLATION_PAUSE_SECS {
                    self.enter_osc_phase(OscPhase::Advance);
                }
            }
        }
    }

    fn enter_osc_phase(&mut self, phase: OscPhase) {
        self.osc_phase = phase;
        self.osc_elapsed = 0.0;
    }

    /// Ticks until the obstacle has traversed the playfield and despawns
    pub fn lifetime_ticks(field_height: f32, fall_speed: f32) -> u32 {
        secs_to_ticks((field_height + TRAVEL_OFFSET) / fall_speed)
    }
}

/// The single ball of a round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub on_fire: bool,
}

impl Ball {
    /// Ball starts at the playfield center
    pub fn new(field_width: f32, field_height: f32) -> Self {
        Self {
            pos: Vec2::new(field_width / 2.0, field_height / 2.0),
            vel: Vec2::ZERO,
            on_fire: false,
        }
    }
}

/// Events the simulation emits for the host to react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// Round ended; the outcome handler must be called exactly once with this
    RoundOver { won: bool },
    /// Ball landed on a pad and stopped
    BallStopped,
    /// Ball touched a hazard; fire sequence started
    CaughtFire,
    /// An obstacle entered the playfield
    ObstacleSpawned { id: u32, variant: ObstacleVariant },
}

/// One complete play session: Idle → Playing → {OnFire | Finished}.
///
/// Owns all per-round state. `Finished` is terminal; constructing a new
/// `Round` is the only restart path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    /// Round seed for reproducible spawner rolls
    pub seed: u64,
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: RoundPhase,
    /// Seconds remaining until the survival win
    pub secs_left: i32,
    /// Countdown-running guard. Start idempotence keys off this flag rather
    /// than `phase`, so the two can drift; known consistency risk, kept
    /// deliberately.
    pub timer_active: bool,
    /// Smoothed horizontal tilt, mutated only through the sensor path
    pub tilt: f32,
    pub ball: Ball,
    pub obstacles: Vec<Obstacle>,
    /// Simulation tick counter; advances even while Idle, so the spawner
    /// runs before start
    pub time_ticks: u64,
    /// Ticks remaining in the fire sequence while `OnFire`
    pub fire_ticks_left: u32,
    /// Spawner cadence; runs whenever the sim steps, even while Idle
    pub spawn_timer: SecondTimer,
    next_id: u32,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<SimEvent>,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

impl Round {
    /// Build a fresh round. This is the only way to (re)start; no in-place
    /// reset exists.
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let ball = Ball::new(tuning.field_width, tuning.field_height);
        let spawn_interval = tuning.spawn_interval_secs;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            secs_left: tuning.win_time_secs,
            tuning,
            phase: RoundPhase::Idle,
            timer_active: false,
            tilt: 0.0,
            ball,
            obstacles: Vec::new(),
            time_ticks: 0,
            fire_ticks_left: 0,
            spawn_timer: SecondTimer::new(spawn_interval),
            next_id: 1,
            events: Vec::new(),
        }
    }

    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Start input. Valid only from Idle; a second call while Playing is a
    /// no-op and in particular must not restart the countdown (guarded by
    /// `timer_active`, not the phase).
    pub fn start(&mut self) {
        if matches!(self.phase, RoundPhase::Finished { .. } | RoundPhase::OnFire) {
            return;
        }
        self.phase = RoundPhase::Playing;
        if !self.timer_active {
            self.timer_active = true;
            log::info!("round started, {}s to survive", self.secs_left);
        }
    }

    /// One countdown tick (1 Hz). Only decrements while Playing; hitting zero
    /// cancels the countdown and wins the round.
    pub fn on_tick(&mut self) {
        if self.phase != RoundPhase::Playing || !self.timer_active {
            return;
        }
        self.secs_left -= 1;
        if self.secs_left <= 0 {
            self.timer_active = false;
            self.finish();
        }
    }

    /// Dispatch one classified contact event
    pub fn on_contact(&mut self, contact: Contact) {
        match contact.kind() {
            ContactKind::BallPad => {
                // Landing: kill all velocity, no phase change
                self.ball.vel = Vec2::ZERO;
                self.events.push(SimEvent::BallStopped);
            }
            ContactKind::BallHazard => {
                // Re-entrant hazard contacts while burning are no-ops
                if !self.ball.on_fire {
                    self.ball.on_fire = true;
                    self.tilt = 0.0;
                    self.phase = RoundPhase::OnFire;
                    self.fire_ticks_left = secs_to_ticks(FIRE_SEQUENCE_SECS);
                    self.events.push(SimEvent::CaughtFire);
                    log::info!("ball caught fire at {}s left", self.secs_left);
                }
            }
            ContactKind::Ignored => {}
        }
    }

    /// Ball escaped past the playfield top: immediate loss, independent of
    /// the countdown value.
    pub fn on_boundary_exceeded(&mut self) {
        if self.phase != RoundPhase::Playing {
            return;
        }
        self.timer_active = false;
        self.finish();
    }

    /// Latest smoothed sensor value. Last-write-wins; no queueing.
    pub fn on_sensor_sample(&mut self, smoothed_x: f32) {
        // Tilt is dead once the ball burns
        if self.ball.on_fire {
            return;
        }
        self.tilt = smoothed_x;
    }

    /// End the round. Won iff the countdown ran out; every other path (fire,
    /// escape) still has seconds on the clock.
    pub(crate) fn finish(&mut self) {
        if matches!(self.phase, RoundPhase::Finished { .. }) {
            return;
        }
        let won = self.secs_left <= 0;
        self.timer_active = false;
        self.phase = RoundPhase::Finished { won };
        self.events.push(SimEvent::RoundOver { won });
        log::info!("round over, won={won}");
    }

    /// Take and clear pending events
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// True while the physics step should advance the world
    pub fn stepping(&self) -> bool {
        matches!(self.phase, RoundPhase::Playing | RoundPhase::OnFire)
    }
}
