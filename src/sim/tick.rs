//! Fixed timestep simulation tick
//!
//! Advances one round deterministically: spawner cadence, per-step ball
//! control, integration, contact detection, boundary clamp, escape check,
//! and the fire sequence countdown.

use super::contact::{BALL_CATEGORY, Contact, HAZARD_CATEGORY, PAD_CATEGORY, circle_rect_overlap};
use super::spawn::{despawn_expired, spawn_obstacle};
use super::state::{Round, RoundPhase};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start input (tap anywhere). No-op once the round is running.
    pub start: bool,
}

/// Advance the round by one fixed timestep.
///
/// The 1 Hz countdown is NOT driven here; it arrives through
/// `Round::on_tick` from whichever clock source the host wires up.
pub fn tick(round: &mut Round, input: &TickInput, dt: f32) {
    if input.start {
        round.start();
    }

    if matches!(round.phase, RoundPhase::Finished { .. }) {
        return;
    }

    round.time_ticks += 1;

    // The spawner runs whenever the sim steps, even while Idle: pads are
    // already queuing up before the first tap.
    for _ in 0..round.spawn_timer.advance(dt) {
        spawn_obstacle(round);
    }
    despawn_expired(round);

    if !round.stepping() {
        return;
    }

    // Per-step ball control: horizontal velocity follows the smoothed tilt,
    // vertical velocity is reset so gravity never accumulates across steps
    round.ball.vel.x = round.tilt * round.tuning.tilt_gain;
    round.ball.vel.y = GRAVITY * dt;
    round.ball.pos += round.ball.vel * dt;

    // World scroll and pad oscillation
    let fall_speed = round.tuning.fall_speed;
    for obstacle in &mut round.obstacles {
        obstacle.advance(dt, fall_speed);
    }

    // Contact detection: the ball against every pad and hazard body. Pads
    // are solid from above; an overlapped pad carries the ball on its top
    // edge, which is how a cornered ball gets pushed toward the top.
    let field_width = round.tuning.field_width;
    let mut contacts = Vec::new();
    let mut carry_y: Option<f32> = None;
    for obstacle in &round.obstacles {
        let pad = obstacle.pad_rect(field_width);
        if circle_rect_overlap(round.ball.pos, BALL_RADIUS, &pad) {
            contacts.push(Contact::new(BALL_CATEGORY, PAD_CATEGORY));
            if round.ball.pos.y >= pad.min.y {
                let top = pad.max().y + BALL_RADIUS;
                carry_y = Some(carry_y.map_or(top, |y: f32| y.max(top)));
            }
        }
        if let Some(hazard) = obstacle.hazard_rect(field_width)
            && circle_rect_overlap(round.ball.pos, BALL_RADIUS, &hazard)
        {
            contacts.push(Contact::new(BALL_CATEGORY, HAZARD_CATEGORY));
        }
    }
    for contact in contacts {
        round.on_contact(contact);
    }
    if let Some(y) = carry_y {
        round.ball.pos.y = y;
    }

    // Hard boundary clamp, every step, independent of contact detection
    round.ball.pos.y = round.ball.pos.y.max(EDGE_MARGIN);
    round.ball.pos.x = round
        .ball
        .pos
        .x
        .clamp(EDGE_MARGIN, field_width - EDGE_MARGIN);

    // Escape past the playfield top is a loss in its own right
    if round.ball.pos.y > round.tuning.field_height {
        round.on_boundary_exceeded();
    }

    // Fire sequence: a fixed visual duration, then the round is lost
    if round.phase == RoundPhase::OnFire {
        round.fire_ticks_left = round.fire_ticks_left.saturating_sub(1);
        if round.fire_ticks_left == 0 {
            round.finish();
        }
    }
}
